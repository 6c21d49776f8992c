use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response body of create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod member {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Member {
        pub id: Uuid,
        pub name: String,
        pub created_at: DateTime<Utc>,
    }

    /// Totals over a member's non-cancelled pledges.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberPledgeSummary {
        pub member_id: Uuid,
        pub pledge_count: u64,
        pub committed_minor: i64,
        pub collected_minor: i64,
        pub pending_minor: i64,
        pub overdue_count: u64,
    }
}

pub mod committee {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommitteeNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Committee {
        pub id: Uuid,
        pub name: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub committee_id: Option<Uuid>,
        /// Fundraising goal in minor units.
        pub goal_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectProgress {
        pub project_id: Uuid,
        pub goal_minor: Option<i64>,
        pub pledged_minor: i64,
        pub collected_minor: i64,
        pub offerings_minor: i64,
        pub expenses_minor: i64,
        pub net_minor: i64,
    }
}

pub mod pledge {
    use super::*;

    /// Status persisted on the pledge.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PledgeStatus {
        Active,
        Completed,
        Cancelled,
    }

    /// Read-time classification; `overdue` is never stored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PledgeState {
        Active,
        Overdue,
        Completed,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeNew {
        pub debtor_id: Uuid,
        pub amount_total_minor: i64,
        pub due_date: NaiveDate,
        pub purpose: Option<String>,
        pub committee_id: Option<Uuid>,
        pub project_id: Option<Uuid>,
        pub created_by: String,
    }

    /// Explicit edit. Absent fields are left untouched; a blank `purpose`
    /// clears it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeUpdate {
        pub amount_total_minor: Option<i64>,
        pub due_date: Option<NaiveDate>,
        pub purpose: Option<String>,
        pub actor: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeCancel {
        pub actor: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PledgeListQuery {
        pub debtor_id: Option<Uuid>,
        pub committee_id: Option<Uuid>,
        pub project_id: Option<Uuid>,
        pub status: Option<PledgeStatus>,
        pub state: Option<PledgeState>,
        pub due_from: Option<NaiveDate>,
        pub due_to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Pledge {
        pub id: Uuid,
        pub debtor_id: Uuid,
        pub committee_id: Option<Uuid>,
        pub project_id: Option<Uuid>,
        pub purpose: Option<String>,
        pub amount_total_minor: i64,
        pub amount_collected_minor: i64,
        pub pending_minor: i64,
        pub due_date: NaiveDate,
        pub status: PledgeStatus,
        pub state: PledgeState,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub created_by: String,
        pub last_updated_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeList {
        pub pledges: Vec<Pledge>,
    }
}

pub mod payment {
    use super::*;

    use crate::pledge::PledgeStatus;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        Transfer,
        Check,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub pledge_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        /// Defaults to `cash`.
        pub method: Option<PaymentMethod>,
        pub note: Option<String>,
        pub registered_by: String,
        /// The caller's view of the pledge total. A mismatch with the stored
        /// total is rejected with 409.
        pub amount_total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentRegistered {
        pub success: bool,
        pub payment_id: Uuid,
        pub amount_collected_minor: i64,
        pub status: PledgeStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Payment {
        pub id: Uuid,
        pub pledge_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub method: PaymentMethod,
        pub note: Option<String>,
        pub registered_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentListQuery {
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentList {
        pub payments: Vec<Payment>,
        pub next_cursor: Option<String>,
    }
}

pub mod movement {
    use super::*;

    use crate::payment::PaymentMethod;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OfferingCategory {
        Tithe,
        Offering,
        Firstfruit,
        Donation,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferingNew {
        pub amount_minor: i64,
        pub date: NaiveDate,
        /// Defaults to `offering`.
        pub category: Option<OfferingCategory>,
        pub concept: String,
        pub project_id: Option<Uuid>,
        pub registered_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub concept: String,
        /// Defaults to `cash`.
        pub payment_method: Option<PaymentMethod>,
        pub project_id: Option<Uuid>,
        pub receipt_ref: Option<String>,
        pub note: Option<String>,
        pub registered_by: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MovementUpdate {
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub concept: Option<String>,
    }

    /// `from` and `to` are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MovementListQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub project_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Offering {
        pub id: Uuid,
        pub committee_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub category: OfferingCategory,
        pub concept: String,
        pub project_id: Option<Uuid>,
        pub registered_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Expense {
        pub id: Uuid,
        pub committee_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub concept: String,
        pub payment_method: PaymentMethod,
        pub project_id: Option<Uuid>,
        pub receipt_ref: Option<String>,
        pub note: Option<String>,
        pub registered_by: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommitteeBalance {
        pub committee_id: Uuid,
        pub balance_minor: i64,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub offering_income_minor: i64,
        pub pledge_income_minor: i64,
    }
}
