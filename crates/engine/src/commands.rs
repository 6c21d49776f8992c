//! Command structs for engine operations.
//!
//! These types group parameters for write operations (pledges, payments,
//! offerings, expenses), keeping call sites readable and avoiding long
//! argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{OfferingCategory, PaymentMethod};

/// Create a pledge for a member.
#[derive(Clone, Debug)]
pub struct CreatePledgeCmd {
    pub debtor_id: Uuid,
    pub amount_total_minor: i64,
    pub due_date: NaiveDate,
    pub purpose: Option<String>,
    pub committee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub created_by: String,
}

impl CreatePledgeCmd {
    #[must_use]
    pub fn new(
        debtor_id: Uuid,
        created_by: impl Into<String>,
        amount_total_minor: i64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            debtor_id,
            amount_total_minor,
            due_date,
            purpose: None,
            committee_id: None,
            project_id: None,
            created_by: created_by.into(),
        }
    }

    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    #[must_use]
    pub fn committee_id(mut self, committee_id: Uuid) -> Self {
        self.committee_id = Some(committee_id);
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Explicit edit of a pledge. `None` fields are left untouched; a blank
/// `purpose` clears it.
#[derive(Clone, Debug)]
pub struct UpdatePledgeCmd {
    pub pledge_id: Uuid,
    pub amount_total_minor: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub purpose: Option<String>,
    pub actor: String,
}

impl UpdatePledgeCmd {
    #[must_use]
    pub fn new(pledge_id: Uuid, actor: impl Into<String>) -> Self {
        Self {
            pledge_id,
            amount_total_minor: None,
            due_date: None,
            purpose: None,
            actor: actor.into(),
        }
    }

    #[must_use]
    pub fn amount_total_minor(mut self, amount_total_minor: i64) -> Self {
        self.amount_total_minor = Some(amount_total_minor);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }
}

/// Apply a payment to a pledge.
#[derive(Clone, Debug)]
pub struct RegisterPaymentCmd {
    pub pledge_id: Uuid,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub registered_by: String,
    /// The caller's view of the pledge total. When present it must match the
    /// stored total, otherwise the registration fails with `Conflict`.
    pub expected_amount_total_minor: Option<i64>,
}

impl RegisterPaymentCmd {
    #[must_use]
    pub fn new(
        pledge_id: Uuid,
        registered_by: impl Into<String>,
        amount_minor: i64,
        paid_on: NaiveDate,
    ) -> Self {
        Self {
            pledge_id,
            amount_minor,
            paid_on,
            method: PaymentMethod::Cash,
            note: None,
            registered_by: registered_by.into(),
            expected_amount_total_minor: None,
        }
    }

    #[must_use]
    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn expected_amount_total_minor(mut self, amount_total_minor: i64) -> Self {
        self.expected_amount_total_minor = Some(amount_total_minor);
        self
    }
}

/// Record an offering (income) on a committee ledger.
#[derive(Clone, Debug)]
pub struct RecordOfferingCmd {
    pub committee_id: Uuid,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub category: OfferingCategory,
    pub concept: String,
    pub project_id: Option<Uuid>,
    pub registered_by: String,
}

impl RecordOfferingCmd {
    #[must_use]
    pub fn new(
        committee_id: Uuid,
        registered_by: impl Into<String>,
        amount_minor: i64,
        occurred_on: NaiveDate,
        concept: impl Into<String>,
    ) -> Self {
        Self {
            committee_id,
            amount_minor,
            occurred_on,
            category: OfferingCategory::Offering,
            concept: concept.into(),
            project_id: None,
            registered_by: registered_by.into(),
        }
    }

    #[must_use]
    pub fn category(mut self, category: OfferingCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Record an expense (outflow) on a committee ledger.
#[derive(Clone, Debug)]
pub struct RecordExpenseCmd {
    pub committee_id: Uuid,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub concept: String,
    pub payment_method: PaymentMethod,
    pub project_id: Option<Uuid>,
    pub receipt_ref: Option<String>,
    pub note: Option<String>,
    pub registered_by: String,
}

impl RecordExpenseCmd {
    #[must_use]
    pub fn new(
        committee_id: Uuid,
        registered_by: impl Into<String>,
        amount_minor: i64,
        occurred_on: NaiveDate,
        concept: impl Into<String>,
    ) -> Self {
        Self {
            committee_id,
            amount_minor,
            occurred_on,
            concept: concept.into(),
            payment_method: PaymentMethod::Cash,
            project_id: None,
            receipt_ref: None,
            note: None,
            registered_by: registered_by.into(),
        }
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    #[must_use]
    pub fn receipt_ref(mut self, receipt_ref: impl Into<String>) -> Self {
        self.receipt_ref = Some(receipt_ref.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Administrative correction of an offering or expense.
#[derive(Clone, Debug)]
pub struct UpdateMovementCmd {
    pub committee_id: Uuid,
    pub movement_id: Uuid,
    pub amount_minor: Option<i64>,
    pub occurred_on: Option<NaiveDate>,
    pub concept: Option<String>,
}

impl UpdateMovementCmd {
    #[must_use]
    pub fn new(committee_id: Uuid, movement_id: Uuid) -> Self {
        Self {
            committee_id,
            movement_id,
            amount_minor: None,
            occurred_on: None,
            concept: None,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn occurred_on(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }

    #[must_use]
    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }
}

/// Create a fundraising project.
#[derive(Clone, Debug)]
pub struct CreateProjectCmd {
    pub name: String,
    pub committee_id: Option<Uuid>,
    pub goal_minor: Option<i64>,
}

impl CreateProjectCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            committee_id: None,
            goal_minor: None,
        }
    }

    #[must_use]
    pub fn committee_id(mut self, committee_id: Uuid) -> Self {
        self.committee_id = Some(committee_id);
        self
    }

    #[must_use]
    pub fn goal_minor(mut self, goal_minor: i64) -> Self {
        self.goal_minor = Some(goal_minor);
        self
    }
}
