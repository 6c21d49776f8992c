//! Pledge primitives and the pledge lifecycle.
//!
//! A `Pledge` is a member's commitment to contribute `amount_total_minor` by
//! `due_date`. Only three statuses are ever stored (`active`, `completed`,
//! `cancelled`); `overdue` is derived at read time, see [`PledgeState`].
//!
//! Invariant: `0 <= amount_collected_minor <= amount_total_minor`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{ensure_positive, parse_optional_uuid, parse_uuid},
};

/// Status persisted on the pledge row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeStatus {
    Active,
    Completed,
    Cancelled,
}

impl PledgeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses never accept payments again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl TryFrom<&str> for PledgeStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid pledge status: {other}"
            ))),
        }
    }
}

/// Read-time classification of a pledge.
///
/// `Overdue` is `stored == active && due_date < today`; it reverts on its own
/// once the due date moves or the stored status changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeState {
    Active,
    Overdue,
    Completed,
    Cancelled,
}

impl PledgeState {
    pub fn derive(status: PledgeStatus, due_date: NaiveDate, today: NaiveDate) -> Self {
        match status {
            PledgeStatus::Active if due_date < today => Self::Overdue,
            PledgeStatus::Active => Self::Active,
            PledgeStatus::Completed => Self::Completed,
            PledgeStatus::Cancelled => Self::Cancelled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn accepts_payments(self) -> bool {
        matches!(self, Self::Active | Self::Overdue)
    }
}

impl TryFrom<&str> for PledgeState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "overdue" => Ok(Self::Overdue),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid pledge state: {other}"
            ))),
        }
    }
}

/// Result of applying a payment to a pledge, before it is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentEffect {
    pub amount_collected_minor: i64,
    pub status: PledgeStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pledge {
    pub id: Uuid,
    pub debtor_id: Uuid,
    /// Set for committee-scoped pledges; their payments count as committee
    /// income.
    pub committee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub purpose: Option<String>,
    pub amount_total_minor: i64,
    pub amount_collected_minor: i64,
    pub due_date: NaiveDate,
    pub status: PledgeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub last_updated_by: String,
}

impl Pledge {
    pub fn new(
        debtor_id: Uuid,
        amount_total_minor: i64,
        due_date: NaiveDate,
        created_by: String,
    ) -> ResultEngine<Self> {
        ensure_positive(amount_total_minor, "amount_total")?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            debtor_id,
            committee_id: None,
            project_id: None,
            purpose: None,
            amount_total_minor,
            amount_collected_minor: 0,
            due_date,
            status: PledgeStatus::Active,
            created_at: now,
            updated_at: now,
            last_updated_by: created_by.clone(),
            created_by,
        })
    }

    /// `amount_total - amount_collected`.
    pub fn pending_minor(&self) -> i64 {
        self.amount_total_minor - self.amount_collected_minor
    }

    pub fn state(&self, today: NaiveDate) -> PledgeState {
        PledgeState::derive(self.status, self.due_date, today)
    }

    /// Validates a payment against the current snapshot and returns the
    /// resulting collected amount and stored status.
    pub fn apply_payment(&self, amount_minor: i64, today: NaiveDate) -> ResultEngine<PaymentEffect> {
        ensure_positive(amount_minor, "amount")?;
        let state = self.state(today);
        if !state.accepts_payments() {
            return Err(EngineError::TerminalState(format!(
                "pledge {} is {}",
                self.id,
                state.as_str()
            )));
        }
        let pending = self.pending_minor();
        if amount_minor > pending {
            return Err(EngineError::ExceedsPending(format!(
                "amount {amount_minor} exceeds pending {pending}"
            )));
        }

        let amount_collected_minor = self.amount_collected_minor + amount_minor;
        let status = if amount_collected_minor >= self.amount_total_minor {
            PledgeStatus::Completed
        } else {
            PledgeStatus::Active
        };
        Ok(PaymentEffect {
            amount_collected_minor,
            status,
        })
    }

    /// Validates an explicit edit of `amount_total`.
    pub fn check_amount_total(&self, amount_total_minor: i64) -> ResultEngine<()> {
        ensure_positive(amount_total_minor, "amount_total")?;
        if amount_total_minor < self.amount_collected_minor {
            return Err(EngineError::InvariantViolation(format!(
                "amount_total {amount_total_minor} is below amount_collected {}",
                self.amount_collected_minor
            )));
        }
        Ok(())
    }

    fn check_invariants(&self) -> ResultEngine<()> {
        if self.amount_collected_minor < 0 || self.amount_collected_minor > self.amount_total_minor
        {
            return Err(EngineError::InvariantViolation(format!(
                "pledge {} has amount_collected {} outside [0, {}]",
                self.id, self.amount_collected_minor, self.amount_total_minor
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pledges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub debtor_id: String,
    pub committee_id: Option<String>,
    pub project_id: Option<String>,
    pub purpose: Option<String>,
    pub amount_total_minor: i64,
    pub amount_collected_minor: i64,
    pub due_date: Date,
    pub stored_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub created_by: String,
    pub last_updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::DebtorId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Members,
    #[sea_orm(
        belongs_to = "super::committees::Entity",
        from = "Column::CommitteeId",
        to = "super::committees::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Committees,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::committees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Committees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Pledge> for ActiveModel {
    fn from(pledge: &Pledge) -> Self {
        Self {
            id: ActiveValue::Set(pledge.id.to_string()),
            debtor_id: ActiveValue::Set(pledge.debtor_id.to_string()),
            committee_id: ActiveValue::Set(pledge.committee_id.map(|id| id.to_string())),
            project_id: ActiveValue::Set(pledge.project_id.map(|id| id.to_string())),
            purpose: ActiveValue::Set(pledge.purpose.clone()),
            amount_total_minor: ActiveValue::Set(pledge.amount_total_minor),
            amount_collected_minor: ActiveValue::Set(pledge.amount_collected_minor),
            due_date: ActiveValue::Set(pledge.due_date),
            stored_status: ActiveValue::Set(pledge.status.as_str().to_string()),
            created_at: ActiveValue::Set(pledge.created_at),
            updated_at: ActiveValue::Set(pledge.updated_at),
            created_by: ActiveValue::Set(pledge.created_by.clone()),
            last_updated_by: ActiveValue::Set(pledge.last_updated_by.clone()),
        }
    }
}

impl TryFrom<Model> for Pledge {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let pledge = Self {
            id: parse_uuid(&model.id, "pledge")?,
            debtor_id: parse_uuid(&model.debtor_id, "member")?,
            committee_id: parse_optional_uuid(model.committee_id.as_deref(), "committee")?,
            project_id: parse_optional_uuid(model.project_id.as_deref(), "project")?,
            purpose: model.purpose,
            amount_total_minor: model.amount_total_minor,
            amount_collected_minor: model.amount_collected_minor,
            due_date: model.due_date,
            status: PledgeStatus::try_from(model.stored_status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            created_by: model.created_by,
            last_updated_by: model.last_updated_by,
        };
        pledge.check_invariants()?;
        Ok(pledge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pledge(total: i64) -> Pledge {
        Pledge::new(Uuid::new_v4(), total, date(2026, 12, 31), "treasurer".to_string()).unwrap()
    }

    #[test]
    fn new_pledge_rejects_non_positive_total() {
        let err = Pledge::new(Uuid::new_v4(), 0, date(2026, 1, 1), "t".to_string()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        let err = Pledge::new(Uuid::new_v4(), -5, date(2026, 1, 1), "t".to_string()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn overdue_is_derived_only_for_active() {
        let today = date(2026, 6, 1);
        let due = date(2026, 5, 31);
        assert_eq!(
            PledgeState::derive(PledgeStatus::Active, due, today),
            PledgeState::Overdue
        );
        assert_eq!(
            PledgeState::derive(PledgeStatus::Active, today, today),
            PledgeState::Active
        );
        assert_eq!(
            PledgeState::derive(PledgeStatus::Completed, due, today),
            PledgeState::Completed
        );
        assert_eq!(
            PledgeState::derive(PledgeStatus::Cancelled, due, today),
            PledgeState::Cancelled
        );
    }

    #[test]
    fn partial_then_full_payment_completes() {
        let today = date(2026, 1, 1);
        let mut p = pledge(100_000);

        let effect = p.apply_payment(40_000, today).unwrap();
        assert_eq!(effect.amount_collected_minor, 40_000);
        assert_eq!(effect.status, PledgeStatus::Active);
        p.amount_collected_minor = effect.amount_collected_minor;

        let effect = p.apply_payment(60_000, today).unwrap();
        assert_eq!(effect.amount_collected_minor, 100_000);
        assert_eq!(effect.status, PledgeStatus::Completed);
    }

    #[test]
    fn payment_over_pending_is_rejected() {
        let mut p = pledge(100_000);
        p.amount_collected_minor = 70_000;
        let err = p.apply_payment(30_001, date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::ExceedsPending(_)));
    }

    #[test]
    fn terminal_pledges_reject_payments() {
        let mut p = pledge(100);
        p.status = PledgeStatus::Cancelled;
        let err = p.apply_payment(1, date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::TerminalState(_)));

        p.status = PledgeStatus::Completed;
        p.amount_collected_minor = 100;
        let err = p.apply_payment(1, date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::TerminalState(_)));
    }

    #[test]
    fn overdue_pledge_still_accepts_payments() {
        let p = pledge(500);
        let effect = p.apply_payment(100, date(2027, 3, 1)).unwrap();
        assert_eq!(effect.amount_collected_minor, 100);
    }

    #[test]
    fn amount_total_edit_cannot_undercut_collected() {
        let mut p = pledge(1_000);
        p.amount_collected_minor = 600;
        assert!(p.check_amount_total(600).is_ok());
        assert!(matches!(
            p.check_amount_total(599).unwrap_err(),
            EngineError::InvariantViolation(_)
        ));
        assert!(matches!(
            p.check_amount_total(0).unwrap_err(),
            EngineError::InvalidAmount(_)
        ));
    }
}
