//! Committee offerings and expenses.
//!
//! Every committed write publishes `BalanceChanged` for its committee. The
//! balance itself is never stored, so corrections and deletions need no
//! compensating entries.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BalanceChangeCause, EngineError, EngineEvent, Expense, Offering, RecordExpenseCmd,
    RecordOfferingCmd, ResultEngine, UpdateMovementCmd, expenses, offerings,
    util::{ensure_positive, normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

/// Filters for listing a committee's movements.
///
/// `from` and `to` are both inclusive.
#[derive(Clone, Debug, Default)]
pub struct MovementListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub project_id: Option<Uuid>,
}

/// Builds the `WHERE` clause shared by the offering and expense listings.
macro_rules! movement_condition {
    ($module:ident, $committee_id:expr, $filter:expr) => {{
        let filter: &MovementListFilter = $filter;
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(EngineError::InvalidInput(
                "invalid range: from must be <= to".to_string(),
            ));
        }
        let mut cond =
            Condition::all().add($module::Column::CommitteeId.eq($committee_id.to_string()));
        if let Some(from) = filter.from {
            cond = cond.add($module::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            cond = cond.add($module::Column::OccurredOn.lte(to));
        }
        if let Some(project_id) = filter.project_id {
            cond = cond.add($module::Column::ProjectId.eq(project_id.to_string()));
        }
        cond
    }};
}

impl Engine {
    /// Record an offering on a committee ledger.
    pub async fn record_offering(&self, cmd: RecordOfferingCmd) -> ResultEngine<Uuid> {
        let RecordOfferingCmd {
            committee_id,
            amount_minor,
            occurred_on,
            category,
            concept,
            project_id,
            registered_by,
        } = cmd;
        let concept = normalize_required_name(&concept, "concept")?;
        let registered_by = normalize_required_name(&registered_by, "registered_by")?;
        let mut offering = Offering::new(
            committee_id,
            amount_minor,
            occurred_on,
            category,
            concept,
            registered_by,
        )?;
        offering.project_id = project_id;

        with_tx!(self, |db_tx| {
            self.require_committee(&db_tx, committee_id).await?;
            self.require_optional_project(&db_tx, project_id).await?;
            offerings::ActiveModel::from(&offering).insert(&db_tx).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(
            offering_id = %offering.id,
            %committee_id,
            amount_minor,
            "offering recorded"
        );
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Offering(offering.id),
        });
        Ok(offering.id)
    }

    /// Record an expense on a committee ledger.
    pub async fn record_expense(&self, cmd: RecordExpenseCmd) -> ResultEngine<Uuid> {
        let RecordExpenseCmd {
            committee_id,
            amount_minor,
            occurred_on,
            concept,
            payment_method,
            project_id,
            receipt_ref,
            note,
            registered_by,
        } = cmd;
        let concept = normalize_required_name(&concept, "concept")?;
        let registered_by = normalize_required_name(&registered_by, "registered_by")?;
        let mut expense = Expense::new(
            committee_id,
            amount_minor,
            occurred_on,
            concept,
            payment_method,
            registered_by,
        )?;
        expense.project_id = project_id;
        expense.receipt_ref = normalize_optional_text(receipt_ref.as_deref());
        expense.note = normalize_optional_text(note.as_deref());

        with_tx!(self, |db_tx| {
            self.require_committee(&db_tx, committee_id).await?;
            self.require_optional_project(&db_tx, project_id).await?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(
            expense_id = %expense.id,
            %committee_id,
            amount_minor,
            "expense recorded"
        );
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Expense(expense.id),
        });
        Ok(expense.id)
    }

    /// A committee's offerings, oldest first.
    pub async fn offerings(
        &self,
        committee_id: Uuid,
        filter: &MovementListFilter,
    ) -> ResultEngine<Vec<Offering>> {
        let cond = movement_condition!(offerings, committee_id, filter);
        with_tx!(self, |db_tx| {
            self.require_committee(&db_tx, committee_id).await?;
            let models = offerings::Entity::find()
                .filter(cond)
                .order_by_asc(offerings::Column::OccurredOn)
                .order_by_asc(offerings::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Offering::try_from).collect()
        })
    }

    /// A committee's expenses, oldest first.
    pub async fn expenses(
        &self,
        committee_id: Uuid,
        filter: &MovementListFilter,
    ) -> ResultEngine<Vec<Expense>> {
        let cond = movement_condition!(expenses, committee_id, filter);
        with_tx!(self, |db_tx| {
            self.require_committee(&db_tx, committee_id).await?;
            let models = expenses::Entity::find()
                .filter(cond)
                .order_by_asc(expenses::Column::OccurredOn)
                .order_by_asc(expenses::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Expense::try_from).collect()
        })
    }

    /// Administrative correction of an offering's amount, date or concept.
    pub async fn update_offering(&self, cmd: UpdateMovementCmd) -> ResultEngine<Offering> {
        let UpdateMovementCmd {
            committee_id,
            movement_id,
            amount_minor,
            occurred_on,
            concept,
        } = cmd;
        let patch = MovementPatch::new(amount_minor, occurred_on, concept.as_deref())?;

        let offering = with_tx!(self, |db_tx| {
            let model = offerings::Entity::find_by_id(movement_id.to_string())
                .filter(offerings::Column::CommitteeId.eq(committee_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("offering".to_string()))?;

            let mut active: offerings::ActiveModel = model.into();
            if let Some(amount_minor) = patch.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(occurred_on) = patch.occurred_on {
                active.occurred_on = ActiveValue::Set(occurred_on);
            }
            if let Some(concept) = patch.concept.clone() {
                active.concept = ActiveValue::Set(concept);
            }
            let model = active.update(&db_tx).await?;
            Offering::try_from(model)
        })?;

        tracing::info!(offering_id = %movement_id, %committee_id, "offering updated");
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Offering(movement_id),
        });
        Ok(offering)
    }

    /// Administrative correction of an expense's amount, date or concept.
    pub async fn update_expense(&self, cmd: UpdateMovementCmd) -> ResultEngine<Expense> {
        let UpdateMovementCmd {
            committee_id,
            movement_id,
            amount_minor,
            occurred_on,
            concept,
        } = cmd;
        let patch = MovementPatch::new(amount_minor, occurred_on, concept.as_deref())?;

        let expense = with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(movement_id.to_string())
                .filter(expenses::Column::CommitteeId.eq(committee_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("expense".to_string()))?;

            let mut active: expenses::ActiveModel = model.into();
            if let Some(amount_minor) = patch.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(occurred_on) = patch.occurred_on {
                active.occurred_on = ActiveValue::Set(occurred_on);
            }
            if let Some(concept) = patch.concept.clone() {
                active.concept = ActiveValue::Set(concept);
            }
            let model = active.update(&db_tx).await?;
            Expense::try_from(model)
        })?;

        tracing::info!(expense_id = %movement_id, %committee_id, "expense updated");
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Expense(movement_id),
        });
        Ok(expense)
    }

    pub async fn delete_offering(&self, committee_id: Uuid, offering_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let res = offerings::Entity::delete_many()
                .filter(offerings::Column::Id.eq(offering_id.to_string()))
                .filter(offerings::Column::CommitteeId.eq(committee_id.to_string()))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::NotFound("offering".to_string()));
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(%offering_id, %committee_id, "offering deleted");
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Offering(offering_id),
        });
        Ok(())
    }

    pub async fn delete_expense(&self, committee_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let res = expenses::Entity::delete_many()
                .filter(expenses::Column::Id.eq(expense_id.to_string()))
                .filter(expenses::Column::CommitteeId.eq(committee_id.to_string()))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::NotFound("expense".to_string()));
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(%expense_id, %committee_id, "expense deleted");
        self.publish(EngineEvent::BalanceChanged {
            committee_id,
            cause: BalanceChangeCause::Expense(expense_id),
        });
        Ok(())
    }
}

/// Validated fields of an `UpdateMovementCmd`.
struct MovementPatch {
    amount_minor: Option<i64>,
    occurred_on: Option<NaiveDate>,
    concept: Option<String>,
}

impl MovementPatch {
    fn new(
        amount_minor: Option<i64>,
        occurred_on: Option<NaiveDate>,
        concept: Option<&str>,
    ) -> ResultEngine<Self> {
        if let Some(amount_minor) = amount_minor {
            ensure_positive(amount_minor, "amount")?;
        }
        let concept = concept
            .map(|c| normalize_required_name(c, "concept"))
            .transpose()?;
        if amount_minor.is_none() && occurred_on.is_none() && concept.is_none() {
            return Err(EngineError::InvalidInput("nothing to update".to_string()));
        }
        Ok(Self {
            amount_minor,
            occurred_on,
            concept,
        })
    }
}
