//! Committee balances and project progress.
//!
//! Both are recomputed from the ledgers on every call; nothing here is
//! stored. Reads run inside one transaction so the income and expense sides
//! come from the same snapshot.

use sea_orm::{
    DatabaseTransaction, JoinType, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, PledgeStatus, ResultEngine, expenses, offerings, payments, pledges,
};

use super::{Engine, with_tx};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeBalance {
    pub committee_id: Uuid,
    pub offering_income_minor: i64,
    /// Payments applied to pledges scoped to this committee.
    pub pledge_income_minor: i64,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    /// `total_income - total_expense`; may be negative.
    pub balance_minor: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub project_id: Uuid,
    pub goal_minor: Option<i64>,
    /// Sum of `amount_total` over the project's non-cancelled pledges.
    pub pledged_minor: i64,
    /// Payments applied to the project's pledges.
    pub collected_minor: i64,
    pub offerings_minor: i64,
    pub expenses_minor: i64,
    /// `collected + offerings - expenses`.
    pub net_minor: i64,
}

pub(super) fn sum_minor(values: impl IntoIterator<Item = i64>, label: &str) -> ResultEngine<i64> {
    values
        .into_iter()
        .try_fold(0i64, i64::checked_add)
        .ok_or_else(|| EngineError::InvariantViolation(format!("{label} overflows")))
}

fn net_minor(income: i64, expense: i64) -> ResultEngine<i64> {
    income
        .checked_sub(expense)
        .ok_or_else(|| EngineError::InvariantViolation("balance overflows".to_string()))
}

impl Engine {
    /// Income, expense and net balance of a committee.
    ///
    /// Income is the committee's offerings plus every payment applied to a
    /// pledge whose `committee_id` is this committee, including payments kept
    /// on pledges that were later cancelled.
    pub async fn committee_balance(&self, committee_id: Uuid) -> ResultEngine<CommitteeBalance> {
        with_tx!(self, |db_tx| {
            self.require_committee(&db_tx, committee_id).await?;
            let committee = committee_id.to_string();

            let offering_amounts: Vec<i64> = offerings::Entity::find()
                .select_only()
                .column(offerings::Column::AmountMinor)
                .filter(offerings::Column::CommitteeId.eq(committee.clone()))
                .into_tuple()
                .all(&db_tx)
                .await?;
            let expense_amounts: Vec<i64> = expenses::Entity::find()
                .select_only()
                .column(expenses::Column::AmountMinor)
                .filter(expenses::Column::CommitteeId.eq(committee.clone()))
                .into_tuple()
                .all(&db_tx)
                .await?;
            let payment_amounts = payment_amounts(
                &db_tx,
                pledges::Column::CommitteeId.eq(committee),
            )
            .await?;

            let offering_income_minor = sum_minor(offering_amounts, "offering income")?;
            let pledge_income_minor = sum_minor(payment_amounts, "pledge income")?;
            let total_income_minor =
                sum_minor([offering_income_minor, pledge_income_minor], "total income")?;
            let total_expense_minor = sum_minor(expense_amounts, "total expense")?;

            Ok(CommitteeBalance {
                committee_id,
                offering_income_minor,
                pledge_income_minor,
                total_income_minor,
                total_expense_minor,
                balance_minor: net_minor(total_income_minor, total_expense_minor)?,
            })
        })
    }

    /// Fundraising progress of a project.
    pub async fn project_progress(&self, project_id: Uuid) -> ResultEngine<ProjectProgress> {
        with_tx!(self, |db_tx| {
            let project = self.require_project(&db_tx, project_id).await?;
            let project_ref = project_id.to_string();

            let pledged: Vec<i64> = pledges::Entity::find()
                .select_only()
                .column(pledges::Column::AmountTotalMinor)
                .filter(pledges::Column::ProjectId.eq(project_ref.clone()))
                .filter(pledges::Column::StoredStatus.ne(PledgeStatus::Cancelled.as_str()))
                .into_tuple()
                .all(&db_tx)
                .await?;
            let collected =
                payment_amounts(&db_tx, pledges::Column::ProjectId.eq(project_ref.clone())).await?;
            let offering_amounts: Vec<i64> = offerings::Entity::find()
                .select_only()
                .column(offerings::Column::AmountMinor)
                .filter(offerings::Column::ProjectId.eq(project_ref.clone()))
                .into_tuple()
                .all(&db_tx)
                .await?;
            let expense_amounts: Vec<i64> = expenses::Entity::find()
                .select_only()
                .column(expenses::Column::AmountMinor)
                .filter(expenses::Column::ProjectId.eq(project_ref))
                .into_tuple()
                .all(&db_tx)
                .await?;

            let collected_minor = sum_minor(collected, "collected")?;
            let offerings_minor = sum_minor(offering_amounts, "offerings")?;
            let expenses_minor = sum_minor(expense_amounts, "expenses")?;
            let income = sum_minor([collected_minor, offerings_minor], "project income")?;

            Ok(ProjectProgress {
                project_id,
                goal_minor: project.goal_minor,
                pledged_minor: sum_minor(pledged, "pledged")?,
                collected_minor,
                offerings_minor,
                expenses_minor,
                net_minor: net_minor(income, expenses_minor)?,
            })
        })
    }
}

/// Amounts of all payments whose pledge matches `pledge_filter`.
async fn payment_amounts(
    db: &DatabaseTransaction,
    pledge_filter: sea_orm::sea_query::SimpleExpr,
) -> ResultEngine<Vec<i64>> {
    let amounts = payments::Entity::find()
        .select_only()
        .column(payments::Column::AmountMinor)
        .join(JoinType::InnerJoin, payments::Relation::Pledges.def())
        .filter(pledge_filter)
        .into_tuple()
        .all(db)
        .await?;
    Ok(amounts)
}
