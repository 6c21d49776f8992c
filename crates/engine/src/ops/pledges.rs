use chrono::{NaiveDate, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CreatePledgeCmd, EngineError, EngineEvent, Pledge, PledgeState, PledgeStatus, ResultEngine,
    UpdatePledgeCmd, pledges,
    util::{apply_optional_text_patch, normalize_optional_text},
};

use super::{Engine, balances::sum_minor, with_tx};

/// A pledge together with its read-time classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeSnapshot {
    pub pledge: Pledge,
    pub state: PledgeState,
    pub pending_minor: i64,
}

impl PledgeSnapshot {
    fn new(pledge: Pledge, today: NaiveDate) -> Self {
        Self {
            state: pledge.state(today),
            pending_minor: pledge.pending_minor(),
            pledge,
        }
    }
}

/// Filters for listing pledges.
///
/// `due_from` and `due_to` are both inclusive.
#[derive(Clone, Debug, Default)]
pub struct PledgeListFilter {
    pub debtor_id: Option<Uuid>,
    pub committee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub status: Option<PledgeStatus>,
    /// Derived state; `Overdue` and `Active` depend on the engine clock.
    pub state: Option<PledgeState>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl PledgeListFilter {
    fn condition(&self, today: NaiveDate) -> ResultEngine<Condition> {
        if let (Some(from), Some(to)) = (self.due_from, self.due_to)
            && from > to
        {
            return Err(EngineError::InvalidInput(
                "invalid range: due_from must be <= due_to".to_string(),
            ));
        }

        let mut cond = Condition::all();
        if let Some(debtor_id) = self.debtor_id {
            cond = cond.add(pledges::Column::DebtorId.eq(debtor_id.to_string()));
        }
        if let Some(committee_id) = self.committee_id {
            cond = cond.add(pledges::Column::CommitteeId.eq(committee_id.to_string()));
        }
        if let Some(project_id) = self.project_id {
            cond = cond.add(pledges::Column::ProjectId.eq(project_id.to_string()));
        }
        if let Some(status) = self.status {
            cond = cond.add(pledges::Column::StoredStatus.eq(status.as_str()));
        }
        if let Some(state) = self.state {
            cond = cond.add(match state {
                PledgeState::Overdue => Condition::all()
                    .add(pledges::Column::StoredStatus.eq(PledgeStatus::Active.as_str()))
                    .add(pledges::Column::DueDate.lt(today)),
                PledgeState::Active => Condition::all()
                    .add(pledges::Column::StoredStatus.eq(PledgeStatus::Active.as_str()))
                    .add(pledges::Column::DueDate.gte(today)),
                PledgeState::Completed => Condition::all()
                    .add(pledges::Column::StoredStatus.eq(PledgeStatus::Completed.as_str())),
                PledgeState::Cancelled => Condition::all()
                    .add(pledges::Column::StoredStatus.eq(PledgeStatus::Cancelled.as_str())),
            });
        }
        if let Some(from) = self.due_from {
            cond = cond.add(pledges::Column::DueDate.gte(from));
        }
        if let Some(to) = self.due_to {
            cond = cond.add(pledges::Column::DueDate.lte(to));
        }
        Ok(cond)
    }
}

/// Totals over a member's non-cancelled pledges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeSummary {
    pub debtor_id: Uuid,
    pub pledge_count: u64,
    pub committed_minor: i64,
    pub collected_minor: i64,
    pub pending_minor: i64,
    pub overdue_count: u64,
}

/// Why a conditional pledge edit matched no row, judged on a fresh read.
fn rejected_edit(current: &Pledge, requested_total_minor: i64) -> EngineError {
    if current.status.is_terminal() {
        return EngineError::TerminalState(format!(
            "pledge {} is {}",
            current.id,
            current.status.as_str()
        ));
    }
    EngineError::InvariantViolation(format!(
        "amount_total {requested_total_minor} is below amount_collected {}",
        current.amount_collected_minor
    ))
}

impl PledgeSummary {
    fn include(&mut self, pledge: &Pledge, today: NaiveDate) -> ResultEngine<()> {
        self.pledge_count += 1;
        self.committed_minor =
            sum_minor([self.committed_minor, pledge.amount_total_minor], "committed")?;
        self.collected_minor =
            sum_minor([self.collected_minor, pledge.amount_collected_minor], "collected")?;
        self.pending_minor = sum_minor([self.pending_minor, pledge.pending_minor()], "pending")?;
        if pledge.state(today) == PledgeState::Overdue {
            self.overdue_count += 1;
        }
        Ok(())
    }
}

impl Engine {
    /// Create a new `active` pledge with nothing collected.
    pub async fn new_pledge(&self, cmd: CreatePledgeCmd) -> ResultEngine<Uuid> {
        let CreatePledgeCmd {
            debtor_id,
            amount_total_minor,
            due_date,
            purpose,
            committee_id,
            project_id,
            created_by,
        } = cmd;

        let mut pledge = Pledge::new(debtor_id, amount_total_minor, due_date, created_by)?;
        pledge.purpose = normalize_optional_text(purpose.as_deref());
        pledge.committee_id = committee_id;
        pledge.project_id = project_id;

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, debtor_id).await?;
            self.require_optional_committee(&db_tx, committee_id)
                .await?;
            self.require_optional_project(&db_tx, project_id).await?;

            pledges::ActiveModel::from(&pledge).insert(&db_tx).await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(
            pledge_id = %pledge.id,
            %debtor_id,
            amount_total_minor,
            "pledge created"
        );
        self.publish(EngineEvent::PledgeChanged {
            pledge_id: pledge.id,
            status: pledge.status,
            amount_collected_minor: 0,
        });
        Ok(pledge.id)
    }

    /// Return a pledge with its derived state for today.
    pub async fn pledge(&self, pledge_id: Uuid) -> ResultEngine<PledgeSnapshot> {
        let today = self.today();
        with_tx!(self, |db_tx| {
            let model = self.require_pledge(&db_tx, pledge_id).await?;
            Ok(PledgeSnapshot::new(Pledge::try_from(model)?, today))
        })
    }

    /// List pledges ordered by due date, then creation time.
    pub async fn list_pledges(&self, filter: &PledgeListFilter) -> ResultEngine<Vec<PledgeSnapshot>> {
        let today = self.today();
        let cond = filter.condition(today)?;
        let models = pledges::Entity::find()
            .filter(cond)
            .order_by_asc(pledges::Column::DueDate)
            .order_by_asc(pledges::Column::CreatedAt)
            .order_by_asc(pledges::Column::Id)
            .all(&self.database)
            .await?;
        models
            .into_iter()
            .map(|model| Ok(PledgeSnapshot::new(Pledge::try_from(model)?, today)))
            .collect()
    }

    /// Cancel a pledge.
    ///
    /// Completed pledges are terminal. Cancelling a cancelled pledge returns
    /// it unchanged. Collected money stays where it is: the snapshot exposes
    /// `amount_collected_minor` for callers that want a confirmation step.
    pub async fn cancel_pledge(&self, pledge_id: Uuid, actor: &str) -> ResultEngine<PledgeSnapshot> {
        let today = self.today();
        let (pledge, changed) = with_tx!(self, |db_tx| {
            let model = self.require_pledge_for_update(&db_tx, pledge_id).await?;
            let mut pledge = Pledge::try_from(model)?;
            match pledge.status {
                PledgeStatus::Cancelled => Ok((pledge, false)),
                PledgeStatus::Completed => Err(EngineError::TerminalState(format!(
                    "pledge {pledge_id} is completed"
                ))),
                PledgeStatus::Active => {
                    let now = Utc::now();
                    let res = pledges::Entity::update_many()
                        .col_expr(
                            pledges::Column::StoredStatus,
                            Expr::value(PledgeStatus::Cancelled.as_str()),
                        )
                        .col_expr(pledges::Column::UpdatedAt, Expr::value(now))
                        .col_expr(pledges::Column::LastUpdatedBy, Expr::value(actor))
                        .filter(pledges::Column::Id.eq(pledge_id.to_string()))
                        .filter(pledges::Column::StoredStatus.eq(PledgeStatus::Active.as_str()))
                        .exec(&db_tx)
                        .await?;
                    if res.rows_affected == 0 {
                        // A registration completed it after our read.
                        return Err(EngineError::TerminalState(format!(
                            "pledge {pledge_id} is completed"
                        )));
                    }
                    pledge.status = PledgeStatus::Cancelled;
                    pledge.updated_at = now;
                    pledge.last_updated_by = actor.to_string();
                    Ok((pledge, true))
                }
            }
        })?;

        if changed {
            tracing::info!(
                %pledge_id,
                actor,
                amount_collected_minor = pledge.amount_collected_minor,
                "pledge cancelled"
            );
            self.publish(EngineEvent::PledgeChanged {
                pledge_id,
                status: pledge.status,
                amount_collected_minor: pledge.amount_collected_minor,
            });
        }
        Ok(PledgeSnapshot::new(pledge, today))
    }

    /// Explicit edit of a pledge's total, due date or purpose.
    ///
    /// The total can never drop below what was already collected. The check
    /// is part of the `UPDATE` itself, so a registration committing between
    /// our read and our write cannot break the invariant.
    pub async fn update_pledge(&self, cmd: UpdatePledgeCmd) -> ResultEngine<PledgeSnapshot> {
        let UpdatePledgeCmd {
            pledge_id,
            amount_total_minor,
            due_date,
            purpose,
            actor,
        } = cmd;
        let today = self.today();

        let pledge = with_tx!(self, |db_tx| {
            let model = self.require_pledge_for_update(&db_tx, pledge_id).await?;
            let mut pledge = Pledge::try_from(model)?;
            if pledge.status.is_terminal() {
                return Err(EngineError::TerminalState(format!(
                    "pledge {pledge_id} is {}",
                    pledge.status.as_str()
                )));
            }
            if let Some(amount_total_minor) = amount_total_minor {
                pledge.check_amount_total(amount_total_minor)?;
                pledge.amount_total_minor = amount_total_minor;
            }
            if let Some(due_date) = due_date {
                pledge.due_date = due_date;
            }
            pledge.purpose = apply_optional_text_patch(pledge.purpose, purpose.as_deref());
            pledge.updated_at = Utc::now();
            pledge.last_updated_by = actor.clone();

            let res = pledges::Entity::update_many()
                .col_expr(
                    pledges::Column::AmountTotalMinor,
                    Expr::value(pledge.amount_total_minor),
                )
                .col_expr(pledges::Column::DueDate, Expr::value(pledge.due_date))
                .col_expr(pledges::Column::Purpose, Expr::value(pledge.purpose.clone()))
                .col_expr(pledges::Column::UpdatedAt, Expr::value(pledge.updated_at))
                .col_expr(
                    pledges::Column::LastUpdatedBy,
                    Expr::value(pledge.last_updated_by.clone()),
                )
                .filter(pledges::Column::Id.eq(pledge_id.to_string()))
                .filter(pledges::Column::StoredStatus.eq(PledgeStatus::Active.as_str()))
                .filter(pledges::Column::AmountCollectedMinor.lte(pledge.amount_total_minor))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                // The row moved after our read: report what it moved to.
                let current = Pledge::try_from(self.require_pledge(&db_tx, pledge_id).await?)?;
                return Err(rejected_edit(&current, pledge.amount_total_minor));
            }
            Ok::<_, EngineError>(pledge)
        })?;

        tracing::info!(%pledge_id, %actor, "pledge updated");
        self.publish(EngineEvent::PledgeChanged {
            pledge_id,
            status: pledge.status,
            amount_collected_minor: pledge.amount_collected_minor,
        });
        Ok(PledgeSnapshot::new(pledge, today))
    }

    /// Committed, collected and pending totals over a member's non-cancelled
    /// pledges.
    pub async fn pledge_summary(&self, debtor_id: Uuid) -> ResultEngine<PledgeSummary> {
        let today = self.today();
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, debtor_id).await?;
            let models = pledges::Entity::find()
                .filter(pledges::Column::DebtorId.eq(debtor_id.to_string()))
                .filter(pledges::Column::StoredStatus.ne(PledgeStatus::Cancelled.as_str()))
                .all(&db_tx)
                .await?;

            let mut summary = PledgeSummary {
                debtor_id,
                ..PledgeSummary::default()
            };
            for model in models {
                summary.include(&Pledge::try_from(model)?, today)?;
            }
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pledge(total: i64, due_date: NaiveDate) -> Pledge {
        Pledge::new(Uuid::new_v4(), total, due_date, "treasurer".to_string()).unwrap()
    }

    #[test]
    fn summary_counts_overdue_and_pending() {
        let today = date(2026, 10, 15);
        let mut paid = pledge(50_000, date(2026, 9, 1));
        paid.amount_collected_minor = 20_000;

        let mut summary = PledgeSummary::default();
        summary.include(&paid, today).unwrap();
        summary.include(&pledge(10_000, date(2026, 12, 1)), today).unwrap();

        assert_eq!(summary.pledge_count, 2);
        assert_eq!(summary.committed_minor, 60_000);
        assert_eq!(summary.collected_minor, 20_000);
        assert_eq!(summary.pending_minor, 40_000);
        assert_eq!(summary.overdue_count, 1);
    }

    #[test]
    fn summary_reports_overflow_instead_of_wrapping() {
        let today = date(2026, 10, 15);
        let mut summary = PledgeSummary::default();
        summary.include(&pledge(i64::MAX, date(2026, 12, 1)), today).unwrap();

        let err = summary
            .include(&pledge(i64::MAX, date(2026, 12, 1)), today)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
    }

    #[test]
    fn edit_lost_to_completion_is_terminal() {
        let mut current = pledge(100_000, date(2026, 12, 1));
        current.amount_collected_minor = 100_000;
        current.status = PledgeStatus::Completed;

        assert!(matches!(
            rejected_edit(&current, 90_000),
            EngineError::TerminalState(_)
        ));
    }

    #[test]
    fn edit_lost_to_payment_is_invariant_violation() {
        let mut current = pledge(100_000, date(2026, 12, 1));
        current.amount_collected_minor = 95_000;

        assert!(matches!(
            rejected_edit(&current, 90_000),
            EngineError::InvariantViolation(_)
        ));
    }
}
