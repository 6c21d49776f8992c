use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BalanceChangeCause, EngineError, EngineEvent, Payment, Pledge, PledgeStatus,
    RegisterPaymentCmd, ResultEngine, payments, pledges,
    util::{ensure_positive, normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

const MAX_REGISTRATION_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF: Duration = Duration::from_millis(15);

/// What a committed registration left behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub payment_id: Uuid,
    pub pledge_id: Uuid,
    pub amount_collected_minor: i64,
    pub status: PledgeStatus,
    pub committee_id: Option<Uuid>,
}

enum Attempt {
    Committed(RegistrationOutcome),
    /// The pledge row changed between our read and our conditional update.
    LostRace,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PaymentsCursor {
    created_at: DateTime<Utc>,
    payment_id: String,
}

impl PaymentsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid payments cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid payments cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid payments cursor".to_string()))
    }
}

impl Engine {
    /// Apply a payment to a pledge.
    ///
    /// The payment row and the pledge update commit together or not at all.
    /// The pledge update only lands if the row still holds the values this
    /// attempt validated against; otherwise the attempt rolls back, re-reads
    /// and re-validates, so a concurrent payment can never push
    /// `amount_collected` past `amount_total`. Lock contention reported by the
    /// backend is retried the same way. Once the attempts run out the call
    /// fails with `Conflict` and nothing is persisted.
    ///
    /// Not idempotent: two successful calls record two payments.
    pub async fn register_payment(
        &self,
        cmd: RegisterPaymentCmd,
    ) -> ResultEngine<RegistrationOutcome> {
        ensure_positive(cmd.amount_minor, "amount")?;
        let registered_by = normalize_required_name(&cmd.registered_by, "registered_by")?;
        let note = normalize_optional_text(cmd.note.as_deref());
        let today = self.today();

        for attempt in 1..=MAX_REGISTRATION_ATTEMPTS {
            match self
                .try_register_payment(&cmd, &registered_by, note.clone(), today)
                .await
            {
                Ok(Attempt::Committed(outcome)) => {
                    tracing::info!(
                        pledge_id = %outcome.pledge_id,
                        payment_id = %outcome.payment_id,
                        amount_minor = cmd.amount_minor,
                        amount_collected_minor = outcome.amount_collected_minor,
                        status = outcome.status.as_str(),
                        "payment registered"
                    );
                    self.publish(EngineEvent::PledgeChanged {
                        pledge_id: outcome.pledge_id,
                        status: outcome.status,
                        amount_collected_minor: outcome.amount_collected_minor,
                    });
                    if let Some(committee_id) = outcome.committee_id {
                        self.publish(EngineEvent::BalanceChanged {
                            committee_id,
                            cause: BalanceChangeCause::Payment(outcome.payment_id),
                        });
                    }
                    return Ok(outcome);
                }
                Ok(Attempt::LostRace) => {
                    tracing::debug!(
                        pledge_id = %cmd.pledge_id,
                        attempt,
                        "pledge changed concurrently, retrying registration"
                    );
                }
                Err(err) if err.is_lock_contention() => {
                    tracing::debug!(
                        pledge_id = %cmd.pledge_id,
                        attempt,
                        error = %err,
                        "pledge row busy, retrying registration"
                    );
                }
                Err(err) => return Err(err),
            }

            if attempt < MAX_REGISTRATION_ATTEMPTS {
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
        }

        tracing::warn!(
            pledge_id = %cmd.pledge_id,
            attempts = MAX_REGISTRATION_ATTEMPTS,
            "payment registration gave up"
        );
        Err(EngineError::Conflict(format!(
            "pledge {} kept changing, registration not applied",
            cmd.pledge_id
        )))
    }

    async fn try_register_payment(
        &self,
        cmd: &RegisterPaymentCmd,
        registered_by: &str,
        note: Option<String>,
        today: NaiveDate,
    ) -> ResultEngine<Attempt> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_pledge_for_update(&db_tx, cmd.pledge_id)
                .await?;
            let pledge = Pledge::try_from(model)?;

            if let Some(expected) = cmd.expected_amount_total_minor
                && expected != pledge.amount_total_minor
            {
                return Err(EngineError::Conflict(format!(
                    "pledge total is {}, caller expected {expected}",
                    pledge.amount_total_minor
                )));
            }
            let effect = pledge.apply_payment(cmd.amount_minor, today)?;

            let payment = Payment::new(
                pledge.id,
                cmd.amount_minor,
                cmd.paid_on,
                cmd.method,
                note,
                registered_by.to_string(),
            )?;

            let res = pledges::Entity::update_many()
                .col_expr(
                    pledges::Column::AmountCollectedMinor,
                    Expr::value(effect.amount_collected_minor),
                )
                .col_expr(
                    pledges::Column::StoredStatus,
                    Expr::value(effect.status.as_str()),
                )
                .col_expr(pledges::Column::UpdatedAt, Expr::value(payment.created_at))
                .col_expr(pledges::Column::LastUpdatedBy, Expr::value(registered_by))
                .filter(pledges::Column::Id.eq(pledge.id.to_string()))
                .filter(pledges::Column::AmountCollectedMinor.eq(pledge.amount_collected_minor))
                .filter(pledges::Column::AmountTotalMinor.eq(pledge.amount_total_minor))
                .filter(pledges::Column::StoredStatus.eq(PledgeStatus::Active.as_str()))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Ok(Attempt::LostRace);
            }

            payments::ActiveModel::from(&payment).insert(&db_tx).await?;

            Ok(Attempt::Committed(RegistrationOutcome {
                payment_id: payment.id,
                pledge_id: pledge.id,
                amount_collected_minor: effect.amount_collected_minor,
                status: effect.status,
                committee_id: pledge.committee_id,
            }))
        })
    }

    /// All payments of a pledge, oldest first.
    pub async fn payments_for_pledge(&self, pledge_id: Uuid) -> ResultEngine<Vec<Payment>> {
        with_tx!(self, |db_tx| {
            self.require_pledge(&db_tx, pledge_id).await?;
            let models = payments::Entity::find()
                .filter(payments::Column::PledgeId.eq(pledge_id.to_string()))
                .order_by_asc(payments::Column::CreatedAt)
                .order_by_asc(payments::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Payment::try_from).collect()
        })
    }

    /// Lists the payments of a pledge with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(created_at DESC, payment_id DESC)`.
    pub async fn list_payments_page(
        &self,
        pledge_id: Uuid,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<(Vec<Payment>, Option<String>)> {
        if limit == 0 {
            return Err(EngineError::InvalidInput("limit must be > 0".to_string()));
        }
        with_tx!(self, |db_tx| {
            self.require_pledge(&db_tx, pledge_id).await?;

            let mut query = payments::Entity::find()
                .filter(payments::Column::PledgeId.eq(pledge_id.to_string()))
                .order_by_desc(payments::Column::CreatedAt)
                .order_by_desc(payments::Column::Id)
                .limit(limit.saturating_add(1));
            if let Some(cursor) = cursor {
                let cursor = PaymentsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(payments::Column::CreatedAt.lt(cursor.created_at))
                        .add(
                            Condition::all()
                                .add(payments::Column::CreatedAt.eq(cursor.created_at))
                                .add(payments::Column::Id.lt(cursor.payment_id)),
                        ),
                );
            }

            let models = query.all(&db_tx).await?;
            let has_more = models.len() > limit as usize;
            let items = models
                .into_iter()
                .take(limit as usize)
                .map(Payment::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let next_cursor = if has_more {
                items
                    .last()
                    .map(|p| PaymentsCursor {
                        created_at: p.created_at,
                        payment_id: p.id.to_string(),
                    })
                    .map(|c| c.encode())
                    .transpose()?
            } else {
                None
            };
            Ok((items, next_cursor))
        })
    }
}
