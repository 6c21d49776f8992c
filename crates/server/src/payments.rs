//! Payments API endpoints

use api_types::payment::{PaymentList, PaymentListQuery, PaymentNew, PaymentRegistered};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{map_status, method_from_api, payment_view},
    server::ServerState,
};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 200;

/// `register_payment`: applies a payment to a pledge atomically.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentRegistered>), ServerError> {
    let mut cmd = engine::RegisterPaymentCmd::new(
        payload.pledge_id,
        payload.registered_by,
        payload.amount_minor,
        payload.date,
    )
    .expected_amount_total_minor(payload.amount_total_minor);
    if let Some(method) = payload.method {
        cmd = cmd.method(method_from_api(method));
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let outcome = state.engine.register_payment(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentRegistered {
            success: true,
            payment_id: outcome.payment_id,
            amount_collected_minor: outcome.amount_collected_minor,
            status: map_status(outcome.status),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(pledge_id): Path<Uuid>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<PaymentList>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let (payments, next_cursor) = state
        .engine
        .list_payments_page(pledge_id, limit, query.cursor.as_deref())
        .await?;

    Ok(Json(PaymentList {
        payments: payments.into_iter().map(payment_view).collect(),
        next_cursor,
    }))
}
