use api_types::balance::CommitteeBalance;
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// `get_committee_balance`: recomputed from the ledgers on every request.
pub async fn committee_balance(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommitteeBalance>, ServerError> {
    let balance = state.engine.committee_balance(id).await?;
    Ok(Json(CommitteeBalance {
        committee_id: balance.committee_id,
        balance_minor: balance.balance_minor,
        total_income_minor: balance.total_income_minor,
        total_expense_minor: balance.total_expense_minor,
        offering_income_minor: balance.offering_income_minor,
        pledge_income_minor: balance.pledge_income_minor,
    }))
}
