//! Offerings and expenses API endpoints

use api_types::{
    Created,
    movement::{Expense, ExpenseNew, MovementListQuery, MovementUpdate, Offering, OfferingNew},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{category_from_api, expense_view, method_from_api, offering_view},
    server::ServerState,
};

fn list_filter(query: MovementListQuery) -> engine::MovementListFilter {
    engine::MovementListFilter {
        from: query.from,
        to: query.to,
        project_id: query.project_id,
    }
}

fn update_cmd(
    committee_id: Uuid,
    movement_id: Uuid,
    payload: MovementUpdate,
) -> engine::UpdateMovementCmd {
    let mut cmd = engine::UpdateMovementCmd::new(committee_id, movement_id);
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount_minor(amount_minor);
    }
    if let Some(date) = payload.date {
        cmd = cmd.occurred_on(date);
    }
    if let Some(concept) = payload.concept {
        cmd = cmd.concept(concept);
    }
    cmd
}

pub async fn offering_new(
    State(state): State<ServerState>,
    Path(committee_id): Path<Uuid>,
    Json(payload): Json<OfferingNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let mut cmd = engine::RecordOfferingCmd::new(
        committee_id,
        payload.registered_by,
        payload.amount_minor,
        payload.date,
        payload.concept,
    );
    if let Some(category) = payload.category {
        cmd = cmd.category(category_from_api(category));
    }
    if let Some(project_id) = payload.project_id {
        cmd = cmd.project_id(project_id);
    }

    let id = state.engine.record_offering(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn offerings(
    State(state): State<ServerState>,
    Path(committee_id): Path<Uuid>,
    Query(query): Query<MovementListQuery>,
) -> Result<Json<Vec<Offering>>, ServerError> {
    let offerings = state
        .engine
        .offerings(committee_id, &list_filter(query))
        .await?;
    Ok(Json(offerings.into_iter().map(offering_view).collect()))
}

pub async fn offering_update(
    State(state): State<ServerState>,
    Path((committee_id, offering_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MovementUpdate>,
) -> Result<Json<Offering>, ServerError> {
    let offering = state
        .engine
        .update_offering(update_cmd(committee_id, offering_id, payload))
        .await?;
    Ok(Json(offering_view(offering)))
}

pub async fn offering_delete(
    State(state): State<ServerState>,
    Path((committee_id, offering_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_offering(committee_id, offering_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn expense_new(
    State(state): State<ServerState>,
    Path(committee_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let mut cmd = engine::RecordExpenseCmd::new(
        committee_id,
        payload.registered_by,
        payload.amount_minor,
        payload.date,
        payload.concept,
    );
    if let Some(method) = payload.payment_method {
        cmd = cmd.payment_method(method_from_api(method));
    }
    if let Some(project_id) = payload.project_id {
        cmd = cmd.project_id(project_id);
    }
    if let Some(receipt_ref) = payload.receipt_ref {
        cmd = cmd.receipt_ref(receipt_ref);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let id = state.engine.record_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn expenses(
    State(state): State<ServerState>,
    Path(committee_id): Path<Uuid>,
    Query(query): Query<MovementListQuery>,
) -> Result<Json<Vec<Expense>>, ServerError> {
    let expenses = state
        .engine
        .expenses(committee_id, &list_filter(query))
        .await?;
    Ok(Json(expenses.into_iter().map(expense_view).collect()))
}

pub async fn expense_update(
    State(state): State<ServerState>,
    Path((committee_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MovementUpdate>,
) -> Result<Json<Expense>, ServerError> {
    let expense = state
        .engine
        .update_expense(update_cmd(committee_id, expense_id, payload))
        .await?;
    Ok(Json(expense_view(expense)))
}

pub async fn expense_delete(
    State(state): State<ServerState>,
    Path((committee_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(committee_id, expense_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
