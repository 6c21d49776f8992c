//! Pledges API endpoints

use api_types::{
    Created,
    pledge::{Pledge, PledgeCancel, PledgeList, PledgeListQuery, PledgeNew, PledgeUpdate},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{pledge_view, state_from_api, status_from_api},
    server::ServerState,
};

pub async fn pledge_new(
    State(state): State<ServerState>,
    Json(payload): Json<PledgeNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let mut cmd = engine::CreatePledgeCmd::new(
        payload.debtor_id,
        payload.created_by,
        payload.amount_total_minor,
        payload.due_date,
    );
    if let Some(purpose) = payload.purpose {
        cmd = cmd.purpose(purpose);
    }
    if let Some(committee_id) = payload.committee_id {
        cmd = cmd.committee_id(committee_id);
    }
    if let Some(project_id) = payload.project_id {
        cmd = cmd.project_id(project_id);
    }

    let id = state.engine.new_pledge(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Pledge>, ServerError> {
    Ok(Json(pledge_view(state.engine.pledge(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PledgeListQuery>,
) -> Result<Json<PledgeList>, ServerError> {
    let filter = engine::PledgeListFilter {
        debtor_id: query.debtor_id,
        committee_id: query.committee_id,
        project_id: query.project_id,
        status: query.status.map(status_from_api),
        state: query.state.map(state_from_api),
        due_from: query.due_from,
        due_to: query.due_to,
    };
    let pledges = state.engine.list_pledges(&filter).await?;
    Ok(Json(PledgeList {
        pledges: pledges.into_iter().map(pledge_view).collect(),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PledgeUpdate>,
) -> Result<Json<Pledge>, ServerError> {
    let mut cmd = engine::UpdatePledgeCmd::new(id, payload.actor);
    if let Some(amount_total_minor) = payload.amount_total_minor {
        cmd = cmd.amount_total_minor(amount_total_minor);
    }
    if let Some(due_date) = payload.due_date {
        cmd = cmd.due_date(due_date);
    }
    if let Some(purpose) = payload.purpose {
        cmd = cmd.purpose(purpose);
    }

    Ok(Json(pledge_view(state.engine.update_pledge(cmd).await?)))
}

pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PledgeCancel>,
) -> Result<Json<Pledge>, ServerError> {
    let snapshot = state.engine.cancel_pledge(id, &payload.actor).await?;
    Ok(Json(pledge_view(snapshot)))
}
