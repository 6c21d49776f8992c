//! Members API endpoints

use api_types::{
    Created,
    member::{Member, MemberNew, MemberPledgeSummary},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn member_new(
    State(state): State<ServerState>,
    Json(payload): Json<MemberNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state.engine.new_member(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>, ServerError> {
    let member = state.engine.member(id).await?;
    Ok(Json(Member {
        id: member.id,
        name: member.name,
        created_at: member.created_at,
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberPledgeSummary>, ServerError> {
    let summary = state.engine.pledge_summary(id).await?;
    Ok(Json(MemberPledgeSummary {
        member_id: summary.debtor_id,
        pledge_count: summary.pledge_count,
        committed_minor: summary.committed_minor,
        collected_minor: summary.collected_minor,
        pending_minor: summary.pending_minor,
        overdue_count: summary.overdue_count,
    }))
}
