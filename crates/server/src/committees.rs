//! Committees API endpoints

use api_types::{
    Created,
    committee::{Committee, CommitteeNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(committee: engine::Committee) -> Committee {
    Committee {
        id: committee.id,
        name: committee.name,
        created_at: committee.created_at,
    }
}

pub async fn committee_new(
    State(state): State<ServerState>,
    Json(payload): Json<CommitteeNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state.engine.new_committee(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Committee>>, ServerError> {
    let committees = state.engine.committees().await?;
    Ok(Json(committees.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Committee>, ServerError> {
    Ok(Json(view(state.engine.committee(id).await?)))
}
