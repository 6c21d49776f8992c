use api_types::{
    Created,
    project::{ProjectNew, ProjectProgress},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn project_new(
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let mut cmd = engine::CreateProjectCmd::new(payload.name);
    if let Some(committee_id) = payload.committee_id {
        cmd = cmd.committee_id(committee_id);
    }
    if let Some(goal_minor) = payload.goal_minor {
        cmd = cmd.goal_minor(goal_minor);
    }
    let id = state.engine.new_project(cmd).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn progress(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectProgress>, ServerError> {
    let progress = state.engine.project_progress(id).await?;
    Ok(Json(ProjectProgress {
        project_id: progress.project_id,
        goal_minor: progress.goal_minor,
        pledged_minor: progress.pledged_minor,
        collected_minor: progress.collected_minor,
        offerings_minor: progress.offerings_minor,
        expenses_minor: progress.expenses_minor,
        net_minor: progress.net_minor,
    }))
}
