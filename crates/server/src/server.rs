use axum::{
    Router,
    routing::{get, patch, post},
};

use std::sync::Arc;

use crate::{balances, committees, members, movements, payments, pledges, projects};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Builds the HTTP surface over a shared engine.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/members", post(members::member_new))
        .route("/members/{id}", get(members::get).delete(members::delete))
        .route("/members/{id}/summary", get(members::summary))
        .route(
            "/committees",
            post(committees::committee_new).get(committees::list),
        )
        .route("/committees/{id}", get(committees::get))
        .route("/committees/{id}/balance", get(balances::committee_balance))
        .route(
            "/committees/{id}/offerings",
            post(movements::offering_new).get(movements::offerings),
        )
        .route(
            "/committees/{id}/offerings/{offering_id}",
            patch(movements::offering_update).delete(movements::offering_delete),
        )
        .route(
            "/committees/{id}/expenses",
            post(movements::expense_new).get(movements::expenses),
        )
        .route(
            "/committees/{id}/expenses/{expense_id}",
            patch(movements::expense_update).delete(movements::expense_delete),
        )
        .route("/projects", post(projects::project_new))
        .route("/projects/{id}/progress", get(projects::progress))
        .route("/pledges", post(pledges::pledge_new).get(pledges::list))
        .route("/pledges/{id}", get(pledges::get).patch(pledges::update))
        .route("/pledges/{id}/cancel", post(pledges::cancel))
        .route("/pledges/{id}/payments", get(payments::list))
        .route("/payments", post(payments::register))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}
