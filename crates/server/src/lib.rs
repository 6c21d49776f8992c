use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod balances;
mod committees;
mod convert;
mod members;
mod movements;
mod payments;
mod pledges;
mod projects;
mod server;

pub mod types {
    pub use api_types::Created;

    pub mod member {
        pub use api_types::member::{Member, MemberNew, MemberPledgeSummary};
    }

    pub mod committee {
        pub use api_types::committee::{Committee, CommitteeNew};
    }

    pub mod project {
        pub use api_types::project::{ProjectNew, ProjectProgress};
    }

    pub mod pledge {
        pub use api_types::pledge::{
            Pledge, PledgeCancel, PledgeList, PledgeListQuery, PledgeNew, PledgeState,
            PledgeStatus, PledgeUpdate,
        };
    }

    pub mod payment {
        pub use api_types::payment::{
            Payment, PaymentList, PaymentListQuery, PaymentMethod, PaymentNew, PaymentRegistered,
        };
    }

    pub mod movement {
        pub use api_types::movement::{
            Expense, ExpenseNew, MovementListQuery, MovementUpdate, Offering, OfferingCategory,
            OfferingNew,
        };
    }

    pub mod balance {
        pub use api_types::balance::CommitteeBalance;
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::ExceedsPending(_)
        | EngineError::InvariantViolation(_)
        | EngineError::TerminalState(_)
        | EngineError::InvalidInput(_)
        | EngineError::InvalidCursor(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
