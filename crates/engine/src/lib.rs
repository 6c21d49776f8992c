//! Pledge/payment reconciliation engine.
//!
//! The engine owns pledges, the payments applied to them and the
//! offering/expense ledgers of each committee. All durable state lives in the
//! relational store behind the injected `DatabaseConnection`; the engine keeps
//! no in-memory copy of it.

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::{
    CreatePledgeCmd, CreateProjectCmd, RecordExpenseCmd, RecordOfferingCmd, RegisterPaymentCmd,
    UpdateMovementCmd, UpdatePledgeCmd,
};
pub use committees::Committee;
pub use error::EngineError;
pub use events::{BalanceChangeCause, EngineEvent};
pub use expenses::Expense;
pub use members::Member;
pub use money::Money;
pub use offerings::{Offering, OfferingCategory};
pub use ops::{
    CommitteeBalance, Engine, EngineBuilder, MovementListFilter, PledgeListFilter, PledgeSnapshot,
    PledgeSummary, ProjectProgress, RegistrationOutcome,
};
pub use payments::{Payment, PaymentMethod};
pub use pledges::{PaymentEffect, Pledge, PledgeState, PledgeStatus};
pub use projects::Project;

mod clock;
mod commands;
mod committees;
mod error;
mod events;
mod expenses;
mod members;
mod money;
mod offerings;
mod ops;
mod payments;
mod pledges;
mod projects;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
