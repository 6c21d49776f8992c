//! Notifications published after a mutation commits.
//!
//! Hosts subscribe through [`Engine::subscribe`](crate::Engine::subscribe) to
//! invalidate caches or push updates. Events are best effort: a lagging or
//! absent subscriber never fails the mutation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PledgeStatus;

/// What moved a committee balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum BalanceChangeCause {
    Payment(Uuid),
    Offering(Uuid),
    Expense(Uuid),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum EngineEvent {
    BalanceChanged {
        committee_id: Uuid,
        cause: BalanceChangeCause,
    },
    PledgeChanged {
        pledge_id: Uuid,
        status: PledgeStatus,
        amount_collected_minor: i64,
    },
}
