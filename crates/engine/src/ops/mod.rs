use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;

use crate::{Clock, EngineEvent, ResultEngine, SystemClock};

mod balances;
mod lookup;
mod movements;
mod payments;
mod pledges;
mod registry;

pub use balances::{CommitteeBalance, ProjectProgress};
pub use movements::MovementListFilter;
pub use payments::RegistrationOutcome;
pub use pledges::{PledgeListFilter, PledgeSnapshot, PledgeSummary};

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: broadcast::Sender<EngineEvent>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Subscribe to events published after committed mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// The date used to classify pledges as overdue.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn publish(&self, event: EngineEvent) {
        // No receivers is not an error: nobody is caching.
        if self.events.send(event).is_err() {
            tracing::trace!("engine event dropped, no subscribers");
        }
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    clock: Arc<dyn Clock>,
    event_capacity: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            clock: Arc::new(SystemClock),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the clock used for overdue classification.
    pub fn clock(mut self, clock: impl Clock + 'static) -> EngineBuilder {
        self.clock = Arc::new(clock);
        self
    }

    /// Buffer size of the event channel. Slow subscribers lag past it.
    pub fn event_capacity(mut self, capacity: usize) -> EngineBuilder {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let (events, _) = broadcast::channel(self.event_capacity);
        Ok(Engine {
            database: self.database,
            events,
            clock: self.clock,
        })
    }
}
