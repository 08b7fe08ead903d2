//! M/M/s queueing simulation
//!
//! Customers arrive as a Poisson process and are served by one of several
//! servers with exponentially distributed service times. When every server
//! is busy they wait under one of three disciplines:
//! - single: one queue shared by all servers
//! - random: one queue per server, chosen from a weight vector
//! - shortest: one queue per server, join the shortest
//!
//! The [`Simulation`] advances a virtual clock through a time-ordered table
//! of arrivals and departures and records waiting and service times for
//! every customer that reaches a server.

pub mod config;
pub mod error;
pub mod policy;
pub mod queues;
pub mod random;
pub mod report;
pub mod servers;
pub mod simulation;
pub mod stats;

pub use config::{QueueingMode, RunConfig, Scenario, SimulationConfig};
pub use error::{ConfigError, EmptyTableError, Error, InsufficientDataError, Result};
pub use policy::{Policy, Selection};
pub use queues::QueueSet;
pub use random::{Exponential, RandomProcess};
pub use report::ScenarioReport;
pub use servers::ServerBank;
pub use simulation::{ServiceStart, Simulation};
pub use stats::{Statistics, Summary};

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
}

/// A scheduled arrival or departure
///
/// `number` is the engine's event counter at creation, so it orders
/// simultaneous events by insertion. A departure also names the server it
/// releases and the customer whose service ends, which ties it back to
/// that customer's arrival.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    number: u64,
    kind: EventKind,
    time: f64,
    server: Option<usize>,
    customer: Option<u64>,
}

impl Event {
    pub fn arrival(number: u64, time: f64) -> Event {
        Event {
            number,
            kind: EventKind::Arrival,
            time,
            server: None,
            customer: None,
        }
    }

    pub fn departure(number: u64, time: f64, server: usize, customer: u64) -> Event {
        Event {
            number,
            kind: EventKind::Departure,
            time,
            server: Some(server),
            customer: Some(customer),
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Server being released; always set for departures
    pub fn server(&self) -> Option<usize> {
        self.server
    }

    /// Customer finishing service; always set for departures
    pub fn customer(&self) -> Option<u64> {
        self.customer
    }

    pub fn name(&self) -> String {
        match self.kind {
            EventKind::Arrival => format!("arrival{}", self.number),
            EventKind::Departure => format!("departure{}", self.number),
        }
    }
}

impl des::Scheduled for Event {
    fn time(&self) -> f64 {
        self.time
    }

    fn sequence(&self) -> u64 {
        self.number
    }
}

// ============================================================================
// Core Data Types
// ============================================================================

/// A customer waiting in a queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Customer {
    pub entry_time: f64,
    pub service_time: f64,
    pub number: u64,
}

impl Customer {
    pub fn new(entry_time: f64, service_time: f64, number: u64) -> Customer {
        Customer {
            entry_time,
            service_time,
            number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServerState {
    #[default]
    Idle,
    Busy,
}

impl ServerState {
    pub fn is_idle(&self) -> bool {
        *self == ServerState::Idle
    }

    pub fn is_busy(&self) -> bool {
        *self == ServerState::Busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use des::{EventTable, Scheduled};

    #[test]
    fn event_constructors() {
        let arrival = Event::arrival(1, 0.5);
        assert_eq!(arrival.kind(), EventKind::Arrival);
        assert_eq!(arrival.server(), None);
        assert_eq!(arrival.name(), "arrival1");

        let departure = Event::departure(2, 3.0, 4, 0);
        assert_eq!(departure.kind(), EventKind::Departure);
        assert_eq!(departure.server(), Some(4));
        assert_eq!(departure.customer(), Some(0));
        assert_eq!(departure.sequence(), 2);
        assert_eq!(departure.name(), "departure2");
    }

    #[test]
    fn events_order_by_time_then_number() {
        let mut table = EventTable::new();
        table.push(Event::departure(3, 2.0, 0, 0));
        table.push(Event::arrival(4, 2.0));
        table.push(Event::arrival(1, 1.0));

        assert_eq!(table.pop().map(|e| e.number()), Ok(1));
        assert_eq!(table.pop().map(|e| e.number()), Ok(3));
        assert_eq!(table.pop().map(|e| e.number()), Ok(4));
    }

    #[test]
    fn servers_start_idle() {
        assert!(ServerState::default().is_idle());
        assert!(ServerState::Busy.is_busy());
    }
}
