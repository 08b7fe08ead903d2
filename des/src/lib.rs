//! Discrete-event scheduling primitives
//!
//! The [`EventTable`] holds pending events and hands them back in
//! occurrence order. Events sharing a timestamp come out in the order of
//! their sequence numbers, so a simulation that numbers events as it
//! creates them gets FIFO behaviour among simultaneous events.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

/// Anything that can sit in an [`EventTable`]
pub trait Scheduled {
    /// Simulation time at which the event occurs
    fn time(&self) -> f64;

    /// Tie-break key for events at the same time (lower runs first)
    fn sequence(&self) -> u64;
}

/// Raised when popping from a table with nothing left in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event table is empty")]
pub struct EmptyTableError;

struct Pending<E> {
    event: E,
}

impl<E: Scheduled> Pending<E> {
    fn key(&self) -> (f64, u64) {
        (self.event.time(), self.event.sequence())
    }
}

impl<E: Scheduled> PartialEq for Pending<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E: Scheduled> Eq for Pending<E> {}

impl<E: Scheduled> Ord for Pending<E> {
    // Reversed so the max-heap yields the earliest event.
    fn cmp(&self, other: &Self) -> Ordering {
        let (t, seq) = self.key();
        let (other_t, other_seq) = other.key();
        other_t
            .total_cmp(&t)
            .then_with(|| other_seq.cmp(&seq))
    }
}

impl<E: Scheduled> PartialOrd for Pending<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-ordered table of pending events
pub struct EventTable<E> {
    queue: BinaryHeap<Pending<E>>,
}

impl<E: Scheduled> EventTable<E> {
    pub fn new() -> EventTable<E> {
        EventTable {
            queue: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.queue.push(Pending { event });
    }

    /// Remove and return the earliest pending event
    pub fn pop(&mut self) -> Result<E, EmptyTableError> {
        self.queue
            .pop()
            .map(|pending| pending.event)
            .ok_or(EmptyTableError)
    }

    pub fn peek(&self) -> Option<&E> {
        self.queue.peek().map(|pending| &pending.event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.peek().map(Scheduled::time)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending events in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.queue.iter().map(|pending| &pending.event)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<E: Scheduled> Default for EventTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Scheduled> FromIterator<E> for EventTable<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        EventTable {
            queue: iter.into_iter().map(|event| Pending { event }).collect(),
        }
    }
}
