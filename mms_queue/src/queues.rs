use std::collections::VecDeque;

use crate::Customer;

/// FIFO waiting lines, one per queue index
#[derive(Debug, Clone, Default)]
pub struct QueueSet {
    lines: Vec<VecDeque<Customer>>,
}

impl QueueSet {
    pub fn new(queue_count: usize) -> QueueSet {
        QueueSet {
            lines: vec![VecDeque::new(); queue_count],
        }
    }

    /// Number of queues
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn len(&self, queue: usize) -> usize {
        self.lines[queue].len()
    }

    pub fn is_empty(&self, queue: usize) -> bool {
        self.lines[queue].is_empty()
    }

    pub fn enqueue(&mut self, queue: usize, customer: Customer) {
        self.lines[queue].push_back(customer);
    }

    pub fn dequeue(&mut self, queue: usize) -> Option<Customer> {
        self.lines[queue].pop_front()
    }

    pub fn front(&self, queue: usize) -> Option<&Customer> {
        self.lines[queue].front()
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.lines.iter().map(VecDeque::len).collect()
    }

    /// Customers waiting across all queues
    pub fn total_waiting(&self) -> usize {
        self.lines.iter().map(VecDeque::len).sum()
    }

    /// Index of the shortest queue, lowest index on ties
    pub fn shortest(&self) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .min_by_key(|(i, line)| (line.len(), *i))
            .map(|(i, _)| i)
    }
}
