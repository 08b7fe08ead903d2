//! The event-driven M/M/s engine
//!
//! The loop pops the earliest pending event, moves the clock to it and
//! dispatches:
//! - Arrival: draw a service time, ask the policy for a queue/server,
//!   start service or join the queue, then schedule the next arrival.
//!   Arrivals always schedule a successor, so the table never runs dry.
//! - Departure: pull the head of the server's queue (the shared queue in
//!   single mode) straight into service, or mark the server idle.
//!
//! A server is busy exactly while a departure for it is pending.

use std::collections::BTreeMap;

use des::EventTable;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::{ConfigError, EmptyTableError, InsufficientDataError, Result};
use crate::policy::Policy;
use crate::queues::QueueSet;
use crate::random::RandomProcess;
use crate::servers::ServerBank;
use crate::stats::Statistics;
use crate::{Customer, Event, EventKind, ServerState};

/// One customer reaching a server
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceStart {
    pub customer: u64,
    pub server: usize,
    pub entry_time: f64,
    pub start_time: f64,
    pub service_time: f64,
}

impl ServiceStart {
    pub fn waiting_time(&self) -> f64 {
        self.start_time - self.entry_time
    }
}

pub struct Simulation {
    config: SimulationConfig,
    current_time: f64,
    random: RandomProcess,
    event_table: EventTable<Event>,
    servers: ServerBank,
    queues: QueueSet,
    policy: Policy,
    // Ordered maps keep summation order, and so results, reproducible.
    waiting_time: BTreeMap<u64, f64>,
    service_time: BTreeMap<u64, f64>,
    service_log: Vec<ServiceStart>,
    completed: u64,
    event_counter: u64,
    customer_counter: u64,
    events_processed: u64,
}

impl Simulation {
    /// Validate `config` and schedule the first arrival at time zero
    pub fn new(config: SimulationConfig) -> Result<Simulation, ConfigError> {
        config.validate()?;
        let random = RandomProcess::new(
            config.seed,
            config.inter_arrival_mean,
            config.service_mean,
        )?;
        let policy = Policy::from_config(&config)?;

        let mut simulation = Simulation {
            servers: ServerBank::new(config.server_count),
            queues: QueueSet::new(config.queue_count()),
            config,
            current_time: 0.0,
            random,
            event_table: EventTable::new(),
            policy,
            waiting_time: BTreeMap::new(),
            service_time: BTreeMap::new(),
            service_log: Vec::new(),
            completed: 0,
            event_counter: 0,
            customer_counter: 0,
            events_processed: 0,
        };
        simulation.schedule_arrival(0.0);
        Ok(simulation)
    }

    /// Run until the clock passes `horizon`
    ///
    /// The clock is checked before each pop, so the last event processed is
    /// the first one past the horizon. A negative or non-finite horizon is
    /// rejected before any event runs.
    pub fn simulate(&mut self, horizon: f64) -> Result<()> {
        self.simulate_observed(horizon, |_| {})
    }

    /// Like [`Simulation::simulate`], showing the engine to `observer` after
    /// every event
    pub fn simulate_observed<F>(&mut self, horizon: f64, mut observer: F) -> Result<()>
    where
        F: FnMut(&Simulation),
    {
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(ConfigError::InvalidHorizon(horizon).into());
        }
        info!(
            seed = self.config.seed,
            mode = %self.config.mode,
            servers = self.config.server_count,
            horizon,
            "simulation started"
        );
        while self.current_time <= horizon {
            self.step()?;
            observer(self);
        }
        info!(
            end_time = self.current_time,
            customers = self.customer_counter,
            served = self.service_log.len(),
            completed = self.completed,
            events = self.events_processed,
            "simulation finished"
        );
        debug!(
            busy = self.servers.busy_count(),
            waiting = self.queues.total_waiting(),
            pending = self.event_table.len(),
            "final state"
        );
        Ok(())
    }

    /// Process the next event and return it
    pub fn step(&mut self) -> Result<Event, EmptyTableError> {
        let event = self.event_table.pop()?;
        self.current_time = event.time();
        self.events_processed += 1;
        trace!(t = event.time(), event = %event.name(), "processing");

        match (event.kind(), event.server()) {
            (EventKind::Arrival, _) => self.arrive(),
            (EventKind::Departure, Some(server)) => self.depart(server),
            (EventKind::Departure, None) => unreachable!("departure without a server"),
        }
        Ok(event)
    }

    fn arrive(&mut self) {
        let now = self.current_time;
        let service_time = self.random.next_service();
        let selection = self
            .policy
            .select(&mut self.servers, &self.queues, &mut self.random);
        let customer = Customer::new(now, service_time, self.customer_counter);

        match selection.server {
            Some(server) => self.begin_service(customer, server),
            None => {
                trace!(customer = customer.number, queue = selection.queue, "queued");
                self.queues.enqueue(selection.queue, customer);
            }
        }
        self.customer_counter += 1;

        let next = now + self.random.next_inter_arrival();
        self.schedule_arrival(next);
    }

    fn depart(&mut self, server: usize) {
        self.completed += 1;
        let queue = if self.queues.count() == 1 { 0 } else { server };
        match self.queues.dequeue(queue) {
            Some(customer) => self.begin_service(customer, server),
            None => self.servers.release(server),
        }
    }

    /// Record the customer's timings and schedule its departure
    fn begin_service(&mut self, customer: Customer, server: usize) {
        let now = self.current_time;
        let start = ServiceStart {
            customer: customer.number,
            server,
            entry_time: customer.entry_time,
            start_time: now,
            service_time: customer.service_time,
        };
        self.waiting_time.insert(customer.number, start.waiting_time());
        self.service_time.insert(customer.number, customer.service_time);
        self.service_log.push(start);

        let number = self.next_event_number();
        self.event_table.push(Event::departure(
            number,
            now + customer.service_time,
            server,
            customer.number,
        ));
    }

    fn schedule_arrival(&mut self, time: f64) {
        let number = self.next_event_number();
        self.event_table.push(Event::arrival(number, time));
    }

    fn next_event_number(&mut self) -> u64 {
        self.event_counter += 1;
        self.event_counter
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn server_states(&self) -> &[ServerState] {
        self.servers.states()
    }

    pub fn queue_lengths(&self) -> Vec<usize> {
        self.queues.lengths()
    }

    pub fn servers(&self) -> &ServerBank {
        &self.servers
    }

    pub fn queues(&self) -> &QueueSet {
        &self.queues
    }

    /// Servers with a departure pending, in index order
    pub fn scheduled_departures(&self) -> Vec<usize> {
        let mut servers: Vec<usize> = self
            .event_table
            .iter()
            .filter_map(|event| event.server())
            .collect();
        servers.sort_unstable();
        servers
    }

    pub fn pending_events(&self) -> usize {
        self.event_table.len()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Customers whose service has finished
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Customers that have arrived so far
    pub fn arrivals(&self) -> u64 {
        self.customer_counter
    }

    pub fn waiting_times(&self) -> &BTreeMap<u64, f64> {
        &self.waiting_time
    }

    pub fn service_times(&self) -> &BTreeMap<u64, f64> {
        &self.service_time
    }

    /// Waiting plus service time for every customer that reached a server
    pub fn time_in_system(&self) -> BTreeMap<u64, f64> {
        self.waiting_time
            .iter()
            .filter_map(|(number, wait)| {
                self.service_time
                    .get(number)
                    .map(|service| (*number, wait + service))
            })
            .collect()
    }

    /// Service starts in the order they happened
    pub fn service_log(&self) -> &[ServiceStart] {
        &self.service_log
    }

    /// Count, mean and standard deviation of the three timing measures
    ///
    /// Timings are recorded when service starts, but nothing is reported
    /// until two customers have left the system.
    pub fn statistics(&self) -> Result<Statistics, InsufficientDataError> {
        if self.completed < 2 {
            return Err(InsufficientDataError {
                measure: "completed services",
                required: 2,
                found: self.completed as usize,
            });
        }
        let waiting: Vec<f64> = self.waiting_time.values().copied().collect();
        let service: Vec<f64> = self.service_time.values().copied().collect();
        let time_in_system: Vec<f64> = self.time_in_system().into_values().collect();
        Statistics::from_samples(&waiting, &service, &time_in_system)
    }
}
