// Given-When-Then tests for the three queueing disciplines
// Arrivals are fed straight to the policy, so simultaneous arrivals can be
// modelled without going through the event table

use mms_queue::{
    Customer, Policy, QueueSet, QueueingMode, RandomProcess, Selection, ServerBank,
    SimulationConfig,
};

struct Harness {
    policy: Policy,
    servers: ServerBank,
    queues: QueueSet,
    random: RandomProcess,
    next_customer: u64,
}

impl Harness {
    fn new(config: SimulationConfig) -> Harness {
        Harness {
            policy: Policy::from_config(&config).unwrap(),
            servers: ServerBank::new(config.server_count),
            queues: QueueSet::new(config.queue_count()),
            random: RandomProcess::new(config.seed, config.inter_arrival_mean, config.service_mean)
                .unwrap(),
            next_customer: 0,
        }
    }

    /// Route one arrival at time `t`, queueing it when no server takes it
    fn arrive(&mut self, t: f64) -> Selection {
        let selection = self
            .policy
            .select(&mut self.servers, &self.queues, &mut self.random);
        if selection.server.is_none() {
            self.queues
                .enqueue(selection.queue, Customer::new(t, 1.0, self.next_customer));
        }
        self.next_customer += 1;
        selection
    }
}

fn spread(lengths: &[usize]) -> usize {
    lengths.iter().max().unwrap() - lengths.iter().min().unwrap()
}

#[test]
fn given_idle_servers_when_simultaneous_arrivals_under_shortest_then_queues_stay_balanced() {
    // GIVEN: four idle servers with dedicated queues
    let mut h = Harness::new(SimulationConfig::new(0, 1.0, 1.0, 4, QueueingMode::Shortest));

    // WHEN: 23 customers arrive at the same instant
    for i in 0..23 {
        let selection = h.arrive(0.0);

        // THEN: the first four take servers 0..3 in order
        if i < 4 {
            assert_eq!(selection.server, Some(i));
            assert_eq!(selection.queue, i);
        } else {
            assert_eq!(selection.server, None);
        }

        // THEN: no queue is ever more than one longer than another
        assert!(spread(&h.queues.lengths()) <= 1, "lengths {:?}", h.queues.lengths());
    }

    assert_eq!(h.servers.busy_count(), 4);
    assert_eq!(h.queues.lengths(), vec![5, 5, 5, 4]);
}

#[test]
fn given_all_busy_when_arrivals_under_shortest_then_ties_go_to_lowest_index() {
    let mut h = Harness::new(SimulationConfig::new(0, 1.0, 1.0, 3, QueueingMode::Shortest));
    for _ in 0..3 {
        h.arrive(0.0);
    }

    assert_eq!(h.arrive(1.0).queue, 0);
    assert_eq!(h.arrive(1.0).queue, 1);
    assert_eq!(h.arrive(1.0).queue, 2);
    assert_eq!(h.arrive(1.0).queue, 0);
}

#[test]
fn given_waiting_line_when_server_frees_under_single_then_newcomer_still_queues() {
    // GIVEN: two busy servers and one customer waiting
    let mut h = Harness::new(SimulationConfig::new(0, 1.0, 1.0, 2, QueueingMode::Single));
    h.arrive(0.0);
    h.arrive(0.0);
    assert_eq!(h.arrive(0.5), Selection { queue: 0, server: None });

    // WHEN: a server frees up without pulling from the line, and someone arrives
    h.servers.release(0);
    let selection = h.arrive(0.7);

    // THEN: the newcomer joins the back of the shared line
    assert_eq!(selection, Selection { queue: 0, server: None });
    assert_eq!(h.queues.lengths(), vec![2]);
    assert_eq!(h.queues.front(0).map(|c| c.number), Some(2));
}

#[test]
fn given_empty_line_when_arrival_under_single_then_first_idle_server_serves() {
    let mut h = Harness::new(SimulationConfig::new(0, 1.0, 1.0, 3, QueueingMode::Single));
    h.servers.occupy(0);

    let selection = h.arrive(0.0);

    assert_eq!(selection, Selection { queue: 0, server: Some(1) });
    assert!(!h.servers.is_idle(1));
    assert!(h.servers.is_idle(2));
}

#[test]
fn given_random_mode_when_chosen_server_busy_then_customer_joins_its_queue() {
    // GIVEN: weights that send everyone to queue 1
    let config = SimulationConfig::new(3, 1.0, 1.0, 3, QueueingMode::Random)
        .with_weights(vec![0.0, 1.0, 0.0]);
    let mut h = Harness::new(config);

    // WHEN: three customers arrive together
    let first = h.arrive(0.0);
    let second = h.arrive(0.0);
    let third = h.arrive(0.0);

    // THEN: the first is served by server 1, the others wait in queue 1
    assert_eq!(first, Selection { queue: 1, server: Some(1) });
    assert_eq!(second, Selection { queue: 1, server: None });
    assert_eq!(third, Selection { queue: 1, server: None });
    assert_eq!(h.queues.lengths(), vec![0, 2, 0]);
    assert!(h.servers.is_idle(0));
    assert!(h.servers.is_idle(2));
}

#[test]
fn given_uniform_random_mode_when_many_arrivals_then_every_queue_is_used() {
    let mut h = Harness::new(SimulationConfig::new(13, 1.0, 1.0, 5, QueueingMode::Random));
    for server in 0..5 {
        h.servers.occupy(server);
    }

    for _ in 0..500 {
        h.arrive(0.0);
    }

    for len in h.queues.lengths() {
        assert!(len > 50, "lengths {:?}", h.queues.lengths());
    }
}
