//! Queue selection on arrival
//!
//! Each arriving customer asks the policy where to go. The answer is the
//! queue it belongs to and, when a server can take it right away, that
//! server. The policy marks the chosen server busy before returning.

use rand::distr::weighted::WeightedIndex;

use crate::config::{QueueingMode, SimulationConfig};
use crate::error::ConfigError;
use crate::queues::QueueSet;
use crate::random::RandomProcess;
use crate::servers::ServerBank;

/// Where an arriving customer goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub queue: usize,
    /// Server that starts serving immediately, if any
    pub server: Option<usize>,
}

impl Selection {
    fn served(queue: usize, server: usize) -> Selection {
        Selection {
            queue,
            server: Some(server),
        }
    }

    fn queued(queue: usize) -> Selection {
        Selection {
            queue,
            server: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Policy {
    Single,
    Random {
        weights: Vec<f64>,
        index: WeightedIndex<f64>,
    },
    Shortest,
}

impl Policy {
    pub fn from_config(config: &SimulationConfig) -> Result<Policy, ConfigError> {
        match config.mode {
            QueueingMode::Single => Ok(Policy::Single),
            QueueingMode::Shortest => Ok(Policy::Shortest),
            QueueingMode::Random => {
                let weights = config.queue_weights()?;
                let index = WeightedIndex::new(&weights)
                    .map_err(|e| ConfigError::UnusableWeights(e.to_string()))?;
                Ok(Policy::Random { weights, index })
            }
        }
    }

    pub fn mode(&self) -> QueueingMode {
        match self {
            Policy::Single => QueueingMode::Single,
            Policy::Random { .. } => QueueingMode::Random,
            Policy::Shortest => QueueingMode::Shortest,
        }
    }

    /// Effective weights in random mode
    pub fn weights(&self) -> Option<&[f64]> {
        match self {
            Policy::Random { weights, .. } => Some(weights),
            _ => None,
        }
    }

    pub fn select(
        &self,
        servers: &mut ServerBank,
        queues: &QueueSet,
        random: &mut RandomProcess,
    ) -> Selection {
        let selection = match self {
            Policy::Single => {
                // Anyone already waiting goes first.
                if !queues.is_empty(0) {
                    Selection::queued(0)
                } else {
                    match servers.first_idle() {
                        Some(server) => Selection::served(0, server),
                        None => Selection::queued(0),
                    }
                }
            }
            Policy::Random { index, .. } => {
                let queue = random.choose(index);
                if servers.is_idle(queue) {
                    Selection::served(queue, queue)
                } else {
                    Selection::queued(queue)
                }
            }
            Policy::Shortest => match servers.first_idle() {
                Some(server) => Selection::served(server, server),
                None => Selection::queued(queues.shortest().unwrap_or(0)),
            },
        };

        if let Some(server) = selection.server {
            servers.occupy(server);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Customer;

    fn setup(mode: QueueingMode, server_count: usize) -> (Policy, ServerBank, QueueSet, RandomProcess) {
        let config = SimulationConfig::new(5, 1.0, 1.0, server_count, mode);
        (
            Policy::from_config(&config).unwrap(),
            ServerBank::new(server_count),
            QueueSet::new(config.queue_count()),
            RandomProcess::new(config.seed, 1.0, 1.0).unwrap(),
        )
    }

    #[test]
    fn single_takes_idle_servers_in_order_then_queues() {
        let (policy, mut servers, mut queues, mut rng) = setup(QueueingMode::Single, 2);

        let first = policy.select(&mut servers, &queues, &mut rng);
        assert_eq!(first, Selection::served(0, 0));
        let second = policy.select(&mut servers, &queues, &mut rng);
        assert_eq!(second, Selection::served(0, 1));
        let third = policy.select(&mut servers, &queues, &mut rng);
        assert_eq!(third, Selection::queued(0));
        queues.enqueue(0, Customer::new(0.0, 1.0, 2));

        // A freed server does not let a newcomer skip the line.
        servers.release(1);
        let fourth = policy.select(&mut servers, &queues, &mut rng);
        assert_eq!(fourth, Selection::queued(0));
        assert!(servers.is_idle(1));
    }

    #[test]
    fn shortest_prefers_idle_server_then_shortest_queue() {
        let (policy, mut servers, mut queues, mut rng) = setup(QueueingMode::Shortest, 3);
        servers.occupy(0);
        assert_eq!(
            policy.select(&mut servers, &queues, &mut rng),
            Selection::served(1, 1)
        );
        servers.occupy(2);

        queues.enqueue(0, Customer::new(0.0, 1.0, 0));
        queues.enqueue(0, Customer::new(0.0, 1.0, 1));
        queues.enqueue(2, Customer::new(0.0, 1.0, 2));
        assert_eq!(
            policy.select(&mut servers, &queues, &mut rng),
            Selection::queued(1)
        );
    }

    #[test]
    fn random_serves_directly_when_chosen_server_idle() {
        let config = SimulationConfig::new(11, 1.0, 1.0, 2, QueueingMode::Random)
            .with_weights(vec![0.0, 1.0]);
        let policy = Policy::from_config(&config).unwrap();
        let mut servers = ServerBank::new(2);
        let queues = QueueSet::new(2);
        let mut rng = RandomProcess::new(11, 1.0, 1.0).unwrap();

        assert_eq!(
            policy.select(&mut servers, &queues, &mut rng),
            Selection::served(1, 1)
        );
        // Server 0 stays idle but the weights never send anyone there.
        assert_eq!(
            policy.select(&mut servers, &queues, &mut rng),
            Selection::queued(1)
        );
        assert!(servers.is_idle(0));
    }

    #[test]
    fn random_weights_are_normalised() {
        let config = SimulationConfig::new(0, 1.0, 1.0, 3, QueueingMode::Random)
            .with_weights(vec![0.5, 0.5, 0.5]);
        let policy = Policy::from_config(&config).unwrap();
        assert_eq!(policy.weights(), Some(&[0.5, 0.5, 0.0][..]));
        assert_eq!(policy.mode(), QueueingMode::Random);
    }

    #[test]
    fn random_follows_weights_roughly() {
        let config = SimulationConfig::new(0, 1.0, 1.0, 2, QueueingMode::Random)
            .with_weights(vec![0.8, 0.2]);
        let policy = Policy::from_config(&config).unwrap();
        let queues = QueueSet::new(2);
        let mut rng = RandomProcess::new(8, 1.0, 1.0).unwrap();

        let mut counts = [0usize; 2];
        for _ in 0..10_000 {
            // Keep both servers busy so every arrival is a plain draw.
            let mut servers = ServerBank::new(2);
            servers.occupy(0);
            servers.occupy(1);
            counts[policy.select(&mut servers, &queues, &mut rng).queue] += 1;
        }
        let share = counts[0] as f64 / 10_000.0;
        assert!((share - 0.8).abs() < 0.03, "queue 0 share {share}");
    }

    #[test]
    fn other_modes_have_no_weights() {
        let (policy, ..) = setup(QueueingMode::Shortest, 2);
        assert_eq!(policy.weights(), None);
        assert_eq!(policy.mode(), QueueingMode::Shortest);
    }
}
