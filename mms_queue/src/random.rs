//! Seeded source of the exponential processes driving the model
//!
//! Every draw in a run comes from one `StdRng`, so a seed fixes the whole
//! event sequence.

use rand::SeedableRng;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp};

use crate::error::ConfigError;

/// Exponential distribution parameterised by its mean
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    dist: Exp<f64>,
}

impl Exponential {
    pub fn with_mean(name: &'static str, mean: f64) -> Result<Exponential, ConfigError> {
        let invalid = || ConfigError::NonPositiveMean { name, value: mean };
        if !mean.is_finite() || mean <= 0.0 {
            return Err(invalid());
        }
        let dist = Exp::new(1.0 / mean).map_err(|_| invalid())?;
        Ok(Exponential { dist })
    }
}

/// Owns the generator and the two processes of an M/M/s system
pub struct RandomProcess {
    seed: u64,
    rng: StdRng,
    inter_arrival: Exponential,
    service: Exponential,
}

impl RandomProcess {
    pub fn new(
        seed: u64,
        inter_arrival_mean: f64,
        service_mean: f64,
    ) -> Result<RandomProcess, ConfigError> {
        Ok(RandomProcess {
            seed,
            rng: StdRng::seed_from_u64(seed),
            inter_arrival: Exponential::with_mean("inter-arrival mean", inter_arrival_mean)?,
            service: Exponential::with_mean("service mean", service_mean)?,
        })
    }

    /// Restart the stream from `value`
    pub fn seed(&mut self, value: u64) {
        self.seed = value;
        self.rng = StdRng::seed_from_u64(value);
    }

    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    pub fn sample(&mut self, process: &Exponential) -> f64 {
        process.dist.sample(&mut self.rng)
    }

    /// Time until the next arrival
    pub fn next_inter_arrival(&mut self) -> f64 {
        let process = self.inter_arrival;
        self.sample(&process)
    }

    /// Length of one service
    pub fn next_service(&mut self) -> f64 {
        let process = self.service;
        self.sample(&process)
    }

    /// Draw an index from a discrete distribution
    pub fn choose(&mut self, weights: &WeightedIndex<f64>) -> usize {
        weights.sample(&mut self.rng)
    }
}
