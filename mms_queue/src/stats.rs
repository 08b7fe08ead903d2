//! Summary statistics over per-customer timings

use serde::Serialize;

use crate::error::InsufficientDataError;

/// Observation count, mean and sample standard deviation of one measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Bessel-corrected (divisor n - 1)
    pub stdev: f64,
}

impl Summary {
    /// Needs at least two observations for the standard deviation
    pub fn from_samples(measure: &'static str, samples: &[f64]) -> Result<Summary, InsufficientDataError> {
        let count = samples.len();
        if count < 2 {
            return Err(InsufficientDataError {
                measure,
                required: 2,
                found: count,
            });
        }
        let mean = mean(measure, samples)?;
        let squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
        Ok(Summary {
            count,
            mean,
            stdev: (squares / (count - 1) as f64).sqrt(),
        })
    }
}

/// Arithmetic mean; needs at least one observation
pub fn mean(measure: &'static str, samples: &[f64]) -> Result<f64, InsufficientDataError> {
    if samples.is_empty() {
        return Err(InsufficientDataError {
            measure,
            required: 1,
            found: 0,
        });
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Summaries of the three per-customer measures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub waiting: Summary,
    pub service: Summary,
    pub time_in_system: Summary,
}

impl Statistics {
    pub fn from_samples(
        waiting: &[f64],
        service: &[f64],
        time_in_system: &[f64],
    ) -> Result<Statistics, InsufficientDataError> {
        Ok(Statistics {
            waiting: Summary::from_samples("waiting time", waiting)?,
            service: Summary::from_samples("service time", service)?,
            time_in_system: Summary::from_samples("time in system", time_in_system)?,
        })
    }
}
