//! Reporting of finished runs
//!
//! The text table mirrors the classic queueing-course printout. Runs can
//! also be exported as a per-customer CSV and a JSON summary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{InsufficientDataError, Result};
use crate::simulation::Simulation;
use crate::stats::{Statistics, Summary};

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub config: SimulationConfig,
    pub horizon: f64,
    pub end_time: f64,
    pub arrivals: u64,
    pub served: usize,
    pub statistics: Statistics,
}

impl ScenarioReport {
    pub fn from_simulation(
        scenario: impl Into<String>,
        horizon: f64,
        simulation: &Simulation,
    ) -> Result<ScenarioReport, InsufficientDataError> {
        Ok(ScenarioReport {
            scenario: scenario.into(),
            config: simulation.config().clone(),
            horizon,
            end_time: simulation.current_time(),
            arrivals: simulation.arrivals(),
            served: simulation.service_log().len(),
            statistics: simulation.statistics()?,
        })
    }

    /// Plain-text statistics table
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Scenario: {}", self.scenario);
        let _ = writeln!(out, "Seed: {}", self.config.seed);
        let _ = writeln!(out, "Mode: {}", self.config.mode);
        let _ = writeln!(out, "Simulation ended at {:.3}", self.end_time);
        let _ = writeln!(out, "{:=^64}", " STATISTICS ");
        let _ = writeln!(
            out,
            "{:<16}{:>14}{:>17}{:>17}",
            "", "Observations", "Average", "StDev"
        );
        for (label, summary) in [
            ("Waiting Time", &self.statistics.waiting),
            ("Service Time", &self.statistics.service),
            ("Time in System", &self.statistics.time_in_system),
        ] {
            let _ = writeln!(out, "{}", row(label, summary));
        }
        out
    }

    /// One row per customer that reached a server, in service-start order
    pub fn write_customer_csv<P: AsRef<Path>>(&self, path: P, simulation: &Simulation) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "customer",
            "server",
            "entry_time",
            "start_time",
            "waiting_time",
            "service_time",
            "time_in_system",
        ])?;

        for start in simulation.service_log() {
            wtr.write_record(&[
                start.customer.to_string(),
                start.server.to_string(),
                start.entry_time.to_string(),
                start.start_time.to_string(),
                start.waiting_time().to_string(),
                start.service_time.to_string(),
                (start.waiting_time() + start.service_time).to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_summary_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write all outputs to a directory
    ///
    /// Creates:
    /// - customers.csv
    /// - summary.json
    pub fn write_all<P: AsRef<Path>>(&self, dir: P, simulation: &Simulation) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        self.write_customer_csv(dir.join("customers.csv"), simulation)?;
        self.write_summary_json(dir.join("summary.json"))?;

        Ok(())
    }
}

fn row(label: &str, summary: &Summary) -> String {
    format!(
        "{:<16}{:>14}{:>17.6}{:>17.6}",
        label, summary.count, summary.mean, summary.stdev
    )
}
