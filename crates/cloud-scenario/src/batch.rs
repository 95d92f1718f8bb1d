//! Reading and running scenario batches.
//!
//! One YAML file may hold several scenarios separated as YAML documents.
//! Scenarios are built and run strictly one after another against a shared
//! policy registry; a failure while building one scenario aborts only that
//! scenario, already finished runs keep their results.

use std::fs;
use std::fs::File;
use std::rc::Rc;

use indexmap::map::IndexMap;
use log::error;
use serde::Deserialize;

use crate::core::error::ScenarioError;
use crate::core::registry::PolicyRegistry;
use crate::core::spec::ScenarioSpec;
use crate::engine::SimulationEngine;
use crate::simulation::ScenarioSimulation;

/// Reads all scenarios from a multi-document YAML file.
/// An empty file yields an empty batch, which is not an error.
pub fn read_scenarios(path: &str) -> Result<Vec<ScenarioSpec>, ScenarioError> {
    let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut scenarios = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&content) {
        // empty documents (empty file, trailing ---) deserialize to None
        let scenario = Option::<ScenarioSpec>::deserialize(document).map_err(|source| ScenarioError::Parse {
            path: path.to_string(),
            source,
        })?;
        if let Some(scenario) = scenario {
            scenarios.push(scenario);
        }
    }
    Ok(scenarios)
}

/// Result of one successfully built and executed scenario.
pub struct ScenarioRunResult {
    pub simulation: ScenarioSimulation,
    pub summary: IndexMap<String, String>,
}

/// Builds and runs every scenario of a batch sequentially.
pub struct BatchRunner {
    registry: Rc<PolicyRegistry>,
    results_dir: Option<String>,
}

impl BatchRunner {
    pub fn new(registry: Rc<PolicyRegistry>) -> Self {
        Self {
            registry,
            results_dir: None,
        }
    }

    /// Directory where `results.json` with per-scenario summaries is written.
    pub fn with_results_dir(mut self, dir: &str) -> Self {
        fs::create_dir_all(dir).unwrap_or_else(|_| panic!("Can't create results dir {}", dir));
        self.results_dir = Some(dir.to_string());
        self
    }

    /// Runs the scenarios one after another, creating a fresh engine per
    /// scenario. Scenarios that fail to build are logged and skipped.
    pub fn run<E, F>(&self, scenarios: &[ScenarioSpec], mut make_engine: F) -> Vec<ScenarioRunResult>
    where
        E: SimulationEngine,
        F: FnMut() -> E,
    {
        let mut results = Vec::new();
        for (i, spec) in scenarios.iter().enumerate() {
            let label = format!("scenario_{}", i + 1);
            let simulation = match ScenarioSimulation::build(spec, self.registry.clone(), &label) {
                Ok(simulation) => simulation,
                Err(e) => {
                    error!("skipping {}: {}", label, e);
                    continue;
                }
            };
            let mut engine = make_engine();
            simulation.run(&mut engine);

            let mut summary = IndexMap::new();
            summary.insert("label".to_string(), label);
            summary.insert("datacenters".to_string(), simulation.datacenters().len().to_string());
            summary.insert("hosts".to_string(), simulation.hosts().len().to_string());
            summary.insert("brokers".to_string(), simulation.brokers().len().to_string());
            summary.insert(
                "vms".to_string(),
                simulation.scenario().number_of_vms().to_string(),
            );
            summary.insert(
                "workloads".to_string(),
                simulation.scenario().number_of_workloads().to_string(),
            );
            results.push(ScenarioRunResult { simulation, summary });
        }

        if let Some(dir) = &self.results_dir {
            let summaries: Vec<_> = results.iter().map(|r| r.summary.clone()).collect();
            match File::create(format!("{}/results.json", dir)) {
                Ok(mut file) => {
                    if let Err(e) = serde_json::to_writer_pretty(&mut file, &summaries) {
                        error!("cannot write results.json: {}", e);
                    }
                }
                Err(e) => error!("cannot create results.json: {}", e),
            }
        }

        results
    }
}
