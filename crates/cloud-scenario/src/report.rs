//! Rendering of per-broker workload result tables.

use std::fs::File;

use serde::Serialize;

use crate::core::assembler::AssembledScenario;
use crate::core::workload::WorkloadStatus;

/// One row of the workload results table.
#[derive(Debug, Serialize)]
pub struct WorkloadRow {
    pub broker: String,
    pub workload_id: u32,
    pub status: WorkloadStatus,
    pub vm_id: Option<u32>,
    pub host_id: Option<u32>,
    pub start_time: Option<f64>,
    pub finish_time: Option<f64>,
}

/// Workload results of one scenario, one row per workload in broker order.
pub struct WorkloadReport {
    rows: Vec<WorkloadRow>,
}

impl WorkloadReport {
    /// Collects result rows from a scenario after the engine has run.
    /// The host of each workload is recovered through the broker-scoped
    /// VM lookup.
    pub fn new(scenario: &AssembledScenario) -> Self {
        let mut rows = Vec::new();
        for broker in scenario.brokers() {
            for workload in scenario.workloads(broker.id) {
                let workload = workload.borrow();
                let host_id = workload
                    .vm_id()
                    .and_then(|vm_id| scenario.find_vm(broker.id, vm_id))
                    .and_then(|vm| vm.borrow().host_id());
                rows.push(WorkloadRow {
                    broker: broker.name().to_string(),
                    workload_id: workload.id,
                    status: workload.status().clone(),
                    vm_id: workload.vm_id(),
                    host_id,
                    start_time: workload.start_time(),
                    finish_time: workload.finish_time(),
                });
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[WorkloadRow] {
        &self.rows
    }

    /// Prints the table to stdout.
    pub fn print(&self) {
        println!(
            "{:<12} {:>8} {:>10} {:>6} {:>6} {:>12} {:>12}",
            "Broker", "Workload", "Status", "VM", "Host", "Start", "Finish"
        );
        for row in &self.rows {
            println!(
                "{:<12} {:>8} {:>10} {:>6} {:>6} {:>12} {:>12}",
                row.broker,
                row.workload_id,
                row.status.to_string(),
                fmt_opt_id(row.vm_id),
                fmt_opt_id(row.host_id),
                fmt_opt_time(row.start_time),
                fmt_opt_time(row.finish_time),
            );
        }
    }

    /// Saves the table as CSV.
    pub fn save_csv(&self, path: &str) -> Result<(), csv::Error> {
        let file = File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn fmt_opt_id(id: Option<u32>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_opt_time(time: Option<f64>) -> String {
    time.map(|t| format!("{:.2}", t)).unwrap_or_else(|| "-".to_string())
}
