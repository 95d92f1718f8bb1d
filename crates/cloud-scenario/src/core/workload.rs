//! Representation of a workload and its status.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::core::utilization_model::UtilizationModel;

/// Status of a workload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum WorkloadStatus {
    Pending,
    Running,
    Finished,
    Failed,
}

impl Display for WorkloadStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            WorkloadStatus::Pending => write!(f, "pending"),
            WorkloadStatus::Running => write!(f, "running"),
            WorkloadStatus::Finished => write!(f, "finished"),
            WorkloadStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A concrete workload produced by scenario assembly.
///
/// A workload has a length in instructions and three utilization models
/// describing how it loads the CPU, memory and bandwidth of its VM over time.
/// VM binding and run times are filled in by the simulation engine.
pub struct Workload {
    pub id: u32,
    pub broker_id: u32,
    length: u64,
    pes: u32,
    input_size: u64,
    output_size: u64,
    cpu_utilization: Box<dyn UtilizationModel>,
    ram_utilization: Box<dyn UtilizationModel>,
    bw_utilization: Box<dyn UtilizationModel>,
    status: WorkloadStatus,
    vm_id: Option<u32>,
    start_time: Option<f64>,
    finish_time: Option<f64>,
}

impl Workload {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        broker_id: u32,
        length: u64,
        pes: u32,
        input_size: u64,
        output_size: u64,
        cpu_utilization: Box<dyn UtilizationModel>,
        ram_utilization: Box<dyn UtilizationModel>,
        bw_utilization: Box<dyn UtilizationModel>,
    ) -> Self {
        Self {
            id,
            broker_id,
            length,
            pes,
            input_size,
            output_size,
            cpu_utilization,
            ram_utilization,
            bw_utilization,
            status: WorkloadStatus::Pending,
            vm_id: None,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn pes(&self) -> u32 {
        self.pes
    }

    pub fn input_size(&self) -> u64 {
        self.input_size
    }

    pub fn output_size(&self) -> u64 {
        self.output_size
    }

    pub fn status(&self) -> &WorkloadStatus {
        &self.status
    }

    pub fn vm_id(&self) -> Option<u32> {
        self.vm_id
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn finish_time(&self) -> Option<f64> {
        self.finish_time
    }

    /// Current CPU utilization fraction.
    pub fn cpu_utilization(&self, time: f64) -> f64 {
        self.cpu_utilization.utilization(time)
    }

    /// Current memory utilization fraction.
    pub fn ram_utilization(&self, time: f64) -> f64 {
        self.ram_utilization.utilization(time)
    }

    /// Current bandwidth utilization fraction.
    pub fn bw_utilization(&self, time: f64) -> f64 {
        self.bw_utilization.utilization(time)
    }

    /// Binds the workload to a VM and marks it running.
    pub fn start_on_vm(&mut self, vm_id: u32, time: f64) {
        self.vm_id = Some(vm_id);
        self.start_time = Some(time);
        self.status = WorkloadStatus::Running;
    }

    pub fn finish(&mut self, time: f64) {
        self.finish_time = Some(time);
        self.status = WorkloadStatus::Finished;
    }

    pub fn fail(&mut self) {
        self.status = WorkloadStatus::Failed;
    }
}
