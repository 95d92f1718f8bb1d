//! Representation of a virtual machine.

use crate::core::workload_scheduler::WorkloadScheduler;

/// A concrete VM produced by scenario assembly.
///
/// The VM is characterized by its resource requirements (MIPS per PE, PE
/// count, memory, bandwidth, image size) and carries the workload scheduler
/// resolved from its spec. Host binding is filled in by the simulation engine
/// once the VM is placed.
pub struct Vm {
    pub id: u32,
    pub broker_id: u32,
    mips: f64,
    pes: u32,
    ram: u64,
    bandwidth: u64,
    image_size: u64,
    host_id: Option<u32>,
    workload_scheduler: Box<dyn WorkloadScheduler>,
}

impl Vm {
    pub fn new(
        id: u32,
        broker_id: u32,
        mips: f64,
        pes: u32,
        ram: u64,
        bandwidth: u64,
        image_size: u64,
        mut workload_scheduler: Box<dyn WorkloadScheduler>,
    ) -> Self {
        workload_scheduler.attach(mips, pes);
        Self {
            id,
            broker_id,
            mips,
            pes,
            ram,
            bandwidth,
            image_size,
            host_id: None,
            workload_scheduler,
        }
    }

    pub fn mips(&self) -> f64 {
        self.mips
    }

    pub fn pes(&self) -> u32 {
        self.pes
    }

    pub fn ram(&self) -> u64 {
        self.ram
    }

    pub fn bandwidth(&self) -> u64 {
        self.bandwidth
    }

    pub fn image_size(&self) -> u64 {
        self.image_size
    }

    /// Id of the host running this VM, if it has been placed.
    pub fn host_id(&self) -> Option<u32> {
        self.host_id
    }

    pub fn set_host_id(&mut self, host_id: u32) {
        self.host_id = Some(host_id);
    }

    pub fn workload_scheduler(&self) -> &dyn WorkloadScheduler {
        self.workload_scheduler.as_ref()
    }
}
