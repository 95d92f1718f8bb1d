//! Representation of a physical host and its processing elements.

use crate::core::provisioner::ResourceProvisioner;
use crate::core::vm::Vm;
use crate::core::vm_scheduler::VmScheduler;

/// A single CPU core of a host, wrapping the provisioner managing its MIPS.
pub struct ProcessingElement {
    pub id: u32,
    mips: f64,
    provisioner: Box<dyn ResourceProvisioner>,
}

impl ProcessingElement {
    pub fn new(id: u32, mips: f64, provisioner: Box<dyn ResourceProvisioner>) -> Self {
        Self { id, mips, provisioner }
    }

    pub fn mips(&self) -> f64 {
        self.mips
    }

    pub fn provisioner(&self) -> &dyn ResourceProvisioner {
        self.provisioner.as_ref()
    }
}

/// A concrete host produced by scenario assembly.
///
/// Owns its processing elements, the memory and bandwidth provisioners, and
/// the VM scheduler resolved from its spec. Storage is plain bookkeeping
/// charged with VM image sizes.
pub struct Host {
    pub id: u32,
    pes: Vec<ProcessingElement>,
    ram: u64,
    bandwidth: u64,
    storage: u64,
    available_storage: u64,
    ram_provisioner: Box<dyn ResourceProvisioner>,
    bw_provisioner: Box<dyn ResourceProvisioner>,
    vm_scheduler: Box<dyn VmScheduler>,
}

impl Host {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        pes: Vec<ProcessingElement>,
        ram: u64,
        bandwidth: u64,
        storage: u64,
        ram_provisioner: Box<dyn ResourceProvisioner>,
        bw_provisioner: Box<dyn ResourceProvisioner>,
        mut vm_scheduler: Box<dyn VmScheduler>,
    ) -> Self {
        let pe_mips: Vec<f64> = pes.iter().map(|pe| pe.mips()).collect();
        vm_scheduler.attach(&pe_mips);
        Self {
            id,
            pes,
            ram,
            bandwidth,
            storage,
            available_storage: storage,
            ram_provisioner,
            bw_provisioner,
            vm_scheduler,
        }
    }

    pub fn pes(&self) -> &[ProcessingElement] {
        &self.pes
    }

    pub fn pe_count(&self) -> u32 {
        self.pes.len() as u32
    }

    pub fn ram(&self) -> u64 {
        self.ram
    }

    pub fn bandwidth(&self) -> u64 {
        self.bandwidth
    }

    pub fn storage(&self) -> u64 {
        self.storage
    }

    pub fn total_mips(&self) -> f64 {
        self.pes.iter().map(|pe| pe.mips()).sum()
    }

    pub fn available_mips(&self) -> f64 {
        self.vm_scheduler.available_mips()
    }

    pub fn free_pes(&self) -> u32 {
        self.vm_scheduler.free_pes()
    }

    pub fn available_ram(&self) -> f64 {
        self.ram_provisioner.available()
    }

    pub fn available_bandwidth(&self) -> f64 {
        self.bw_provisioner.available()
    }

    pub fn available_storage(&self) -> u64 {
        self.available_storage
    }

    /// Checks whether the VM would fit on this host without reserving anything.
    pub fn can_allocate(&self, vm: &Vm) -> bool {
        self.vm_scheduler.can_allocate(vm.mips(), vm.pes())
            && self.ram_provisioner.available() >= vm.ram() as f64
            && self.bw_provisioner.available() >= vm.bandwidth() as f64
            && self.available_storage >= vm.image_size()
    }

    /// Reserves host resources for the VM, returns false and rolls back
    /// if any of them is denied.
    pub fn allocate_vm(&mut self, vm: &Vm) -> bool {
        if self.available_storage < vm.image_size() {
            return false;
        }
        if !self.vm_scheduler.allocate(vm.id, vm.mips(), vm.pes()) {
            return false;
        }
        if !self.ram_provisioner.allocate(vm.id, vm.ram() as f64) {
            self.vm_scheduler.deallocate(vm.id);
            return false;
        }
        if !self.bw_provisioner.allocate(vm.id, vm.bandwidth() as f64) {
            self.vm_scheduler.deallocate(vm.id);
            self.ram_provisioner.deallocate(vm.id);
            return false;
        }
        self.available_storage -= vm.image_size();
        true
    }

    /// Releases all host resources reserved for the VM.
    pub fn deallocate_vm(&mut self, vm: &Vm) {
        self.vm_scheduler.deallocate(vm.id);
        self.ram_provisioner.deallocate(vm.id);
        self.bw_provisioner.deallocate(vm.id);
        self.available_storage = (self.available_storage + vm.image_size()).min(self.storage);
    }
}
