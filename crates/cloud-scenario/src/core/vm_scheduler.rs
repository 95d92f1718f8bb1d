//! VM scheduling policies for sharing host processing elements.

use std::collections::HashMap;

/// Trait for policies dividing host PE capacity between VMs.
///
/// A scheduler is constructed without arguments and attached to its host
/// during host construction, after which it self-initializes against the
/// host PE list.
pub trait VmScheduler {
    /// Binds the scheduler to the host processing elements.
    fn attach(&mut self, pe_mips: &[f64]);

    /// Tries to reserve capacity for a VM requesting `pes` elements of `mips` each,
    /// returns false if the VM does not fit.
    fn allocate(&mut self, vm_id: u32, mips: f64, pes: u32) -> bool;

    /// Releases the capacity reserved for a VM.
    fn deallocate(&mut self, vm_id: u32);

    /// Checks whether a VM with the given requirements would fit.
    fn can_allocate(&self, mips: f64, pes: u32) -> bool;

    /// Total MIPS capacity currently unreserved.
    fn available_mips(&self) -> f64;

    /// Number of processing elements a new VM could still claim.
    fn free_pes(&self) -> u32;
}

impl std::fmt::Debug for dyn VmScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn VmScheduler")
    }
}

/// Time-shared scheduler: VMs draw from the pooled capacity of all PEs,
/// so a VM fits as long as its total MIPS demand does.
#[derive(Default)]
pub struct TimeSharedVmScheduler {
    pe_mips: f64,
    total_mips: f64,
    allocated: HashMap<u32, f64>,
}

impl TimeSharedVmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocated_mips(&self) -> f64 {
        self.allocated.values().sum()
    }
}

impl VmScheduler for TimeSharedVmScheduler {
    fn attach(&mut self, pe_mips: &[f64]) {
        self.pe_mips = pe_mips.first().copied().unwrap_or(0.);
        self.total_mips = pe_mips.iter().sum();
    }

    fn allocate(&mut self, vm_id: u32, mips: f64, pes: u32) -> bool {
        if !self.can_allocate(mips, pes) {
            return false;
        }
        self.allocated.insert(vm_id, mips * pes as f64);
        true
    }

    fn deallocate(&mut self, vm_id: u32) {
        self.allocated.remove(&vm_id);
    }

    fn can_allocate(&self, mips: f64, pes: u32) -> bool {
        mips * pes as f64 <= self.available_mips()
    }

    fn available_mips(&self) -> f64 {
        self.total_mips - self.allocated_mips()
    }

    fn free_pes(&self) -> u32 {
        if self.pe_mips == 0. {
            return 0;
        }
        (self.available_mips() / self.pe_mips).floor() as u32
    }
}

/// Space-shared scheduler: each VM gets exclusive use of whole PEs,
/// so a VM fits only if enough PEs are unassigned and each PE is fast enough.
#[derive(Default)]
pub struct SpaceSharedVmScheduler {
    pe_mips: f64,
    pe_count: u32,
    allocated: HashMap<u32, u32>,
}

impl SpaceSharedVmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocated_pes(&self) -> u32 {
        self.allocated.values().sum()
    }
}

impl VmScheduler for SpaceSharedVmScheduler {
    fn attach(&mut self, pe_mips: &[f64]) {
        self.pe_mips = pe_mips.first().copied().unwrap_or(0.);
        self.pe_count = pe_mips.len() as u32;
    }

    fn allocate(&mut self, vm_id: u32, mips: f64, pes: u32) -> bool {
        if !self.can_allocate(mips, pes) {
            return false;
        }
        self.allocated.insert(vm_id, pes);
        true
    }

    fn deallocate(&mut self, vm_id: u32) {
        self.allocated.remove(&vm_id);
    }

    fn can_allocate(&self, mips: f64, pes: u32) -> bool {
        mips <= self.pe_mips && pes <= self.free_pes()
    }

    fn available_mips(&self) -> f64 {
        self.free_pes() as f64 * self.pe_mips
    }

    fn free_pes(&self) -> u32 {
        self.pe_count - self.allocated_pes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_shared_pools_capacity() {
        let mut scheduler = TimeSharedVmScheduler::new();
        scheduler.attach(&[1000., 1000.]);
        // a VM asking for more MIPS per PE than one PE offers still fits,
        // as long as the pooled capacity covers it
        assert!(scheduler.allocate(1, 1500., 1));
        assert_eq!(scheduler.available_mips(), 500.);
        assert!(!scheduler.allocate(2, 600., 1));
        scheduler.deallocate(1);
        assert_eq!(scheduler.available_mips(), 2000.);
    }

    #[test]
    fn test_space_shared_assigns_whole_pes() {
        let mut scheduler = SpaceSharedVmScheduler::new();
        scheduler.attach(&[1000., 1000.]);
        assert!(!scheduler.can_allocate(1500., 1));
        assert!(scheduler.allocate(1, 1000., 1));
        assert_eq!(scheduler.free_pes(), 1);
        assert!(!scheduler.allocate(2, 500., 2));
        assert!(scheduler.allocate(2, 500., 1));
        assert_eq!(scheduler.free_pes(), 0);
    }
}
