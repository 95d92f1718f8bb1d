//! VM allocation policies selecting a host for each VM.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::host::Host;
use crate::core::vm::Vm;

/// Trait for policies selecting a datacenter host for a VM.
///
/// The policy is a function of the VM requirements and the current host
/// states, which returns the id of the selected host or `None` if no
/// suitable host exists. Reserving resources on the selected host is done
/// by the caller.
pub trait AllocationPolicy {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32>;
}

/// Default policy, which returns the suitable host with the most free PEs.
pub struct SimpleAllocationPolicy;

impl SimpleAllocationPolicy {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for SimpleAllocationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationPolicy for SimpleAllocationPolicy {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut max_free_pes: u32 = 0;
        for host in hosts {
            let host = host.borrow();
            if host.can_allocate(vm) && host.free_pes() >= max_free_pes {
                max_free_pes = host.free_pes();
                result = Some(host.id);
            }
        }
        result
    }
}

/// FirstFit policy, which returns the first suitable host.
pub struct FirstFit;

impl FirstFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for FirstFit {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationPolicy for FirstFit {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        for host in hosts {
            let host = host.borrow();
            if host.can_allocate(vm) {
                return Some(host.id);
            }
        }
        None
    }
}

/// BestFit policy, which returns the most loaded (by available MIPS) suitable host.
pub struct BestFit;

impl BestFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for BestFit {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationPolicy for BestFit {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut min_available_mips = f64::MAX;
        for host in hosts {
            let host = host.borrow();
            if host.can_allocate(vm) && host.available_mips() < min_available_mips {
                min_available_mips = host.available_mips();
                result = Some(host.id);
            }
        }
        result
    }
}

/// WorstFit policy, which returns the least loaded (by available MIPS) suitable host.
pub struct WorstFit;

impl WorstFit {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WorstFit {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationPolicy for WorstFit {
    fn select_host(&self, vm: &Vm, hosts: &[Rc<RefCell<Host>>]) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut max_available_mips: f64 = -1.;
        for host in hosts {
            let host = host.borrow();
            if host.can_allocate(vm) && host.available_mips() > max_available_mips {
                max_available_mips = host.available_mips();
                result = Some(host.id);
            }
        }
        result
    }
}
