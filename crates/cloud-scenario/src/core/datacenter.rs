//! Representation of a datacenter.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::allocation_policy::AllocationPolicy;
use crate::core::host::Host;
use crate::core::vm::Vm;

/// Storage area network attached to a datacenter.
#[derive(Debug, Clone, PartialEq)]
pub struct Storage {
    pub capacity: u64,
    pub bandwidth: f64,
    pub latency: f64,
}

/// Per-resource billing rates of a datacenter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostRates {
    pub per_cpu_sec: f64,
    pub per_mem: f64,
    pub per_storage: f64,
    pub per_bw: f64,
}

/// A concrete datacenter produced by scenario assembly: an ordered host list
/// plus the allocation policy resolved from its spec.
pub struct Datacenter {
    pub id: u32,
    name: String,
    architecture: String,
    os: String,
    hypervisor: String,
    scheduling_interval: f64,
    cost_rates: CostRates,
    hosts: Vec<Rc<RefCell<Host>>>,
    storage: Vec<Storage>,
    allocation_policy: Box<dyn AllocationPolicy>,
}

impl Datacenter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        name: String,
        architecture: String,
        os: String,
        hypervisor: String,
        scheduling_interval: f64,
        cost_rates: CostRates,
        hosts: Vec<Rc<RefCell<Host>>>,
        storage: Vec<Storage>,
        allocation_policy: Box<dyn AllocationPolicy>,
    ) -> Self {
        Self {
            id,
            name,
            architecture,
            os,
            hypervisor,
            scheduling_interval,
            cost_rates,
            hosts,
            storage,
            allocation_policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn hypervisor(&self) -> &str {
        &self.hypervisor
    }

    pub fn scheduling_interval(&self) -> f64 {
        self.scheduling_interval
    }

    pub fn cost_rates(&self) -> &CostRates {
        &self.cost_rates
    }

    pub fn hosts(&self) -> &[Rc<RefCell<Host>>] {
        &self.hosts
    }

    pub fn storage(&self) -> &[Storage] {
        &self.storage
    }

    pub fn host(&self, host_id: u32) -> Option<Rc<RefCell<Host>>> {
        self.hosts.iter().find(|h| h.borrow().id == host_id).cloned()
    }

    /// Asks the allocation policy for a host and reserves its resources
    /// for the VM. Returns the selected host id, or None if the VM fits
    /// nowhere in this datacenter.
    pub fn place_vm(&self, vm: &Vm) -> Option<u32> {
        let host_id = self.allocation_policy.select_host(vm, &self.hosts)?;
        let host = self.host(host_id)?;
        if host.borrow_mut().allocate_vm(vm) {
            Some(host_id)
        } else {
            None
        }
    }
}
