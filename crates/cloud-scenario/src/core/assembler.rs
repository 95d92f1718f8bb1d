//! Assembly of the concrete entity graph from an expanded scenario.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use sugars::{rc, refcell};

use crate::core::broker::Broker;
use crate::core::datacenter::{CostRates, Datacenter, Storage};
use crate::core::error::ScenarioError;
use crate::core::expansion::{expand, IdAllocator, NameGenerator};
use crate::core::host::{Host, ProcessingElement};
use crate::core::registry::PolicyRegistry;
use crate::core::spec::{CustomerSpec, DatacenterSpec, HostSpec, ScenarioSpec, VmSpec, WorkloadSpec};
use crate::core::vm::Vm;
use crate::core::workload::Workload;

/// The concrete entity graph of one scenario, ready to be handed to a
/// simulation engine.
///
/// Keeps the insertion order of everything: datacenters and brokers follow
/// the spec declaration order, and each broker's VM and workload lists keep
/// their expansion order.
pub struct AssembledScenario {
    datacenters: Vec<Rc<RefCell<Datacenter>>>,
    brokers: Vec<Rc<Broker>>,
    vms: IndexMap<u32, Vec<Rc<RefCell<Vm>>>>,
    workloads: IndexMap<u32, Vec<Rc<RefCell<Workload>>>>,
}

impl std::fmt::Debug for AssembledScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssembledScenario")
            .field("datacenters", &self.datacenters.len())
            .field("brokers", &self.brokers.len())
            .field("vms", &self.vms.len())
            .field("workloads", &self.workloads.len())
            .finish()
    }
}

impl AssembledScenario {
    pub fn datacenters(&self) -> &[Rc<RefCell<Datacenter>>] {
        &self.datacenters
    }

    pub fn brokers(&self) -> &[Rc<Broker>] {
        &self.brokers
    }

    /// All hosts of all datacenters, flattened in datacenter order.
    pub fn hosts(&self) -> Vec<Rc<RefCell<Host>>> {
        self.datacenters
            .iter()
            .flat_map(|dc| dc.borrow().hosts().to_vec())
            .collect()
    }

    /// VMs owned by the broker, in expansion order.
    pub fn vms(&self, broker_id: u32) -> &[Rc<RefCell<Vm>>] {
        self.vms.get(&broker_id).map(|vms| vms.as_slice()).unwrap_or(&[])
    }

    /// Workloads owned by the broker, in expansion order.
    pub fn workloads(&self, broker_id: u32) -> &[Rc<RefCell<Workload>>] {
        self.workloads.get(&broker_id).map(|w| w.as_slice()).unwrap_or(&[])
    }

    /// Searches for a VM with the given id among the VMs owned by the broker.
    pub fn find_vm(&self, broker_id: u32, vm_id: u32) -> Option<Rc<RefCell<Vm>>> {
        self.vms(broker_id).iter().find(|vm| vm.borrow().id == vm_id).cloned()
    }

    pub fn number_of_vms(&self) -> usize {
        self.vms.values().map(|vms| vms.len()).sum()
    }

    pub fn number_of_workloads(&self) -> usize {
        self.workloads.values().map(|w| w.len()).sum()
    }
}

/// Builds concrete entities from spec records, resolving policy aliases
/// through the injected registry.
///
/// Assembly is strictly bottom-up: processing elements before hosts, hosts
/// before datacenters, VMs and workloads before their broker registration.
/// Every policy field is resolved exactly once per constructed entity; an
/// unresolvable alias aborts the whole scenario.
pub struct GraphAssembler {
    registry: Rc<PolicyRegistry>,
}

impl GraphAssembler {
    pub fn new(registry: Rc<PolicyRegistry>) -> Self {
        Self { registry }
    }

    /// Expands the scenario spec and assembles the concrete entity graph.
    pub fn assemble(&self, spec: &ScenarioSpec) -> Result<AssembledScenario, ScenarioError> {
        let mut datacenter_ids = IdAllocator::new();
        let mut host_ids = IdAllocator::new();
        let mut broker_ids = IdAllocator::new();
        let mut vm_ids = IdAllocator::new();
        let mut workload_ids = IdAllocator::new();
        let mut datacenter_names = NameGenerator::new("datacenter");
        let mut customer_names = NameGenerator::new("customer");

        let mut datacenters = Vec::new();
        for entry in expand(&spec.datacenters, &mut datacenter_ids) {
            let name = datacenter_names.next_name(entry.spec.name.as_deref());
            let datacenter = self.assemble_datacenter(entry.id, name, entry.spec, &mut host_ids)?;
            datacenters.push(rc!(refcell!(datacenter)));
        }

        let mut brokers = Vec::new();
        let mut vms = IndexMap::new();
        let mut workloads = IndexMap::new();
        for entry in expand(&spec.customers, &mut broker_ids) {
            let name = customer_names.next_name(entry.spec.name.as_deref());
            let broker = Rc::new(Broker::new(entry.id, name));
            let broker_vms = self.assemble_vms(&broker, entry.spec, &mut vm_ids)?;
            let broker_workloads = self.assemble_workloads(&broker, entry.spec, &mut workload_ids)?;
            vms.insert(broker.id, broker_vms);
            workloads.insert(broker.id, broker_workloads);
            brokers.push(broker);
        }

        Ok(AssembledScenario {
            datacenters,
            brokers,
            vms,
            workloads,
        })
    }

    fn assemble_datacenter(
        &self,
        id: u32,
        name: String,
        spec: &DatacenterSpec,
        host_ids: &mut IdAllocator,
    ) -> Result<Datacenter, ScenarioError> {
        let mut hosts = Vec::new();
        for entry in expand(&spec.hosts, host_ids) {
            let host = self.assemble_host(entry.id, entry.spec)?;
            hosts.push(rc!(refcell!(host)));
        }
        let storage = spec
            .storage
            .iter()
            .map(|s| Storage {
                capacity: s.capacity,
                bandwidth: s.bandwidth,
                latency: s.latency,
            })
            .collect();
        let allocation_policy = self.registry.allocation_policy(&spec.allocation_policy)?;
        let cost_rates = CostRates {
            per_cpu_sec: spec.cost_per_cpu_sec,
            per_mem: spec.cost_per_mem,
            per_storage: spec.cost_per_storage,
            per_bw: spec.cost_per_bw,
        };
        Ok(Datacenter::new(
            id,
            name,
            spec.architecture.clone(),
            spec.os.clone(),
            spec.hypervisor.clone(),
            spec.scheduling_interval,
            cost_rates,
            hosts,
            storage,
            allocation_policy,
        ))
    }

    fn assemble_host(&self, id: u32, spec: &HostSpec) -> Result<Host, ScenarioError> {
        let mut pes = Vec::new();
        for pe_id in 0..spec.pes {
            // each PE wraps its own freshly resolved provisioner
            let provisioner = self.registry.provisioner(&spec.pe_provisioner, spec.mips)?;
            pes.push(ProcessingElement::new(pe_id, spec.mips, provisioner));
        }
        let ram_provisioner = self.registry.provisioner(&spec.ram_provisioner, spec.ram as f64)?;
        let bw_provisioner = self.registry.provisioner(&spec.bw_provisioner, spec.bandwidth as f64)?;
        let vm_scheduler = self.registry.vm_scheduler(&spec.vm_scheduler)?;
        Ok(Host::new(
            id,
            pes,
            spec.ram,
            spec.bandwidth,
            spec.storage,
            ram_provisioner,
            bw_provisioner,
            vm_scheduler,
        ))
    }

    fn assemble_vms(
        &self,
        broker: &Rc<Broker>,
        spec: &CustomerSpec,
        vm_ids: &mut IdAllocator,
    ) -> Result<Vec<Rc<RefCell<Vm>>>, ScenarioError> {
        let mut vms = Vec::new();
        for entry in expand(&spec.vms, vm_ids) {
            vms.push(rc!(refcell!(self.assemble_vm(entry.id, broker.id, entry.spec)?)));
        }
        Ok(vms)
    }

    fn assemble_vm(&self, id: u32, broker_id: u32, spec: &VmSpec) -> Result<Vm, ScenarioError> {
        let workload_scheduler = self.registry.workload_scheduler(&spec.workload_scheduler)?;
        Ok(Vm::new(
            id,
            broker_id,
            spec.mips,
            spec.pes,
            spec.ram,
            spec.bandwidth,
            spec.image_size,
            workload_scheduler,
        ))
    }

    fn assemble_workloads(
        &self,
        broker: &Rc<Broker>,
        spec: &CustomerSpec,
        workload_ids: &mut IdAllocator,
    ) -> Result<Vec<Rc<RefCell<Workload>>>, ScenarioError> {
        let mut workloads = Vec::new();
        for entry in expand(&spec.workloads, workload_ids) {
            workloads.push(rc!(refcell!(self.assemble_workload(entry.id, broker.id, entry.spec)?)));
        }
        Ok(workloads)
    }

    fn assemble_workload(&self, id: u32, broker_id: u32, spec: &WorkloadSpec) -> Result<Workload, ScenarioError> {
        let cpu_utilization = self.registry.utilization_model(&spec.cpu_utilization)?;
        let ram_utilization = self.registry.utilization_model(&spec.ram_utilization)?;
        let bw_utilization = self.registry.utilization_model(&spec.bw_utilization)?;
        Ok(Workload::new(
            id,
            broker_id,
            spec.length,
            spec.pes,
            spec.input_size,
            spec.output_size,
            cpu_utilization,
            ram_utilization,
            bw_utilization,
        ))
    }
}
