//! Scenario runner: builds the entity graph and feeds it to an engine.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::core::assembler::{AssembledScenario, GraphAssembler};
use crate::core::broker::Broker;
use crate::core::datacenter::Datacenter;
use crate::core::error::ScenarioError;
use crate::core::host::Host;
use crate::core::registry::PolicyRegistry;
use crate::core::spec::ScenarioSpec;
use crate::core::vm::Vm;
use crate::core::workload::Workload;
use crate::engine::SimulationEngine;

/// One runnable scenario: the assembled entity graph plus a label used in
/// logs and reports. The runner keeps ownership of the graph for its whole
/// lifetime; engines and reporting components access it through the
/// read accessors.
pub struct ScenarioSimulation {
    label: String,
    scenario: AssembledScenario,
}

impl ScenarioSimulation {
    /// Expands and assembles the scenario spec against the given registry.
    pub fn build(spec: &ScenarioSpec, registry: Rc<PolicyRegistry>, label: &str) -> Result<Self, ScenarioError> {
        let scenario = GraphAssembler::new(registry).assemble(spec)?;
        for datacenter in scenario.datacenters() {
            let datacenter = datacenter.borrow();
            info!("{}: {} hosts", datacenter.name(), datacenter.hosts().len());
        }
        Ok(Self {
            label: label.to_string(),
            scenario,
        })
    }

    /// Hands the assembled graph to the engine and starts the run:
    /// datacenters first, then each broker's VM and workload lists.
    pub fn run(&self, engine: &mut dyn SimulationEngine) {
        info!("starting simulation of scenario {}", self.label);
        for datacenter in self.scenario.datacenters() {
            engine.add_datacenter(datacenter.clone());
        }
        for broker in self.scenario.brokers() {
            engine.submit_vms(broker.clone(), self.scenario.vms(broker.id).to_vec());
            engine.submit_workloads(broker.clone(), self.scenario.workloads(broker.id).to_vec());
        }
        engine.run();
        info!("simulation of scenario {} finished", self.label);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn scenario(&self) -> &AssembledScenario {
        &self.scenario
    }

    pub fn datacenters(&self) -> &[Rc<RefCell<Datacenter>>] {
        self.scenario.datacenters()
    }

    pub fn hosts(&self) -> Vec<Rc<RefCell<Host>>> {
        self.scenario.hosts()
    }

    pub fn brokers(&self) -> &[Rc<Broker>] {
        self.scenario.brokers()
    }

    pub fn vms(&self, broker_id: u32) -> &[Rc<RefCell<Vm>>] {
        self.scenario.vms(broker_id)
    }

    pub fn workloads(&self, broker_id: u32) -> &[Rc<RefCell<Workload>>] {
        self.scenario.workloads(broker_id)
    }

    pub fn find_vm(&self, broker_id: u32, vm_id: u32) -> Option<Rc<RefCell<Vm>>> {
        self.scenario.find_vm(broker_id, vm_id)
    }
}
