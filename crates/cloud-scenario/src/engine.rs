//! Interface to the simulation engine and a minimal reference implementation.
//!
//! The engine owning event dispatch, time advancement and resource contention
//! is external to this crate; the scenario runner only hands it the assembled
//! graph through [`SimulationEngine`]. [`BasicEngine`] is a deliberately
//! simple synchronous implementation used by tests and the bundled CLI: it
//! places VMs through the datacenter allocation policies and runs workloads
//! to completion without modelling contention over time.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::core::broker::Broker;
use crate::core::datacenter::Datacenter;
use crate::core::vm::Vm;
use crate::core::workload::Workload;

/// The consumed surface of a simulation engine: the runner registers
/// datacenters, submits per-broker VM and workload lists, and starts the run.
pub trait SimulationEngine {
    fn add_datacenter(&mut self, datacenter: Rc<RefCell<Datacenter>>);

    fn submit_vms(&mut self, broker: Rc<Broker>, vms: Vec<Rc<RefCell<Vm>>>);

    fn submit_workloads(&mut self, broker: Rc<Broker>, workloads: Vec<Rc<RefCell<Workload>>>);

    /// Runs the simulation to completion, mutating the submitted entities.
    fn run(&mut self);
}

struct Submission {
    broker: Rc<Broker>,
    vms: Vec<Rc<RefCell<Vm>>>,
    workloads: Vec<Rc<RefCell<Workload>>>,
}

/// Reference engine with instantaneous scheduling semantics.
///
/// VM placement walks the datacenters in registration order and asks each
/// datacenter to place the VM via its allocation policy. Workloads are bound
/// to their broker's placed VMs round-robin and executed in waves sized by
/// the VM workload scheduler's concurrency limit, with run times derived from
/// the scheduler MIPS share and the CPU utilization model at start time.
#[derive(Default)]
pub struct BasicEngine {
    datacenters: Vec<Rc<RefCell<Datacenter>>>,
    submissions: Vec<Submission>,
}

impl BasicEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn submission_for(&mut self, broker: &Rc<Broker>) -> &mut Submission {
        let position = self.submissions.iter().position(|s| s.broker.id == broker.id);
        match position {
            Some(index) => &mut self.submissions[index],
            None => {
                self.submissions.push(Submission {
                    broker: broker.clone(),
                    vms: Vec::new(),
                    workloads: Vec::new(),
                });
                self.submissions.last_mut().unwrap()
            }
        }
    }

    fn place_vms(&mut self) {
        for submission in &self.submissions {
            for vm in &submission.vms {
                let mut placed = false;
                for datacenter in &self.datacenters {
                    let host_id = datacenter.borrow().place_vm(&vm.borrow());
                    if let Some(host_id) = host_id {
                        vm.borrow_mut().set_host_id(host_id);
                        placed = true;
                        break;
                    }
                }
                if !placed {
                    warn!(
                        "no suitable host found for VM {} of broker {}",
                        vm.borrow().id,
                        submission.broker.name()
                    );
                }
            }
        }
    }

    fn run_workloads(&mut self) {
        for submission in &self.submissions {
            let placed_vms: Vec<_> = submission
                .vms
                .iter()
                .filter(|vm| vm.borrow().host_id().is_some())
                .cloned()
                .collect();
            if placed_vms.is_empty() {
                for workload in &submission.workloads {
                    workload.borrow_mut().fail();
                }
                continue;
            }

            // bind workloads to VMs round-robin, then run each VM's queue in
            // waves bounded by its workload scheduler concurrency limit
            let mut queues: Vec<Vec<Rc<RefCell<Workload>>>> = vec![Vec::new(); placed_vms.len()];
            for (i, workload) in submission.workloads.iter().enumerate() {
                queues[i % placed_vms.len()].push(workload.clone());
            }

            for (vm, queue) in placed_vms.iter().zip(queues) {
                Self::run_vm_queue(&vm.borrow(), &queue);
            }
        }
    }

    fn run_vm_queue(vm: &Vm, queue: &[Rc<RefCell<Workload>>]) {
        let scheduler = vm.workload_scheduler();
        let limit = scheduler.concurrency_limit().max(1) as usize;
        let mut clock = 0.;
        for wave in queue.chunks(limit) {
            let share = scheduler.mips_share(wave.len() as u32);
            let mut wave_duration: f64 = 0.;
            for workload in wave {
                let mut workload = workload.borrow_mut();
                workload.start_on_vm(vm.id, clock);
                let rate = share * workload.cpu_utilization(clock);
                if rate <= 0. {
                    workload.fail();
                    continue;
                }
                let duration = workload.length() as f64 / rate;
                workload.finish(clock + duration);
                wave_duration = wave_duration.max(duration);
            }
            clock += wave_duration;
        }
    }
}

impl SimulationEngine for BasicEngine {
    fn add_datacenter(&mut self, datacenter: Rc<RefCell<Datacenter>>) {
        self.datacenters.push(datacenter);
    }

    fn submit_vms(&mut self, broker: Rc<Broker>, vms: Vec<Rc<RefCell<Vm>>>) {
        self.submission_for(&broker).vms.extend(vms);
    }

    fn submit_workloads(&mut self, broker: Rc<Broker>, workloads: Vec<Rc<RefCell<Workload>>>) {
        self.submission_for(&broker).workloads.extend(workloads);
    }

    fn run(&mut self) {
        self.place_vms();
        self.run_workloads();
    }
}
