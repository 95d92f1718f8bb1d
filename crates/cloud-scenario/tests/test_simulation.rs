use std::rc::Rc;

use cloud_scenario::batch::{read_scenarios, BatchRunner};
use cloud_scenario::core::registry::PolicyRegistry;
use cloud_scenario::core::workload::WorkloadStatus;
use cloud_scenario::engine::BasicEngine;
use cloud_scenario::report::WorkloadReport;
use cloud_scenario::simulation::ScenarioSimulation;

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

#[test]
// The VM (500 MIPS, 1 PE) lands on a host and its single full-utilization
// workload of 100000 instructions finishes after 100000 / 500 = 200 seconds.
fn test_round_trip_run() {
    let specs = read_scenarios(&name_wrapper("round_trip.yaml")).unwrap();
    let registry = Rc::new(PolicyRegistry::new());
    let simulation = ScenarioSimulation::build(&specs[0], registry, "round_trip").unwrap();

    let mut engine = BasicEngine::new();
    simulation.run(&mut engine);

    let broker = &simulation.brokers()[0];
    let vm = &simulation.vms(broker.id)[0];
    let host_id = vm.borrow().host_id().unwrap();
    assert_eq!(host_id, 1);

    let workload = simulation.workloads(broker.id)[0].borrow();
    assert_eq!(*workload.status(), WorkloadStatus::Finished);
    assert_eq!(workload.vm_id(), Some(vm.borrow().id));
    assert_eq!(workload.start_time(), Some(0.));
    assert_eq!(workload.finish_time(), Some(200.));

    // host resources were actually reserved for the VM
    let host = simulation
        .datacenters()
        .iter()
        .find_map(|dc| dc.borrow().host(host_id))
        .unwrap();
    assert_eq!(host.borrow().available_mips(), 1500.);
    assert_eq!(host.borrow().available_ram(), 8192. - 1024.);
}

#[test]
// The report re-associates each finished workload with the host that ran it
// through the broker-scoped VM lookup.
fn test_workload_report() {
    let specs = read_scenarios(&name_wrapper("round_trip.yaml")).unwrap();
    let registry = Rc::new(PolicyRegistry::new());
    let simulation = ScenarioSimulation::build(&specs[0], registry, "round_trip").unwrap();
    simulation.run(&mut BasicEngine::new());

    let report = WorkloadReport::new(simulation.scenario());
    assert_eq!(report.rows().len(), 1);
    let row = &report.rows()[0];
    assert_eq!(row.broker, "alice");
    assert_eq!(row.status, WorkloadStatus::Finished);
    assert_eq!(row.host_id, Some(1));
}

#[test]
// A failing scenario is skipped; the rest of the batch still runs.
fn test_batch_fault_isolation() {
    let specs = read_scenarios(&name_wrapper("batch.yaml")).unwrap();
    assert_eq!(specs.len(), 2);
    let runner = BatchRunner::new(Rc::new(PolicyRegistry::new()));
    let results = runner.run(&specs, BasicEngine::new);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].summary.get("label").unwrap(), "scenario_1");
    assert_eq!(results[0].summary.get("vms").unwrap(), "2");
    assert_eq!(results[0].summary.get("workloads").unwrap(), "4");

    // the good scenario actually ran
    let simulation = &results[0].simulation;
    let broker = &simulation.brokers()[0];
    for workload in simulation.workloads(broker.id) {
        assert_eq!(*workload.borrow().status(), WorkloadStatus::Finished);
    }
}

#[test]
// Without any datacenter the VMs stay unplaced and workloads fail.
fn test_run_without_datacenters() {
    let specs = read_scenarios(&name_wrapper("batch.yaml")).unwrap();
    let mut spec = specs[0].clone();
    spec.datacenters.clear();
    let registry = Rc::new(PolicyRegistry::new());
    let simulation = ScenarioSimulation::build(&spec, registry, "no_datacenters").unwrap();
    simulation.run(&mut BasicEngine::new());

    let broker = &simulation.brokers()[0];
    for vm in simulation.vms(broker.id) {
        assert_eq!(vm.borrow().host_id(), None);
    }
    for workload in simulation.workloads(broker.id) {
        assert_eq!(*workload.borrow().status(), WorkloadStatus::Failed);
    }
}
