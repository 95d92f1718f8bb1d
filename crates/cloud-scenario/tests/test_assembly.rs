use std::rc::Rc;

use cloud_scenario::batch::read_scenarios;
use cloud_scenario::core::assembler::GraphAssembler;
use cloud_scenario::core::registry::PolicyRegistry;
use cloud_scenario::core::spec::{CustomerSpec, DatacenterSpec, ScenarioSpec};

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn assembler() -> GraphAssembler {
    GraphAssembler::new(Rc::new(PolicyRegistry::new()))
}

#[test]
// One datacenter spec with amount 2 and one host each, one customer with one
// VM and one workload: 2 datacenters, 2 hosts, 1 broker, 1 VM, 1 workload,
// with identities unique within every class.
fn test_round_trip_scenario() {
    let specs = read_scenarios(&name_wrapper("round_trip.yaml")).unwrap();
    assert_eq!(specs.len(), 1);
    let spec = &specs[0];
    assert_eq!(spec.number_of_datacenters(), 2);
    assert_eq!(spec.number_of_hosts(), 2);
    assert_eq!(spec.number_of_vms(), 1);
    assert_eq!(spec.number_of_workloads(), 1);

    let scenario = assembler().assemble(spec).unwrap();
    assert_eq!(scenario.datacenters().len(), 2);
    assert_eq!(scenario.hosts().len(), 2);
    assert_eq!(scenario.brokers().len(), 1);

    let broker = &scenario.brokers()[0];
    assert_eq!(broker.name(), "alice");
    assert_eq!(scenario.vms(broker.id).len(), 1);
    assert_eq!(scenario.workloads(broker.id).len(), 1);

    let datacenter_ids: Vec<u32> = scenario.datacenters().iter().map(|dc| dc.borrow().id).collect();
    assert_eq!(datacenter_ids, vec![1, 2]);
    let host_ids: Vec<u32> = scenario.hosts().iter().map(|h| h.borrow().id).collect();
    assert_eq!(host_ids, vec![1, 2]);

    // generated names are scenario-scoped
    let names: Vec<String> = scenario
        .datacenters()
        .iter()
        .map(|dc| dc.borrow().name().to_string())
        .collect();
    assert_eq!(names, vec!["datacenter1", "datacenter2"]);
}

#[test]
// Host construction wires PEs, provisioners and the VM scheduler.
fn test_host_assembly() {
    let specs = read_scenarios(&name_wrapper("round_trip.yaml")).unwrap();
    let scenario = assembler().assemble(&specs[0]).unwrap();
    let hosts = scenario.hosts();
    let host = hosts[0].borrow();
    assert_eq!(host.pe_count(), 2);
    assert_eq!(host.total_mips(), 2000.);
    assert_eq!(host.available_mips(), 2000.);
    assert_eq!(host.available_ram(), 8192.);
    assert_eq!(host.available_bandwidth(), 10000.);
    assert_eq!(host.available_storage(), 1048576);
    for pe in host.pes() {
        assert_eq!(pe.mips(), 1000.);
        assert_eq!(pe.provisioner().capacity(), 1000.);
    }
}

#[test]
// A datacenter without hosts is legal and assembles to an empty pool.
fn test_datacenter_without_hosts() {
    let spec = ScenarioSpec {
        datacenters: vec![DatacenterSpec {
            name: Some("empty".to_string()),
            amount: None,
            architecture: "x86".to_string(),
            os: "Linux".to_string(),
            hypervisor: "Xen".to_string(),
            allocation_policy: "Simple".to_string(),
            cost_per_cpu_sec: 0.1,
            cost_per_mem: 0.05,
            cost_per_storage: 0.01,
            cost_per_bw: 0.02,
            scheduling_interval: 30.,
            hosts: Vec::new(),
            storage: Vec::new(),
        }],
        customers: Vec::new(),
    };
    let scenario = assembler().assemble(&spec).unwrap();
    assert_eq!(scenario.datacenters().len(), 1);
    let datacenter = scenario.datacenters()[0].borrow();
    assert_eq!(datacenter.name(), "empty");
    assert!(datacenter.hosts().is_empty());
    assert_eq!(datacenter.cost_rates().per_cpu_sec, 0.1);
    assert_eq!(datacenter.scheduling_interval(), 30.);
}

#[test]
// A customer without VMs or workloads assembles to a broker owning nothing.
fn test_customer_without_vms() {
    let spec = ScenarioSpec {
        datacenters: Vec::new(),
        customers: vec![CustomerSpec {
            name: None,
            amount: Some(2),
            vms: Vec::new(),
            workloads: Vec::new(),
        }],
    };
    let scenario = assembler().assemble(&spec).unwrap();
    assert_eq!(scenario.brokers().len(), 2);
    let names: Vec<&str> = scenario.brokers().iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["customer1", "customer2"]);
    assert!(scenario.vms(scenario.brokers()[0].id).is_empty());
    assert!(scenario.workloads(scenario.brokers()[0].id).is_empty());
}

#[test]
// An unresolvable alias aborts the whole scenario with a descriptive error.
fn test_bad_alias_aborts_scenario() {
    let specs = read_scenarios(&name_wrapper("batch.yaml")).unwrap();
    assert_eq!(specs.len(), 2);
    assert!(assembler().assemble(&specs[0]).is_ok());
    let err = assembler().assemble(&specs[1]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("allocation policy"));
    assert!(message.contains("Telepathy"));
}

#[test]
// The broker-scoped VM lookup finds VMs by id and nothing else.
fn test_find_vm() {
    let specs = read_scenarios(&name_wrapper("batch.yaml")).unwrap();
    let scenario = assembler().assemble(&specs[0]).unwrap();
    let broker = &scenario.brokers()[0];
    let vm = scenario.find_vm(broker.id, 2).unwrap();
    assert_eq!(vm.borrow().id, 2);
    assert!(scenario.find_vm(broker.id, 99).is_none());
    assert!(scenario.find_vm(broker.id + 1, 2).is_none());
}

#[test]
// An empty scenario file is "nothing to build", not an error.
fn test_empty_scenario_file() {
    let specs = read_scenarios(&name_wrapper("empty.yaml")).unwrap();
    assert!(specs.is_empty());
}
