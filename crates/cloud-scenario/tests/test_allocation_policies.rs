use std::cell::RefCell;
use std::rc::Rc;

use sugars::{rc, refcell};

use cloud_scenario::core::host::{Host, ProcessingElement};
use cloud_scenario::core::registry::PolicyRegistry;
use cloud_scenario::core::vm::Vm;

fn make_host(registry: &PolicyRegistry, id: u32, pes: u32, mips: f64) -> Rc<RefCell<Host>> {
    let mut pe_list = Vec::new();
    for pe_id in 0..pes {
        let provisioner = registry.provisioner("Simple", mips).unwrap();
        pe_list.push(ProcessingElement::new(pe_id, mips, provisioner));
    }
    rc!(refcell!(Host::new(
        id,
        pe_list,
        65536,
        100000,
        1048576,
        registry.provisioner("Simple", 65536.).unwrap(),
        registry.provisioner("Simple", 100000.).unwrap(),
        registry.vm_scheduler("TimeShared").unwrap(),
    )))
}

fn make_vm(registry: &PolicyRegistry, id: u32, mips: f64, pes: u32) -> Vm {
    Vm::new(
        id,
        1,
        mips,
        pes,
        1024,
        1000,
        1024,
        registry.workload_scheduler("TimeShared").unwrap(),
    )
}

#[test]
// First fit selects the first appropriate host.
fn test_first_fit() {
    let registry = PolicyRegistry::new();
    let hosts = vec![
        make_host(&registry, 1, 1, 1000.),
        make_host(&registry, 2, 4, 1000.),
        make_host(&registry, 3, 4, 1000.),
    ];
    let policy = registry.allocation_policy("FirstFit").unwrap();

    let small = make_vm(&registry, 1, 500., 1);
    assert_eq!(policy.select_host(&small, &hosts), Some(1));
    // a VM too big for host 1 skips ahead to host 2
    let big = make_vm(&registry, 2, 1000., 2);
    assert_eq!(policy.select_host(&big, &hosts), Some(2));
}

#[test]
// Best fit selects the suitable host with the least capacity left.
fn test_best_fit() {
    let registry = PolicyRegistry::new();
    let hosts = vec![make_host(&registry, 1, 4, 1000.), make_host(&registry, 2, 2, 1000.)];
    let policy = registry.allocation_policy("BestFit").unwrap();

    let vm = make_vm(&registry, 1, 500., 1);
    assert_eq!(policy.select_host(&vm, &hosts), Some(2));

    // after loading host 2, host 1 remains the only suitable one
    hosts[1].borrow_mut().allocate_vm(&make_vm(&registry, 2, 900., 2));
    let vm = make_vm(&registry, 3, 400., 1);
    assert_eq!(policy.select_host(&vm, &hosts), Some(1));
}

#[test]
// Worst fit selects the suitable host with the most capacity left.
fn test_worst_fit() {
    let registry = PolicyRegistry::new();
    let hosts = vec![make_host(&registry, 1, 2, 1000.), make_host(&registry, 2, 4, 1000.)];
    let policy = registry.allocation_policy("WorstFit").unwrap();

    let vm = make_vm(&registry, 1, 500., 1);
    assert_eq!(policy.select_host(&vm, &hosts), Some(2));
}

#[test]
// The default policy balances by free PEs and gives up when nothing fits.
fn test_simple_policy() {
    let registry = PolicyRegistry::new();
    let hosts = vec![make_host(&registry, 1, 2, 1000.), make_host(&registry, 2, 4, 1000.)];
    let policy = registry.allocation_policy("Simple").unwrap();

    let vm = make_vm(&registry, 1, 1000., 1);
    assert_eq!(policy.select_host(&vm, &hosts), Some(2));

    let impossible = make_vm(&registry, 2, 10000., 8);
    assert_eq!(policy.select_host(&impossible, &hosts), None);
}
