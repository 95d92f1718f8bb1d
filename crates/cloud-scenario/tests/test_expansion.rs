use cloud_scenario::core::expansion::{expand, IdAllocator, NameGenerator};
use cloud_scenario::core::spec::{DatacenterSpec, HostSpec};

fn host_spec() -> HostSpec {
    HostSpec {
        id: 0,
        pes: 2,
        mips: 1000.,
        ram: 8192,
        bandwidth: 10000,
        storage: 1048576,
        ram_provisioner: "Simple".to_string(),
        bw_provisioner: "Simple".to_string(),
        pe_provisioner: "Simple".to_string(),
        vm_scheduler: "TimeShared".to_string(),
        amount: None,
    }
}

fn datacenter_spec(name: Option<&str>, amount: Option<u32>) -> DatacenterSpec {
    DatacenterSpec {
        name: name.map(|n| n.to_string()),
        amount,
        architecture: "x86".to_string(),
        os: "Linux".to_string(),
        hypervisor: "Xen".to_string(),
        allocation_policy: "Simple".to_string(),
        cost_per_cpu_sec: 0.,
        cost_per_mem: 0.,
        cost_per_storage: 0.,
        cost_per_bw: 0.,
        scheduling_interval: 0.,
        hosts: Vec::new(),
        storage: Vec::new(),
    }
}

#[test]
// Absent and zero amounts both produce exactly one replica, k > 1 produces k.
fn test_amount_normalization() {
    let mut ids = IdAllocator::new();
    let specs = vec![
        HostSpec { amount: None, ..host_spec() },
        HostSpec { amount: Some(0), ..host_spec() },
        HostSpec { amount: Some(3), ..host_spec() },
    ];
    let expanded = expand(&specs, &mut ids);
    assert_eq!(expanded.len(), 5);
}

#[test]
// Replicas of one entry are contiguous and entries keep their declared order.
fn test_order_preservation() {
    let mut ids = IdAllocator::new();
    let spec_a = HostSpec { mips: 1., amount: Some(2), ..host_spec() };
    let spec_b = HostSpec { mips: 2., amount: Some(1), ..host_spec() };
    let specs = vec![spec_a, spec_b];
    let expanded = expand(&specs, &mut ids);
    let order: Vec<f64> = expanded.iter().map(|e| e.spec.mips).collect();
    assert_eq!(order, vec![1., 1., 2.]);
}

#[test]
// Ids come from a shared counter and never repeat across spec entries.
fn test_identity_uniqueness() {
    let mut ids = IdAllocator::new();
    let specs = vec![
        HostSpec { amount: Some(3), ..host_spec() },
        HostSpec { amount: Some(2), ..host_spec() },
    ];
    let expanded = expand(&specs, &mut ids);
    let mut seen: Vec<u32> = expanded.iter().map(|e| e.id).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 5);
    assert_eq!(ids.last_id(), 5);
}

#[test]
// Only the first replica carries the explicit id; later replicas take counter
// values, and the explicit-id replica does not consume the counter. This is
// the documented (if surprising) rule for combining explicit ids with
// amount > 1, kept as is rather than given friendlier semantics.
fn test_identity_precedence() {
    let mut ids = IdAllocator::new();
    let specs = vec![HostSpec { id: 7, amount: Some(3), ..host_spec() }];
    let expanded = expand(&specs, &mut ids);
    let assigned: Vec<u32> = expanded.iter().map(|e| e.id).collect();
    assert_eq!(assigned, vec![7, 1, 2]);
}

#[test]
// Same rule with a warm counter: {7, n+1, n+2} for counter value n.
fn test_identity_precedence_with_warm_counter() {
    let mut ids = IdAllocator::new();
    ids.next_id();
    ids.next_id();
    ids.next_id();
    let specs = vec![HostSpec { id: 7, amount: Some(3), ..host_spec() }];
    let expanded = expand(&specs, &mut ids);
    let assigned: Vec<u32> = expanded.iter().map(|e| e.id).collect();
    assert_eq!(assigned, vec![7, 4, 5]);
}

#[test]
// Blank names are replaced with <kind><n>, counted across the whole scenario
// per produced entity, not per spec entry. Explicit names are kept for every
// replica and still advance the counter.
fn test_name_generation() {
    let mut ids = IdAllocator::new();
    let mut names = NameGenerator::new("datacenter");
    let specs = vec![
        datacenter_spec(Some("main"), Some(2)),
        datacenter_spec(None, Some(1)),
        datacenter_spec(Some("  "), Some(1)),
    ];
    let generated: Vec<String> = expand(&specs, &mut ids)
        .iter()
        .map(|e| names.next_name(e.spec.name.as_deref()))
        .collect();
    assert_eq!(generated, vec!["main", "main", "datacenter3", "datacenter4"]);
}
