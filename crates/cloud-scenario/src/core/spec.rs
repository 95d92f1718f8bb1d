//! Declarative scenario specification.
//!
//! A scenario describes datacenters and customers abstractly: each record
//! carries an `amount` (how many identical copies to create) and the string
//! aliases of the policies to attach. Records are plain deserialized data,
//! immutable after parsing; turning them into concrete entities is the job of
//! [`crate::core::expansion`] and [`crate::core::assembler`].

use serde::{Deserialize, Serialize};

/// Root of a single scenario: abstract datacenters and customers.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ScenarioSpec {
    /// Datacenter configurations.
    #[serde(default)]
    pub datacenters: Vec<DatacenterSpec>,
    /// Customer configurations.
    #[serde(default)]
    pub customers: Vec<CustomerSpec>,
}

/// Holds configuration of a single datacenter or a set of identical datacenters.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DatacenterSpec {
    /// Datacenter name.
    /// A generated name is used if absent or blank.
    #[serde(default)]
    pub name: Option<String>,
    /// Number of such datacenters.
    #[serde(default)]
    pub amount: Option<u32>,
    /// Hardware architecture label.
    #[serde(default = "default_architecture")]
    pub architecture: String,
    /// Operating system label.
    #[serde(default = "default_os")]
    pub os: String,
    /// Hypervisor label.
    #[serde(default = "default_hypervisor")]
    pub hypervisor: String,
    /// VM allocation policy alias.
    #[serde(default = "default_simple")]
    pub allocation_policy: String,
    /// Cost per second of CPU time.
    #[serde(default)]
    pub cost_per_cpu_sec: f64,
    /// Cost per unit of memory.
    #[serde(default)]
    pub cost_per_mem: f64,
    /// Cost per unit of storage.
    #[serde(default)]
    pub cost_per_storage: f64,
    /// Cost per unit of bandwidth.
    #[serde(default)]
    pub cost_per_bw: f64,
    /// Interval between datacenter scheduling rounds.
    #[serde(default)]
    pub scheduling_interval: f64,
    /// Configurations of physical hosts.
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
    /// Configurations of storage area networks.
    #[serde(default)]
    pub storage: Vec<StorageSpec>,
}

/// Holds configuration of a single physical host or a set of identical hosts.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct HostSpec {
    /// Explicit host id, 0 means auto-assign.
    #[serde(default)]
    pub id: u32,
    /// Number of processing elements.
    pub pes: u32,
    /// MIPS capacity of each processing element.
    pub mips: f64,
    /// Host memory capacity.
    pub ram: u64,
    /// Host network bandwidth.
    pub bandwidth: u64,
    /// Host storage capacity.
    pub storage: u64,
    /// Memory provisioner alias.
    #[serde(default = "default_simple")]
    pub ram_provisioner: String,
    /// Bandwidth provisioner alias.
    #[serde(default = "default_simple")]
    pub bw_provisioner: String,
    /// Processing element provisioner alias.
    #[serde(default = "default_simple")]
    pub pe_provisioner: String,
    /// VM scheduler alias.
    #[serde(default = "default_time_shared")]
    pub vm_scheduler: String,
    /// Number of such hosts.
    #[serde(default)]
    pub amount: Option<u32>,
}

/// Storage area network attached to a datacenter.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct StorageSpec {
    /// Storage capacity.
    pub capacity: u64,
    /// Storage bandwidth.
    pub bandwidth: f64,
    /// Network latency of accessing the storage.
    #[serde(default)]
    pub latency: f64,
}

/// Holds configuration of a single customer or a set of identical customers.
///
/// Each concrete customer is represented by one broker owning the customer's
/// VMs and workloads.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct CustomerSpec {
    /// Customer name.
    /// A generated name is used if absent or blank.
    #[serde(default)]
    pub name: Option<String>,
    /// Number of such customers.
    #[serde(default)]
    pub amount: Option<u32>,
    /// Configurations of virtual machines.
    #[serde(default)]
    pub vms: Vec<VmSpec>,
    /// Configurations of workloads.
    #[serde(default)]
    pub workloads: Vec<WorkloadSpec>,
}

/// Holds configuration of a single VM or a set of identical VMs.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct VmSpec {
    /// Explicit VM id, 0 means auto-assign.
    #[serde(default)]
    pub id: u32,
    /// Required MIPS capacity per processing element.
    pub mips: f64,
    /// Number of required processing elements.
    pub pes: u32,
    /// VM memory requirement.
    pub ram: u64,
    /// VM network bandwidth requirement.
    pub bandwidth: u64,
    /// VM image size, charged against host storage.
    pub image_size: u64,
    /// Workload scheduler alias.
    #[serde(default = "default_time_shared")]
    pub workload_scheduler: String,
    /// Number of such VMs.
    #[serde(default)]
    pub amount: Option<u32>,
}

/// Holds configuration of a single workload or a set of identical workloads.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct WorkloadSpec {
    /// Workload length in number of instructions.
    pub length: u64,
    /// Number of processing elements the workload runs on.
    pub pes: u32,
    /// Size of the workload input file.
    #[serde(default)]
    pub input_size: u64,
    /// Size of the workload output file.
    #[serde(default)]
    pub output_size: u64,
    /// CPU utilization model alias.
    #[serde(default = "default_full")]
    pub cpu_utilization: String,
    /// Memory utilization model alias.
    #[serde(default = "default_full")]
    pub ram_utilization: String,
    /// Bandwidth utilization model alias.
    #[serde(default = "default_full")]
    pub bw_utilization: String,
    /// Number of such workloads.
    #[serde(default)]
    pub amount: Option<u32>,
}

fn default_architecture() -> String {
    "x86".to_string()
}

fn default_os() -> String {
    "Linux".to_string()
}

fn default_hypervisor() -> String {
    "Xen".to_string()
}

fn default_simple() -> String {
    "Simple".to_string()
}

fn default_time_shared() -> String {
    "TimeShared".to_string()
}

fn default_full() -> String {
    "Full".to_string()
}

/// Normalizes a replica count: absent and zero both mean one copy.
pub(crate) fn normalize_amount(amount: Option<u32>) -> u32 {
    amount.unwrap_or(1).max(1)
}

impl DatacenterSpec {
    pub fn amount(&self) -> u32 {
        normalize_amount(self.amount)
    }
}

impl HostSpec {
    pub fn amount(&self) -> u32 {
        normalize_amount(self.amount)
    }
}

impl CustomerSpec {
    pub fn amount(&self) -> u32 {
        normalize_amount(self.amount)
    }
}

impl VmSpec {
    pub fn amount(&self) -> u32 {
        normalize_amount(self.amount)
    }
}

impl WorkloadSpec {
    pub fn amount(&self) -> u32 {
        normalize_amount(self.amount)
    }
}

impl ScenarioSpec {
    /// Returns total datacenter count, including replicas.
    pub fn number_of_datacenters(&self) -> u32 {
        self.datacenters.iter().map(|dc| dc.amount()).sum()
    }

    /// Returns total host count across all datacenters, including replicas.
    pub fn number_of_hosts(&self) -> u32 {
        self.datacenters
            .iter()
            .map(|dc| dc.amount() * dc.hosts.iter().map(|h| h.amount()).sum::<u32>())
            .sum()
    }

    /// Returns total VM count across all customers, including replicas.
    pub fn number_of_vms(&self) -> u32 {
        self.customers
            .iter()
            .map(|c| c.amount() * c.vms.iter().map(|vm| vm.amount()).sum::<u32>())
            .sum()
    }

    /// Returns total workload count across all customers, including replicas.
    pub fn number_of_workloads(&self) -> u32 {
        self.customers
            .iter()
            .map(|c| c.amount() * c.workloads.iter().map(|w| w.amount()).sum::<u32>())
            .sum()
    }
}
