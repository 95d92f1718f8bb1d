//! Alias registry and policy resolver.
//!
//! Policies are referenced from scenario specs by short aliases such as
//! `TimeShared` or `Constant[value=0.5]`. The registry turns an alias into a
//! fresh instance of the corresponding capability contract: the alias name is
//! prefixed with the capability kind to form a full implementation name
//! (`TimeShared` -> `VmSchedulerTimeShared`), which is looked up in a
//! per-kind factory cache. On a miss the built-in factory table is consulted
//! and the factory is cached, so repeated resolutions of the same alias are
//! plain map hits for the rest of the process lifetime. The caches are
//! append-only and never evict.
//!
//! The registry is an explicitly constructed object shared via `Rc`, so tests
//! and embedders can pre-seed it with custom factories through the
//! `register_*` methods.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::core::allocation_policy::{AllocationPolicy, BestFit, FirstFit, SimpleAllocationPolicy, WorstFit};
use crate::core::error::ScenarioError;
use crate::core::options::{parse_config_value, parse_options, require_option};
use crate::core::provisioner::{OvercommitProvisioner, ResourceProvisioner, SimpleProvisioner};
use crate::core::utilization_model::{
    ConstantUtilizationModel, FullUtilizationModel, StochasticUtilizationModel, UtilizationModel,
};
use crate::core::vm_scheduler::{SpaceSharedVmScheduler, TimeSharedVmScheduler, VmScheduler};
use crate::core::workload_scheduler::{
    SpaceSharedWorkloadScheduler, TimeSharedWorkloadScheduler, WorkloadScheduler,
};

/// Kinds of pluggable policies resolved by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    VmScheduler,
    AllocationPolicy,
    ResourceProvisioner,
    WorkloadScheduler,
    UtilizationModel,
}

impl PolicyKind {
    /// Naming prefix of implementations for this capability kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            PolicyKind::VmScheduler => "VmScheduler",
            PolicyKind::AllocationPolicy => "VmAllocationPolicy",
            PolicyKind::ResourceProvisioner => "ResourceProvisioner",
            PolicyKind::WorkloadScheduler => "WorkloadScheduler",
            PolicyKind::UtilizationModel => "UtilizationModel",
        }
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PolicyKind::VmScheduler => write!(f, "VM scheduler"),
            PolicyKind::AllocationPolicy => write!(f, "allocation policy"),
            PolicyKind::ResourceProvisioner => write!(f, "resource provisioner"),
            PolicyKind::WorkloadScheduler => write!(f, "workload scheduler"),
            PolicyKind::UtilizationModel => write!(f, "utilization model"),
        }
    }
}

/// Factory constructing a VM scheduler from the alias options.
pub type VmSchedulerFactory = Rc<dyn Fn(Option<&str>) -> Result<Box<dyn VmScheduler>, String>>;
/// Factory constructing an allocation policy from the alias options.
pub type AllocationPolicyFactory = Rc<dyn Fn(Option<&str>) -> Result<Box<dyn AllocationPolicy>, String>>;
/// Factory constructing a provisioner for the given resource capacity.
pub type ProvisionerFactory = Rc<dyn Fn(f64, Option<&str>) -> Result<Box<dyn ResourceProvisioner>, String>>;
/// Factory constructing a workload scheduler from the alias options.
pub type WorkloadSchedulerFactory = Rc<dyn Fn(Option<&str>) -> Result<Box<dyn WorkloadScheduler>, String>>;
/// Factory constructing a utilization model from the alias options.
pub type UtilizationModelFactory = Rc<dyn Fn(Option<&str>) -> Result<Box<dyn UtilizationModel>, String>>;

/// Resolves policy aliases into constructed policy instances.
#[derive(Default)]
pub struct PolicyRegistry {
    vm_schedulers: RefCell<HashMap<String, VmSchedulerFactory>>,
    allocation_policies: RefCell<HashMap<String, AllocationPolicyFactory>>,
    provisioners: RefCell<HashMap<String, ProvisionerFactory>>,
    workload_schedulers: RefCell<HashMap<String, WorkloadSchedulerFactory>>,
    utilization_models: RefCell<HashMap<String, UtilizationModelFactory>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a VM scheduler alias into a fresh instance.
    pub fn vm_scheduler(&self, alias: &str) -> Result<Box<dyn VmScheduler>, ScenarioError> {
        let kind = PolicyKind::VmScheduler;
        let (full_name, options) = qualify(kind, alias)?;
        let factory = lookup(&self.vm_schedulers, builtin_vm_scheduler, kind, alias, &full_name)?;
        factory(options.as_deref()).map_err(|cause| ScenarioError::resolution(kind, alias, cause))
    }

    /// Resolves an allocation policy alias into a fresh instance.
    pub fn allocation_policy(&self, alias: &str) -> Result<Box<dyn AllocationPolicy>, ScenarioError> {
        let kind = PolicyKind::AllocationPolicy;
        let (full_name, options) = qualify(kind, alias)?;
        let factory = lookup(&self.allocation_policies, builtin_allocation_policy, kind, alias, &full_name)?;
        factory(options.as_deref()).map_err(|cause| ScenarioError::resolution(kind, alias, cause))
    }

    /// Resolves a provisioner alias into a fresh instance managing `capacity`.
    pub fn provisioner(&self, alias: &str, capacity: f64) -> Result<Box<dyn ResourceProvisioner>, ScenarioError> {
        let kind = PolicyKind::ResourceProvisioner;
        let (full_name, options) = qualify(kind, alias)?;
        let factory = lookup(&self.provisioners, builtin_provisioner, kind, alias, &full_name)?;
        factory(capacity, options.as_deref()).map_err(|cause| ScenarioError::resolution(kind, alias, cause))
    }

    /// Resolves a workload scheduler alias into a fresh instance.
    pub fn workload_scheduler(&self, alias: &str) -> Result<Box<dyn WorkloadScheduler>, ScenarioError> {
        let kind = PolicyKind::WorkloadScheduler;
        let (full_name, options) = qualify(kind, alias)?;
        let factory = lookup(&self.workload_schedulers, builtin_workload_scheduler, kind, alias, &full_name)?;
        factory(options.as_deref()).map_err(|cause| ScenarioError::resolution(kind, alias, cause))
    }

    /// Resolves a utilization model alias into a fresh instance.
    pub fn utilization_model(&self, alias: &str) -> Result<Box<dyn UtilizationModel>, ScenarioError> {
        let kind = PolicyKind::UtilizationModel;
        let (full_name, options) = qualify(kind, alias)?;
        let factory = lookup(&self.utilization_models, builtin_utilization_model, kind, alias, &full_name)?;
        factory(options.as_deref()).map_err(|cause| ScenarioError::resolution(kind, alias, cause))
    }

    /// Registers a custom VM scheduler factory under the given alias name.
    pub fn register_vm_scheduler<F>(&self, name: &str, factory: F)
    where
        F: Fn(Option<&str>) -> Result<Box<dyn VmScheduler>, String> + 'static,
    {
        let full_name = format!("{}{}", PolicyKind::VmScheduler.prefix(), name);
        self.vm_schedulers.borrow_mut().insert(full_name, Rc::new(factory));
    }

    /// Registers a custom allocation policy factory under the given alias name.
    pub fn register_allocation_policy<F>(&self, name: &str, factory: F)
    where
        F: Fn(Option<&str>) -> Result<Box<dyn AllocationPolicy>, String> + 'static,
    {
        let full_name = format!("{}{}", PolicyKind::AllocationPolicy.prefix(), name);
        self.allocation_policies.borrow_mut().insert(full_name, Rc::new(factory));
    }

    /// Registers a custom provisioner factory under the given alias name.
    pub fn register_provisioner<F>(&self, name: &str, factory: F)
    where
        F: Fn(f64, Option<&str>) -> Result<Box<dyn ResourceProvisioner>, String> + 'static,
    {
        let full_name = format!("{}{}", PolicyKind::ResourceProvisioner.prefix(), name);
        self.provisioners.borrow_mut().insert(full_name, Rc::new(factory));
    }

    /// Registers a custom workload scheduler factory under the given alias name.
    pub fn register_workload_scheduler<F>(&self, name: &str, factory: F)
    where
        F: Fn(Option<&str>) -> Result<Box<dyn WorkloadScheduler>, String> + 'static,
    {
        let full_name = format!("{}{}", PolicyKind::WorkloadScheduler.prefix(), name);
        self.workload_schedulers.borrow_mut().insert(full_name, Rc::new(factory));
    }

    /// Registers a custom utilization model factory under the given alias name.
    pub fn register_utilization_model<F>(&self, name: &str, factory: F)
    where
        F: Fn(Option<&str>) -> Result<Box<dyn UtilizationModel>, String> + 'static,
    {
        let full_name = format!("{}{}", PolicyKind::UtilizationModel.prefix(), name);
        self.utilization_models.borrow_mut().insert(full_name, Rc::new(factory));
    }

    /// Checks whether the factory for the given alias is already cached.
    pub fn is_cached(&self, kind: PolicyKind, alias: &str) -> bool {
        let full_name = match qualify(kind, alias) {
            Ok((full_name, _)) => full_name,
            Err(_) => return false,
        };
        match kind {
            PolicyKind::VmScheduler => self.vm_schedulers.borrow().contains_key(&full_name),
            PolicyKind::AllocationPolicy => self.allocation_policies.borrow().contains_key(&full_name),
            PolicyKind::ResourceProvisioner => self.provisioners.borrow().contains_key(&full_name),
            PolicyKind::WorkloadScheduler => self.workload_schedulers.borrow().contains_key(&full_name),
            PolicyKind::UtilizationModel => self.utilization_models.borrow().contains_key(&full_name),
        }
    }
}

/// Builds the full implementation name for an alias, splitting off options.
fn qualify(kind: PolicyKind, alias: &str) -> Result<(String, Option<String>), ScenarioError> {
    let (name, options) = parse_config_value(alias);
    if name.is_empty() {
        return Err(ScenarioError::resolution(kind, alias, "empty alias"));
    }
    Ok((format!("{}{}", kind.prefix(), name), options))
}

/// Returns the cached factory for the full name, falling back to the
/// built-in table and caching the result.
fn lookup<V: Clone>(
    cache: &RefCell<HashMap<String, V>>,
    builtin: fn(&str) -> Option<V>,
    kind: PolicyKind,
    alias: &str,
    full_name: &str,
) -> Result<V, ScenarioError> {
    if let Some(factory) = cache.borrow().get(full_name) {
        return Ok(factory.clone());
    }
    let factory = builtin(full_name)
        .ok_or_else(|| ScenarioError::resolution(kind, alias, "no implementation with this name"))?;
    cache.borrow_mut().insert(full_name.to_string(), factory.clone());
    Ok(factory)
}

fn builtin_vm_scheduler(full_name: &str) -> Option<VmSchedulerFactory> {
    match full_name {
        "VmSchedulerTimeShared" => Some(Rc::new(|_| Ok(Box::new(TimeSharedVmScheduler::new()) as Box<dyn VmScheduler>))),
        "VmSchedulerSpaceShared" => {
            Some(Rc::new(|_| Ok(Box::new(SpaceSharedVmScheduler::new()) as Box<dyn VmScheduler>)))
        }
        _ => None,
    }
}

fn builtin_allocation_policy(full_name: &str) -> Option<AllocationPolicyFactory> {
    match full_name {
        "VmAllocationPolicySimple" => {
            Some(Rc::new(|_| Ok(Box::new(SimpleAllocationPolicy::new()) as Box<dyn AllocationPolicy>)))
        }
        "VmAllocationPolicyFirstFit" => Some(Rc::new(|_| Ok(Box::new(FirstFit::new()) as Box<dyn AllocationPolicy>))),
        "VmAllocationPolicyBestFit" => Some(Rc::new(|_| Ok(Box::new(BestFit::new()) as Box<dyn AllocationPolicy>))),
        "VmAllocationPolicyWorstFit" => Some(Rc::new(|_| Ok(Box::new(WorstFit::new()) as Box<dyn AllocationPolicy>))),
        _ => None,
    }
}

fn builtin_provisioner(full_name: &str) -> Option<ProvisionerFactory> {
    match full_name {
        "ResourceProvisionerSimple" => {
            Some(Rc::new(|capacity, _| Ok(Box::new(SimpleProvisioner::new(capacity)) as Box<dyn ResourceProvisioner>)))
        }
        "ResourceProvisionerOvercommit" => Some(Rc::new(|capacity, _| {
            Ok(Box::new(OvercommitProvisioner::new(capacity)) as Box<dyn ResourceProvisioner>)
        })),
        _ => None,
    }
}

fn builtin_workload_scheduler(full_name: &str) -> Option<WorkloadSchedulerFactory> {
    match full_name {
        "WorkloadSchedulerTimeShared" => {
            Some(Rc::new(|_| Ok(Box::new(TimeSharedWorkloadScheduler::new()) as Box<dyn WorkloadScheduler>)))
        }
        "WorkloadSchedulerSpaceShared" => {
            Some(Rc::new(|_| Ok(Box::new(SpaceSharedWorkloadScheduler::new()) as Box<dyn WorkloadScheduler>)))
        }
        _ => None,
    }
}

fn builtin_utilization_model(full_name: &str) -> Option<UtilizationModelFactory> {
    match full_name {
        "UtilizationModelFull" => {
            Some(Rc::new(|_| Ok(Box::new(FullUtilizationModel::new()) as Box<dyn UtilizationModel>)))
        }
        "UtilizationModelConstant" => Some(Rc::new(|options| {
            let options = parse_options(options.unwrap_or_default());
            let value = require_option::<f64>(&options, "value")?;
            Ok(Box::new(ConstantUtilizationModel::new(value)) as Box<dyn UtilizationModel>)
        })),
        "UtilizationModelStochastic" => Some(Rc::new(|options| {
            let options = parse_options(options.unwrap_or_default());
            let seed = match options.get("seed") {
                Some(_) => require_option::<u64>(&options, "seed")?,
                None => 1,
            };
            Ok(Box::new(StochasticUtilizationModel::new(seed)) as Box<dyn UtilizationModel>)
        })),
        _ => None,
    }
}
