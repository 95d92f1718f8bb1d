//! Resource provisioning policies.

use std::collections::HashMap;

/// Trait for policies handing out a fixed resource capacity (memory,
/// bandwidth or the MIPS of a single processing element) to VMs.
///
/// A provisioner is constructed with the capacity it manages.
pub trait ResourceProvisioner {
    /// Managed capacity.
    fn capacity(&self) -> f64;

    /// Tries to reserve a share of the resource for a VM,
    /// returns false if the request is denied.
    fn allocate(&mut self, vm_id: u32, amount: f64) -> bool;

    /// Releases the share reserved for a VM.
    fn deallocate(&mut self, vm_id: u32);

    /// Capacity not yet reserved.
    fn available(&self) -> f64;
}

/// Strict provisioner: requests beyond the remaining capacity are denied.
pub struct SimpleProvisioner {
    capacity: f64,
    allocated: HashMap<u32, f64>,
}

impl SimpleProvisioner {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            allocated: HashMap::new(),
        }
    }
}

impl ResourceProvisioner for SimpleProvisioner {
    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn allocate(&mut self, vm_id: u32, amount: f64) -> bool {
        if amount > self.available() {
            return false;
        }
        *self.allocated.entry(vm_id).or_insert(0.) += amount;
        true
    }

    fn deallocate(&mut self, vm_id: u32) {
        self.allocated.remove(&vm_id);
    }

    fn available(&self) -> f64 {
        self.capacity - self.allocated.values().sum::<f64>()
    }
}

/// Overcommitting provisioner: every request is granted and the resource is
/// assumed to be multiplexed by the host at runtime. Available capacity never
/// drops below zero.
pub struct OvercommitProvisioner {
    capacity: f64,
    allocated: HashMap<u32, f64>,
}

impl OvercommitProvisioner {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            allocated: HashMap::new(),
        }
    }
}

impl ResourceProvisioner for OvercommitProvisioner {
    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn allocate(&mut self, vm_id: u32, amount: f64) -> bool {
        *self.allocated.entry(vm_id).or_insert(0.) += amount;
        true
    }

    fn deallocate(&mut self, vm_id: u32) {
        self.allocated.remove(&vm_id);
    }

    fn available(&self) -> f64 {
        (self.capacity - self.allocated.values().sum::<f64>()).max(0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_provisioner_denies_overflow() {
        let mut provisioner = SimpleProvisioner::new(100.);
        assert!(provisioner.allocate(1, 60.));
        assert!(!provisioner.allocate(2, 60.));
        assert_eq!(provisioner.available(), 40.);
        provisioner.deallocate(1);
        assert_eq!(provisioner.available(), 100.);
    }

    #[test]
    fn test_overcommit_provisioner_grants_overflow() {
        let mut provisioner = OvercommitProvisioner::new(100.);
        assert!(provisioner.allocate(1, 60.));
        assert!(provisioner.allocate(2, 60.));
        assert_eq!(provisioner.available(), 0.);
    }
}
