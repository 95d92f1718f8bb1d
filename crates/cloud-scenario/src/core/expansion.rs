//! Expansion of spec entries into identified replicas.
//!
//! Every spec entry is replicated `amount` times; replicas keep the declared
//! order and are contiguous. The first replica takes the spec's explicit
//! non-zero id without consuming the shared counter, every other replica
//! takes the next counter value. The counter for an entity class spans the
//! whole scenario, so identities stay unique across spec entries.

use crate::core::spec::{CustomerSpec, DatacenterSpec, HostSpec, VmSpec, WorkloadSpec};

/// Monotonic identity counter for one entity class. Ids start at 1;
/// 0 is reserved for "auto-assign" in specs.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u32 {
        self.last += 1;
        self.last
    }

    /// Last id handed out so far.
    pub fn last_id(&self) -> u32 {
        self.last
    }
}

/// Generates names of the form `<prefix><n>` for entities declared without a
/// name. The counter advances once per produced entity of the kind, named or
/// not, and spans the whole scenario.
#[derive(Debug)]
pub struct NameGenerator {
    prefix: &'static str,
    produced: u32,
}

impl NameGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, produced: 0 }
    }

    pub fn next_name(&mut self, explicit: Option<&str>) -> String {
        self.produced += 1;
        match explicit {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("{}{}", self.prefix, self.produced),
        }
    }
}

/// Spec entry that can be expanded into identified replicas.
pub trait ExpandableSpec {
    /// Normalized replica count (absent and zero mean one).
    fn amount(&self) -> u32;

    /// Explicit identity from the spec, 0 means auto-assign.
    fn explicit_id(&self) -> u32 {
        0
    }
}

impl ExpandableSpec for DatacenterSpec {
    fn amount(&self) -> u32 {
        DatacenterSpec::amount(self)
    }
}

impl ExpandableSpec for HostSpec {
    fn amount(&self) -> u32 {
        HostSpec::amount(self)
    }

    fn explicit_id(&self) -> u32 {
        self.id
    }
}

impl ExpandableSpec for CustomerSpec {
    fn amount(&self) -> u32 {
        CustomerSpec::amount(self)
    }
}

impl ExpandableSpec for VmSpec {
    fn amount(&self) -> u32 {
        VmSpec::amount(self)
    }

    fn explicit_id(&self) -> u32 {
        self.id
    }
}

impl ExpandableSpec for WorkloadSpec {
    fn amount(&self) -> u32 {
        WorkloadSpec::amount(self)
    }
}

/// One replica of a spec entry together with its assigned identity.
pub struct ExpandedEntity<'a, T> {
    pub spec: &'a T,
    pub id: u32,
}

/// Replicates each spec entry `amount` times, assigning identities from the
/// shared per-class counter.
pub fn expand<'a, T: ExpandableSpec>(specs: &'a [T], ids: &mut IdAllocator) -> Vec<ExpandedEntity<'a, T>> {
    let mut result = Vec::new();
    for spec in specs {
        for i in 0..spec.amount() {
            // only the first replica may carry the explicit id
            let id = if i == 0 && spec.explicit_id() != 0 {
                spec.explicit_id()
            } else {
                ids.next_id()
            };
            result.push(ExpandedEntity { spec, id });
        }
    }
    result
}
