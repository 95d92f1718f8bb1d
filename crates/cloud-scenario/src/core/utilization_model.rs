//! Workload resource utilization models.

use std::cell::RefCell;

use dyn_clone::{clone_trait_object, DynClone};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// A utilization model is a function defining which fraction of the requested
/// resource a workload actually uses at the given moment of time.
pub trait UtilizationModel: DynClone {
    /// Utilization fraction in [0, 1] at the given time.
    fn utilization(&self, time: f64) -> f64;
}

clone_trait_object!(UtilizationModel);

impl std::fmt::Debug for dyn UtilizationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn UtilizationModel")
    }
}

/// The workload always uses the full requested resource.
#[derive(Clone, Default)]
pub struct FullUtilizationModel;

impl FullUtilizationModel {
    pub fn new() -> Self {
        Self {}
    }
}

impl UtilizationModel for FullUtilizationModel {
    fn utilization(&self, _time: f64) -> f64 {
        1.
    }
}

/// The workload uses a constant fraction of the requested resource.
#[derive(Clone)]
pub struct ConstantUtilizationModel {
    value: f64,
}

impl ConstantUtilizationModel {
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0., 1.),
        }
    }
}

impl UtilizationModel for ConstantUtilizationModel {
    fn utilization(&self, _time: f64) -> f64 {
        self.value
    }
}

/// The workload utilization is sampled uniformly from [0, 1] on each call,
/// using a deterministic seeded generator.
#[derive(Clone)]
pub struct StochasticUtilizationModel {
    rand: RefCell<Pcg64>,
}

impl StochasticUtilizationModel {
    pub fn new(seed: u64) -> Self {
        Self {
            rand: RefCell::new(Pcg64::seed_from_u64(seed)),
        }
    }
}

impl UtilizationModel for StochasticUtilizationModel {
    fn utilization(&self, _time: f64) -> f64 {
        self.rand.borrow_mut().gen_range(0.0..=1.0)
    }
}
