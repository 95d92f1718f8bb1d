//! Workload scheduling policies inside a VM.

/// Trait for policies dividing VM capacity between its workloads.
///
/// A scheduler is constructed without arguments and attached to its VM
/// during VM construction.
pub trait WorkloadScheduler {
    /// Binds the scheduler to the VM capacity.
    fn attach(&mut self, mips: f64, pes: u32);

    /// Number of workloads that can make progress at the same time.
    fn concurrency_limit(&self) -> u32;

    /// MIPS rate given to each of `running` concurrently executing workloads.
    fn mips_share(&self, running: u32) -> f64;
}

/// Time-shared scheduler: all submitted workloads run at once,
/// evenly splitting the pooled VM capacity.
#[derive(Default)]
pub struct TimeSharedWorkloadScheduler {
    total_mips: f64,
}

impl TimeSharedWorkloadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkloadScheduler for TimeSharedWorkloadScheduler {
    fn attach(&mut self, mips: f64, pes: u32) {
        self.total_mips = mips * pes as f64;
    }

    fn concurrency_limit(&self) -> u32 {
        u32::MAX
    }

    fn mips_share(&self, running: u32) -> f64 {
        if running == 0 {
            return self.total_mips;
        }
        self.total_mips / running as f64
    }
}

/// Space-shared scheduler: at most one workload per processing element runs
/// at a time, each at full PE speed; the rest wait in line.
#[derive(Default)]
pub struct SpaceSharedWorkloadScheduler {
    mips: f64,
    pes: u32,
}

impl SpaceSharedWorkloadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkloadScheduler for SpaceSharedWorkloadScheduler {
    fn attach(&mut self, mips: f64, pes: u32) {
        self.mips = mips;
        self.pes = pes;
    }

    fn concurrency_limit(&self) -> u32 {
        self.pes.max(1)
    }

    fn mips_share(&self, _running: u32) -> f64 {
        self.mips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_shared_splits_evenly() {
        let mut scheduler = TimeSharedWorkloadScheduler::new();
        scheduler.attach(1000., 2);
        assert_eq!(scheduler.concurrency_limit(), u32::MAX);
        assert_eq!(scheduler.mips_share(4), 500.);
    }

    #[test]
    fn test_space_shared_runs_per_pe() {
        let mut scheduler = SpaceSharedWorkloadScheduler::new();
        scheduler.attach(1000., 2);
        assert_eq!(scheduler.concurrency_limit(), 2);
        assert_eq!(scheduler.mips_share(2), 1000.);
    }
}
