//! Synthetic load harness
//!
//! The reporter itself only formats statistics it is handed; something has
//! to produce them. This module is the stand-in for a host runtime: an
//! instrumented [`SyntheticHeap`] that accounts allocations, triggers
//! collections on heap growth, and assembles [`StatsSnapshot`]s, plus a
//! [`Workload`] that churns allocations through it. None of this is
//! consulted by the report or history modules; they see only the
//! snapshot.

mod heap;
mod workload;

pub use heap::SyntheticHeap;
pub use workload::Workload;

use thiserror::Error;

/// Errors raised by nonsensical harness configuration.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Growth percentage of zero would trigger a collection on every
    /// allocation.
    #[error("growth percentage must be positive")]
    ZeroGrowth,

    /// An empty batch performs no allocations per step.
    #[error("allocation batch size must be positive")]
    ZeroBatch,

    /// The workload needs at least one block size to draw from.
    #[error("block size ladder is empty")]
    NoBlockSizes,

    /// Zero-byte blocks cannot be mapped to a size class.
    #[error("block size of zero at ladder position {0}")]
    ZeroBlockSize(usize),
}

/// Workload and collector tuning, constructed once at startup.
///
/// Replaces what would otherwise be process-wide mutable flag state; the
/// heap and workload each take a copy by value.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Collect when allocation since the last collection reaches this
    /// percentage of live data.
    pub growth_percent: u32,
    /// Allocations performed per workload step.
    pub batch_size: usize,
    /// Block sizes the workload draws from; also the heap's size-class
    /// ladder.
    pub block_sizes: Vec<usize>,
    /// Retained blocks the workload holds live in steady state.
    pub live_blocks: usize,
    /// RNG seed; zero seeds from entropy.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            growth_percent: 100,
            batch_size: 1500,
            block_sizes: vec![1024, 2048, 4096, 8192, 1 << 20],
            live_blocks: 4096,
            seed: 0,
        }
    }
}

impl WorkloadConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.growth_percent == 0 {
            return Err(HarnessError::ZeroGrowth);
        }
        if self.batch_size == 0 {
            return Err(HarnessError::ZeroBatch);
        }
        if self.block_sizes.is_empty() {
            return Err(HarnessError::NoBlockSizes);
        }
        if let Some(pos) = self.block_sizes.iter().position(|&s| s == 0) {
            return Err(HarnessError::ZeroBlockSize(pos));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(WorkloadConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_growth_rejected() {
        let config = WorkloadConfig {
            growth_percent: 0,
            ..WorkloadConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::ZeroGrowth)
        ));
    }

    #[test]
    fn zero_block_size_reported_with_position() {
        let config = WorkloadConfig {
            block_sizes: vec![1024, 0, 4096],
            ..WorkloadConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::ZeroBlockSize(1))
        ));
    }
}
