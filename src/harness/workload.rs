//! Allocation churn generator
//!
//! Drives the synthetic heap the way a busy program would: every step
//! allocates a batch of randomly sized blocks, keeps a bounded working
//! set live, and turns the rest into garbage for the next collection.

use super::{SyntheticHeap, WorkloadConfig};

/// A random allocation workload over a fixed block-size ladder.
#[derive(Debug)]
pub struct Workload {
    batch_size: usize,
    block_sizes: Vec<usize>,
    live_blocks: usize,
    retained: Vec<usize>,
    rng: fastrand::Rng,
}

impl Workload {
    /// Build a workload from the shared harness configuration.
    pub fn new(config: &WorkloadConfig) -> Self {
        let rng = if config.seed == 0 {
            fastrand::Rng::new()
        } else {
            fastrand::Rng::with_seed(config.seed)
        };
        Self {
            batch_size: config.batch_size,
            block_sizes: config.block_sizes.clone(),
            live_blocks: config.live_blocks,
            retained: Vec::with_capacity(config.live_blocks + config.batch_size),
            rng,
        }
    }

    /// Run one allocation batch, shed excess working set, and give the
    /// heap a chance to collect.
    ///
    /// Returns whether a collection ran this step.
    pub fn step(&mut self, heap: &mut SyntheticHeap) -> bool {
        for _ in 0..self.batch_size {
            let size = self.block_sizes[self.rng.usize(..self.block_sizes.len())];
            heap.alloc(size);
            self.retained.push(size);
        }
        // Evict random survivors down to the working-set bound; evictees
        // become garbage for the next sweep.
        while self.retained.len() > self.live_blocks {
            let idx = self.rng.usize(..self.retained.len());
            let size = self.retained.swap_remove(idx);
            heap.release(size);
        }
        heap.maybe_collect()
    }

    /// Blocks currently held live.
    pub fn live(&self) -> usize {
        self.retained.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkloadConfig {
        WorkloadConfig {
            batch_size: 100,
            block_sizes: vec![1024, 2048],
            live_blocks: 150,
            seed: 7,
            ..WorkloadConfig::default()
        }
    }

    #[test]
    fn working_set_is_bounded() {
        let config = config();
        let mut heap = SyntheticHeap::new(&config).unwrap();
        let mut workload = Workload::new(&config);

        for _ in 0..10 {
            workload.step(&mut heap);
            assert!(workload.live() <= config.live_blocks);
        }
    }

    #[test]
    fn steady_state_produces_garbage_and_collections() {
        let config = config();
        let mut heap = SyntheticHeap::new(&config).unwrap();
        let mut workload = Workload::new(&config);

        let mut collected = false;
        for _ in 0..10_000 {
            collected |= workload.step(&mut heap);
            if collected {
                break;
            }
        }
        assert!(collected, "growth trigger never fired");

        let snapshot = heap.snapshot();
        assert!(snapshot.collections >= 1);
        assert!(snapshot.free_count > 0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = config();

        let mut heap_a = SyntheticHeap::new(&config).unwrap();
        let mut workload_a = Workload::new(&config);
        let mut heap_b = SyntheticHeap::new(&config).unwrap();
        let mut workload_b = Workload::new(&config);

        for _ in 0..50 {
            workload_a.step(&mut heap_a);
            workload_b.step(&mut heap_b);
        }

        let a = heap_a.snapshot();
        let b = heap_b.snapshot();
        assert_eq!(a.bytes_allocated, b.bytes_allocated);
        assert_eq!(a.alloc_count, b.alloc_count);
        assert_eq!(a.collections, b.collections);
    }
}
