//! Worker pool for the read-only half of a step.
//!
//! Each cell's redistribution only reads the current generation, so the
//! per-cell pass fans out over rayon and returns results in storage order.
//! Writing shares into the next generation stays serial in the engines,
//! which keeps the scatter free of atomics and deterministic.

use std::sync::OnceLock;

use rayon::prelude::*;

use crate::config::AetherConfig;
use crate::error::Result;

const PARALLEL_MIN_CELLS: usize = 4_096;
const TARGET_CHUNKS_PER_WORKER: usize = 4;
const CHUNK_MIN: usize = 256;
const CHUNK_MAX: usize = 16_384;

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

#[inline]
fn auto_pool_thread_count_for_physical(physical: usize) -> usize {
    let physical = physical.max(1);
    if physical <= 8 {
        physical
    } else {
        physical.div_ceil(2).max(6)
    }
}

/// Resolve the thread count from a config, falling back to auto-detect.
fn resolve_thread_count(config: &AetherConfig) -> usize {
    let mut threads = config
        .thread_count
        .unwrap_or_else(|| auto_pool_thread_count_for_physical(physical_core_count()));
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

#[inline]
fn parallel_chunk_size(len: usize, workers: usize) -> usize {
    let target_chunks = workers.max(1).saturating_mul(TARGET_CHUNKS_PER_WORKER);
    len.div_ceil(target_chunks).clamp(CHUNK_MIN, CHUNK_MAX)
}

pub(crate) struct Workers {
    pool: Option<rayon::ThreadPool>,
    threads: usize,
    min_cells: usize,
}

impl Workers {
    pub(crate) fn new(config: &AetherConfig) -> Result<Self> {
        let threads = resolve_thread_count(config);
        let pool = if threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("aether-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        log::debug!("aether worker pool: {threads} thread(s)");
        Ok(Self {
            pool,
            threads,
            min_cells: config.parallel_min_cells.unwrap_or(PARALLEL_MIN_CELLS),
        })
    }

    #[inline]
    pub(crate) fn threads(&self) -> usize {
        self.threads
    }

    /// Maps every index in `0..len` through `f`, with one scratch value per
    /// worker created by `init`. Results come back in index order.
    pub(crate) fn map_cells<T, S, I, F>(&self, len: usize, init: I, f: F) -> Vec<T>
    where
        T: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, usize) -> T + Sync + Send,
    {
        let pool = match &self.pool {
            Some(pool) if len >= self.min_cells => pool,
            _ => {
                let mut scratch = init();
                return (0..len).map(|index| f(&mut scratch, index)).collect();
            }
        };
        let chunk = parallel_chunk_size(len, self.threads);
        pool.install(|| {
            (0..len)
                .into_par_iter()
                .with_min_len(chunk)
                .map_init(&init, |scratch, index| f(scratch, index))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Workers, auto_pool_thread_count_for_physical, parallel_chunk_size};
    use crate::config::AetherConfig;

    #[test]
    fn auto_pool_thread_count_targets_bandwidth_sweet_spot() {
        assert_eq!(auto_pool_thread_count_for_physical(0), 1);
        assert_eq!(auto_pool_thread_count_for_physical(4), 4);
        assert_eq!(auto_pool_thread_count_for_physical(9), 6);
        assert_eq!(auto_pool_thread_count_for_physical(24), 12);
    }

    #[test]
    fn chunk_size_obeys_bounds() {
        assert_eq!(parallel_chunk_size(100, 4), 256);
        assert_eq!(parallel_chunk_size(40_000, 4), 2_500);
        assert_eq!(parallel_chunk_size(10_000_000, 2), 16_384);
    }

    #[test]
    fn parallel_and_serial_maps_agree() {
        let parallel = Workers::new(
            &AetherConfig::default()
                .thread_count(3)
                .parallel_min_cells(0),
        )
        .unwrap();
        let serial = Workers::new(&AetherConfig::serial()).unwrap();
        assert_eq!(serial.threads(), 1);
        let square = |calls: &mut usize, i: usize| {
            *calls += 1;
            i * i
        };
        let a = parallel.map_cells(10_000, || 0usize, square);
        let b = serial.map_cells(10_000, || 0usize, square);
        assert_eq!(a, b);
        assert_eq!(a[99], 99 * 99);
    }
}
