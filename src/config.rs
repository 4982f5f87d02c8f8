/// Configuration shared by every automaton engine.
///
/// Use `AetherConfig::default()` for auto-tuned defaults, or customise
/// individual knobs via the builder methods.
#[derive(Clone, Debug, Default)]
pub struct AetherConfig {
    /// Number of threads for the compute pool.
    /// `None` means auto-detect (physical cores, memory-bandwidth capped).
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    /// `None` means no additional cap beyond `thread_count`.
    pub max_threads: Option<usize>,
    /// Grids with fewer stored cells than this are stepped serially.
    /// `None` uses the built-in threshold.
    pub parallel_min_cells: Option<usize>,
}

impl AetherConfig {
    /// Set an explicit thread count for the compute pool.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    /// Set the stored cell count from which a step fans out to the pool.
    pub fn parallel_min_cells(mut self, n: usize) -> Self {
        self.parallel_min_cells = Some(n);
        self
    }

    /// Single-threaded configuration, mostly for tests and reference runs.
    pub fn serial() -> Self {
        Self::default().thread_count(1)
    }
}

#[cfg(test)]
mod tests {
    use super::AetherConfig;

    #[test]
    fn builder_clamps_thread_counts() {
        let config = AetherConfig::default()
            .thread_count(0)
            .max_threads(0)
            .parallel_min_cells(7);
        assert_eq!(config.thread_count, Some(1));
        assert_eq!(config.max_threads, Some(1));
        assert_eq!(config.parallel_min_cells, Some(7));
        assert_eq!(AetherConfig::serial().thread_count, Some(1));
    }
}
