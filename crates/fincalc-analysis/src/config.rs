//! Execution settings for the analysis layers.

use serde::{Deserialize, Serialize};

/// Default minimum work-item count before fanning out to rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2000;

/// Default number of Monte Carlo iterations drawn from one RNG stream.
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// Controls how analysis work is scheduled.
///
/// Only scheduling is affected: a seeded Monte Carlo run yields the same
/// sample set whether it runs sequentially or in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum iteration or peer count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,

    /// Iterations per Monte Carlo chunk. Each chunk owns one seeded RNG.
    pub chunk_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the Monte Carlo chunk size. Zero is treated as one.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns true if parallel processing should be used for `count` items.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 2000);
        assert_eq!(config.chunk_size, 250);
    }

    #[test]
    fn test_sequential_config() {
        let config = AnalysisConfig::sequential();
        assert!(!config.parallel);
        assert!(!config.should_parallelize(1_000_000));
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::new()
            .with_threshold(10)
            .with_chunk_size(0)
            .with_parallel(true);
        assert_eq!(config.parallel_threshold, 10);
        assert_eq!(config.chunk_size, 1);
    }

    #[test]
    fn test_should_parallelize() {
        let config = AnalysisConfig::new().with_threshold(100);

        #[cfg(feature = "parallel")]
        {
            assert!(!config.should_parallelize(99));
            assert!(config.should_parallelize(100));
        }

        #[cfg(not(feature = "parallel"))]
        {
            assert!(!config.should_parallelize(100));
            assert!(!config.should_parallelize(1000));
        }
    }
}
