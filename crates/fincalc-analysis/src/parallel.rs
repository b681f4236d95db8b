//! Conditional parallel iteration.
//!
//! Uses rayon when the `parallel` feature is enabled and the configuration
//! allows it; otherwise falls back to a plain iterator. Output order always
//! matches input order.

use crate::config::AnalysisConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - `work` reaches `config.parallel_threshold`
///
/// `work` is the amount of work the items represent, which for chunked
/// Monte Carlo runs is the iteration count rather than the chunk count.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], work: usize, config: &AnalysisConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(work) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
