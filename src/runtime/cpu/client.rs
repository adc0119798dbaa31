//! CPU client and parallelism configuration

use super::runtime::{CpuDevice, CpuRuntime};
use crate::runtime::RuntimeClient;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default minimum number of linear indices handed to one rayon task
const DEFAULT_CHUNK_SIZE: usize = 4096;

/// How the CPU client executes the two-phase piecewise resolution
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Two parallel passes over the linear index space; the end of the first
    /// pass is the fence. Sequential when the `rayon` feature is disabled.
    #[default]
    ParallelPasses,
    /// Scoped worker threads that meet at a `std::sync::Barrier` between the
    /// candidacy phase and the write phase.
    ThreadBarrier,
}

/// Parallelism settings for CPU kernels
///
/// - `max_threads`: worker count, `None` uses every available core
/// - `chunk_size`: minimum linear indices per task, `None` uses 4096
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    max_threads: Option<usize>,
    chunk_size: Option<usize>,
    strategy: ResolveStrategy,
}

impl ParallelismConfig {
    /// Create a configuration; zero values are treated as `None`
    pub fn new(max_threads: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            max_threads: max_threads.filter(|&n| n > 0),
            chunk_size: chunk_size.filter(|&n| n > 0),
            strategy: ResolveStrategy::default(),
        }
    }

    /// Select the resolution strategy
    pub fn with_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Configured worker count, if any
    pub fn max_threads(&self) -> Option<usize> {
        self.max_threads
    }

    /// Minimum linear indices per task
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Resolution strategy
    pub fn strategy(&self) -> ResolveStrategy {
        self.strategy
    }

    /// Number of workers to spawn for thread-based strategies
    pub fn worker_count(&self) -> usize {
        self.max_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// CPU client for operation dispatch
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client with default parallelism
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            parallelism: ParallelismConfig::default(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Return a client using the given parallelism settings
    ///
    /// A dedicated rayon pool is built when `max_threads` is set. If the pool
    /// cannot be built the global pool is used and a warning is logged.
    pub fn with_parallelism(&self, config: ParallelismConfig) -> Self {
        #[cfg(feature = "rayon")]
        let pool = config.max_threads().and_then(|n| {
            match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Some(Arc::new(pool)),
                Err(err) => {
                    tracing::warn!(threads = n, %err, "falling back to global rayon pool");
                    None
                }
            }
        });

        Self {
            device: self.device.clone(),
            parallelism: config,
            #[cfg(feature = "rayon")]
            pool,
        }
    }

    /// Current parallelism settings
    pub fn parallelism(&self) -> &ParallelismConfig {
        &self.parallelism
    }

    /// Minimum task length for `with_min_len`
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.parallelism.chunk_size()
    }

    /// Run `op` inside this client's thread pool
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<T, F>(&self, op: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Run `op` on the calling thread
    #[cfg(not(feature = "rayon"))]
    pub(crate) fn install_parallelism<T, F>(&self, op: F) -> T
    where
        F: FnOnce() -> T,
    {
        op()
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // CPU operations are synchronous, nothing to do
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_mean_default() {
        let cfg = ParallelismConfig::new(Some(0), Some(0));
        assert_eq!(cfg.max_threads(), None);
        assert_eq!(cfg.chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_worker_count_follows_max_threads() {
        let cfg = ParallelismConfig::new(Some(3), None);
        assert_eq!(cfg.worker_count(), 3);
        assert!(ParallelismConfig::default().worker_count() >= 1);
    }

    #[test]
    fn test_with_parallelism_keeps_settings() {
        let client = CpuClient::new(CpuDevice::new());
        let cfg = ParallelismConfig::new(Some(2), Some(64))
            .with_strategy(ResolveStrategy::ThreadBarrier);
        let tuned = client.with_parallelism(cfg);
        assert_eq!(tuned.parallelism(), &cfg);
        assert_eq!(tuned.rayon_min_len(), 64);
        assert_eq!(client.parallelism(), &ParallelismConfig::default());
    }
}
