//! # Runtime
//!
//! Tokio runtime profiles for the SOS binaries.
//!
//! A dispatch run is short and I/O bound: one location fix, one optional
//! directory query, one store read and a burst of concurrent sends. The
//! profiles here size the worker pool for that shape instead of for a
//! long-running server.
//!
//! ## Profiles
//! * **Default**: worker threads from `TOKIO_WORKER_THREADS` or available parallelism.
//! * **Memory Efficient**: half the workers and small stacks, for the CLI.
//! * **Responsive**: full pool with a short keep-alive, for hosts that trigger
//!   dispatches back-to-back.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[sos_runtime::main(memory_efficient)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use sos_derive::main;

use anyhow::Context;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const FALLBACK_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 256;
/// 2 `MiB`
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
/// 512 `KiB`
const MIN_STACK_SIZE: usize = 512 * 1024;
/// 8 `MiB`
const MAX_STACK_SIZE: usize = 8 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "sos-worker";

static DETECTED_WORKERS: OnceLock<usize> = OnceLock::new();

fn detected_workers() -> usize {
    *DETECTED_WORKERS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|&n| (1..=MAX_WORKER_THREADS).contains(&n))
            .unwrap_or_else(|| {
                available_parallelism().map_or(FALLBACK_WORKER_THREADS, std::num::NonZero::get)
            })
    })
}

/// Worker pool settings for [`build_runtime_with_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_workers(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Preset for the CLI and other short-lived processes.
    #[must_use = "Pass the profile to build_runtime_with_config"]
    pub fn memory_efficient() -> Self {
        Self {
            worker_threads: (detected_workers() / 2).max(1),
            stack_size: MIN_STACK_SIZE * 2,
            thread_name: "sos-lean".to_owned(),
            thread_keep_alive: Duration::from_secs(10),
        }
    }

    /// Preset for hosts where several dispatches may overlap.
    #[must_use = "Pass the profile to build_runtime_with_config"]
    pub fn responsive() -> Self {
        Self {
            worker_threads: detected_workers().max(2),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "sos-dispatch".to_owned(),
            thread_keep_alive: Duration::from_secs(5),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    /// Re-applies every bound, for configs assembled field by field.
    fn normalized(&self) -> Self {
        Self::default()
            .with_worker_threads(self.worker_threads)
            .with_stack_size(self.stack_size)
            .with_thread_name(self.thread_name.clone())
            .with_keep_alive(self.thread_keep_alive)
    }

    const fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.thread_keep_alive = keep_alive;
        self
    }
}

/// Builds a multi-threaded runtime with I/O and timers enabled.
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(
        workers = config.worker_threads,
        stack = config.stack_size,
        name = %config.thread_name,
        "Building tokio runtime"
    );

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_threads_are_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(
            RuntimeConfig::default().with_worker_threads(10_000).worker_threads,
            MAX_WORKER_THREADS
        );
    }

    #[test]
    fn stack_size_is_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(1).stack_size, MIN_STACK_SIZE);
        assert_eq!(RuntimeConfig::default().with_stack_size(usize::MAX).stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn blank_thread_name_falls_back() {
        assert_eq!(RuntimeConfig::default().with_thread_name("  ").thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn memory_efficient_keeps_at_least_one_worker() {
        assert!(RuntimeConfig::memory_efficient().worker_threads >= 1);
        assert!(RuntimeConfig::responsive().worker_threads >= 2);
    }

    #[test]
    fn normalizes_hand_built_config() {
        let raw = RuntimeConfig {
            worker_threads: 0,
            stack_size: 0,
            thread_name: String::new(),
            thread_keep_alive: Duration::from_secs(1),
        };
        let runtime = build_runtime_with_config(&raw).expect("runtime should build");
        let answer = runtime.block_on(async { 21 * 2 });
        assert_eq!(answer, 42);
    }
}
