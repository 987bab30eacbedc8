//! Timing instrumentation for maze generation and rendering.
//!
//! Measurements are collected in a process-wide store, keyed by operation name,
//! and can be summarised through `tracing` or written to a timestamped report.
//!
//! # Features
//! - **Manual timers**: [`Timer`] for explicit start/stop timing
//! - **Scoped timers**: [`ScopedTimer`] records when dropped
//! - **Frame timing**: [`record_frame`] tracks how fast frames are produced
//! - **Macros**: `benchmark!` and `debug_benchmark!` wrap a block in a scoped timer

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static FORCE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turns recording on for every default-configured timer, release builds
/// included. Debug builds record regardless.
pub fn set_enabled(enabled: bool) {
    FORCE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether default-configured timers currently record.
pub fn is_enabled() -> bool {
    cfg!(debug_assertions) || FORCE_ENABLED.load(Ordering::Relaxed)
}

/// Configuration for benchmarking features
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Whether measurements are recorded at all
    pub enabled: bool,
    /// Whether each measurement is also logged at trace level
    pub log_each: bool,
    /// Measurements shorter than this are dropped
    pub min_duration_threshold: Duration,
    /// Maximum number of frame time samples kept for frame statistics
    pub max_frame_samples: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            enabled: is_enabled(),
            log_each: false,
            min_duration_threshold: Duration::ZERO,
            max_frame_samples: 1000,
        }
    }
}

impl BenchmarkConfig {
    /// A config that records everything, regardless of build profile.
    pub fn always() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// Measurement storage: per-operation metrics and the frame counter.
pub mod data;

/// Table formatting for reports.
pub mod format;

/// Timers, convenience functions, report writing and the timing macros.
pub mod utils;


pub use data::{BENCHMARK_DATA, FrameRateCounter, PerformanceMetrics};
pub use utils::*;
