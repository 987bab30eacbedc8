//! Benchmark timers and helpers.
//!
//! [`Timer`] measures explicitly, [`ScopedTimer`] measures until it is dropped.
//! Results land in [`BENCHMARK_DATA`] and can be logged with [`log_summary`] or
//! written out with [`write_results_to_file`].

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

use super::BenchmarkConfig;
use super::data::{BENCHMARK_DATA, BenchmarkData, PerformanceMetrics};
use super::format::{format_table, partition};
use crate::error::Result;

fn with_data<T>(f: impl FnOnce(&mut BenchmarkData) -> T) -> T {
    // A panic while holding the lock leaves only timing data behind, which is
    // still usable.
    let mut data = BENCHMARK_DATA
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut data)
}

/// A timer for measuring execution time of code sections.
#[derive(Debug)]
pub struct Timer {
    name: String,
    start_time: Instant,
    config: BenchmarkConfig,
}

impl Timer {
    /// Starts timing `name` now.
    pub fn new(name: &str, config: BenchmarkConfig) -> Self {
        Self {
            name: name.to_string(),
            start_time: Instant::now(),
            config,
        }
    }

    /// Stops the timer, recording the measurement when enabled and above the
    /// configured threshold. Returns the elapsed time either way.
    pub fn stop(self) -> Duration {
        let duration = self.start_time.elapsed();
        if self.config.enabled && duration >= self.config.min_duration_threshold {
            with_data(|data| data.record_measurement(&self.name, duration));
            if self.config.log_each {
                trace!(operation = %self.name, ?duration, "benchmark");
            }
        }
        duration
    }
}

/// A timer that records when it goes out of scope.
#[derive(Debug)]
pub struct ScopedTimer {
    timer: Option<Timer>,
}

impl ScopedTimer {
    /// Starts timing `name`; the measurement is recorded on drop.
    pub fn new(name: &str, config: BenchmarkConfig) -> Self {
        Self {
            timer: Some(Timer::new(name, config)),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

/// Times a closure with the default configuration.
pub fn time<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _timer = scoped_timer(name);
    f()
}

/// Creates a scoped timer with the default configuration.
pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name, BenchmarkConfig::default())
}

/// Drops every recorded operation timing.
pub fn clear_measurements() {
    with_data(|data| data.clear());
}

/// Snapshot of every recorded measurement.
pub fn get_measurements() -> HashMap<String, PerformanceMetrics> {
    with_data(|data| data.measurements().clone())
}

/// Records a produced frame for frame-rate statistics. Returns the current average.
pub fn record_frame() -> f64 {
    with_data(|data| data.record_frame())
}

/// `(min, avg, max)` frames per second.
pub fn get_fps_stats() -> (f64, f64, f64) {
    with_data(|data| data.fps_stats())
}

/// Renders the full report: frame statistics and both benchmark tables.
pub fn format_report(measurements: &HashMap<String, PerformanceMetrics>) -> String {
    let (setup, frame) = partition(measurements);
    let (min_fps, avg_fps, max_fps) = get_fps_stats();

    let mut report = String::new();
    if avg_fps > 0.0 {
        report.push_str(&format!(
            "Frame rate - Min: {min_fps:.1}, Average: {avg_fps:.1}, Max: {max_fps:.1}\n\n"
        ));
    } else {
        report.push_str("Frame rate - No frame data recorded\n\n");
    }
    report.push_str(&format_table("SETUP BENCHMARKS", &setup));
    if !setup.is_empty() && !frame.is_empty() {
        report.push('\n');
    }
    report.push_str(&format_table("FRAME BENCHMARKS", &frame));
    report
}

/// Logs the report at info level, one line per row.
pub fn log_summary() {
    let measurements = get_measurements();
    if measurements.is_empty() {
        debug!("No benchmark measurements recorded");
        return;
    }
    for line in format_report(&measurements).lines() {
        info!(target: "delve::benchmarks", "{line}");
    }
}

/// Writes the report to a timestamped file in `dir`, creating it if needed.
///
/// Returns `None` when there is nothing to write.
pub fn write_results_to_file(dir: impl AsRef<Path>, source: &str) -> Result<Option<PathBuf>> {
    let measurements = get_measurements();
    if measurements.is_empty() {
        debug!("No benchmark measurements to write");
        return Ok(None);
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let now: DateTime<Local> = Local::now();
    let path = dir.join(format!("{}.txt", now.format("%I-%M%P-%m-%d-%Y")));

    let mut contents = String::new();
    contents.push_str("Delve Performance Benchmark Results\n");
    contents.push_str(&format!("Generated: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
    contents.push_str(&format!("Source: {source}\n"));
    contents.push_str(&format!("{}\n\n", "=".repeat(60)));
    contents.push_str(&format_report(&measurements));
    contents.push_str(&format!("\n{}\nEnd of benchmark report\n", "=".repeat(60)));
    fs::write(&path, contents)?;

    info!(path = %path.display(), "Benchmark results written");
    Ok(Some(path))
}

/// Wraps a block in a [`ScopedTimer`] with the default configuration.
///
/// ```ignore
/// let frame = benchmark!("raycast_render", renderer.render(&state));
/// ```
#[macro_export]
macro_rules! benchmark {
    ($name:expr, $block:expr) => {{
        let _timer = $crate::benchmarks::ScopedTimer::new(
            $name,
            $crate::benchmarks::BenchmarkConfig::default(),
        );
        $block
    }};
}

/// Like `benchmark!`, but only times debug builds.
#[macro_export]
macro_rules! debug_benchmark {
    ($name:expr, $block:expr) => {{
        #[cfg(debug_assertions)]
        let _timer = $crate::benchmarks::ScopedTimer::new(
            $name,
            $crate::benchmarks::BenchmarkConfig::default(),
        );
        $block
    }};
}
