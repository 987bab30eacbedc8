use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::BenchmarkConfig;

/// Rolling window of frame-to-frame durations.
#[derive(Debug)]
pub struct FrameRateCounter {
    frame_times: Vec<Duration>,
    max_samples: usize,
    last_frame_time: Option<Instant>,
}

impl FrameRateCounter {
    /// Keeps at most `max_samples` frame durations.
    pub fn new(max_samples: usize) -> Self {
        Self {
            frame_times: Vec::with_capacity(max_samples),
            max_samples,
            last_frame_time: None,
        }
    }

    /// Records a frame produced now and returns the current average rate.
    pub fn record_frame(&mut self) -> f64 {
        self.record_frame_at(Instant::now())
    }

    /// Records a frame produced at `now`. The first frame only sets the baseline.
    pub fn record_frame_at(&mut self, now: Instant) -> f64 {
        if let Some(last) = self.last_frame_time {
            self.frame_times.push(now.saturating_duration_since(last));
            if self.frame_times.len() > self.max_samples {
                self.frame_times.remove(0);
            }
        }
        self.last_frame_time = Some(now);
        self.fps()
    }

    /// Frame durations in the window, oldest first.
    pub fn samples(&self) -> &[Duration] {
        &self.frame_times
    }

    /// Average frames per second over the window, zero without samples.
    pub fn fps(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        let avg = total.as_secs_f64() / self.frame_times.len() as f64;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// `(min, avg, max)` frames per second. The slowest frame gives the minimum.
    pub fn fps_stats(&self) -> (f64, f64, f64) {
        let rate = |d: Option<&Duration>| match d {
            Some(d) if d.as_secs_f64() > 0.0 => 1.0 / d.as_secs_f64(),
            _ => 0.0,
        };
        let min = rate(self.frame_times.iter().max());
        let max = rate(self.frame_times.iter().min());
        (min, self.fps(), max)
    }
}

/// Aggregated timings for one named operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Number of measurements.
    pub count: usize,
    /// Sum of all measurements.
    pub total_duration: Duration,
    /// Fastest measurement.
    pub min_duration: Duration,
    /// Slowest measurement.
    pub max_duration: Duration,
    /// Mean of all measurements.
    pub avg_duration: Duration,
}

impl PerformanceMetrics {
    fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            avg_duration: Duration::ZERO,
        }
    }

    fn update(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.avg_duration = self.total_duration / self.count as u32;
    }
}

lazy_static::lazy_static! {
    /// Process-wide benchmark storage.
    pub static ref BENCHMARK_DATA: Arc<Mutex<BenchmarkData>> = Arc::new(Mutex::new(BenchmarkData::new()));
}

/// Central storage for all measurements.
#[derive(Debug)]
pub struct BenchmarkData {
    measurements: HashMap<String, PerformanceMetrics>,
    fps_counter: FrameRateCounter,
}

impl BenchmarkData {
    fn new() -> Self {
        Self {
            measurements: HashMap::new(),
            fps_counter: FrameRateCounter::new(BenchmarkConfig::default().max_frame_samples),
        }
    }

    /// Adds one timing for `name`.
    pub fn record_measurement(&mut self, name: &str, duration: Duration) {
        self.measurements
            .entry(name.to_string())
            .or_insert_with(PerformanceMetrics::new)
            .update(duration);
    }

    /// All operations measured so far.
    pub fn measurements(&self) -> &HashMap<String, PerformanceMetrics> {
        &self.measurements
    }

    /// Drops all operation timings. Frame samples are kept.
    pub fn clear(&mut self) {
        self.measurements.clear();
    }

    /// Records a frame produced now; returns the average rate.
    pub fn record_frame(&mut self) -> f64 {
        self.fps_counter.record_frame()
    }

    /// `(min, avg, max)` frames per second.
    pub fn fps_stats(&self) -> (f64, f64, f64) {
        self.fps_counter.fps_stats()
    }
}
