//! Benchmark result formatting.
//!
//! Measurements are split into setup work (maze generation, config and asset
//! loading) and per-frame work (rendering, movement), each printed as a table
//! sorted by total time.

use super::data::PerformanceMetrics;
use std::fmt::Write;
use std::time::Duration;

/// Column widths in the order: (name, count, total, avg, min, max)
pub type ColumnWidths = (usize, usize, usize, usize, usize, usize);

/// Name fragments that mark a measurement as setup work.
const SETUP_MARKERS: [&str; 4] = ["generation", "loading", "setup", "config"];

/// Whether `name` is a one-off setup step rather than per-frame work.
pub fn is_setup(name: &str) -> bool {
    SETUP_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Splits measurements into `(setup, per_frame)`, each sorted by total time,
/// longest first.
pub fn partition<'a>(
    measurements: impl IntoIterator<Item = (&'a String, &'a PerformanceMetrics)>,
) -> (
    Vec<(&'a String, &'a PerformanceMetrics)>,
    Vec<(&'a String, &'a PerformanceMetrics)>,
) {
    let (mut setup, mut frame): (Vec<_>, Vec<_>) =
        measurements.into_iter().partition(|(name, _)| is_setup(name));
    setup.sort_by(|a, b| b.1.total_duration.cmp(&a.1.total_duration));
    frame.sort_by(|a, b| b.1.total_duration.cmp(&a.1.total_duration));
    (setup, frame)
}

/// Calculates column widths so every row of `benchmarks` fits.
pub fn calculate_column_widths(benchmarks: &[(&String, &PerformanceMetrics)]) -> ColumnWidths {
    let width = |d: Duration| format!("{d:?}").len();
    benchmarks.iter().fold(
        (30, 6, 15, 15, 15, 15),
        |(name, count, total, avg, min, max), (n, m)| {
            (
                name.max(n.len()),
                count.max(m.count.to_string().len()),
                total.max(width(m.total_duration)),
                avg.max(width(m.avg_duration)),
                min.max(width(m.min_duration)),
                max.max(width(m.max_duration)),
            )
        },
    )
}

/// Renders a titled table. Operations measured once only show their total.
pub fn format_table(title: &str, benchmarks: &[(&String, &PerformanceMetrics)]) -> String {
    let mut out = String::new();
    if benchmarks.is_empty() {
        return out;
    }
    let (nw, cw, tw, aw, iw, xw) = calculate_column_widths(benchmarks);

    let _ = writeln!(out, "=== {title} ===");
    let _ = writeln!(
        out,
        "{:<nw$} | {:>cw$} | {:>tw$} | {:>aw$} | {:>iw$} | {:>xw$}",
        "Operation", "Count", "Total", "Avg", "Min", "Max"
    );
    let _ = writeln!(out, "{}", "-".repeat(nw + cw + tw + aw + iw + xw + 15));

    for (name, m) in benchmarks {
        let total = format!("{:?}", m.total_duration);
        if m.count > 1 {
            let _ = writeln!(
                out,
                "{:<nw$} | {:>cw$} | {:>tw$} | {:>aw$} | {:>iw$} | {:>xw$}",
                name,
                m.count,
                total,
                format!("{:?}", m.avg_duration),
                format!("{:?}", m.min_duration),
                format!("{:?}", m.max_duration),
            );
        } else {
            let _ = writeln!(out, "{:<nw$} | {:>cw$} | {:>tw$}", name, m.count, total);
        }
    }

    let total: f64 = benchmarks
        .iter()
        .map(|(_, m)| m.total_duration.as_secs_f64())
        .sum();
    let _ = writeln!(out, "Total: {total:.3}s");
    out
}
