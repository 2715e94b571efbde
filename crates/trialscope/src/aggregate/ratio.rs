//! Guarded ratios. A zero denominator yields `None` ("not applicable").

/// Display marker for a ratio whose denominator was zero.
pub const NOT_APPLICABLE: &str = "N/A";

/// `part / whole * 100`, or `None` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

/// `total / count`, or `None` when `count` is zero.
pub fn average(total: usize, count: usize) -> Option<f64> {
    (count > 0).then(|| total as f64 / count as f64)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a ratio with one decimal and `suffix`, or [`NOT_APPLICABLE`].
pub fn format_ratio(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{suffix}"),
        None => NOT_APPLICABLE.to_string(),
    }
}
