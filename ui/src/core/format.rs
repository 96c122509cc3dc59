//! Formatting helpers for table cells.

pub fn format_measure(value: f64) -> String {
    format!("{value:.3}")
}

/// Uncertainty annotation; zero and missing values are not shown.
pub fn format_uncertainty(value: Option<f64>) -> Option<String> {
    value
        .filter(|v| *v != 0.0 && v.is_finite())
        .map(|v| format!("±{v:.3}"))
}

pub fn format_z(value: f64) -> String {
    format!("{value:.3}")
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => "—".to_string(),
    }
}

pub fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "—".to_string(),
    }
}
