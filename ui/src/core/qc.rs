//! Z-score performance classes shared by the chart and the results table.

/// Bands used across the dashboard: |z| < 2, 2 ≤ |z| < 3, |z| ≥ 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    Acceptable,
    Poor,
}

impl Performance {
    pub fn from_z(z: f64) -> Self {
        let magnitude = z.abs();
        if magnitude < 2.0 {
            Self::Excellent
        } else if magnitude < 3.0 {
            Self::Acceptable
        } else {
            Self::Poor
        }
    }

    /// Backend badge class (`success` / `warning` / `danger`), falling back to
    /// the z-score when the class is unknown.
    pub fn from_class(class: &str, z: f64) -> Self {
        match class {
            "success" => Self::Excellent,
            "warning" => Self::Acceptable,
            "danger" => Self::Poor,
            _ => Self::from_z(z),
        }
    }

    /// Marker colour on the control chart.
    pub fn chart_color(self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::Acceptable => "orange",
            Self::Poor => "red",
        }
    }

    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::Excellent => "qc-badge--excellent",
            Self::Acceptable => "qc-badge--acceptable",
            Self::Poor => "qc-badge--poor",
        }
    }
}
