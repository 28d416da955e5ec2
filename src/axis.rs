use serde::Serialize;

use crate::metadata::ScoreBounds;

/// How the renderer should set one value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AxisScaling {
    /// Bounds come from the data.
    Autoscale,
    /// Exactly the tabulated bounds.
    Clamp { lower: f64, upper: f64 },
    /// Lower bound from the data, upper bound fixed.
    KeepUpper { upper: f64 },
    /// Upper bound from the data, lower bound fixed.
    KeepLower { lower: f64 },
}

impl AxisScaling {
    /// Concrete `(lower, upper)` once the data extent is known.
    pub fn limits(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        match *self {
            AxisScaling::Autoscale => (data_min, data_max),
            AxisScaling::Clamp { lower, upper } => (lower, upper),
            AxisScaling::KeepUpper { upper } => (data_min, upper),
            AxisScaling::KeepLower { lower } => (lower, data_max),
        }
    }
}

/// Min and max of the finite values, if any.
pub fn data_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Choose the axis scaling for one score on one sub-plot.
///
/// A single outlier below the floor lets the floor float but keeps the
/// ceiling, and vice versa. Data that overshoots on both sides, `(0, 0)`
/// bounds, missing bounds and empty data all autoscale.
pub fn resolve(bounds: Option<ScoreBounds>, observed: &[f64]) -> AxisScaling {
    let Some(b) = bounds else {
        return AxisScaling::Autoscale;
    };
    if b.is_autoscale() {
        return AxisScaling::Autoscale;
    }
    let Some((min, max)) = data_extent(observed) else {
        return AxisScaling::Clamp {
            lower: b.min,
            upper: b.max,
        };
    };
    match (min <= b.min, max >= b.max) {
        (true, true) => AxisScaling::Autoscale,
        (true, false) => AxisScaling::KeepUpper { upper: b.max },
        (false, true) => AxisScaling::KeepLower { lower: b.min },
        (false, false) => AxisScaling::Clamp {
            lower: b.min,
            upper: b.max,
        },
    }
}

/// Observation counts always start at zero and end at the largest count.
pub fn count_bounds(observed: &[f64]) -> Option<ScoreBounds> {
    data_extent(observed).map(|(_, max)| ScoreBounds {
        min: 0.0,
        max: max.ceil(),
    })
}
