use serde::{Deserialize, Serialize};

use crate::core::data::DataPoint;
use crate::core::scale::{ValueField, extent};

/// Maps `value` onto `[0, 1]` relative to `[floor, ceil]`.
///
/// Out-of-range values clamp. A zero-width or non-finite band returns 0.
#[must_use]
pub fn color_or_opacity_for(value: f64, floor: f64, ceil: f64) -> f64 {
    let span = ceil - floor;
    if span == 0.0 || !span.is_finite() || !value.is_finite() {
        return 0.0;
    }
    ((value - floor) / span).clamp(0.0, 1.0)
}

/// Observed floor/ceil of a field, used for opacity ramps and legends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub floor: f64,
    pub ceil: f64,
}

impl IntensityRange {
    #[must_use]
    pub const fn new(floor: f64, ceil: f64) -> Self {
        Self { floor, ceil }
    }

    /// Scans `points`; an empty dataset yields the flat range `[0, 0]`.
    #[must_use]
    pub fn from_points(points: &[DataPoint], field: &ValueField) -> Self {
        let (floor, ceil) = extent(points, field).unwrap_or((0.0, 0.0));
        Self { floor, ceil }
    }

    #[must_use]
    pub fn intensity(self, value: f64) -> f64 {
        color_or_opacity_for(value, self.floor, self.ceil)
    }

    #[must_use]
    pub fn legend_ticks(self, count: usize) -> Vec<f64> {
        legend_ticks(self.floor, self.ceil, count)
    }
}

/// `count` evenly spaced stops from `floor` to `ceil`, both ends included.
#[must_use]
pub fn legend_ticks(floor: f64, ceil: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![floor],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|index| {
                    if index + 1 == count {
                        ceil
                    } else {
                        floor + (ceil - floor) * (index as f64 / last)
                    }
                })
                .collect()
        }
    }
}
