use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::data::{DataPoint, PointKey};
use crate::core::hierarchy::PositionedLeaf;
use crate::core::intensity::IntensityRange;
use crate::core::labels::tile_label_lines;
use crate::core::scale::{Scale, ValueField};
use crate::core::topology::{RegionFeature, Ring, rings_contain};
use crate::error::{ChartError, ChartResult};

/// Paint-order index of a mark inside one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkKey(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Path {
        rings: Vec<Ring>,
    },
}

impl MarkShape {
    /// Rectangle from two corners in any order.
    #[must_use]
    pub fn rect_between(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Rect {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Rect {
                x: left,
                y: top,
                width,
                height,
            } => x >= *left && x <= left + width && y >= *top && y <= top + height,
            Self::Circle { cx, cy, r } => (x - cx).powi(2) + (y - cy).powi(2) <= r * r,
            Self::Path { rings } => {
                let inside_bounds = self
                    .bounds()
                    .is_some_and(|(x0, y0, x1, y1)| x >= x0 && x <= x1 && y >= y0 && y <= y1);
                inside_bounds && rings_contain(rings, x, y)
            }
        }
    }

    /// `(x0, y0, x1, y1)` bounding box; `None` for an empty path.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => Some((*x, *y, x + width, y + height)),
            Self::Circle { cx, cy, r } => Some((cx - r, cy - r, cx + r, cy + r)),
            Self::Path { rings } => rings.iter().flatten().fold(None, |bounds, &(x, y)| {
                Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                })
            }),
        }
    }
}

/// One visual primitive bound to exactly one data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub key: MarkKey,
    /// Lookup-only reference to the backing `DataPoint` (or treemap leaf).
    pub point: PointKey,
    pub shape: MarkShape,
    pub opacity: f64,
    pub emphasis: bool,
    pub color_slot: Option<usize>,
    pub label_lines: Vec<String>,
}

impl Mark {
    fn new(key: MarkKey, point: PointKey, shape: MarkShape) -> Self {
        Self {
            key,
            point,
            shape,
            opacity: 1.0,
            emphasis: false,
            color_slot: None,
            label_lines: Vec::new(),
        }
    }
}

/// Scales for one render. Axes a mark spec does not use may be `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleSet {
    pub x: Option<Scale>,
    pub y: Option<Scale>,
    pub intensity: Option<IntensityRange>,
}

impl ScaleSet {
    #[must_use]
    pub fn xy(x: Scale, y: Scale) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            intensity: None,
        }
    }

    #[must_use]
    pub fn with_intensity(mut self, intensity: IntensityRange) -> Self {
        self.intensity = Some(intensity);
        self
    }

    fn x(&self) -> ChartResult<&Scale> {
        self.x
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("mark spec needs an x scale".to_owned()))
    }

    fn y(&self) -> ChartResult<&Scale> {
        self.y
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("mark spec needs a y scale".to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkSpec {
    /// Vertical bars from the y baseline up to the metric.
    Bars { x: ValueField, bar_width: f64 },
    /// Circles at `(x, y)`. `emphasis` names a text attribute whose non-empty
    /// value flags the dot.
    Dots {
        x: ValueField,
        y: ValueField,
        radius: f64,
        emphasis: Option<String>,
    },
    /// Heat map cells spanning `[x(v), x(v + step)]` horizontally and one band
    /// vertically, shaded by metric intensity.
    Cells {
        x: ValueField,
        band: ValueField,
        step: f64,
    },
    /// Choropleth regions joined to points through their spatial key.
    Regions { features: Vec<RegionFeature> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryColorPolicy {
    /// Slot = index of the tile's category among the dataset root's children.
    #[default]
    RootChildIndex,
    /// No color slots; tiles render in the neutral fill.
    Disabled,
}

enum Prepared<'a> {
    Bars {
        x: &'a Scale,
        y: &'a Scale,
        field: &'a ValueField,
        width: f64,
        baseline: f64,
    },
    Dots {
        x: &'a Scale,
        y: &'a Scale,
        x_field: &'a ValueField,
        y_field: &'a ValueField,
        radius: f64,
        emphasis: Option<&'a str>,
    },
    Cells {
        x: &'a Scale,
        band: &'a Scale,
        x_field: &'a ValueField,
        band_field: &'a ValueField,
        step: f64,
        bandwidth: f64,
        intensity: IntensityRange,
    },
    Regions {
        by_id: IndexMap<i64, &'a RegionFeature>,
        intensity: IntensityRange,
    },
}

/// Computes one mark per point, in input order.
///
/// Any point that cannot be placed fails the whole call; no partial mark
/// list is ever returned.
pub fn build_marks(
    points: &[DataPoint],
    scales: &ScaleSet,
    spec: &MarkSpec,
) -> ChartResult<Vec<Mark>> {
    let prepared = prepare(points, scales, spec)?;

    #[cfg(feature = "parallel-marks")]
    {
        use rayon::prelude::*;
        points
            .par_iter()
            .enumerate()
            .map(|(index, point)| build_one(index, point, &prepared))
            .collect()
    }

    #[cfg(not(feature = "parallel-marks"))]
    {
        points
            .iter()
            .enumerate()
            .map(|(index, point)| build_one(index, point, &prepared))
            .collect()
    }
}

fn prepare<'a>(
    points: &[DataPoint],
    scales: &'a ScaleSet,
    spec: &'a MarkSpec,
) -> ChartResult<Prepared<'a>> {
    let intensity = || {
        scales
            .intensity
            .unwrap_or_else(|| IntensityRange::from_points(points, &ValueField::Metric))
    };

    Ok(match spec {
        MarkSpec::Bars { x, bar_width } => {
            if !bar_width.is_finite() || *bar_width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "bar width must be finite and > 0".to_owned(),
                ));
            }
            let y = scales.y()?;
            Prepared::Bars {
                x: scales.x()?,
                y,
                field: x,
                width: *bar_width,
                baseline: baseline_pixel(y),
            }
        }
        MarkSpec::Dots {
            x,
            y,
            radius,
            emphasis,
        } => {
            if !radius.is_finite() || *radius <= 0.0 {
                return Err(ChartError::InvalidData(
                    "dot radius must be finite and > 0".to_owned(),
                ));
            }
            Prepared::Dots {
                x: scales.x()?,
                y: scales.y()?,
                x_field: x,
                y_field: y,
                radius: *radius,
                emphasis: emphasis.as_deref(),
            }
        }
        MarkSpec::Cells { x, band, step } => {
            if !step.is_finite() || *step <= 0.0 {
                return Err(ChartError::InvalidData(
                    "cell step must be finite and > 0".to_owned(),
                ));
            }
            let band_scale = scales.y()?;
            let bandwidth = band_scale
                .as_band()
                .ok_or_else(|| ChartError::InvalidData("cells need a band y scale".to_owned()))?
                .bandwidth()
                .abs();
            Prepared::Cells {
                x: scales.x()?,
                band: band_scale,
                x_field: x,
                band_field: band,
                step: *step,
                bandwidth,
                intensity: intensity(),
            }
        }
        MarkSpec::Regions { features } => Prepared::Regions {
            by_id: features
                .iter()
                .filter_map(|feature| feature.id.map(|id| (id, feature)))
                .collect(),
            intensity: intensity(),
        },
    })
}

/// Pixel of value 0, or of the nearest domain end when 0 lies outside it.
fn baseline_pixel(scale: &Scale) -> f64 {
    match scale {
        Scale::Continuous(scale) => {
            let (d0, d1) = scale.domain();
            scale.apply(0.0_f64.clamp(d0.min(d1), d0.max(d1)))
        }
        Scale::Band(scale) => scale.range().0,
    }
}

fn build_one(index: usize, point: &DataPoint, prepared: &Prepared<'_>) -> ChartResult<Mark> {
    let key = MarkKey(index);
    match prepared {
        Prepared::Bars {
            x,
            y,
            field,
            width,
            baseline,
        } => {
            let left = place(index, point, x, field)?;
            let top = place(index, point, y, &ValueField::Metric)?;
            Ok(Mark::new(
                key,
                point.key,
                MarkShape::rect_between(left, top, left + width, *baseline),
            ))
        }
        Prepared::Dots {
            x,
            y,
            x_field,
            y_field,
            radius,
            emphasis,
        } => {
            let cx = place(index, point, x, x_field)?;
            let cy = place(index, point, y, y_field)?;
            let mut mark = Mark::new(key, point.key, MarkShape::Circle { cx, cy, r: *radius });
            mark.emphasis = emphasis
                .and_then(|name| point.text(name))
                .is_some_and(|text| !text.is_empty());
            Ok(mark)
        }
        Prepared::Cells {
            x,
            band,
            x_field,
            band_field,
            step,
            bandwidth,
            intensity,
        } => {
            let value = read(index, point, x_field)?;
            let x0 = position(index, x, value)?;
            let x1 = position(index, x, value + step)?;
            let y0 = place(index, point, band, band_field)?;
            let mut mark = Mark::new(
                key,
                point.key,
                MarkShape::rect_between(x0, y0, x1, y0 + bandwidth),
            );
            mark.opacity = intensity.intensity(point.value);
            Ok(mark)
        }
        Prepared::Regions { by_id, intensity } => {
            let spatial_key = point.spatial_key.ok_or_else(|| {
                ChartError::malformed(index, "region point has no spatial key")
            })?;
            let feature = by_id.get(&spatial_key).ok_or_else(|| {
                ChartError::malformed(index, format!("no geometry for spatial key {spatial_key}"))
            })?;
            let rings = feature.rings().cloned().collect();
            let mut mark = Mark::new(key, point.key, MarkShape::Path { rings });
            mark.opacity = intensity.intensity(point.value);
            Ok(mark)
        }
    }
}

fn read(index: usize, point: &DataPoint, field: &ValueField) -> ChartResult<f64> {
    field.read(point).ok_or_else(|| {
        ChartError::malformed(index, format!("point has no numeric value for {field:?}"))
    })
}

fn position(index: usize, scale: &Scale, value: f64) -> ChartResult<f64> {
    scale.position(value).ok_or_else(|| {
        ChartError::malformed(index, format!("value {value} is outside the band domain"))
    })
}

fn place(index: usize, point: &DataPoint, scale: &Scale, field: &ValueField) -> ChartResult<f64> {
    position(index, scale, read(index, point, field)?)
}

/// One rectangle mark per treemap leaf, labelled with its name lines.
#[must_use]
pub fn build_tile_marks(leaves: &[PositionedLeaf], policy: CategoryColorPolicy) -> Vec<Mark> {
    leaves
        .iter()
        .enumerate()
        .map(|(index, leaf)| {
            let rect = leaf.rect;
            let mut mark = Mark::new(
                MarkKey(index),
                leaf.key,
                MarkShape::rect_between(rect.x0, rect.y0, rect.x1, rect.y1),
            );
            mark.color_slot = match policy {
                CategoryColorPolicy::RootChildIndex => Some(leaf.group),
                CategoryColorPolicy::Disabled => None,
            };
            mark.label_lines = tile_label_lines(&leaf.name);
            mark
        })
        .collect()
}
