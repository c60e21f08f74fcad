use chrono::{DateTime, Datelike, NaiveDate};
use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::data::DataPoint;
use crate::error::{ChartError, ChartResult};

/// Which numeric quantity of a `DataPoint` a scale or mark reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueField {
    Metric,
    Attribute(String),
}

impl ValueField {
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    #[must_use]
    pub fn read(&self, point: &DataPoint) -> Option<f64> {
        match self {
            Self::Metric => Some(point.value),
            Self::Attribute(name) => point.attribute(name).and_then(|value| value.as_f64()),
        }
    }
}

/// Axis description consumed by `derive_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisSpec {
    Linear {
        field: ValueField,
        range: (f64, f64),
        pad_low: f64,
        pad_high: f64,
        include_zero: bool,
    },
    /// Continuous axis over dates; date attributes read as unix seconds.
    Time {
        field: ValueField,
        range: (f64, f64),
        pad_low: f64,
        pad_high: f64,
    },
    Band {
        domain: Vec<i64>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
    },
}

impl AxisSpec {
    #[must_use]
    pub fn linear(field: ValueField, range: (f64, f64)) -> Self {
        Self::Linear {
            field,
            range,
            pad_low: 0.0,
            pad_high: 0.0,
            include_zero: false,
        }
    }

    #[must_use]
    pub fn time(field: ValueField, range: (f64, f64)) -> Self {
        Self::Time {
            field,
            range,
            pad_low: 0.0,
            pad_high: 0.0,
        }
    }

    #[must_use]
    pub fn band(domain: Vec<i64>, range: (f64, f64)) -> Self {
        Self::Band {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Widens the fitted domain by fixed amounts on each side.
    #[must_use]
    pub fn with_domain_padding(mut self, low: f64, high: f64) -> Self {
        match &mut self {
            Self::Linear {
                pad_low, pad_high, ..
            }
            | Self::Time {
                pad_low, pad_high, ..
            } => {
                *pad_low = low;
                *pad_high = high;
            }
            Self::Band { .. } => {}
        }
        self
    }

    #[must_use]
    pub fn with_zero(mut self) -> Self {
        if let Self::Linear { include_zero, .. } = &mut self {
            *include_zero = true;
        }
        self
    }

    #[must_use]
    pub fn with_band_padding(mut self, inner: f64, outer: f64) -> Self {
        if let Self::Band {
            padding_inner,
            padding_outer,
            ..
        } = &mut self
        {
            *padding_inner = inner;
            *padding_outer = outer;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuousKind {
    Linear,
    Time,
}

/// Linear interpolation from a numeric domain onto a pixel range.
///
/// A zero-width domain is flat: every value maps to the range start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    kind: ContinuousKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl ContinuousScale {
    pub fn new(kind: ContinuousKind, domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        validate_range(range)?;
        Ok(Self {
            kind,
            domain,
            range,
        })
    }

    #[must_use]
    pub fn kind(self) -> ContinuousKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn is_flat(self) -> bool {
        self.domain.0 == self.domain.1
    }

    /// Position of `value` inside the domain as a ratio (0 at start, 1 at end).
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 || !value.is_finite() {
            return 0.0;
        }
        (value - self.domain.0) / span
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        self.range.0 + self.normalize(value) * (self.range.1 - self.range.0)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (low, high) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        match self.kind {
            ContinuousKind::Linear => nice_ticks(low, high, count),
            ContinuousKind::Time => year_ticks(low, high, count),
        }
    }
}

/// Evenly subdivides a pixel range among an enumerated integer domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: IndexSet<i64>,
    range: (f64, f64),
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(
        domain: impl IntoIterator<Item = i64>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
    ) -> ChartResult<Self> {
        validate_range(range)?;
        for (name, value) in [("inner", padding_inner), ("outer", padding_outer)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "band {name} padding must be finite and in [0, 1]"
                )));
            }
        }

        let domain: IndexSet<i64> = domain.into_iter().collect();
        let count = domain.len() as f64;
        let span = range.1 - range.0;
        let slots = (count - padding_inner + 2.0 * padding_outer).max(1.0);
        let step = if domain.is_empty() { 0.0 } else { span / slots };
        let used = step * (count - padding_inner).max(0.0);
        let start = range.0 + (span - used) * 0.5;

        Ok(Self {
            domain,
            range,
            start,
            step,
            bandwidth: step * (1.0 - padding_inner),
        })
    }

    #[must_use]
    pub fn domain(&self) -> Vec<i64> {
        self.domain.iter().copied().collect()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Signed band thickness; negative when the range runs backwards.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Start of the band holding `key`, or `None` when `key` is outside the domain.
    #[must_use]
    pub fn apply(&self, key: i64) -> Option<f64> {
        self.domain
            .get_index_of(&key)
            .map(|index| self.start + self.step * index as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Continuous(ContinuousScale),
    Band(BandScale),
}

impl Scale {
    /// Maps a numeric value to a pixel coordinate.
    ///
    /// Band scales accept whole numbers only.
    #[must_use]
    pub fn position(&self, value: f64) -> Option<f64> {
        match self {
            Self::Continuous(scale) => value.is_finite().then(|| scale.apply(value)),
            Self::Band(scale) => {
                if value.is_finite() && value.fract() == 0.0 {
                    scale.apply(value as i64)
                } else {
                    None
                }
            }
        }
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<ContinuousScale> {
        match self {
            Self::Continuous(scale) => Some(*scale),
            Self::Band(_) => None,
        }
    }

    #[must_use]
    pub fn as_band(&self) -> Option<&BandScale> {
        match self {
            Self::Band(scale) => Some(scale),
            Self::Continuous(_) => None,
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Continuous(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }

    /// Tick values: nice round numbers for continuous scales, every key for bands.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Continuous(scale) => scale.ticks(count),
            Self::Band(scale) => scale.domain().into_iter().map(|key| key as f64).collect(),
        }
    }
}

/// Fits a scale to the data described by `spec`.
///
/// Only invalid configuration is an error. Empty datasets and single-valued
/// fields produce flat scales instead.
pub fn derive_scale(points: &[DataPoint], spec: &AxisSpec) -> ChartResult<Scale> {
    match spec {
        AxisSpec::Linear {
            field,
            range,
            pad_low,
            pad_high,
            include_zero,
        } => {
            let mut domain = fitted_domain(points, field, *pad_low, *pad_high)?;
            if *include_zero {
                domain = (domain.0.min(0.0), domain.1.max(0.0));
            }
            ContinuousScale::new(ContinuousKind::Linear, domain, *range).map(Scale::Continuous)
        }
        AxisSpec::Time {
            field,
            range,
            pad_low,
            pad_high,
        } => {
            let domain = fitted_domain(points, field, *pad_low, *pad_high)?;
            ContinuousScale::new(ContinuousKind::Time, domain, *range).map(Scale::Continuous)
        }
        AxisSpec::Band {
            domain,
            range,
            padding_inner,
            padding_outer,
        } => BandScale::new(domain.iter().copied(), *range, *padding_inner, *padding_outer)
            .map(Scale::Band),
    }
}

/// Min/max of `field` over `points`, skipping points where it is absent.
#[must_use]
pub fn extent(points: &[DataPoint], field: &ValueField) -> Option<(f64, f64)> {
    let mut values = points.iter().filter_map(|point| field.read(point));
    let first = OrderedFloat(values.next()?);
    let (min, max) = values.fold((first, first), |(min, max), value| {
        let value = OrderedFloat(value);
        (min.min(value), max.max(value))
    });
    Some((min.0, max.0))
}

fn fitted_domain(
    points: &[DataPoint],
    field: &ValueField,
    pad_low: f64,
    pad_high: f64,
) -> ChartResult<(f64, f64)> {
    if !pad_low.is_finite() || !pad_high.is_finite() || pad_low < 0.0 || pad_high < 0.0 {
        return Err(ChartError::InvalidData(
            "domain padding must be finite and >= 0".to_owned(),
        ));
    }
    Ok(match extent(points, field) {
        Some((min, max)) => (min - pad_low, max + pad_high),
        None => (0.0, 0.0),
    })
}

fn validate_range(range: (f64, f64)) -> ChartResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }
    Ok(())
}

/// Round tick values covering `[min, max]` in 1/2/5 × 10ⁿ steps.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max || count == 1 {
        return vec![min];
    }

    let spacing = nice_number(nice_number(max - min, false) / (count - 1) as f64, true);
    if spacing <= 0.0 || !spacing.is_finite() {
        return vec![min];
    }
    let first = (min / spacing).ceil() as i64;
    let last = (max / spacing).floor() as i64;
    (first..=last).map(|step| step as f64 * spacing).collect()
}

/// January 1st (unix seconds) of evenly spaced years inside `[min, max]`.
fn year_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let (Some(first), Some(last)) = (year_at(min), year_at(max)) else {
        return Vec::new();
    };
    let span = f64::from(last - first);
    let step = if count > 1 && span > 0.0 {
        nice_number(nice_number(span, false) / (count - 1) as f64, true)
            .round()
            .max(1.0) as i32
    } else {
        1
    };
    let mut start = first.div_euclid(step) * step;
    if start < first {
        start += step;
    }

    (start..=last)
        .step_by(step as usize)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp() as f64)
        .filter(|seconds| (min..=max).contains(seconds))
        .collect()
}

fn year_at(seconds: f64) -> Option<i32> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp(seconds.floor() as i64, 0).map(|time| time.year())
}

fn nice_number(value: f64, round: bool) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    let exponent = value.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = value / magnitude;
    let nice = if round {
        match fraction {
            f if f < 1.5 => 1.0,
            f if f < 3.0 => 2.0,
            f if f < 7.0 => 5.0,
            _ => 10.0,
        }
    } else {
        match fraction {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        }
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::{nice_number, nice_ticks, year_ticks};

    #[test]
    fn nice_number_snaps_to_one_two_five() {
        assert_eq!(nice_number(0.9, true), 1.0);
        assert_eq!(nice_number(23.0, true), 20.0);
        assert_eq!(nice_number(45.0, true), 50.0);
        assert_eq!(nice_number(0.0, true), 0.0);
    }

    #[test]
    fn nice_ticks_stay_inside_domain() {
        let ticks = nice_ticks(3.0, 97.0, 5);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|tick| (3.0..=97.0).contains(tick)));
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn year_ticks_fall_on_new_year() {
        // 1947-01-01 .. 2015-07-01
        let ticks = year_ticks(-725_846_400.0, 1_435_708_800.0, 10);
        assert_eq!(ticks.first().copied(), Some(-631_152_000.0));
        assert!(ticks.iter().all(|tick| tick.rem_euclid(86_400.0) == 0.0));
        assert!(year_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn flat_domain_yields_single_tick() {
        assert_eq!(nice_ticks(5.0, 5.0, 4), vec![5.0]);
    }
}
