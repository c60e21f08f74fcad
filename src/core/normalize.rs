use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::data::{AttrValue, DataPoint, PointKey};
use crate::error::{ChartError, ChartResult};

/// Location of a field inside one raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPath {
    /// Member of a JSON object.
    Key(String),
    /// Element of a JSON array row (e.g. `["2000-01-01", 100]`).
    Index(usize),
}

impl FieldPath {
    #[must_use]
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        match (self, record) {
            (Self::Key(name), Value::Object(map)) => map.get(name),
            (Self::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Key(name) => format!("`{name}`"),
            Self::Index(index) => format!("[{index}]"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrKind {
    Integer,
    Number,
    Text,
    /// ISO `YYYY-MM-DD`.
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeField {
    pub name: String,
    pub path: FieldPath,
    pub kind: AttrKind,
    pub required: bool,
}

/// Describes where the metric, spatial key, and attributes live in raw records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub metric: FieldPath,
    pub spatial_key: Option<FieldPath>,
    pub attributes: Vec<AttributeField>,
}

impl FieldMapping {
    #[must_use]
    pub fn new(metric: FieldPath) -> Self {
        Self {
            metric,
            spatial_key: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_spatial_key(mut self, path: FieldPath) -> Self {
        self.spatial_key = Some(path);
        self
    }

    #[must_use]
    pub fn with_required(
        mut self,
        name: impl Into<String>,
        path: FieldPath,
        kind: AttrKind,
    ) -> Self {
        self.attributes.push(AttributeField {
            name: name.into(),
            path,
            kind,
            required: true,
        });
        self
    }

    #[must_use]
    pub fn with_optional(
        mut self,
        name: impl Into<String>,
        path: FieldPath,
        kind: AttrKind,
    ) -> Self {
        self.attributes.push(AttributeField {
            name: name.into(),
            path,
            kind,
            required: false,
        });
        self
    }
}

/// Converts raw JSON records into `DataPoint`s, preserving source order.
///
/// The whole batch fails on the first malformed record, so callers never see
/// a partially normalized dataset.
pub fn normalize(records: &[Value], mapping: &FieldMapping) -> ChartResult<Vec<DataPoint>> {
    let mut points = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        points.push(normalize_record(index, record, mapping)?);
    }
    debug!(count = points.len(), "normalized dataset");
    Ok(points)
}

fn normalize_record(
    index: usize,
    record: &Value,
    mapping: &FieldMapping,
) -> ChartResult<DataPoint> {
    if !record.is_object() && !record.is_array() {
        return Err(ChartError::malformed(
            index,
            "record must be a JSON object or array",
        ));
    }

    let raw_metric = mapping.metric.lookup(record).ok_or_else(|| {
        ChartError::malformed(
            index,
            format!("missing metric field {}", mapping.metric.describe()),
        )
    })?;
    let value = parse_number(raw_metric).ok_or_else(|| {
        ChartError::malformed(
            index,
            format!("metric field {} is not numeric", mapping.metric.describe()),
        )
    })?;

    let mut point = DataPoint::new(PointKey(index), value);

    if let Some(path) = &mapping.spatial_key {
        let spatial_key = path
            .lookup(record)
            .and_then(parse_integer)
            .ok_or_else(|| {
                ChartError::malformed(
                    index,
                    format!("spatial key {} must be an integer", path.describe()),
                )
            })?;
        point.spatial_key = Some(spatial_key);
    }

    for field in &mapping.attributes {
        let parsed = field
            .path
            .lookup(record)
            .and_then(|raw| parse_attribute(raw, field.kind));
        let value = match parsed {
            Some(value) => value,
            None if field.required => {
                return Err(ChartError::malformed(
                    index,
                    format!(
                        "attribute `{}` at {} is missing or not {:?}",
                        field.name,
                        field.path.describe(),
                        field.kind
                    ),
                ));
            }
            None => AttrValue::Missing,
        };
        point = point.with_attribute(field.name.clone(), value);
    }

    Ok(point)
}

/// Accepts JSON numbers and numeric strings; rejects anything non-finite.
pub(crate) fn parse_number(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => decimal_to_f64(text.trim())?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn decimal_to_f64(text: &str) -> Option<f64> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()?
        .to_f64()
}

fn parse_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && value.is_finite())
                .map(|value| value as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn parse_attribute(raw: &Value, kind: AttrKind) -> Option<AttrValue> {
    match kind {
        AttrKind::Integer => parse_integer(raw).map(AttrValue::Integer),
        AttrKind::Number => parse_number(raw).map(AttrValue::Number),
        AttrKind::Text => match raw {
            Value::String(text) => Some(AttrValue::Text(text.clone())),
            Value::Number(number) => Some(AttrValue::Text(number.to_string())),
            _ => None,
        },
        AttrKind::Date => raw
            .as_str()
            .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
            .map(AttrValue::Date),
    }
}
