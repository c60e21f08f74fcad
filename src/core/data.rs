use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Source-order index of a record inside its dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointKey(pub usize);

/// Categorical, temporal, or auxiliary numeric attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Integer(i64),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

impl AttrValue {
    /// Numeric view used by scales. Dates map to unix seconds at midnight UTC.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|time| time.and_utc().timestamp() as f64),
            Self::Number(_) | Self::Text(_) | Self::Missing => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// One normalized record: a numeric metric plus named attributes.
///
/// Immutable after normalization. Marks refer back to it by `key` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub key: PointKey,
    pub value: f64,
    pub spatial_key: Option<i64>,
    pub attributes: SmallVec<[Attribute; 4]>,
}

impl DataPoint {
    #[must_use]
    pub fn new(key: PointKey, value: f64) -> Self {
        Self {
            key,
            value,
            spatial_key: None,
            attributes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_spatial_key(mut self, spatial_key: i64) -> Self {
        self.spatial_key = Some(spatial_key);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| &attribute.value)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AttrValue::as_text)
    }

    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.attribute(name).and_then(AttrValue::as_i64)
    }
}
