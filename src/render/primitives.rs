use serde::{Deserialize, Serialize};

use crate::core::MarkKey;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Same color with alpha scaled by `factor` (clamped to [0, 1]).
    #[must_use]
    pub fn faded(self, factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            alpha: self.alpha * factor,
            ..self
        }
    }

    /// `#rrggbb` without alpha; alpha is emitted separately as an opacity.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn validate_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

/// Filled rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub mark: Option<MarkKey>,
}

impl RectPrimitive {
    pub fn validate(self) -> ChartResult<()> {
        validate_finite(&[self.x, self.y, self.width, self.height], "rect")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Filled circle with an optional outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Color,
    pub stroke: Option<(Color, f64)>,
    pub mark: Option<MarkKey>,
}

impl CirclePrimitive {
    pub fn validate(self) -> ChartResult<()> {
        validate_finite(&[self.cx, self.cy, self.r], "circle")?;
        if self.r <= 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be > 0".to_owned(),
            ));
        }
        if let Some((color, width)) = self.stroke {
            color.validate()?;
            validate_finite(&[width], "stroke")?;
        }
        self.fill.validate()
    }
}

/// Filled closed path given as SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub data: String,
    pub fill: Color,
    pub mark: Option<MarkKey>,
}

impl PathPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.data.is_empty() {
            return Err(ChartError::InvalidData(
                "path data must not be empty".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Unfilled polyline (axis lines, region borders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 2 {
            return Err(ChartError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        for (x, y) in &self.points {
            validate_finite(&[*x, *y], "polyline")?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "polyline stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        validate_finite(&[self.x, self.y], "text")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
