use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Margins between the viewport edge and the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "padding `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

/// Inner drawing rectangle left after applying `Padding` to a `Viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(viewport: Viewport, padding: Padding) -> ChartResult<Self> {
        let viewport = viewport.validate()?;
        let padding = padding.validate()?;
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        if padding.left + padding.right >= width || padding.top + padding.bottom >= height {
            return Err(ChartError::InvalidData(
                "padding leaves no room for the plot area".to_owned(),
            ));
        }

        Ok(Self {
            left: padding.left,
            top: padding.top,
            right: width - padding.right,
            bottom: height - padding.bottom,
        })
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Horizontal pixel range, left to right.
    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Vertical pixel range, bottom to top, so larger values sit higher.
    #[must_use]
    pub fn y_range(self) -> (f64, f64) {
        (self.bottom, self.top)
    }
}

/// Pointer location in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
