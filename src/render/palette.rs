use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Fixed fills used when turning marks into primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub base: Color,
    pub neutral: Color,
    pub border: Color,
    pub label: Color,
    pub categories: Vec<Color>,
}

impl Palette {
    /// Category color for `slot`, cycling when there are more slots than colors.
    #[must_use]
    pub fn category(&self, slot: usize) -> Color {
        if self.categories.is_empty() {
            return self.base;
        }
        self.categories[slot % self.categories.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color::rgb(0.0, 1.0, 0.051),
            neutral: Color::rgb(0.129, 0.129, 0.129),
            border: Color::rgb(0.0, 1.0, 0.051),
            label: Color::rgb(1.0, 1.0, 1.0),
            categories: vec![
                Color::rgb(0.122, 0.467, 0.706),
                Color::rgb(1.0, 0.498, 0.055),
                Color::rgb(0.173, 0.627, 0.173),
                Color::rgb(0.839, 0.153, 0.157),
                Color::rgb(0.580, 0.404, 0.741),
                Color::rgb(0.549, 0.337, 0.294),
                Color::rgb(0.890, 0.467, 0.761),
                Color::rgb(0.498, 0.498, 0.498),
                Color::rgb(0.737, 0.741, 0.133),
                Color::rgb(0.090, 0.745, 0.812),
                Color::rgb(0.682, 0.780, 0.910),
                Color::rgb(1.0, 0.733, 0.471),
                Color::rgb(0.596, 0.875, 0.541),
                Color::rgb(1.0, 0.596, 0.588),
                Color::rgb(0.773, 0.690, 0.835),
                Color::rgb(0.769, 0.612, 0.580),
                Color::rgb(0.969, 0.714, 0.824),
                Color::rgb(0.780, 0.780, 0.780),
            ],
        }
    }
}
