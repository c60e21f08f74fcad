use crate::core::topology::rings_to_path;
use crate::core::{Mark, MarkShape, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Palette, PathPrimitive, PolylinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

const TILE_LABEL_FONT_PX: f64 = 10.0;
const TILE_LABEL_INSET_PX: f64 = 4.0;
const TILE_LABEL_FIRST_BASELINE_PX: f64 = 12.0;
const DOT_STROKE_WIDTH_PX: f64 = 1.5;

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub polylines: Vec<PolylinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            circles: Vec::new(),
            paths: Vec::new(),
            polylines: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Converts marks into primitives, preserving paint order per primitive kind.
    #[must_use]
    pub fn from_marks(viewport: Viewport, marks: &[Mark], palette: &Palette) -> Self {
        let mut frame = Self::new(viewport);
        for mark in marks {
            frame.push_mark(mark, palette);
        }
        frame
    }

    fn push_mark(&mut self, mark: &Mark, palette: &Palette) {
        let key = Some(mark.key);
        match &mark.shape {
            MarkShape::Rect {
                x,
                y,
                width,
                height,
            } => {
                let fill = mark
                    .color_slot
                    .map_or(palette.base, |slot| palette.category(slot))
                    .faded(mark.opacity);
                self.rects.push(RectPrimitive {
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                    fill,
                    mark: key,
                });
                for (line, text) in mark.label_lines.iter().enumerate() {
                    if text.trim().is_empty() {
                        continue;
                    }
                    self.texts.push(TextPrimitive::new(
                        text.trim_end(),
                        x + TILE_LABEL_INSET_PX,
                        y + TILE_LABEL_FIRST_BASELINE_PX + line as f64 * TILE_LABEL_FONT_PX,
                        TILE_LABEL_FONT_PX,
                        palette.label,
                        TextHAlign::Left,
                    ));
                }
            }
            MarkShape::Circle { cx, cy, r } => {
                // Emphasized dots are solid; the rest are hollow with an outline.
                let (fill, stroke) = if mark.emphasis {
                    (palette.base, None)
                } else {
                    (palette.neutral, Some((palette.base, DOT_STROKE_WIDTH_PX)))
                };
                self.circles.push(CirclePrimitive {
                    cx: *cx,
                    cy: *cy,
                    r: *r,
                    fill: fill.faded(mark.opacity),
                    stroke,
                    mark: key,
                });
            }
            MarkShape::Path { rings } => {
                let data = rings_to_path(rings);
                if data.is_empty() {
                    return;
                }
                self.paths.push(PathPrimitive {
                    data,
                    fill: palette.base.faded(mark.opacity),
                    mark: key,
                });
            }
        }
    }

    #[must_use]
    pub fn with_polyline(mut self, polyline: PolylinePrimitive) -> Self {
        self.polylines.push(polyline);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for path in &self.paths {
            path.validate()?;
        }
        for polyline in &self.polylines {
            polyline.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn mark_primitive_count(&self) -> usize {
        self.rects.iter().filter(|rect| rect.mark.is_some()).count()
            + self.circles.len()
            + self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.circles.is_empty()
            && self.paths.is_empty()
            && self.polylines.is_empty()
            && self.texts.is_empty()
    }
}
