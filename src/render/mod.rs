mod frame;
mod null_surface;
mod palette;
mod primitives;
mod svg_surface;

pub use frame::RenderFrame;
pub use null_surface::NullSurface;
pub use palette::Palette;
pub use primitives::{
    CirclePrimitive, Color, PathPrimitive, PolylinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use svg_surface::SvgSurface;

use crate::error::ChartResult;

/// Mount point a chart draws into.
///
/// Surfaces receive fully materialized `RenderFrame`s, so drawing code stays
/// isolated from data, scales, and interaction. A surface must be cleared
/// before a new render is mounted on it.
pub trait DrawingSurface {
    fn clear(&mut self);
    fn mount(&mut self, frame: &RenderFrame) -> ChartResult<()>;
    fn is_empty(&self) -> bool;
}
