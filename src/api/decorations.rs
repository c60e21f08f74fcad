//! Axes and legends drawn around the marks.

use serde::{Deserialize, Serialize};

use crate::core::{IntensityRange, PlotArea, Scale};
use crate::render::{
    Palette, PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

const AXIS_STROKE_PX: f64 = 1.0;
const TICK_LENGTH_PX: f64 = 6.0;
const AXIS_FONT_PX: f64 = 10.0;
const LEGEND_SWATCHES: usize = 10;
const LEGEND_BAR_HEIGHT_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisSide {
    Bottom,
    Left,
}

/// Legend description kept on the prepared chart for host-side rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Legend {
    /// Opacity ramp with labelled stops.
    Gradient {
        range: IntensityRange,
        stops: Vec<(f64, String)>,
    },
    /// One entry per color slot.
    Categories(Vec<(usize, String)>),
}

/// Appends an axis line, ticks, and labels for `scale` along one plot edge.
pub(crate) fn push_axis(
    frame: &mut RenderFrame,
    scale: &Scale,
    side: AxisSide,
    plot: PlotArea,
    tick_count: usize,
    palette: &Palette,
    label: impl Fn(f64) -> String,
) {
    let band_offset = scale.as_band().map_or(0.0, |band| band.bandwidth() * 0.5);
    let ticks: Vec<(f64, f64)> = scale
        .ticks(tick_count)
        .into_iter()
        .filter_map(|value| scale.position(value).map(|pixel| (value, pixel + band_offset)))
        .collect();

    match side {
        AxisSide::Bottom => {
            frame.polylines.push(PolylinePrimitive {
                points: vec![(plot.left, plot.bottom), (plot.right, plot.bottom)],
                stroke_width: AXIS_STROKE_PX,
                color: palette.border,
            });
            for (value, x) in ticks {
                frame.polylines.push(PolylinePrimitive {
                    points: vec![(x, plot.bottom), (x, plot.bottom + TICK_LENGTH_PX)],
                    stroke_width: AXIS_STROKE_PX,
                    color: palette.border,
                });
                push_label(
                    frame,
                    label(value),
                    x,
                    plot.bottom + TICK_LENGTH_PX + AXIS_FONT_PX + 2.0,
                    TextHAlign::Center,
                    palette,
                );
            }
        }
        AxisSide::Left => {
            frame.polylines.push(PolylinePrimitive {
                points: vec![(plot.left, plot.top), (plot.left, plot.bottom)],
                stroke_width: AXIS_STROKE_PX,
                color: palette.border,
            });
            for (value, y) in ticks {
                frame.polylines.push(PolylinePrimitive {
                    points: vec![(plot.left - TICK_LENGTH_PX, y), (plot.left, y)],
                    stroke_width: AXIS_STROKE_PX,
                    color: palette.border,
                });
                push_label(
                    frame,
                    label(value),
                    plot.left - TICK_LENGTH_PX - 2.0,
                    y + AXIS_FONT_PX * 0.35,
                    TextHAlign::Right,
                    palette,
                );
            }
        }
    }
}

fn push_label(
    frame: &mut RenderFrame,
    text: String,
    x: f64,
    y: f64,
    align: TextHAlign,
    palette: &Palette,
) {
    if text.is_empty() {
        return;
    }
    frame
        .texts
        .push(TextPrimitive::new(text, x, y, AXIS_FONT_PX, palette.label, align));
}

/// Draws a horizontal opacity ramp of `length` pixels starting at `(x, y)`,
/// with the legend stops labelled underneath.
pub(crate) fn push_gradient_legend(
    frame: &mut RenderFrame,
    legend: &Legend,
    x: f64,
    y: f64,
    length: f64,
    palette: &Palette,
) {
    let Legend::Gradient { range, stops } = legend else {
        return;
    };
    let swatch = length / LEGEND_SWATCHES as f64;
    for index in 0..LEGEND_SWATCHES {
        let ratio = (index as f64 + 0.5) / LEGEND_SWATCHES as f64;
        frame.rects.push(RectPrimitive {
            x: x + swatch * index as f64,
            y,
            width: swatch,
            height: LEGEND_BAR_HEIGHT_PX,
            fill: palette.base.faded(ratio),
            mark: None,
        });
    }
    for (value, text) in stops {
        let offset = range.intensity(*value) * length;
        push_label(
            frame,
            text.clone(),
            x + offset,
            y + LEGEND_BAR_HEIGHT_PX + AXIS_FONT_PX + 2.0,
            TextHAlign::Center,
            palette,
        );
    }
}
