use crate::core::MarkKey;
use crate::error::ChartResult;
use crate::render::{Color, DrawingSurface, RenderFrame, TextHAlign};

/// Surface that serializes mounted frames into a standalone SVG document.
///
/// Mark-backed elements carry a `data-mark` attribute so a host can route
/// delegated pointer events back to the overlay.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    content: Vec<String>,
}

impl SvgSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        for element in &self.content {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

fn fill_attrs(color: Color) -> String {
    format!("fill=\"{}\" fill-opacity=\"{:.3}\"", color.to_hex(), color.alpha)
}

fn mark_attr(mark: Option<MarkKey>) -> String {
    mark.map(|key| format!(" data-mark=\"{}\"", key.0))
        .unwrap_or_default()
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl DrawingSurface for SvgSurface {
    fn clear(&mut self) {
        self.content.clear();
    }

    fn mount(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.width = frame.viewport.width;
        self.height = frame.viewport.height;

        for rect in &frame.rects {
            self.content.push(format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {}{}/>",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                fill_attrs(rect.fill),
                mark_attr(rect.mark)
            ));
        }
        for path in &frame.paths {
            self.content.push(format!(
                "<path d=\"{}\" {}{}/>",
                path.data,
                fill_attrs(path.fill),
                mark_attr(path.mark)
            ));
        }
        for circle in &frame.circles {
            let stroke = circle
                .stroke
                .map(|(color, width)| {
                    format!(" stroke=\"{}\" stroke-width=\"{width}\"", color.to_hex())
                })
                .unwrap_or_default();
            self.content.push(format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {}{stroke}{}/>",
                circle.cx,
                circle.cy,
                circle.r,
                fill_attrs(circle.fill),
                mark_attr(circle.mark)
            ));
        }
        for polyline in &frame.polylines {
            let points = polyline
                .points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            self.content.push(format!(
                "<polyline points=\"{points}\" fill=\"none\" \
                 stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>",
                polyline.color.to_hex(),
                polyline.stroke_width
            ));
        }
        for text in &frame.texts {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            self.content.push(format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" \
                 text-anchor=\"{anchor}\" fill=\"{}\">{}</text>",
                text.x,
                text.y,
                text.font_size_px,
                text.color.to_hex(),
                escape_xml(&text.text)
            ));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("A&B <c>"), "A&amp;B &lt;c&gt;");
    }
}
