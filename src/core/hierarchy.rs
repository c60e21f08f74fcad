use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::data::{AttrValue, DataPoint, PointKey};
use crate::core::normalize::parse_number;
use crate::error::{ChartError, ChartResult};

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Node of a treemap dataset: `{name, category?, value?, children?}`.
///
/// Values may arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    #[must_use]
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: None,
            value: Some(value),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            category: None,
            value: None,
            children,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn lenient_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => parse_number(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("node value {raw} is not numeric"))),
    }
}

/// Axis-aligned rectangle in surface pixels, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TileRect {
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }
}

/// Leaf of a partitioned hierarchy with its tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLeaf {
    pub key: PointKey,
    /// Dotted path of names from the root, e.g. `root.Wii.Wii Sports`.
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub value: f64,
    pub rect: TileRect,
    /// Index among the root's children (input order) used for color slots.
    pub group: usize,
}

impl PositionedLeaf {
    /// Overlay-facing view of the leaf.
    #[must_use]
    pub fn to_data_point(&self) -> DataPoint {
        let category = self
            .category
            .clone()
            .map_or(AttrValue::Missing, AttrValue::Text);
        DataPoint::new(self.key, self.value)
            .with_attribute("id", AttrValue::Text(self.id.clone()))
            .with_attribute("name", AttrValue::Text(self.name.clone()))
            .with_attribute("category", category)
    }
}

struct Summed<'a> {
    node: &'a HierarchyNode,
    id: String,
    value: f64,
    group: usize,
    children: Vec<Summed<'a>>,
}

/// Squarified treemap layout of `root` inside `width × height`.
///
/// Siblings are ordered by descending value, ties keeping input order. Leaf
/// tiles cover the whole rectangle, each with area proportional to its value.
pub fn partition_hierarchy(
    root: &HierarchyNode,
    width: f64,
    height: f64,
) -> ChartResult<Vec<PositionedLeaf>> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ChartError::InvalidData(
            "treemap size must be finite and > 0".to_owned(),
        ));
    }

    let root_names: Vec<&str> = root.children.iter().map(|child| child.name.as_str()).collect();
    let summed = summarize(root, root.name.clone(), 0, &root_names, true)?;

    let mut leaves = Vec::new();
    layout(&summed, TileRect::new(0.0, 0.0, width, height), &mut leaves);
    Ok(leaves)
}

fn summarize<'a>(
    node: &'a HierarchyNode,
    id: String,
    group: usize,
    root_names: &[&str],
    is_root: bool,
) -> ChartResult<Summed<'a>> {
    if node.is_leaf() {
        let value = node.value.ok_or_else(|| {
            ChartError::malformed(None, format!("leaf `{id}` has no value"))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::malformed(
                None,
                format!("leaf `{id}` value must be finite and >= 0"),
            ));
        }
        let group = node
            .category
            .as_deref()
            .and_then(|category| root_names.iter().position(|name| *name == category))
            .unwrap_or(group);
        return Ok(Summed {
            node,
            id,
            value,
            group,
            children: Vec::new(),
        });
    }

    let mut children = Vec::with_capacity(node.children.len());
    for (index, child) in node.children.iter().enumerate() {
        let child_group = if is_root { index } else { group };
        let child_id = format!("{id}.{}", child.name);
        children.push(summarize(child, child_id, child_group, root_names, false)?);
    }
    children.sort_by_key(|child| Reverse(OrderedFloat(child.value)));

    Ok(Summed {
        node,
        id,
        value: children.iter().map(|child| child.value).sum(),
        group,
        children,
    })
}

fn layout(node: &Summed<'_>, rect: TileRect, leaves: &mut Vec<PositionedLeaf>) {
    if node.children.is_empty() {
        leaves.push(PositionedLeaf {
            key: PointKey(leaves.len()),
            id: node.id.clone(),
            name: node.node.name.clone(),
            category: node.node.category.clone(),
            value: node.value,
            rect,
            group: node.group,
        });
        return;
    }

    let values: Vec<f64> = node.children.iter().map(|child| child.value).collect();
    let tiles = squarify(&values, rect);
    for (child, tile) in node.children.iter().zip(tiles) {
        layout(child, tile, leaves);
    }
}

/// Splits `rect` into one tile per value, in order, rows chosen to keep
/// tile aspect ratios close to the golden ratio.
fn squarify(values: &[f64], rect: TileRect) -> Vec<TileRect> {
    let count = values.len();
    let mut tiles = vec![TileRect::new(rect.x0, rect.y0, rect.x0, rect.y0); count];
    let TileRect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = rect;
    let mut remaining: f64 = values.iter().sum();
    let mut row_start = 0;

    while row_start < count {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Zero-valued siblings ahead of the first weighted one join its row.
        let mut row_end = row_start;
        let mut row_sum;
        loop {
            row_sum = values[row_end];
            row_end += 1;
            if row_sum > 0.0 || row_end >= count {
                break;
            }
        }

        let mut min_value = row_sum;
        let mut max_value = row_sum;
        let alpha = if dx > 0.0 && dy > 0.0 && remaining > 0.0 {
            (dy / dx).max(dx / dy) / (remaining * GOLDEN_RATIO)
        } else {
            0.0
        };
        let mut min_ratio = worst_ratio(min_value, max_value, row_sum * row_sum * alpha);

        while row_end < count {
            let value = values[row_end];
            let sum = row_sum + value;
            let next_min = min_value.min(value);
            let next_max = max_value.max(value);
            let ratio = worst_ratio(next_min, next_max, sum * sum * alpha);
            if ratio > min_ratio {
                break;
            }
            row_sum = sum;
            min_value = next_min;
            max_value = next_max;
            min_ratio = ratio;
            row_end += 1;
        }

        let last_row = row_end >= count;
        let share = if last_row {
            1.0
        } else if remaining > 0.0 {
            row_sum / remaining
        } else {
            0.0
        };
        let row = &values[row_start..row_end];
        let row_tiles = &mut tiles[row_start..row_end];

        if dx < dy {
            let row_y1 = if last_row { y1 } else { y0 + dy * share };
            lay_row(row, row_sum, x0, x1, |index, a, b| {
                row_tiles[index] = TileRect::new(a, y0, b, row_y1);
            });
            y0 = row_y1;
        } else {
            let row_x1 = if last_row { x1 } else { x0 + dx * share };
            lay_row(row, row_sum, y0, y1, |index, a, b| {
                row_tiles[index] = TileRect::new(x0, a, row_x1, b);
            });
            x0 = row_x1;
        }

        remaining -= row_sum;
        row_start = row_end;
    }

    tiles
}

fn worst_ratio(min_value: f64, max_value: f64, beta: f64) -> f64 {
    let grow = max_value / beta;
    let shrink = beta / min_value;
    match (grow.is_nan(), shrink.is_nan()) {
        (true, true) => f64::INFINITY,
        (true, false) => shrink,
        (false, true) => grow,
        (false, false) => grow.max(shrink),
    }
}

/// Subdivides `[start, end]` proportionally to `row`; the last weighted tile
/// ends exactly at `end`.
fn lay_row(
    row: &[f64],
    row_sum: f64,
    start: f64,
    end: f64,
    mut place: impl FnMut(usize, f64, f64),
) {
    let scale = if row_sum > 0.0 {
        (end - start) / row_sum
    } else {
        0.0
    };
    let last_weighted = row.iter().rposition(|value| *value > 0.0);
    let mut cursor = start;
    for (index, value) in row.iter().enumerate() {
        let next = if Some(index) == last_weighted {
            end
        } else {
            cursor + value * scale
        };
        place(index, cursor, next);
        cursor = next;
    }
}

#[cfg(test)]
mod tests {
    use super::{TileRect, squarify};

    #[test]
    fn squarify_covers_the_region() {
        let rect = TileRect::new(0.0, 0.0, 600.0, 400.0);
        let tiles = squarify(&[6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0], rect);
        let area: f64 = tiles.iter().map(|tile| tile.area()).sum();
        assert!((area - rect.area()).abs() < 1e-6);
    }

    #[test]
    fn zero_values_get_empty_tiles() {
        let rect = TileRect::new(0.0, 0.0, 100.0, 100.0);
        let tiles = squarify(&[5.0, 0.0], rect);
        assert!((tiles[0].area() - 10_000.0).abs() < 1e-9);
        assert_eq!(tiles[1].area(), 0.0);
    }
}
