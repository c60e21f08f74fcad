//! Minimal TopoJSON decoding for choropleth geometry.
//!
//! Supports quantized and unquantized topologies, `Polygon`/`MultiPolygon`
//! geometries inside `GeometryCollection`s, and interior border meshes.
//! Coordinates are used as-is (no projection), matching pre-projected
//! topologies such as US county maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// One ring: a closed sequence of `(x, y)` points.
pub type Ring = Vec<(f64, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<Value>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<Value>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<TopoTransform>,
    pub objects: IndexMap<String, TopoGeometry>,
    pub arcs: Vec<Vec<Vec<f64>>>,
}

/// Decoded polygonal feature keyed by its geometry id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeature {
    pub id: Option<i64>,
    /// Polygons, each a list of rings (outer ring first).
    pub polygons: Vec<Vec<Ring>>,
}

impl RegionFeature {
    #[must_use]
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }
}

impl Topology {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::malformed(None, format!("invalid topology document: {e}")))
    }

    fn decoded_arcs(&self) -> ChartResult<Vec<Ring>> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| {
                let mut cursor = (0.0, 0.0);
                arc.iter()
                    .map(|position| {
                        let (&x, &y) = match position.as_slice() {
                            [x, y, ..] => (x, y),
                            _ => {
                                return Err(ChartError::malformed(
                                    index,
                                    "arc position needs two coordinates",
                                ));
                            }
                        };
                        Ok(match self.transform {
                            Some(transform) => {
                                cursor.0 += x;
                                cursor.1 += y;
                                (
                                    cursor.0 * transform.scale[0] + transform.translate[0],
                                    cursor.1 * transform.scale[1] + transform.translate[1],
                                )
                            }
                            None => (x, y),
                        })
                    })
                    .collect()
            })
            .collect()
    }

    fn object(&self, name: &str) -> ChartResult<&TopoGeometry> {
        self.objects
            .get(name)
            .ok_or_else(|| ChartError::malformed(None, format!("topology has no object `{name}`")))
    }

    /// Decodes every polygonal geometry of object `name` into features.
    pub fn features(&self, name: &str) -> ChartResult<Vec<RegionFeature>> {
        let arcs = self.decoded_arcs()?;
        let mut features = Vec::new();
        collect_features(self.object(name)?, &arcs, &mut features)?;
        Ok(features)
    }

    /// Arcs shared by two different geometries of object `name`, i.e. interior
    /// borders without the outer coastline.
    pub fn interior_mesh(&self, name: &str) -> ChartResult<Vec<Ring>> {
        let arcs = self.decoded_arcs()?;
        let mut owners: Vec<Vec<usize>> = vec![Vec::new(); arcs.len()];
        let mut geometry_index = 0;
        collect_arc_owners(self.object(name)?, &mut geometry_index, &mut owners)?;

        Ok(owners
            .iter()
            .zip(arcs)
            .filter(|(owner, _)| {
                owner
                    .first()
                    .is_some_and(|first| owner.iter().any(|other| other != first))
            })
            .map(|(_, arc)| arc)
            .collect())
    }
}

fn collect_features(
    geometry: &TopoGeometry,
    arcs: &[Ring],
    out: &mut Vec<RegionFeature>,
) -> ChartResult<()> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_features(child, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { id, arcs: rings } => out.push(RegionFeature {
            id: id.as_ref().and_then(feature_id),
            polygons: vec![decode_polygon(rings, arcs)?],
        }),
        TopoGeometry::MultiPolygon { id, arcs: polygons } => out.push(RegionFeature {
            id: id.as_ref().and_then(feature_id),
            polygons: polygons
                .iter()
                .map(|rings| decode_polygon(rings, arcs))
                .collect::<ChartResult<_>>()?,
        }),
        TopoGeometry::Other => {}
    }
    Ok(())
}

fn collect_arc_owners(
    geometry: &TopoGeometry,
    geometry_index: &mut usize,
    owners: &mut [Vec<usize>],
) -> ChartResult<()> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_arc_owners(child, geometry_index, owners)?;
            }
            return Ok(());
        }
        TopoGeometry::Polygon { arcs, .. } => {
            for arc in arcs.iter().flatten() {
                claim_arc(owners, *arc, *geometry_index)?;
            }
        }
        TopoGeometry::MultiPolygon { arcs, .. } => {
            for arc in arcs.iter().flatten().flatten() {
                claim_arc(owners, *arc, *geometry_index)?;
            }
        }
        TopoGeometry::Other => {}
    }
    *geometry_index += 1;
    Ok(())
}

fn claim_arc(owners: &mut [Vec<usize>], arc: i64, owner: usize) -> ChartResult<()> {
    let slot = owners
        .get_mut(arc_slot(arc))
        .ok_or_else(|| ChartError::malformed(None, format!("arc index {arc} out of range")))?;
    if !slot.contains(&owner) {
        slot.push(owner);
    }
    Ok(())
}

fn decode_polygon(rings: &[Vec<i64>], arcs: &[Ring]) -> ChartResult<Vec<Ring>> {
    rings.iter().map(|ring| decode_ring(ring, arcs)).collect()
}

/// Stitches arcs into one ring; negative indices (`!i`) walk an arc backwards.
fn decode_ring(indices: &[i64], arcs: &[Ring]) -> ChartResult<Ring> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let arc = arcs
            .get(arc_slot(index))
            .ok_or_else(|| ChartError::malformed(None, format!("arc index {index} out of range")))?;
        let skip = usize::from(!ring.is_empty());
        if index >= 0 {
            ring.extend(arc.iter().skip(skip));
        } else {
            ring.extend(arc.iter().rev().skip(skip));
        }
    }
    Ok(ring)
}

fn arc_slot(index: i64) -> usize {
    if index >= 0 {
        index as usize
    } else {
        (!index) as usize
    }
}

fn feature_id(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// SVG path data (`M…L…Z` per ring) for a set of rings.
#[must_use]
pub fn rings_to_path<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> String {
    let mut path = String::new();
    for ring in rings {
        for (index, (x, y)) in ring.iter().enumerate() {
            let command = if index == 0 { 'M' } else { 'L' };
            path.push_str(&format!("{command}{x},{y}"));
        }
        if !ring.is_empty() {
            path.push('Z');
        }
    }
    path
}

/// Even-odd containment test across all rings.
#[must_use]
pub fn rings_contain<'a>(rings: impl IntoIterator<Item = &'a Ring>, x: f64, y: f64) -> bool {
    let mut inside = false;
    for ring in rings {
        let count = ring.len();
        if count < 3 {
            continue;
        }
        let mut previous = ring[count - 1];
        for &current in ring {
            let crosses = (current.1 > y) != (previous.1 > y);
            if crosses {
                let at = (previous.0 - current.0) * (y - current.1) / (previous.1 - current.1)
                    + current.0;
                if x < at {
                    inside = !inside;
                }
            }
            previous = current;
        }
    }
    inside
}
