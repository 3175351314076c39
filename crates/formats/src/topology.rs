//! TopoJSON boundary extraction.
//!
//! Only polygonal geometries are decoded. Arcs may be quantized (delta
//! encoded, with a top-level `transform`) or absolute.

use std::collections::HashMap;

use foundation::math::Vec2;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Closed ring of (longitude, latitude) positions in degrees.
pub type Ring = Vec<Vec2>;

/// One polygon: outer ring first, then holes.
pub type Polygon = Vec<Ring>;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a TopoJSON Topology, found type {0:?}")]
    NotATopology(String),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("object {object:?} has no geometry with id {id:?}")]
    MissingFeature { object: String, id: String },
    #[error("geometry {id:?} has unsupported type {kind:?}")]
    UnsupportedGeometry { id: String, kind: String },
    #[error("arc reference {0} is out of range")]
    ArcOutOfRange(i64),
    #[error("invalid geometry {id:?}: {reason}")]
    InvalidGeometry { id: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub objects: HashMap<String, TopoObject>,
    #[serde(default)]
    pub arcs: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopoObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub arcs: Value,
    #[serde(default)]
    pub geometries: Vec<TopoObject>,
}

impl TopoObject {
    /// The id as a string. Numeric ids render without quotes.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A decoded polygonal boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub id: String,
    pub polygons: Vec<Polygon>,
}

impl Boundary {
    pub fn ring_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_str(payload)?;
        if topology.kind != "Topology" {
            return Err(TopologyError::NotATopology(topology.kind));
        }
        Ok(topology)
    }

    /// Decodes every arc to absolute positions.
    pub fn decoded_arcs(&self) -> Vec<Vec<Vec2>> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(t) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            Vec2::new(
                                x * t.scale[0] + t.translate[0],
                                y * t.scale[1] + t.translate[1],
                            )
                        })
                        .collect()
                }
                None => arc.iter().map(|p| Vec2::new(p[0], p[1])).collect(),
            })
            .collect()
    }

    /// Extracts the geometry with `id` from the named object.
    ///
    /// The object may be a `GeometryCollection` or a single geometry.
    pub fn boundary(&self, object: &str, id: &str) -> Result<Boundary, TopologyError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;

        let found = if root.kind == "GeometryCollection" {
            root.geometries
                .iter()
                .find(|g| g.id_string().as_deref() == Some(id))
        } else {
            Some(root).filter(|g| g.id_string().as_deref() == Some(id))
        };
        let geometry = found.ok_or_else(|| TopologyError::MissingFeature {
            object: object.to_string(),
            id: id.to_string(),
        })?;

        let arcs = self.decoded_arcs();
        let polygons = match geometry.kind.as_str() {
            "Polygon" => vec![polygon(&arcs, &geometry.arcs, id)?],
            "MultiPolygon" => {
                let parts = geometry
                    .arcs
                    .as_array()
                    .ok_or_else(|| invalid(id, "MultiPolygon arcs must be an array"))?;
                parts
                    .iter()
                    .map(|part| polygon(&arcs, part, id))
                    .collect::<Result<Vec<_>, _>>()?
            }
            other => {
                return Err(TopologyError::UnsupportedGeometry {
                    id: id.to_string(),
                    kind: other.to_string(),
                });
            }
        };

        let boundary = Boundary {
            id: id.to_string(),
            polygons,
        };
        debug!(
            object,
            id,
            polygons = boundary.polygons.len(),
            rings = boundary.ring_count(),
            "decoded boundary"
        );
        Ok(boundary)
    }
}

/// Convenience: parse a topology and extract one boundary.
pub fn parse_boundary(payload: &str, object: &str, id: &str) -> Result<Boundary, TopologyError> {
    Topology::from_json_str(payload)?.boundary(object, id)
}

fn invalid(id: &str, reason: &str) -> TopologyError {
    TopologyError::InvalidGeometry {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn polygon(arcs: &[Vec<Vec2>], rings: &Value, id: &str) -> Result<Polygon, TopologyError> {
    let rings = rings
        .as_array()
        .ok_or_else(|| invalid(id, "polygon arcs must be an array of rings"))?;
    rings.iter().map(|r| ring(arcs, r, id)).collect()
}

/// Stitches arc references into one ring. A negative reference `!i` walks arc
/// `i` backwards; consecutive arcs share their joining point.
fn ring(arcs: &[Vec<Vec2>], refs: &Value, id: &str) -> Result<Ring, TopologyError> {
    let refs = refs
        .as_array()
        .ok_or_else(|| invalid(id, "ring must be an array of arc indices"))?;

    let mut points: Ring = Vec::new();
    for r in refs {
        let index = r
            .as_i64()
            .ok_or_else(|| invalid(id, "arc index must be an integer"))?;
        let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::ArcOutOfRange(index))?;

        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    Ok(points)
}
