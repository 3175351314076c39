use std::fmt::Write;

use foundation::math::{AlbersProjection, Vec2, canonical_f64};
use formats::topology::Boundary;

/// Projects a boundary into screen space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BoundaryLayer;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoundaryLayerSnapshot {
    /// Projected rings; points that do not project to finite coordinates are
    /// dropped.
    pub rings: Vec<Vec<Vec2>>,
}

impl BoundaryLayer {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, boundary: &Boundary, projection: &AlbersProjection) -> BoundaryLayerSnapshot {
        let mut rings = Vec::with_capacity(boundary.ring_count());
        for ring in boundary.polygons.iter().flatten() {
            let projected: Vec<Vec2> = ring
                .iter()
                .map(|p| projection.project(p.x, p.y))
                .filter(|p| p.is_finite())
                .collect();
            if projected.len() < 3 {
                continue;
            }
            rings.push(projected);
        }

        BoundaryLayerSnapshot { rings }
    }
}

impl BoundaryLayerSnapshot {
    /// SVG path data: one `M..L..Z` subpath per ring.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for ring in &self.rings {
            let closed = ring.len() > 1 && ring.first() == ring.last();
            let points = if closed { &ring[..ring.len() - 1] } else { &ring[..] };
            for (i, p) in points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{},{}", coord(p.x), coord(p.y));
            }
            d.push('Z');
        }
        d
    }
}

/// Three decimals, shortest form, no negative zero.
pub fn coord(v: f64) -> String {
    format!("{}", canonical_f64((v * 1000.0).round() / 1000.0))
}
