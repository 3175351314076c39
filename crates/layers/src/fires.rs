use foundation::color::{ColorRamp, Rgb};
use foundation::math::{AlbersProjection, Vec2};
use scene::FireWorld;
use scene::entity::FireId;
use scene::key::FireKey;
use scene::query::{FireQuery, query_fires};
use tracing::trace;

use crate::scale::{SequentialScale, SqrtScale};
use crate::tooltip::FireDetails;

/// Acres mapped onto the full radius range.
pub const SIZE_DOMAIN_ACRES: [f64; 2] = [0.0, 1_000_000.0];
pub const RADIUS_RANGE_PX: [f64; 2] = [0.0, 30.0];
/// Durations at or beyond the upper bound share the darkest color.
pub const DURATION_DOMAIN_DAYS: [f64; 2] = [0.0, 30.0];

/// One fire as it should appear on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleFire {
    pub fire: FireId,
    pub key: FireKey,
    pub position: Vec2,
    pub radius: f64,
    pub color: Rgb,
    pub details: FireDetails,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FireLayerSnapshot {
    /// In record order.
    pub fires: Vec<VisibleFire>,
}

/// Filter-and-project stage: turns the selection into positioned, sized and
/// colored fires.
#[derive(Debug, Clone)]
pub struct FireLayer {
    projection: AlbersProjection,
    size: SqrtScale,
    color: SequentialScale,
}

impl FireLayer {
    pub fn new(projection: AlbersProjection) -> Self {
        Self {
            projection,
            size: SqrtScale::new(SIZE_DOMAIN_ACRES, RADIUS_RANGE_PX),
            color: SequentialScale::new(DURATION_DOMAIN_DAYS, ColorRamp::yl_or_rd()),
        }
    }

    pub fn size_scale(&self) -> &SqrtScale {
        &self.size
    }

    pub fn color_scale(&self) -> &SequentialScale {
        &self.color
    }

    pub fn radius(&self, size_acres: f64) -> f64 {
        self.size.apply(size_acres).max(0.0)
    }

    pub fn color(&self, duration_days: f64) -> Rgb {
        self.color
            .apply(duration_days.min(DURATION_DOMAIN_DAYS[1]))
    }

    pub fn extract(&self, world: &FireWorld, query: &FireQuery<'_>) -> FireLayerSnapshot {
        let ids = query_fires(world, query);
        let mut fires = Vec::with_capacity(ids.len());
        for fire in ids {
            let (Some(record), Some(key)) = (world.record(fire), world.key(fire)) else {
                continue;
            };
            let Some(details) = FireDetails::from_record(record) else {
                continue;
            };
            fires.push(VisibleFire {
                fire,
                key: key.clone(),
                position: self.projection.project(record.longitude, record.latitude),
                radius: self.radius(record.size_acres),
                color: self.color(record.duration_days),
                details,
            });
        }

        trace!(at = %query.at, visible = fires.len(), "fire layer extracted");
        FireLayerSnapshot { fires }
    }
}

impl Default for FireLayer {
    fn default() -> Self {
        Self::new(AlbersProjection::default())
    }
}
