use formats::fire_records::{FireDataError, parse_fire_records};
use formats::topology::{Boundary, TopologyError, parse_boundary};
use scene::FireWorld;
use scene::record::FireRecord;
use thiserror::Error;
use tracing::debug;

use crate::config::ViewerConfig;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to load fire records: {0}")]
    Fires(#[from] FireDataError),
    #[error("failed to load boundary: {0}")]
    Topology(#[from] TopologyError),
    #[error("dataset has no fire with a valid discovery date")]
    NoDays,
}

/// Everything loaded at startup. Immutable afterwards.
#[derive(Debug, Clone)]
pub struct MapData {
    pub world: FireWorld,
    pub boundary: Boundary,
}

impl MapData {
    pub fn new(records: Vec<FireRecord>, boundary: Boundary) -> Result<Self, DataError> {
        let world = FireWorld::new(records);
        if world.days().is_empty() {
            return Err(DataError::NoDays);
        }
        debug!(
            records = world.len(),
            days = world.days().len(),
            rings = boundary.ring_count(),
            "map data ready"
        );
        Ok(Self { world, boundary })
    }

    /// Parses both payloads. Either failure aborts the whole load.
    pub fn from_json(
        fires_json: &str,
        topology_json: &str,
        config: &ViewerConfig,
    ) -> Result<Self, DataError> {
        let records = parse_fire_records(fires_json)?;
        let boundary = parse_boundary(topology_json, &config.boundary_object, &config.boundary_id)?;
        Self::new(records, boundary)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{FIRES, TOPOLOGY, map_data};
    use super::{DataError, MapData};
    use crate::config::ViewerConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_fires_and_boundary() {
        let data = map_data();
        assert_eq!(data.world.len(), 2);
        assert_eq!(data.world.days().len(), 3);
        assert_eq!(data.boundary.id, "06");
        assert_eq!(data.boundary.ring_count(), 1);
    }

    #[test]
    fn either_failure_aborts() {
        let config = ViewerConfig::default();
        assert!(matches!(
            MapData::from_json("{}", TOPOLOGY, &config),
            Err(DataError::Fires(_))
        ));
        assert!(matches!(
            MapData::from_json(FIRES, "[]", &config),
            Err(DataError::Topology(_))
        ));

        let missing = ViewerConfig {
            boundary_id: "99".to_string(),
            ..ViewerConfig::default()
        };
        assert!(matches!(
            MapData::from_json(FIRES, TOPOLOGY, &missing),
            Err(DataError::Topology(_))
        ));
    }

    #[test]
    fn dataset_without_valid_discoveries_is_rejected() {
        let fires = r#"[{"FIRE_NAME": "X", "DISCOVERY_DATETIME": "soon"}]"#;
        assert!(matches!(
            MapData::from_json(fires, TOPOLOGY, &ViewerConfig::default()),
            Err(DataError::NoDays)
        ));
        assert!(matches!(
            MapData::from_json("[]", TOPOLOGY, &ViewerConfig::default()),
            Err(DataError::NoDays)
        ));
    }
}
