use foundation::time::{TimeSpan, Timestamp};

/// Containment state of a fire as reported by the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Containment {
    /// No containment reported.
    Uncontained,
    At(Timestamp),
    /// A containment value was present but could not be parsed. Such a fire
    /// is never considered active.
    Unparseable,
}

/// One wildfire as loaded from the dataset. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct FireRecord {
    /// `None` for missing or empty names.
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub size_acres: f64,
    /// `None` when the discovery value is missing or unparseable.
    pub discovered: Option<Timestamp>,
    pub containment: Containment,
    /// 0 means unknown, not zero-length.
    pub duration_days: f64,
    pub cause: Option<String>,
    /// Stable identifier from the source, when it carries one.
    pub source_id: Option<String>,
}

impl FireRecord {
    /// The span during which the fire counts as active, if it has one.
    pub fn active_span(&self) -> Option<TimeSpan> {
        let start = self.discovered?;
        match self.containment {
            Containment::Uncontained => Some(TimeSpan::open(start)),
            Containment::At(end) => Some(TimeSpan::closed(start, end)),
            Containment::Unparseable => None,
        }
    }

    pub fn is_active_at(&self, t: Timestamp) -> bool {
        self.active_span().is_some_and(|span| span.contains(t))
    }

    /// Coordinates, size and duration are all usable numbers.
    pub fn has_finite_measurements(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.size_acres.is_finite()
            && self.duration_days.is_finite()
    }

    /// `needle` must already be lowercased. An empty needle matches every
    /// record; unnamed records never match anything else.
    pub fn name_contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
    }

    pub fn contained_at(&self) -> Option<Timestamp> {
        match self.containment {
            Containment::At(t) => Some(t),
            _ => None,
        }
    }
}
