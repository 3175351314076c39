use foundation::time::Timestamp;

use crate::FireWorld;
use crate::entity::FireId;
use crate::selection::SelectionSet;

/// Trims and lowercases raw search-box text.
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Unified filter over the fire dataset.
///
/// A fire passes when all of these hold:
/// - it is active at `at` (discovered on or before, not yet contained),
/// - its cause is in `causes`,
/// - latitude, longitude, size and duration are finite,
/// - `search` is empty or a substring of its name.
///
/// Ordering contract:
/// - `query_fires` returns fires in ascending `FireId` order (record order).
#[derive(Debug, Clone, Copy)]
pub struct FireQuery<'a> {
    pub at: Timestamp,
    pub causes: &'a SelectionSet,
    /// Already normalized with [`normalize_search`].
    pub search: &'a str,
}

impl FireQuery<'_> {
    pub fn matches(&self, world: &FireWorld, fire: FireId) -> bool {
        let Some(record) = world.record(fire) else {
            return false;
        };
        record.is_active_at(self.at)
            && world
                .cause_of(fire)
                .is_some_and(|cause| self.causes.contains(cause))
            && record.has_finite_measurements()
            && record.name_contains(self.search)
    }
}

pub fn query_fires(world: &FireWorld, query: &FireQuery<'_>) -> Vec<FireId> {
    world
        .active_at(query.at)
        .into_iter()
        .filter(|fire| query.matches(world, *fire))
        .collect()
}
