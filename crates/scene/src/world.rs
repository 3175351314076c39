use std::collections::BTreeSet;

use foundation::time::{DayRange, Timestamp};
use tracing::debug;

use crate::entity::{CauseId, FireId};
use crate::key::{FireKey, assign_keys};
use crate::record::FireRecord;
use crate::temporal::{IntervalItem, IntervalTree};

/// The loaded fire dataset plus everything derived from it once at load.
#[derive(Debug, Clone, Default)]
pub struct FireWorld {
    records: Vec<FireRecord>,
    keys: Vec<FireKey>,
    cause_ids: Vec<Option<CauseId>>,
    causes: Vec<String>,
    days: DayRange,
    active: IntervalTree,
}

impl FireWorld {
    pub fn new(records: Vec<FireRecord>) -> Self {
        let causes: Vec<String> = records
            .iter()
            .filter_map(|r| r.cause.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cause_ids = records
            .iter()
            .map(|r| {
                let cause = r.cause.as_deref()?;
                causes
                    .binary_search_by(|c| c.as_str().cmp(cause))
                    .ok()
                    .map(|i| CauseId(i as u32))
            })
            .collect();

        let extent = records
            .iter()
            .filter_map(|r| r.discovered)
            .fold(None, |acc: Option<(Timestamp, Timestamp)>, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            });
        let days = match extent {
            Some((lo, hi)) => DayRange::covering(lo, hi),
            None => DayRange::default(),
        };

        let active = IntervalTree::build(
            records
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    r.active_span().map(|span| IntervalItem {
                        fire: FireId(i as u32),
                        span,
                    })
                })
                .collect(),
        );

        let keys = assign_keys(&records);

        debug!(
            records = records.len(),
            causes = causes.len(),
            days = days.len(),
            "fire world built"
        );

        Self {
            records,
            keys,
            cause_ids,
            causes,
            days,
            active,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, fire: FireId) -> Option<&FireRecord> {
        self.records.get(fire.index() as usize)
    }

    pub fn key(&self, fire: FireId) -> Option<&FireKey> {
        self.keys.get(fire.index() as usize)
    }

    pub fn cause_of(&self, fire: FireId) -> Option<CauseId> {
        self.cause_ids.get(fire.index() as usize).copied().flatten()
    }

    /// Distinct causes, sorted.
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn cause_id(&self, name: &str) -> Option<CauseId> {
        self.causes
            .binary_search_by(|c| c.as_str().cmp(name))
            .ok()
            .map(|i| CauseId(i as u32))
    }

    pub fn days(&self) -> &DayRange {
        &self.days
    }

    /// Fires whose activity span contains `t`, in record order.
    pub fn active_at(&self, t: Timestamp) -> Vec<FireId> {
        self.active.query_at_time(t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FireId, &FireRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (FireId(i as u32), r))
    }
}
