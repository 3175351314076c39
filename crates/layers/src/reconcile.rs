//! Keyed reconciliation of the rendered fire set.

use std::collections::{HashMap, HashSet};

use scene::key::FireKey;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::fires::VisibleFire;

/// What happens to a fire that stays visible across updates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Keep the attributes bound when the fire first appeared.
    #[default]
    FrozenOnEntry,
    /// Re-bind attributes that changed.
    RefreshOnMatch,
}

/// Minimal set of element operations for one update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderDiff {
    /// Entering fires, in record order.
    pub added: Vec<VisibleFire>,
    /// Exiting keys, in record order.
    pub removed: Vec<FireKey>,
    /// Matched fires whose attributes were re-bound. Always empty under
    /// [`RefreshPolicy::FrozenOnEntry`].
    pub updated: Vec<VisibleFire>,
    /// Matched fires left as they were.
    pub untouched: usize,
}

impl RenderDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// The set of fires currently on screen, keyed by [`FireKey`].
#[derive(Debug, Default, Clone)]
pub struct Reconciler {
    policy: RefreshPolicy,
    rendered: HashMap<FireKey, VisibleFire>,
}

impl Reconciler {
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            policy,
            rendered: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn get(&self, key: &FireKey) -> Option<&VisibleFire> {
        self.rendered.get(key)
    }

    /// Rendered fires in record order, with the attributes they were bound
    /// with.
    pub fn rendered(&self) -> Vec<&VisibleFire> {
        let mut out: Vec<&VisibleFire> = self.rendered.values().collect();
        out.sort_by_key(|f| f.fire);
        out
    }

    /// Matches `next` against the rendered set and applies the result.
    ///
    /// Keys in `next` must be unique.
    pub fn reconcile(&mut self, next: Vec<VisibleFire>) -> RenderDiff {
        let next_keys: HashSet<&FireKey> = next.iter().map(|f| &f.key).collect();

        let mut exiting: Vec<&VisibleFire> = self
            .rendered
            .values()
            .filter(|f| !next_keys.contains(&f.key))
            .collect();
        exiting.sort_by_key(|f| f.fire);
        let removed: Vec<FireKey> = exiting.into_iter().map(|f| f.key.clone()).collect();
        for key in &removed {
            self.rendered.remove(key);
        }

        let mut diff = RenderDiff {
            removed,
            ..RenderDiff::default()
        };
        for fire in next {
            match self.rendered.get_mut(&fire.key) {
                None => {
                    self.rendered.insert(fire.key.clone(), fire.clone());
                    diff.added.push(fire);
                }
                Some(current) => match self.policy {
                    RefreshPolicy::RefreshOnMatch if *current != fire => {
                        *current = fire.clone();
                        diff.updated.push(fire);
                    }
                    _ => diff.untouched += 1,
                },
            }
        }

        trace!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            updated = diff.updated.len(),
            untouched = diff.untouched,
            "reconciled"
        );
        diff
    }

    /// Drops every rendered fire, returning their keys in record order.
    pub fn clear(&mut self) -> Vec<FireKey> {
        let mut all: Vec<VisibleFire> = self.rendered.drain().map(|(_, f)| f).collect();
        all.sort_by_key(|f| f.fire);
        all.into_iter().map(|f| f.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Reconciler, RefreshPolicy};
    use crate::fires::VisibleFire;
    use crate::tooltip::FireDetails;
    use chrono::NaiveDate;
    use foundation::color::Rgb;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use scene::entity::FireId;
    use scene::key::FireKey;

    fn visible(id: u32, radius: f64) -> VisibleFire {
        VisibleFire {
            fire: FireId(id),
            key: FireKey(format!("fire-{id}")),
            position: Vec2::new(id as f64, 0.0),
            radius,
            color: Rgb::new(255, 0, 0),
            details: FireDetails {
                name: None,
                size_acres: 1.0,
                duration_days: 1.0,
                discovered: NaiveDate::from_ymd_opt(2020, 8, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                contained: None,
            },
        }
    }

    fn keys(fires: &[VisibleFire]) -> Vec<String> {
        fires.iter().map(|f| f.key.to_string()).collect()
    }

    #[test]
    fn set_difference_semantics() {
        let mut r = Reconciler::default();
        let first = r.reconcile(vec![visible(0, 1.0), visible(1, 1.0), visible(2, 1.0)]);
        assert_eq!(keys(&first.added), vec!["fire-0", "fire-1", "fire-2"]);
        assert!(first.removed.is_empty());

        let second = r.reconcile(vec![visible(1, 1.0), visible(3, 1.0), visible(2, 1.0)]);
        assert_eq!(keys(&second.added), vec!["fire-3"]);
        assert_eq!(second.removed, vec![FireKey("fire-0".to_string())]);
        assert_eq!(second.untouched, 2);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn same_input_twice_is_an_empty_diff() {
        let mut r = Reconciler::default();
        r.reconcile(vec![visible(4, 2.0), visible(7, 3.0)]);
        let again = r.reconcile(vec![visible(4, 2.0), visible(7, 3.0)]);
        assert!(again.is_empty());
        assert_eq!(again.untouched, 2);
    }

    #[test]
    fn frozen_on_entry_keeps_original_attributes() {
        let mut r = Reconciler::new(RefreshPolicy::FrozenOnEntry);
        r.reconcile(vec![visible(0, 5.0)]);
        let diff = r.reconcile(vec![visible(0, 9.0)]);
        assert!(diff.is_empty());
        assert_eq!(r.get(&FireKey("fire-0".to_string())).unwrap().radius, 5.0);
    }

    #[test]
    fn refresh_on_match_rebinds_changed_attributes() {
        let mut r = Reconciler::new(RefreshPolicy::RefreshOnMatch);
        r.reconcile(vec![visible(0, 5.0), visible(1, 5.0)]);
        let diff = r.reconcile(vec![visible(0, 9.0), visible(1, 5.0)]);
        assert_eq!(keys(&diff.updated), vec!["fire-0"]);
        assert_eq!(diff.untouched, 1);
        assert_eq!(r.get(&FireKey("fire-0".to_string())).unwrap().radius, 9.0);
    }

    #[test]
    fn removed_and_rendered_are_in_record_order() {
        let mut r = Reconciler::default();
        r.reconcile((0..10).rev().map(|i| visible(i, 1.0)).collect());
        let order: Vec<u32> = r.rendered().iter().map(|f| f.fire.0).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());

        let diff = r.reconcile(vec![visible(5, 1.0)]);
        let removed: Vec<&str> = diff.removed.iter().map(FireKey::as_str).collect();
        assert_eq!(
            removed,
            vec![
                "fire-0", "fire-1", "fire-2", "fire-3", "fire-4", "fire-6", "fire-7", "fire-8",
                "fire-9"
            ]
        );
        assert_eq!(r.clear(), vec![FireKey("fire-5".to_string())]);
        assert!(r.is_empty());
    }
}
