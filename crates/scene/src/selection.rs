use crate::entity::CauseId;

/// The set of active causes, one flag per [`CauseId`].
///
/// Ids past the end of the flag table are treated as inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    active: Vec<bool>,
    len: usize,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cause in `0..count` active.
    pub fn full(count: u32) -> Self {
        Self {
            active: vec![true; count as usize],
            len: count as usize,
        }
    }

    pub fn clear(&mut self) {
        self.active.fill(false);
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, cause: CauseId) -> bool {
        self.active
            .get(cause.index() as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, cause: CauseId) -> bool {
        let i = cause.index() as usize;
        if self.active.len() <= i {
            self.active.resize(i + 1, false);
        }
        if self.active[i] {
            return false;
        }
        self.active[i] = true;
        self.len += 1;
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, cause: CauseId) -> bool {
        match self.active.get_mut(cause.index() as usize) {
            Some(flag) if *flag => {
                *flag = false;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    /// Inserts when `on`, removes otherwise. Returns `true` if the set changed.
    pub fn set(&mut self, cause: CauseId, on: bool) -> bool {
        if on {
            self.insert(cause)
        } else {
            self.remove(cause)
        }
    }

    /// Active causes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = CauseId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| CauseId(i as u32))
    }
}
