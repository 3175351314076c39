/// Position of a record in the loaded dataset.
///
/// Ids are dense and follow source order, so sorting by id restores the
/// record order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FireId(pub u32);

impl FireId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Position of a cause in the sorted list of distinct causes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CauseId(pub u32);

impl CauseId {
    pub fn index(&self) -> u32 {
        self.0
    }
}
