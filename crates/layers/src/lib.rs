pub mod boundary;
pub mod fires;
pub mod legend;
pub mod reconcile;
pub mod scale;
pub mod svg;
pub mod symbology;
pub mod tooltip;

pub use fires::*;
pub use reconcile::*;
