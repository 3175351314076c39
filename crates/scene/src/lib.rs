pub mod entity;
pub mod key;
pub mod query;
pub mod record;
pub mod selection;
pub mod temporal;
pub mod world;

pub use world::*;
