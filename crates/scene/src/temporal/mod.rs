pub mod interval_tree;

pub use interval_tree::*;
