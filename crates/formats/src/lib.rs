pub mod fire_records;
pub mod topology;

pub use fire_records::*;
pub use topology::*;
