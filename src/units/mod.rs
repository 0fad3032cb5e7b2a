//! Units: named marker folders fanned out across the component directories.

pub mod context;
pub mod generator;
pub mod resolver;

pub use context::{UnitContext, UnitsMapMode};
pub use generator::UnitsGenerator;
pub use resolver::resolve_directories;
