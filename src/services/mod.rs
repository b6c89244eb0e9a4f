//! Core services for input discovery and searching.

pub mod grep;
mod sink;
pub mod walk;

pub use grep::{BinaryMode, GrepService, SearchOptions};
pub use walk::{collect_inputs, FileFilter, Input, InputSet, WalkConfig};
