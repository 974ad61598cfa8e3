//! Application services
//!
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod tree;

pub use tree::{ConfiguredIndex, TreeService};
