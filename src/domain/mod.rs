//! Domain layer: tree entities and the tree index
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod flat;
pub mod id;
pub mod index;
pub mod item;
pub mod render;
pub mod traverse;

pub use error::{DomainError, TreeResult};
pub use flat::{convert_from_flat, FlatFields, FlatRecord};
pub use id::{IdGenerator, IdStrategy, SequentialIdGenerator, UuidIdGenerator};
pub use index::{DuplicatePolicy, TreeIndex};
pub use item::{ItemPatch, Tree, TreeItem};
pub use render::TreeRender;
pub use traverse::{PostOrderIter, PreOrderIter};
