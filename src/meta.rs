//! Per-file metadata: the typed field store, the tag reader that fills it and
//! the normalizer that derives the path-building fields.

mod normalize;
mod store;
mod tags;

pub use normalize::{normalize, sanitize};
pub use store::*;
pub use tags::{LoftyReader, TagReader};
