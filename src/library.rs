//! Discovery of candidate audio files.

mod scan;

pub use scan::{has_allowed_extension, scan};
