//! Playlist module: the static, ordered list of tracks the player cycles through.
//!
//! A `Playlist` is built once at startup, either from configured entries
//! (`from_settings`) or by scanning a directory (`scan`), and never changes
//! afterwards.

mod configured;
mod model;
mod scan;

pub use configured::from_settings;
pub use model::*;
pub use scan::scan;
