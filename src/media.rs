//! Media element: the capability that actually decodes and outputs audio.
//!
//! The player controller only sees the `MediaElement` trait. `RodioMedia` is
//! the real implementation, backed by a dedicated audio thread.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioMedia;
pub use types::*;

#[cfg(test)]
pub mod fake;

#[cfg(test)]
mod tests;
