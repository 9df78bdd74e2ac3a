//! Application module: the view model shared by the TUI and the runtime.
//!
//! `App` lives in `app::model`; it owns the player controller plus the
//! playlist cursor and turns keys, clicks and remote commands into `Action`s.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
