//! Player module: the controller that owns playback state and keeps a
//! `MediaElement` in sync with it.
//!
//! User intents (`toggle_play_pause`, `next`, `seek_to`, ...) mutate
//! `PlayerState` and are then reconciled into media commands; media events
//! flow back through `pump_events`.

mod controller;
mod state;
mod time;

pub use controller::*;
pub use state::*;
pub use time::format_time;
