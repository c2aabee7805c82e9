//! Live game updates.
//!
//! - [`Feed`] — per-game broadcast of fresh [`GameView`](tsp_ledger::GameView)s
//! - [`Watcher`] — one subscription, bridged onto a WebSocket session
mod feed;
mod watcher;

pub use feed::*;
pub use watcher::*;
