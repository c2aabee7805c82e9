//! Persistence for split-payment games.
//!
//! ## Stores
//!
//! - [`Store`] — create, load and atomically append to games
//! - [`Memory`] — process-local store, one lock per game
//! - [`Postgres`] — durable store, row locks per game (feature `database`)
//!
//! ## Directory
//!
//! - [`Directory`] — read-only organiser and turf lookup
//! - [`Roster`] — in-memory directory, optionally loaded from JSON
//!
//! With the `database` feature, [`Directory`] is also implemented for
//! `Arc<tokio_postgres::Client>` over the booking system's tables.
mod directory;
mod error;
mod memory;
mod roster;
mod store;

#[cfg(feature = "database")]
mod postgres;

pub use directory::*;
pub use error::*;
pub use memory::*;
pub use roster::*;
pub use store::*;

#[cfg(feature = "database")]
pub use postgres::*;
