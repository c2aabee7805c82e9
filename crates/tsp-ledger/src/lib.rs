//! Split-payment game ledger.
//!
//! Functional core of turfsplit: a [`Game`] is created once per split
//! booking and afterwards only grows by appending [`Payment`]s. Every
//! settlement figure (collected, remaining, slots filled, [`Status`]) is
//! derived from the payment list on read.
//!
//! ## Creation
//!
//! - [`Booking`] — organiser, turf and [`Slot`] being settled
//! - [`Terms`] — total, declared players and organiser advance
//! - [`GameId`] — shareable capability token minted per game
//!
//! ## Admission
//!
//! - [`Payer`] — validated, self-reported payment confirmation
//! - [`Policy`] — duplicate-name handling
//! - [`Rejection`] — why a request was refused
//!
//! ## Reads
//!
//! - [`GameView`] — full state shown on the join page
//! - [`GameSummary`] — one line of an organiser's game list
mod booking;
mod game;
mod payer;
mod payment;
mod policy;
mod rejection;
mod status;
mod terms;
mod token;
mod view;

pub use booking::*;
pub use game::*;
pub use payer::*;
pub use payment::*;
pub use policy::*;
pub use rejection::*;
pub use status::*;
pub use terms::*;
pub use token::*;
pub use view::*;
