//! PostgreSQL integration.
//!
//! ## Connectivity
//!
//! - [`connect()`] — Opens a connection and spawns its driver task
//! - [`migrate()`] — Runs a table's DDL if it is missing
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//!
//! ## Table Names
//!
//! Ledger tables ([`GAMES`], [`PAYMENTS`]) are owned by this service.
//! Directory tables ([`USERS`], [`TURFS`]) belong to the booking system
//! and are only read.
mod schema;

pub use schema::*;

use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Opens a connection to `url`.
///
/// The connection driver runs on its own task; it logs and exits when the
/// server goes away, after which every query on the client fails.
pub async fn connect(url: &str) -> Result<Client, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(client)
}

/// Creates a table and its indices if they do not exist yet.
pub async fn migrate<S: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("migrating table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}

/// Table for split-payment games.
#[rustfmt::skip]
pub const GAMES:    &str = "games";
/// Table for payments appended to games.
#[rustfmt::skip]
pub const PAYMENTS: &str = "game_payments";
/// Table for registered users (read-only).
#[rustfmt::skip]
pub const USERS:    &str = "users";
/// Table for listed turfs (read-only).
#[rustfmt::skip]
pub const TURFS:    &str = "turfs";
