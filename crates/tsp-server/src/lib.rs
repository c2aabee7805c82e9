//! Split-Game Server
//!
//! HTTP/JSON and WebSocket front of the split-payment ledger.
//!
//! ## Routes
//!
//! - `POST /book` — open a game for a booking
//! - `GET  /game/{game_id}` — full game state
//! - `POST /game/{game_id}/pay` — confirm one share
//! - `GET  /game/{game_id}/watch` — WebSocket of game states
//! - `GET  /users/{user_id}/games` — an organiser's games
//! - `GET  /health` — store reachability
//!
//! ## Submodules
//!
//! - [`config`] — flags and environment
//! - [`ledger`] — the service behind the handlers
//! - [`dto`] — request and response bodies
//! - [`handlers`] — actix-web handlers

pub mod config;
pub mod dto;
pub mod handlers;
pub mod ledger;

pub use config::Config;
pub use dto::*;
pub use ledger::Ledger;
pub use ledger::Order;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tsp_ledger::Policy;
use tsp_store::Roster;

/// Registers every route. Expects [`Ledger`] and [`Config`] app data.
#[rustfmt::skip]
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::malformed))
        .route("/health", web::get().to(handlers::health))
        .route("/book", web::post().to(handlers::book))
        .service(
            web::scope("/game/{game_id}")
                .route("", web::get().to(handlers::game))
                .route("/pay", web::post().to(handlers::pay))
                .route("/watch", web::get().to(handlers::watch)),
        )
        .route("/users/{user_id}/games", web::get().to(handlers::games));
}

/// Builds the ledger the configuration asks for: PostgreSQL when a
/// database URL is given, memory and a roster otherwise.
pub async fn ledger(config: &Config) -> anyhow::Result<Ledger> {
    let policy = Policy::new(config.duplicates);
    match config.db_url.as_deref() {
        #[cfg(feature = "database")]
        Some(url) => {
            let store = tsp_store::Postgres::connect(url).await?;
            store.migrate().await?;
            let directory = Arc::new(store.client());
            log::info!("games are stored in postgres");
            Ok(Ledger::new(Arc::new(store), directory, policy))
        }
        #[cfg(not(feature = "database"))]
        Some(_) => Err(anyhow::anyhow!("DB_URL is set but the database feature is off")),
        None => {
            let roster = match config.directory.as_ref() {
                Some(path) => Roster::load(path)?,
                None => Roster::default(),
            };
            log::warn!("DB_URL not set, games are kept in memory");
            Ok(Ledger::memory(Arc::new(roster), policy))
        }
    }
}

#[rustfmt::skip]
pub async fn run(config: Config) -> anyhow::Result<()> {
    let ledger = web::Data::new(ledger(&config).await?);
    let bind = config.bind.clone();
    let workers = config.workers;
    let config = web::Data::new(config);
    log::info!("starting split-game server on {} (duplicates: {})", bind, config.duplicates);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(ledger.clone())
            .app_data(config.clone())
            .configure(routes)
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
