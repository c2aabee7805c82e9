use clap::Parser;
use std::path::PathBuf;
use tsp_ledger::Duplicates;

/// Server configuration, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Split-payment game server", long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: String,
    /// PostgreSQL connection string. Games are kept in memory without it.
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,
    /// Origin that join links point at.
    #[arg(long, env = "PUBLIC_ORIGIN", default_value = "http://localhost:5000")]
    pub public_origin: String,
    /// Whether a payer name may pay into the same game twice (`allow` | `reject`).
    #[arg(long, env = "DUPLICATES", default_value_t = Duplicates::Allow)]
    pub duplicates: Duplicates,
    /// JSON file of organisers and turfs, used when there is no database.
    #[arg(long, env = "DIRECTORY")]
    pub directory: Option<PathBuf>,
    /// HTTP worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 6)]
    pub workers: usize,
}

impl Config {
    /// `{origin}/join/{game_id}`.
    pub fn join_link(&self, game_id: &tsp_ledger::GameId) -> String {
        format!("{}/join/{}", self.public_origin.trim_end_matches('/'), game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["backend"]).unwrap();
        assert_eq!(config.workers, 6);
        assert_eq!(config.duplicates, Duplicates::Allow);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "backend",
            "--duplicates",
            "reject",
            "--public-origin",
            "https://turf.example/",
            "--db-url",
            "postgres://localhost/turf",
        ])
        .unwrap();
        assert_eq!(config.duplicates, Duplicates::Reject);
        assert_eq!(config.db_url.as_deref(), Some("postgres://localhost/turf"));
        let id = tsp_ledger::GameId::try_from("rahul-09AM").unwrap();
        assert_eq!(config.join_link(&id), "https://turf.example/join/rahul-09AM");
    }

    #[test]
    fn rejects_unknown_policies() {
        assert!(Config::try_parse_from(["backend", "--duplicates", "sometimes"]).is_err());
    }
}
