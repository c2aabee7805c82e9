use tsp_ledger::GameId;
use tsp_ledger::Rejection;

/// Failures surfaced by a [`Store`](crate::Store).
#[derive(Debug)]
pub enum StoreError {
    /// The ledger refused the request.
    Rejected(Rejection),
    /// A game already exists under this id.
    Collision(GameId),
    /// The backing database failed or returned rows that do not decode.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(r) => write!(f, "{}", r),
            Self::Collision(id) => write!(f, "game id already taken: {}", id),
            Self::Backend(e) => write!(f, "storage failure: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Rejection> for StoreError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

#[cfg(feature = "database")]
impl From<tsp_pg::PgErr> for StoreError {
    fn from(e: tsp_pg::PgErr) -> Self {
        Self::Backend(e.to_string())
    }
}
