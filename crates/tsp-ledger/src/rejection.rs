/// Reasons the ledger refuses a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No game is known under this id.
    NotFound(String),
    /// A field is missing, blank, oversized or out of range.
    Invalid(String),
    /// The game is settled; no further shares are accepted.
    Capacity { filled: usize, players: u32 },
    /// The payer name already appears in the ledger.
    Duplicate(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(_) => write!(f, "Game not found"),
            Self::Invalid(s) => write!(f, "{}", s),
            Self::Capacity { filled, players } => write!(
                f,
                "game is already settled ({} of {} players paid)",
                filled, players
            ),
            Self::Duplicate(s) => write!(f, "{} has already paid their share", s),
        }
    }
}

impl std::error::Error for Rejection {}
