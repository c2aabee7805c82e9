use chrono::DateTime;
use chrono::Utc;
use tsp_core::*;

/// One confirmed contribution. Never amended once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    id: ID<Self>,
    seq: u32,
    player: String,
    user: Option<UserId>,
    amount: Amount,
    upi_ref: String,
    paid_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        id: ID<Self>,
        seq: u32,
        player: String,
        user: Option<UserId>,
        amount: Amount,
        upi_ref: String,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            seq,
            player,
            user,
            amount,
            upi_ref,
            paid_at,
        }
    }
    /// Position in the ledger, starting at zero.
    pub fn seq(&self) -> u32 {
        self.seq
    }
    pub fn player(&self) -> &str {
        &self.player
    }
    pub fn user(&self) -> Option<UserId> {
        self.user
    }
    pub fn amount(&self) -> Amount {
        self.amount
    }
    pub fn upi_ref(&self) -> &str {
        &self.upi_ref
    }
    pub fn paid_at(&self) -> DateTime<Utc> {
        self.paid_at
    }
    /// Whether this is the advance recorded at creation.
    pub fn is_organiser(&self) -> bool {
        self.upi_ref == ORGANISER_REF
    }
}

impl Unique for Payment {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use tsp_pg::*;

    /// Append-only: rows are inserted once and never updated.
    /// `(game_id, seq)` is unique so a lost race cannot reuse a position.
    impl Schema for Payment {
        fn name() -> &'static str {
            PAYMENTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                PAYMENTS,
                " (
                    id          UUID PRIMARY KEY,
                    game_id     UUID NOT NULL REFERENCES ",
                GAMES,
                "(id) ON DELETE CASCADE,
                    seq         INTEGER NOT NULL,
                    player_name VARCHAR(255) NOT NULL,
                    player_id   BIGINT,
                    amount      BIGINT NOT NULL CHECK (amount >= 0),
                    upi_ref     VARCHAR(100) NOT NULL,
                    paid_at     TIMESTAMPTZ NOT NULL,
                    UNIQUE (game_id, seq)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_payments_game ON ",
                PAYMENTS,
                " (game_id, seq);"
            )
        }
    }
}
