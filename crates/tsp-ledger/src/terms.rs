use super::*;
use tsp_core::*;

/// Money terms of a game, fixed at creation.
///
/// The share is derived from these values alone, so it can never drift
/// as payments arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terms {
    total: Amount,
    players: u32,
    advance: Amount,
}

impl Terms {
    pub fn new(total: Amount, players: u32, advance: Amount) -> Result<Self, Rejection> {
        Self::check(total)?;
        if players < 1 || players > MAX_PLAYERS {
            return Err(Rejection::Invalid(format!(
                "num_players must be between 1 and {}",
                MAX_PLAYERS
            )));
        }
        if total < Amount::paise(i64::from(players)) {
            return Err(Rejection::Invalid(
                "amount must cover at least one paisa per player".into(),
            ));
        }
        if advance.is_negative() || advance > total {
            return Err(Rejection::Invalid(
                "advance must be between zero and the total amount".into(),
            ));
        }
        Ok(Self {
            total,
            players,
            advance,
        })
    }
    /// Terms for a booking of `kind`, with the advance it implies.
    /// The total is checked before the advance is derived from it.
    pub fn booked(total: Amount, players: u32, kind: Kind) -> Result<Self, Rejection> {
        Self::check(total)?;
        Self::new(total, players, kind.advance(total))
    }
    fn check(total: Amount) -> Result<(), Rejection> {
        if !total.is_positive() {
            return Err(Rejection::Invalid("amount must be positive".into()));
        }
        if total > MAX_TOTAL {
            return Err(Rejection::Invalid(format!(
                "amount must not exceed {}",
                MAX_TOTAL
            )));
        }
        Ok(())
    }
    pub fn total(&self) -> Amount {
        self.total
    }
    pub fn players(&self) -> u32 {
        self.players
    }
    pub fn advance(&self) -> Amount {
        self.advance
    }
    /// Expected contribution per player.
    pub fn share(&self) -> Amount {
        self.total.share(self.players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn share_is_total_over_players() {
        let terms = Terms::new(Amount::rupees(1200), 4, Amount::ZERO).unwrap();
        assert_eq!(terms.share(), Amount::rupees(300));
    }
    #[test]
    fn rejects_empty_games() {
        assert!(Terms::new(Amount::ZERO, 4, Amount::ZERO).is_err());
        assert!(Terms::new(Amount::rupees(-5), 4, Amount::ZERO).is_err());
        assert!(Terms::new(Amount::rupees(100), 0, Amount::ZERO).is_err());
        assert!(Terms::new(Amount::rupees(100), MAX_PLAYERS + 1, Amount::ZERO).is_err());
    }
    #[test]
    fn rejects_advance_beyond_total() {
        assert!(Terms::new(Amount::rupees(100), 2, Amount::rupees(101)).is_err());
        assert!(Terms::new(Amount::rupees(100), 2, Amount::rupees(-1)).is_err());
        assert!(Terms::new(Amount::rupees(100), 2, Amount::rupees(100)).is_ok());
    }
    #[test]
    fn rejects_sub_paisa_shares() {
        assert!(Terms::new(Amount::paise(3), 4, Amount::ZERO).is_err());
        assert!(Terms::new(Amount::paise(4), 4, Amount::ZERO).is_ok());
    }
    #[test]
    fn rejects_totals_beyond_limit() {
        let over = Amount::from_f64(3.0e16).unwrap();
        assert!(matches!(
            Terms::booked(over, 4, Kind::Split),
            Err(Rejection::Invalid(_))
        ));
        assert!(Terms::booked(MAX_TOTAL, 4, Kind::Split).is_ok());
        assert!(Terms::new(MAX_TOTAL + Amount::paise(1), 4, Amount::ZERO).is_err());
    }
    #[test]
    fn booked_terms_carry_kind_advance() {
        let terms = Terms::booked(Amount::rupees(1200), 4, Kind::Split).unwrap();
        assert_eq!(terms.advance(), Amount::rupees(240));
    }
}
