use super::*;
use chrono::DateTime;
use chrono::Utc;
use tsp_core::*;

/// A split-payment ledger for one booking.
///
/// Everything but the payment list is fixed at creation. Payments are
/// admitted by [`Game::admit`], which only inspects state, and recorded
/// by [`Game::append`]; stores run the two under one lock so that
/// concurrent confirmations cannot overshoot the declared players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: ID<Self>,
    token: GameId,
    booking: Booking,
    terms: Terms,
    created: DateTime<Utc>,
    payments: Vec<Payment>,
}

impl Game {
    /// Opens a game, recording the organiser's advance (if any) first.
    pub fn create(token: GameId, booking: Booking, terms: Terms, now: DateTime<Utc>) -> Self {
        let mut game = Self::from_parts(ID::default(), token, booking, terms, now, Vec::new());
        if terms.advance().is_positive() {
            let organiser = game.booking.organiser();
            let advance = Payment::new(
                ID::default(),
                0,
                organiser.name().to_string(),
                Some(organiser.id()),
                terms.advance(),
                ORGANISER_REF.to_string(),
                now,
            );
            game.append(advance);
        }
        game
    }
    /// Reassembles a game from storage. Payments must be in ledger order.
    pub fn from_parts(
        id: ID<Self>,
        token: GameId,
        booking: Booking,
        terms: Terms,
        created: DateTime<Utc>,
        payments: Vec<Payment>,
    ) -> Self {
        Self {
            id,
            token,
            booking,
            terms,
            created,
            payments,
        }
    }
}

impl Game {
    pub fn token(&self) -> &GameId {
        &self.token
    }
    pub fn booking(&self) -> &Booking {
        &self.booking
    }
    pub fn terms(&self) -> &Terms {
        &self.terms
    }
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }
    pub fn share(&self) -> Amount {
        self.terms.share()
    }
    pub fn collected(&self) -> Amount {
        self.payments.iter().map(Payment::amount).sum()
    }
    pub fn remaining(&self) -> Amount {
        self.terms.total().saturating_sub(self.collected())
    }
    pub fn filled(&self) -> usize {
        self.payments.len()
    }
    pub fn is_settled(&self) -> bool {
        self.filled() >= self.terms.players() as usize || self.collected() >= self.terms.total()
    }
    pub fn status(&self) -> Status {
        if self.payments.is_empty() {
            Status::Pending
        } else if self.is_settled() {
            Status::Settled
        } else {
            Status::Partial
        }
    }
}

impl Game {
    /// Decides whether `payer` may pay into this game and, if so, the
    /// record that would be appended. Does not mutate.
    pub fn admit(
        &self,
        payer: &Payer,
        policy: &Policy,
        now: DateTime<Utc>,
    ) -> Result<Payment, Rejection> {
        if self.is_settled() {
            return Err(Rejection::Capacity {
                filled: self.filled(),
                players: self.terms.players(),
            });
        }
        if policy.duplicates() == Duplicates::Reject && self.has_paid(payer.name()) {
            return Err(Rejection::Duplicate(payer.name().to_string()));
        }
        Ok(Payment::new(
            ID::default(),
            self.filled() as u32,
            payer.name().to_string(),
            payer.user(),
            self.share().min(self.remaining()),
            payer.upi_ref().to_string(),
            now,
        ))
    }
    /// Appends an admitted payment.
    pub fn append(&mut self, payment: Payment) {
        debug_assert_eq!(payment.seq() as usize, self.payments.len());
        self.payments.push(payment);
    }
    fn has_paid(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.payments.iter().any(|p| p.player().to_lowercase() == name)
    }
}

impl Unique for Game {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use tsp_pg::*;

    /// Booking details are snapshotted into the row; the game never
    /// follows later edits to the organiser or turf.
    impl Schema for Game {
        fn name() -> &'static str {
            GAMES
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                GAMES,
                " (
                    id               UUID PRIMARY KEY,
                    token            VARCHAR(128) UNIQUE NOT NULL,
                    organiser_id     BIGINT NOT NULL,
                    organiser_name   VARCHAR(255) NOT NULL,
                    organiser_handle VARCHAR(255) NOT NULL,
                    turf_id          BIGINT NOT NULL,
                    turf_name        VARCHAR(255) NOT NULL,
                    turf_location    TEXT NOT NULL,
                    owner_upi        VARCHAR(100),
                    booking_date     DATE NOT NULL,
                    start_time       TIME NOT NULL,
                    kind             VARCHAR(8) NOT NULL,
                    total            BIGINT NOT NULL CHECK (total > 0),
                    players          INTEGER NOT NULL CHECK (players >= 1),
                    advance          BIGINT NOT NULL CHECK (advance >= 0),
                    created_at       TIMESTAMPTZ NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_games_organiser ON ",
                GAMES,
                " (organiser_id, created_at DESC);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(kind: Kind) -> Booking {
        Booking::new(
            Organiser::new(7, "Rahul".into(), "rahul".into()),
            Turf::new(3, "Green Arena".into(), "Pune".into(), Some("arena@upi".into())),
            Slot::try_from(("2026-10-18", "09:00")).unwrap(),
            kind,
        )
    }
    fn game(total: i64, players: u32, advance: i64) -> Game {
        let terms = Terms::new(Amount::rupees(total), players, Amount::rupees(advance)).unwrap();
        let booking = booking(Kind::Split);
        let token = GameId::mint(booking.organiser(), booking.slot());
        Game::create(token, booking, terms, Utc::now())
    }
    fn pay(game: &mut Game, name: &str) -> Result<Payment, Rejection> {
        let payer = Payer::new(name, "UPI123", None)?;
        let payment = game.admit(&payer, &Policy::default(), Utc::now())?;
        game.append(payment.clone());
        Ok(payment)
    }

    #[test]
    fn fresh_game_without_advance_is_pending() {
        let game = game(1200, 4, 0);
        assert_eq!(game.status(), Status::Pending);
        assert_eq!(game.filled(), 0);
        assert_eq!(game.collected(), Amount::ZERO);
        assert_eq!(game.remaining(), Amount::rupees(1200));
    }

    #[test]
    fn advance_is_first_payment() {
        let game = game(1200, 4, 240);
        let first = &game.payments()[0];
        assert!(first.is_organiser());
        assert_eq!(first.seq(), 0);
        assert_eq!(first.player(), "Rahul");
        assert_eq!(first.user(), Some(7));
        assert_eq!(first.amount(), Amount::rupees(240));
        assert_eq!(game.status(), Status::Partial);
    }

    #[test]
    fn four_shares_settle_twelve_hundred() {
        let mut game = game(1200, 4, 0);
        assert_eq!(game.share(), Amount::rupees(300));
        for name in ["A", "B", "C"] {
            assert_eq!(pay(&mut game, name).unwrap().amount(), Amount::rupees(300));
        }
        assert_eq!(game.filled(), 3);
        assert_eq!(game.collected(), Amount::rupees(900));
        assert_eq!(game.status(), Status::Partial);
        pay(&mut game, "D").unwrap();
        assert_eq!(game.filled(), 4);
        assert_eq!(game.collected(), Amount::rupees(1200));
        assert_eq!(game.status(), Status::Settled);
    }

    #[test]
    fn settled_game_refuses_payments() {
        let mut game = game(600, 2, 0);
        pay(&mut game, "A").unwrap();
        pay(&mut game, "B").unwrap();
        assert_eq!(
            pay(&mut game, "C"),
            Err(Rejection::Capacity {
                filled: 2,
                players: 2
            })
        );
        assert_eq!(game.filled(), 2);
    }

    #[test]
    fn fully_paid_game_is_settled_before_slots_fill() {
        let game = game(1000, 4, 1000);
        assert_eq!(game.filled(), 1);
        assert_eq!(game.status(), Status::Settled);
    }

    #[test]
    fn last_share_is_capped_at_balance() {
        let mut game = game(1000, 3, 500);
        assert_eq!(pay(&mut game, "A").unwrap().amount(), Amount::paise(33333));
        assert_eq!(pay(&mut game, "B").unwrap().amount(), Amount::paise(16667));
        assert_eq!(game.collected(), Amount::rupees(1000));
        assert_eq!(game.status(), Status::Settled);
    }

    #[test]
    fn share_never_recomputed() {
        let mut game = game(1000, 4, 0);
        let share = game.share();
        pay(&mut game, "A").unwrap();
        pay(&mut game, "B").unwrap();
        assert_eq!(game.share(), share);
    }

    #[test]
    fn collected_is_sum_of_payments() {
        let mut game = game(1000, 5, 200);
        pay(&mut game, "A").unwrap();
        pay(&mut game, "B").unwrap();
        let sum: Amount = game.payments().iter().map(Payment::amount).sum();
        assert_eq!(game.collected(), sum);
    }

    #[test]
    fn identical_confirmations_are_not_idempotent() {
        let mut game = game(1200, 4, 0);
        let a = pay(&mut game, "Asha").unwrap();
        let b = pay(&mut game, "Asha").unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(game.filled(), 2);
    }

    #[test]
    fn duplicate_names_rejected_when_configured() {
        let mut game = game(1200, 4, 0);
        let policy = Policy::new(Duplicates::Reject);
        let first = Payer::new("Asha", "1", None).unwrap();
        let again = Payer::new("ASHA", "2", None).unwrap();
        let payment = game.admit(&first, &policy, Utc::now()).unwrap();
        game.append(payment);
        assert_eq!(
            game.admit(&again, &policy, Utc::now()),
            Err(Rejection::Duplicate("ASHA".into()))
        );
    }

    #[test]
    fn sequence_follows_insertion_order() {
        let mut game = game(1200, 4, 240);
        pay(&mut game, "A").unwrap();
        pay(&mut game, "B").unwrap();
        let seqs: Vec<u32> = game.payments().iter().map(Payment::seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }
}
