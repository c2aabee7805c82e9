use super::*;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;
use tsp_core::*;

/// Full game state as shown on the join page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub game_id: GameId,
    pub organiser: String,
    pub turf_id: TurfId,
    pub turf_name: String,
    pub turf_location: String,
    pub date: NaiveDate,
    pub time: String,
    pub kind: Kind,
    pub num_players: u32,
    pub total_amount: Amount,
    pub advance_amount: Amount,
    pub share_per_player: Amount,
    pub owner_upi: Option<String>,
    pub amount_collected: Amount,
    pub remaining: Amount,
    pub slots_filled: usize,
    pub status: Status,
    pub payments: Vec<PaymentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentView {
    pub player_name: String,
    pub amount_paid: Amount,
    pub upi_ref: String,
    pub paid_at: DateTime<Utc>,
}

/// One entry of an organiser's game list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub turf_id: TurfId,
    pub turf_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub total_amount: Amount,
    pub amount_collected: Amount,
    pub slots_filled: usize,
    pub num_players: u32,
    pub status: Status,
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        Self {
            player_name: payment.player().to_string(),
            amount_paid: payment.amount(),
            upi_ref: payment.upi_ref().to_string(),
            paid_at: payment.paid_at(),
        }
    }
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let booking = game.booking();
        let turf = booking.turf();
        Self {
            game_id: game.token().clone(),
            organiser: booking.organiser().name().to_string(),
            turf_id: turf.id(),
            turf_name: turf.name().to_string(),
            turf_location: turf.location().to_string(),
            date: booking.slot().date(),
            time: booking.slot().clock(),
            kind: booking.kind(),
            num_players: game.terms().players(),
            total_amount: game.terms().total(),
            advance_amount: game.terms().advance(),
            share_per_player: game.share(),
            owner_upi: turf.owner_upi().map(str::to_string),
            amount_collected: game.collected(),
            remaining: game.remaining(),
            slots_filled: game.filled(),
            status: game.status(),
            payments: game.payments().iter().map(PaymentView::from).collect(),
        }
    }
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        let booking = game.booking();
        Self {
            game_id: game.token().clone(),
            turf_id: booking.turf().id(),
            turf_name: booking.turf().name().to_string(),
            date: booking.slot().date(),
            time: booking.slot().clock(),
            total_amount: game.terms().total(),
            amount_collected: game.collected(),
            slots_filled: game.filled(),
            num_players: game.terms().players(),
            status: game.status(),
        }
    }
}
