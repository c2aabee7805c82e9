use super::*;
use serde::Deserialize;
use serde::Serialize;
use tsp_core::*;
use tsp_ledger::*;

/// Body of `POST /book`.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub user_id: UserId,
    pub turf_id: TurfId,
    pub date: String,
    #[serde(default = "BookRequest::midnight")]
    pub start_time: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default = "BookRequest::solo")]
    pub num_players: u32,
    #[serde(rename = "type", default)]
    pub kind: Kind,
}

impl BookRequest {
    fn midnight() -> String {
        "00:00".to_string()
    }
    fn solo() -> u32 {
        1
    }
}

impl TryFrom<BookRequest> for Order {
    type Error = Rejection;
    fn try_from(req: BookRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user: req.user_id,
            turf: req.turf_id,
            slot: Slot::try_from((req.date.as_str(), req.start_time.as_str()))?,
            kind: req.kind,
            total: req.amount,
            players: req.num_players,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub message: String,
    pub game_id: GameId,
    pub join_link: String,
    pub advance_paid: Amount,
    pub share_per_player: Amount,
}

/// Body of `POST /game/{game_id}/pay`.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub upi_ref: String,
    pub player_id: Option<UserId>,
}

impl TryFrom<&PayRequest> for Payer {
    type Error = Rejection;
    fn try_from(req: &PayRequest) -> Result<Self, Self::Error> {
        Payer::new(&req.player_name, &req.upi_ref, req.player_id)
    }
}

#[derive(Debug, Serialize)]
pub struct PayResponse {
    pub message: String,
    pub share_paid: Amount,
    pub slots_filled: usize,
    pub amount_collected: Amount,
    pub remaining: Amount,
    pub status: Status,
}

impl PayResponse {
    pub fn new(payment: &Payment, view: &GameView) -> Self {
        Self {
            message: format!(
                "Payment of ₹{} recorded for {}",
                payment.amount(),
                payment.player()
            ),
            share_paid: payment.amount(),
            slots_filled: view.slots_filled,
            amount_collected: view.amount_collected,
            remaining: view.remaining,
            status: view.status,
        }
    }
}

/// Every error response carries this body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
