use super::*;
use tsp_core::UserId;
use tsp_ledger::*;

/// Durable home of games.
///
/// Implementations must make [`Store::append`] atomic per game: the
/// admission check and the write happen under one lock, so concurrent
/// confirmations for the same game are applied one at a time and never
/// overshoot the declared players or the total.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Persists a freshly created game, including its advance payment.
    /// Fails with [`StoreError::Collision`] if the id is taken.
    async fn create(&self, game: &Game) -> Result<(), StoreError>;
    /// Loads a game with its payments in ledger order.
    async fn load(&self, id: &GameId) -> Result<Game, StoreError>;
    /// Games organised by `user`, newest first.
    async fn organised(&self, user: UserId) -> Result<Vec<Game>, StoreError>;
    /// Admits and records one payment, returning it with the updated game.
    async fn append(
        &self,
        id: &GameId,
        payer: &Payer,
        policy: &Policy,
    ) -> Result<(Payment, Game), StoreError>;
    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
