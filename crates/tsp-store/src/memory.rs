use super::*;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tsp_core::UserId;
use tsp_ledger::*;

type Handle = Arc<Mutex<Game>>;

/// Process-local store.
///
/// The registry lock is held only long enough to find or insert a game's
/// handle; admission and append run under that game's own mutex, so
/// games never contend with each other.
#[derive(Default)]
pub struct Memory {
    games: RwLock<HashMap<GameId, Handle>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
    async fn handle(&self, id: &GameId) -> Result<Handle, StoreError> {
        self.games
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::Rejected(Rejection::NotFound(id.to_string())))
    }
}

#[async_trait::async_trait]
impl Store for Memory {
    async fn create(&self, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        if games.contains_key(game.token()) {
            return Err(StoreError::Collision(game.token().clone()));
        }
        games.insert(game.token().clone(), Arc::new(Mutex::new(game.clone())));
        log::debug!("[memory] created game {}", game.token());
        Ok(())
    }
    async fn load(&self, id: &GameId) -> Result<Game, StoreError> {
        let handle = self.handle(id).await?;
        let game = handle.lock().await.clone();
        Ok(game)
    }
    async fn organised(&self, user: UserId) -> Result<Vec<Game>, StoreError> {
        let handles = self.games.read().await.values().cloned().collect::<Vec<_>>();
        let mut games = Vec::new();
        for handle in handles {
            let game = handle.lock().await;
            if game.booking().organiser().id() == user {
                games.push(game.clone());
            }
        }
        games.sort_by(|a, b| b.created().cmp(&a.created()));
        Ok(games)
    }
    async fn append(
        &self,
        id: &GameId,
        payer: &Payer,
        policy: &Policy,
    ) -> Result<(Payment, Game), StoreError> {
        let handle = self.handle(id).await?;
        let mut game = handle.lock().await;
        let payment = game.admit(payer, policy, Utc::now())?;
        game.append(payment.clone());
        log::debug!(
            "[memory] game {} slot {} paid {}",
            id,
            payment.seq(),
            payment.amount()
        );
        Ok((payment, game.clone()))
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
