use chrono::Utc;
use std::sync::Arc;
use tsp_core::*;
use tsp_feed::Feed;
use tsp_feed::Watcher;
use tsp_ledger::*;
use tsp_store::*;

/// A validated booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub user: UserId,
    pub turf: TurfId,
    pub slot: Slot,
    pub kind: Kind,
    pub total: Amount,
    pub players: u32,
}

/// The split-game service: store, directory, feed and policy together.
pub struct Ledger {
    store: Arc<dyn Store>,
    directory: Arc<dyn Directory>,
    feed: Feed,
    policy: Policy,
}

impl Ledger {
    pub fn new(store: Arc<dyn Store>, directory: Arc<dyn Directory>, policy: Policy) -> Self {
        Self {
            store,
            directory,
            feed: Feed::new(),
            policy,
        }
    }
    /// In-memory ledger with the given directory.
    pub fn memory(directory: Arc<dyn Directory>, policy: Policy) -> Self {
        Self::new(Arc::new(Memory::new()), directory, policy)
    }
}

impl Ledger {
    /// Opens a game for a booking and records the organiser's advance.
    ///
    /// Organiser and turf details are resolved once and snapshotted into
    /// the game. Id collisions are retried with a fresh id.
    pub async fn create_game(&self, order: Order) -> Result<Game, StoreError> {
        let terms = Terms::booked(order.total, order.players, order.kind)?;
        let organiser = self.directory.organiser(order.user).await?;
        let turf = self.directory.turf(order.turf).await?;
        let booking = Booking::new(organiser, turf, order.slot, order.kind);
        for _ in 0..GAME_ID_ATTEMPTS {
            let token = GameId::mint(booking.organiser(), booking.slot());
            let game = Game::create(token, booking.clone(), terms, Utc::now());
            match self.store.create(&game).await {
                Ok(()) => {
                    log::info!(
                        "opened game {} ({} for {} players, advance {})",
                        game.token(),
                        terms.total(),
                        terms.players(),
                        terms.advance()
                    );
                    return Ok(game);
                }
                Err(StoreError::Collision(id)) => log::warn!("game id collision on {}", id),
                Err(e) => return Err(e),
            }
        }
        Err(StoreError::Backend(format!(
            "no free game id after {} attempts",
            GAME_ID_ATTEMPTS
        )))
    }
    pub async fn get_game(&self, id: &GameId) -> Result<GameView, StoreError> {
        self.store.load(id).await.map(|game| GameView::from(&game))
    }
    /// Records one confirmation and pushes the new state to watchers.
    pub async fn record_payment(
        &self,
        id: &GameId,
        payer: Payer,
    ) -> Result<(Payment, GameView), StoreError> {
        let (payment, game) = self.store.append(id, &payer, &self.policy).await?;
        let view = GameView::from(&game);
        log::info!(
            "game {} paid by {} ({} of {}, {} collected)",
            id,
            payment.player(),
            view.slots_filled,
            view.num_players,
            view.amount_collected
        );
        self.feed.publish(&view).await;
        Ok((payment, view))
    }
    pub async fn list_games(&self, user: UserId) -> Result<Vec<GameSummary>, StoreError> {
        self.store
            .organised(user)
            .await
            .map(|games| games.iter().map(GameSummary::from).collect())
    }
    /// Subscribes to a game, returning the subscription with the state
    /// it starts from.
    pub async fn watch(&self, id: &GameId) -> Result<(Watcher, GameView), StoreError> {
        let watcher = self.feed.subscribe(id).await;
        match self.get_game(id).await {
            Ok(view) => Ok((watcher, view)),
            Err(e) => {
                watcher.close().await;
                Err(e)
            }
        }
    }
    pub async fn healthy(&self) -> bool {
        self.store
            .ping()
            .await
            .inspect_err(|e| log::error!("health check failed: {}", e))
            .is_ok()
    }
}
