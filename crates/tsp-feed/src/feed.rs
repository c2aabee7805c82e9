use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tsp_core::FEED_CAPACITY;
use tsp_ledger::GameId;
use tsp_ledger::GameView;

type Tx = broadcast::Sender<Arc<str>>;
pub(crate) type Channels = Arc<RwLock<HashMap<GameId, Tx>>>;

/// Fan-out of game views to WebSocket watchers.
///
/// A channel exists per game only while someone watches it: watchers
/// release it on [`Watcher::close`], and publishing drops it once every
/// receiver is gone. Views are serialized once per publish and shared
/// between receivers.
#[derive(Default)]
pub struct Feed {
    channels: Channels,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }
    /// Starts receiving every view published for `id` from now on.
    pub async fn subscribe(&self, id: &GameId) -> Watcher {
        let rx = self
            .channels
            .write()
            .await
            .entry(id.clone())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .subscribe();
        log::debug!("[feed] watching {}", id);
        Watcher::new(id.clone(), rx, self.channels.clone())
    }
    /// Sends `view` to current watchers of its game. No-op without watchers.
    pub async fn publish(&self, view: &GameView) {
        let id = &view.game_id;
        let json = match serde_json::to_string(view) {
            Ok(json) => Arc::<str>::from(json),
            Err(e) => {
                log::error!("[feed] cannot serialize view of {}: {}", id, e);
                return;
            }
        };
        let mut channels = self.channels.write().await;
        let delivered = channels.get(id).map(|tx| tx.send(json).is_ok());
        match delivered {
            Some(true) => log::debug!("[feed] published {}", id),
            Some(false) => {
                channels.remove(id);
                log::debug!("[feed] dropped idle channel {}", id);
            }
            None => {}
        }
    }
    /// Removes the channel of `id` if nobody receives from it any more.
    pub(crate) async fn release(channels: &Channels, id: &GameId) {
        let mut channels = channels.write().await;
        if channels.get(id).is_some_and(|tx| tx.receiver_count() == 0) {
            channels.remove(id);
            log::debug!("[feed] released channel {}", id);
        }
    }
    /// Games that currently have a channel.
    pub async fn watched(&self) -> usize {
        self.channels.read().await.len()
    }
}
