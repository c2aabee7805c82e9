use crate::Feed;
use crate::feed::Channels;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tsp_ledger::GameId;
use tsp_ledger::GameView;

/// One subscription to a game's views.
pub struct Watcher {
    id: GameId,
    rx: Receiver<Arc<str>>,
    channels: Channels,
}

impl Watcher {
    pub(crate) fn new(id: GameId, rx: Receiver<Arc<str>>, channels: Channels) -> Self {
        Self { id, rx, channels }
    }
    /// Ends the subscription, releasing the game's channel if this was
    /// its last receiver.
    pub async fn close(self) {
        let Self { id, rx, channels } = self;
        drop(rx);
        Feed::release(&channels, &id).await;
    }
    /// Next published view as JSON. Views missed while lagging are
    /// skipped, since each view supersedes the ones before it.
    pub async fn next(&mut self) -> Option<Arc<str>> {
        loop {
            match self.rx.recv().await {
                Ok(json) => return Some(json),
                Err(RecvError::Lagged(n)) => log::debug!("[watch {}] skipped {} views", self.id, n),
                Err(RecvError::Closed) => return None,
            }
        }
    }
    /// Sends `current` to the client, then forwards every published view
    /// until the client closes the socket or the connection fails.
    ///
    /// Subscribe before loading `current` so no payment falls between them.
    pub async fn bridge(
        mut self,
        current: &GameView,
        mut session: actix_ws::Session,
        mut streams: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use futures::StreamExt;
        let sent = match serde_json::to_string(current) {
            Ok(json) => session.text(json).await.map_err(|e| anyhow::anyhow!("{}", e)),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = sent {
            self.close().await;
            return Err(e);
        }
        log::debug!("[watch {}] connected", self.id);
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = self.next() => match msg {
                        Some(json) => if session.text(json.to_string()).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = streams.next() => match msg {
                        Some(Ok(actix_ws::Message::Ping(bytes))) => if session.pong(&bytes).await.is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            let _ = session.close(None).await;
            log::debug!("[watch {}] disconnected", self.id);
            self.close().await;
        });
        Ok(())
    }
}
