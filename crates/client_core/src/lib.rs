use std::{sync::Arc, time::Duration};

use futures::{stream::SplitSink, SinkExt, StreamExt};
use shared::protocol::{ClientMessage, ServerUpdate, VoteKind};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    sync::{broadcast, Mutex, RwLock},
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};
use url::Url;

pub mod board;

/// Endpoint of the poll server when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8080/ws";
/// Period of the poll/keep-alive token.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection is not open")]
    NotOpen,
    #[error(transparent)]
    Protocol(#[from] shared::error::ProtocolError),
    #[error("websocket send failed: {0}")]
    Transport(#[from] tungstenite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Opened,
    Update(ServerUpdate),
    /// A frame the client could not interpret. Non-fatal: the next frame is
    /// still processed.
    ProtocolError(String),
    Closed {
        clean: bool,
    },
}

/// One live connection to the poll server.
///
/// Lifecycle is Connecting -> Open -> Closed, with no reconnection: once the
/// connection ends, the session is spent. Consumers observe the session
/// through [`subscribe_events`] and act on it through [`send_vote`].
///
/// [`subscribe_events`]: BattleSession::subscribe_events
/// [`send_vote`]: BattleSession::send_vote
pub struct BattleSession {
    server_url: String,
    writer: Mutex<Option<WsSink>>,
    state: RwLock<ConnectionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl BattleSession {
    /// Starts connecting to `server_url` and returns the session handle
    /// immediately, in the `Connecting` state, along with a receiver that is
    /// subscribed before the connection task runs. An early failure (bad url,
    /// refused connect) therefore always reaches this receiver; receivers
    /// from [`subscribe_events`] only see events broadcast after they exist.
    ///
    /// [`subscribe_events`]: BattleSession::subscribe_events
    pub fn open(
        server_url: impl Into<String>,
    ) -> (Arc<Self>, broadcast::Receiver<SessionEvent>) {
        let (events, receiver) = broadcast::channel(256);
        let session = Arc::new(Self {
            server_url: server_url.into(),
            writer: Mutex::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            events,
        });
        let runner = Arc::clone(&session);
        tokio::spawn(async move { runner.run().await });
        (session, receiver)
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn send(&self, message: ClientMessage) -> Result<(), SessionError> {
        let frame = message.encode()?;
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(SessionError::NotOpen)?;
        writer.send(Message::Text(frame)).await?;
        Ok(())
    }

    /// Relays a clicked option. The tera flag is always false; no
    /// acknowledgement is awaited and nothing is retried.
    pub async fn send_vote(&self, kind: VoteKind, idx: usize) -> Result<(), SessionError> {
        self.send(ClientMessage::vote(kind, idx)).await
    }

    /// Sends a close frame; the read loop observes the close handshake and
    /// finishes the session.
    pub async fn close(&self) {
        let mut guard = self.writer.lock().await;
        if let Some(writer) = guard.as_mut() {
            if let Err(err) = writer.send(Message::Close(None)).await {
                warn!("close frame send failed: {err}");
            }
        }
    }

    async fn run(self: Arc<Self>) {
        if let Err(err) = Url::parse(&self.server_url) {
            error!(url = %self.server_url, "invalid server url: {err}");
            self.finish(false).await;
            return;
        }

        let ws = match connect_async(&self.server_url).await {
            Ok((ws, _)) => ws,
            Err(err) => {
                error!(url = %self.server_url, "websocket connect failed: {err}");
                self.finish(false).await;
                return;
            }
        };
        let (writer, mut reader) = ws.split();
        *self.writer.lock().await = Some(writer);
        *self.state.write().await = ConnectionState::Open;
        info!(url = %self.server_url, "battle socket connected");
        let _ = self.events.send(SessionEvent::Opened);

        let poller = Arc::clone(&self);
        let poll_task = tokio::spawn(async move { poller.poll_loop().await });

        // Stream end without a close frame counts as abrupt.
        let mut clean = false;
        while let Some(frame) = reader.next().await {
            match frame {
                Ok(Message::Text(text)) => match ServerUpdate::parse(&text) {
                    Ok(update) => {
                        if matches!(update, ServerUpdate::Snapshot(_)) {
                            debug!(raw = %text, "battle state update");
                        }
                        let _ = self.events.send(SessionEvent::Update(update));
                    }
                    Err(err) => {
                        warn!("unusable server frame: {err}");
                        let _ = self.events.send(SessionEvent::ProtocolError(err.to_string()));
                    }
                },
                Ok(Message::Close(_)) => {
                    clean = true;
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    error!("websocket receive failed: {err}");
                    break;
                }
            }
        }

        poll_task.abort();
        if clean {
            info!("battle socket closed cleanly");
        } else {
            error!("battle socket closed unexpectedly");
        }
        self.finish(clean).await;
    }

    /// Emits the poll token once per second for as long as the connection
    /// accepts it.
    async fn poll_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = self.send(ClientMessage::Poll).await {
                warn!("poll send failed, stopping poll timer: {err}");
                break;
            }
        }
    }

    async fn finish(&self, clean: bool) {
        *self.writer.lock().await = None;
        *self.state.write().await = ConnectionState::Closed;
        let _ = self.events.send(SessionEvent::Closed { clean });
    }
}

/// Receives the next session event, riding out broadcast lag. A consumer
/// that falls behind skips the dropped events and keeps reading; `None`
/// means the session handle is gone and no further events will arrive.
pub async fn recv_event(
    events: &mut broadcast::Receiver<SessionEvent>,
) -> Option<SessionEvent> {
    loop {
        match events.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event consumer lagged behind the session");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests;
