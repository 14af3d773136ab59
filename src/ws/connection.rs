//! WebSocket Connection Management - Gestione connessioni WebSocket

use crate::AppState;
use crate::dtos::{MessageDTO, MessagesQuery, WsEventDTO};
use crate::services::load_messages;
use crate::ws::{PING_INTERVAL_SECONDS, TIMEOUT_DURATION_SECONDS};
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::oneshot;
use tokio::time::{Duration, MissedTickBehavior, interval, timeout};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, error, info, instrument, warn};

/// Ultimo id contenuto nello snapshot iniziale.
/// Il canale è aperto prima di leggere lo snapshot, quindi può ripetere messaggi già inviati:
/// tutto ciò che ha id <= `newest_id` è già stato consegnato.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCursor {
    newest_id: Option<i64>,
}

impl SnapshotCursor {
    pub fn new(snapshot: &[MessageDTO]) -> Self {
        Self {
            newest_id: snapshot.iter().map(|m| m.id).max(),
        }
    }

    /// true se il messaggio non faceva parte dello snapshot
    pub fn is_new(&self, message_id: i64) -> bool {
        self.newest_id.is_none_or(|newest| message_id > newest)
    }
}

#[instrument(skip(ws, state))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: String) {
    info!("WebSocket connection established");

    // Dividiamo il WebSocket in due metà: sender e receiver
    let (ws_tx, ws_rx) = ws.split();

    // Iscrizione prima di leggere lo snapshot: un messaggio inserito nel mezzo
    // arriva comunque dal canale (e viene scartato se già presente nello snapshot)
    let updates = state.subscriptions.subscribe(&user_id);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // task che sta in ascolto del websocket
    tokio::spawn(listen_ws(ws_rx, shutdown_tx));

    write_ws(user_id, ws_tx, updates, shutdown_rx, state).await;
}

#[instrument(skip(websocket_tx, updates, shutdown_rx, state))]
pub async fn write_ws(
    user_id: String,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    updates: Receiver<Arc<MessageDTO>>,
    mut shutdown_rx: oneshot::Receiver<()>,
    state: Arc<AppState>,
) {
    info!("Write task started");

    let snapshot = match load_messages(&state, &user_id, &MessagesQuery::default()).await {
        Ok(messages) => messages,
        Err(e) => {
            error!("Failed to load snapshot: {:?}", e);
            let event = WsEventDTO::Error {
                code: e.status().as_u16(),
                message: e.message().to_string(),
            };
            let _ = send_event(&mut websocket_tx, &event).await;
            let _ = websocket_tx.close().await;
            return;
        }
    };

    let cursor = SnapshotCursor::new(&snapshot);
    info!(snapshot_size = snapshot.len(), "Sending snapshot");
    if send_event(&mut websocket_tx, &WsEventDTO::Snapshot(snapshot))
        .await
        .is_err()
    {
        warn!("Failed to send snapshot, closing connection");
        return;
    }

    let mut updates = BroadcastStream::new(updates);
    let mut ping = interval(Duration::from_secs(PING_INTERVAL_SECONDS));
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ping.tick().await; // Consuma primo tick immediato

    loop {
        tokio::select! {
            update = updates.next() => match update {
                Some(Ok(msg)) => {
                    if !cursor.is_new(msg.id) {
                        debug!(message_id = msg.id, "Message already in snapshot, skipped");
                        continue;
                    }
                    let event = WsEventDTO::NewMessage(MessageDTO::clone(&msg));
                    if send_event(&mut websocket_tx, &event).await.is_err() {
                        warn!("Failed to send message, closing connection");
                        break;
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped, "Subscriber lagging behind, messages dropped");
                }
                None => {
                    info!("Broadcast channel closed");
                    break;
                }
            },

            // il Pong del client azzera il timeout del listener
            _ = ping.tick() => {
                if websocket_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    warn!("Failed to send ping, closing connection");
                    break;
                }
            }

            _ = &mut shutdown_rx => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let _ = websocket_tx.close().await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| {
            error!("Failed to send event through WebSocket: {:?}", e);
            e
        })
}

#[instrument(skip(websocket_rx, shutdown_tx))]
pub async fn listen_ws(
    mut websocket_rx: SplitStream<WebSocket>,
    shutdown_tx: oneshot::Sender<()>,
) {
    info!("Listen task started");

    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(Ok(Message::Close(_)))) => {
                info!("Close message received");
                break;
            }
            Ok(Some(Ok(Message::Text(text)))) => {
                // l'invio passa dalla POST, dal client ci aspettiamo solo frame di controllo
                debug!(len = text.len(), "Ignoring text frame from client");
            }
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => {
                warn!("WebSocket error: {:?}", e);
                break;
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(());
    info!("Listen task terminated");
}
