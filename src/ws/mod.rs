//! WebSocket Module - Aggiornamenti live della lista messaggi
//!
//! Include:
//! - Gestione upgrade HTTP -> WebSocket
//! - Gestione connessioni (split sender/receiver)
//! - Canali broadcast per utente (`SubscriptionMap`)

pub mod connection;
pub mod subscriptions;

pub use connection::handle_socket;
pub use subscriptions::SubscriptionMap;

use crate::core::{AppError, AppState, Identity, require_identity};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Capacità del canale broadcast di ogni utente
pub const BROADCAST_CHANNEL_CAPACITY: usize = 100;
/// Chiusura della connessione se il client resta muto (Pong inclusi)
pub const TIMEOUT_DURATION_SECONDS: u64 = 90;
pub const PING_INTERVAL_SECONDS: u64 = 30;

/// Entry point per gestire richieste di upgrade WebSocket
/// Operazioni:
/// 1. Verificare l'identità (stessa regola della POST: senza identità 401)
/// 2. Eseguire upgrade HTTP -> WebSocket
/// 3. Passare la connessione ad handle_socket
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    identity: Option<Extension<Identity>>,
) -> Result<Response, AppError> {
    let identity = require_identity(identity)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity.subject)))
}
