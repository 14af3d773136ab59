//! WebSocket Event DTOs - Data Transfer Objects per eventi WebSocket

use crate::dtos::MessageDTO;
use serde::{Deserialize, Serialize};

/// Tagged union per eventi WebSocket
/// Serde serializza questo come:
/// { "type": "Snapshot", "data": [ ... ] }
/// oppure
/// { "type": "NewMessage", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    /// Risultato completo della lista al momento della connessione
    Snapshot(Vec<MessageDTO>),
    /// Nuovo messaggio dello stesso utente
    NewMessage(MessageDTO),
    Error { code: u16, message: String },
}
