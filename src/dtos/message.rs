//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::Message;
use serde::{Deserialize, Serialize};

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: i64,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.message_id,
            user_id: value.user_id,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Body della richiesta di invio. Il contenuto viene accettato così com'è,
/// anche vuoto: il controllo sul testo è compito del client.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubmitMessageDTO {
    pub content: String,
}

/// DTO per creare un nuovo messaggio (senza message_id, assegnato dallo store)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMessageDTO {
    pub user_id: String,
    pub content: String,
    pub created_at: i64,
}
