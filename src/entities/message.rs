//! Message entity - Entità messaggio

use serde::{Deserialize, Serialize};

/// Riga della tabella `messages`. Scritta una sola volta, mai modificata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Message {
    pub message_id: i64,
    // subject dell'identità che ha creato il messaggio, nessuna tabella utenti dietro
    pub user_id: String,
    pub content: String,
    // millisecondi dalla Unix epoch, assegnati dal server all'inserimento
    pub created_at: i64,
}
