//! Application State - Stato globale dell'applicazione
//!
//! Contiene lo store dei messaggi, le sottoscrizioni live e la configurazione
//! necessaria agli handler.

use crate::core::config::ListAuthPolicy;
use crate::repositories::{MemoryMessageStore, MessageRepository, MessageStore};
use crate::ws::subscriptions::SubscriptionMap;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store dei messaggi (MySQL oppure in memoria)
    pub msg: Arc<dyn MessageStore>,

    /// Secret key per verificare i token JWT
    pub jwt_secret: String,

    /// Comportamento della lista messaggi per richieste anonime
    pub list_auth_policy: ListAuthPolicy,

    /// Canali broadcast per utente, usati dalle connessioni WebSocket
    /// Key: user_id, Value: Sender dei nuovi messaggi di quell'utente
    pub subscriptions: SubscriptionMap,
}

impl AppState {
    /// Crea una nuova istanza di AppState a partire da uno store qualsiasi
    ///
    /// # Arguments
    /// * `store` - Implementazione di `MessageStore` condivisa
    /// * `jwt_secret` - Chiave segreta per la verifica dei token JWT
    /// * `list_auth_policy` - Politica della lista per richieste anonime
    pub fn new(
        store: Arc<dyn MessageStore>,
        jwt_secret: String,
        list_auth_policy: ListAuthPolicy,
    ) -> Self {
        Self {
            msg: store,
            jwt_secret,
            list_auth_policy,
            subscriptions: SubscriptionMap::new(),
        }
    }

    /// Stato con i messaggi persistiti su MySQL
    pub fn with_mysql(
        pool: MySqlPool,
        jwt_secret: String,
        list_auth_policy: ListAuthPolicy,
    ) -> Self {
        Self::new(
            Arc::new(MessageRepository::new(pool)),
            jwt_secret,
            list_auth_policy,
        )
    }

    /// Stato con i messaggi tenuti in memoria (test e sviluppo senza database)
    pub fn in_memory(jwt_secret: String, list_auth_policy: ListAuthPolicy) -> Self {
        Self::new(
            Arc::new(MemoryMessageStore::new()),
            jwt_secret,
            list_auth_policy,
        )
    }
}
