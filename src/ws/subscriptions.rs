use crate::dtos::MessageDTO;
use crate::ws::BROADCAST_CHANNEL_CAPACITY;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{debug, info, instrument};

/// Canali broadcast dei nuovi messaggi, uno per user_id con almeno una connessione aperta
pub struct SubscriptionMap {
    channels: DashMap<String, Sender<Arc<MessageDTO>>>,
}

impl Default for SubscriptionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionMap {
    pub fn new() -> Self {
        SubscriptionMap {
            channels: DashMap::new(),
        }
    }

    #[instrument(skip(self))]
    pub fn subscribe(&self, user_id: &str) -> Receiver<Arc<MessageDTO>> {
        // entry() tiene il lock sulla shard: due subscribe concorrenti non creano due canali
        self.channels
            .entry(user_id.to_string())
            .or_insert_with(|| {
                info!("Creating new broadcast channel for user");
                // Arc<MessageDTO> per condividere il messaggio tra i receiver senza copiarlo
                broadcast::channel::<Arc<MessageDTO>>(BROADCAST_CHANNEL_CAPACITY).0
            })
            .subscribe()
    }

    /// Invia il messaggio a tutte le connessioni dell'utente.
    /// Ritorna il numero di receiver raggiunti (0 se l'utente non è connesso).
    #[instrument(skip(self, msg), fields(message_id = msg.id))]
    pub fn publish(&self, user_id: &str, msg: Arc<MessageDTO>) -> usize {
        let delivered = match self.channels.get(user_id) {
            Some(tx) => tx.send(msg).unwrap_or(0),
            None => {
                debug!("No live subscribers for user");
                return 0;
            }
        };

        if delivered == 0 {
            // Nessuno sta ascoltando, rimuovi il channel
            // (solo se nel frattempo nessuno si è iscritto)
            self.channels
                .remove_if(user_id, |_, tx| tx.receiver_count() == 0);
            debug!("Removed idle channel");
        } else {
            info!(receivers = delivered, "Message broadcast to receivers");
        }
        delivered
    }

    /// Numero di connessioni in ascolto per un utente
    pub fn subscriber_count(&self, user_id: &str) -> usize {
        self.channels
            .get(user_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Numero di utenti con un canale attivo
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
