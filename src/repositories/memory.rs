//! MemoryMessageStore - Store dei messaggi in memoria
//!
//! Stesso contratto di `MessageRepository`, senza database. Usato nei test e quando
//! `DATABASE_URL` non è configurato.

use super::MessageStore;
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct Tables {
    /// Righe in ordine di inserimento; message_id = posizione + 1
    rows: Vec<Message>,
    /// Equivalente dell'indice by_user: user_id -> posizioni in `rows`
    by_user: HashMap<String, Vec<usize>>,
}

#[derive(Default)]
pub struct MemoryMessageStore {
    tables: RwLock<Tables>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numero totale di messaggi memorizzati, di tutti gli utenti
    pub async fn len(&self) -> usize {
        self.tables.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    #[instrument(skip(self, data), fields(user_id = %data.user_id))]
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let position = tables.rows.len();

        let message = Message {
            message_id: position as i64 + 1,
            user_id: data.user_id.clone(),
            content: data.content.clone(),
            created_at: data.created_at,
        };

        tables.rows.push(message.clone());
        tables
            .by_user
            .entry(data.user_id.clone())
            .or_default()
            .push(position);

        debug!(message_id = message.message_id, "Message inserted");
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn find_many_by_user_id(
        &self,
        user_id: &str,
        before: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let tables = self.tables.read().await;
        let Some(positions) = tables.by_user.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut messages: Vec<Message> = positions
            .iter()
            .map(|&pos| &tables.rows[pos])
            .filter(|m| before.is_none_or(|b| m.created_at < b))
            .cloned()
            .collect();

        messages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.message_id.cmp(&a.message_id))
        });

        if let Some(limit) = limit {
            messages.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(user_id: &str, content: &str, created_at: i64) -> CreateMessageDTO {
        CreateMessageDTO {
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryMessageStore::new();
        assert!(store.is_empty().await);

        let first = store.create(&new_message("u1", "ciao", 10)).await.unwrap();
        let second = store.create(&new_message("u1", "ciao", 10)).await.unwrap();

        assert_eq!(first.message_id, 1);
        assert_eq!(second.message_id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_orders_newest_first_with_id_tiebreak() {
        let store = MemoryMessageStore::new();
        store.create(&new_message("u1", "a", 100)).await.unwrap();
        store.create(&new_message("u1", "b", 300)).await.unwrap();
        store.create(&new_message("u1", "c", 200)).await.unwrap();
        store.create(&new_message("u1", "d", 300)).await.unwrap();

        let contents: Vec<String> = store
            .find_many_by_user_id("u1", None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();

        assert_eq!(contents, vec!["d", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_find_is_scoped_to_user() {
        let store = MemoryMessageStore::new();
        store.create(&new_message("u1", "mio", 1)).await.unwrap();
        store.create(&new_message("u2", "suo", 2)).await.unwrap();

        let u1 = store.find_many_by_user_id("u1", None, None).await.unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].content, "mio");

        let nobody = store.find_many_by_user_id("u3", None, None).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_find_with_cursor_and_limit() {
        let store = MemoryMessageStore::new();
        for ts in [100, 200, 300, 400] {
            store
                .create(&new_message("u1", &ts.to_string(), ts))
                .await
                .unwrap();
        }

        let page = store
            .find_many_by_user_id("u1", Some(400), Some(2))
            .await
            .unwrap();
        let stamps: Vec<i64> = page.iter().map(|m| m.created_at).collect();
        assert_eq!(stamps, vec![300, 200]);

        let rest = store
            .find_many_by_user_id("u1", Some(200), None)
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].created_at, 100);
    }
}
