//! MessageRepository - Repository MySQL per la gestione dei messaggi

use super::MessageStore;
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use async_trait::async_trait;
use sqlx::{Error, MySql, MySqlPool, QueryBuilder};
use tracing::{debug, instrument};

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: MySqlPool,
}

impl MessageRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    #[instrument(skip(self, data), fields(user_id = %data.user_id))]
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (user_id, content, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.content)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_id() as i64;
        debug!(message_id = new_id, "Message inserted");

        Ok(Message {
            message_id: new_id,
            user_id: data.user_id.clone(),
            content: data.content.clone(),
            created_at: data.created_at,
        })
    }

    #[instrument(skip(self))]
    async fn find_many_by_user_id(
        &self,
        user_id: &str,
        before: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, Error> {
        // il filtro su user_id passa dall'indice by_user, l'ordinamento lo applichiamo noi
        let mut query = QueryBuilder::<MySql>::new(
            r#"
            SELECT
                message_id,
                user_id,
                content,
                created_at
            FROM messages
            WHERE user_id = "#,
        );
        query.push_bind(user_id);

        if let Some(before) = before {
            query.push(" AND created_at < ").push_bind(before);
        }

        query.push(" ORDER BY created_at DESC, message_id DESC");

        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let messages = query
            .build_query_as::<Message>()
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::MySqlPool;

    // Richiedono un MySQL raggiungibile tramite DATABASE_URL: cargo test -- --ignored

    #[ignore = "requires a MySQL server (DATABASE_URL)"]
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("messages")))]
    async fn test_find_many_by_user_id_filters_and_orders(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = MessageRepository::new(pool);

        let alice = repo.find_many_by_user_id("alice", None, None).await?;
        let ids: Vec<i64> = alice.iter().map(|m| m.message_id).collect();
        assert_eq!(ids, vec![4, 3, 1]);
        assert!(alice.iter().all(|m| m.user_id == "alice"));

        let page = repo
            .find_many_by_user_id("alice", Some(1_700_000_003_000), Some(1))
            .await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message_id, 3);

        Ok(())
    }

    #[ignore = "requires a MySQL server (DATABASE_URL)"]
    #[sqlx::test]
    async fn test_create_assigns_distinct_ids(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = MessageRepository::new(pool);
        let dto = CreateMessageDTO {
            user_id: "u1".to_string(),
            content: "stesso testo".to_string(),
            created_at: 1_700_000_000_000,
        };

        let first = repo.create(&dto).await?;
        let second = repo.create(&dto).await?;
        assert_ne!(first.message_id, second.message_id);

        let stored = repo.find_many_by_user_id("u1", None, None).await?;
        assert_eq!(stored.len(), 2);
        Ok(())
    }

    #[ignore = "requires a MySQL server (DATABASE_URL)"]
    #[sqlx::test]
    async fn test_user_id_comparison_is_exact(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = MessageRepository::new(pool);
        repo.create(&CreateMessageDTO {
            user_id: "u1".to_string(),
            content: "solo per u1".to_string(),
            created_at: 1_700_000_000_000,
        })
        .await?;

        assert_eq!(repo.find_many_by_user_id("u1", None, None).await?.len(), 1);
        assert!(repo.find_many_by_user_id("U1", None, None).await?.is_empty());
        assert!(repo.find_many_by_user_id("u1 ", None, None).await?.is_empty());
        Ok(())
    }

    #[ignore = "requires a MySQL server (DATABASE_URL)"]
    #[sqlx::test]
    async fn test_create_stores_content_larger_than_64k(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = MessageRepository::new(pool);
        let content = "x".repeat(70_000);
        repo.create(&CreateMessageDTO {
            user_id: "u1".to_string(),
            content: content.clone(),
            created_at: 1_700_000_000_000,
        })
        .await?;

        let stored = repo.find_many_by_user_id("u1", None, None).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, content);
        Ok(())
    }
}
