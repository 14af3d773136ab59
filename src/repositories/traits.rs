//! Common repository traits
//!
//! This module defines the storage interface used by the message handlers.

use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use async_trait::async_trait;

/// Storage for messages, indexed by owner
///
/// Implementations must assign `message_id` at insert time and must serve
/// `find_many_by_user_id` through a per-user lookup, not a full scan.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserts a new message
    ///
    /// # Arguments
    /// * `data` - DTO containing the data for creation (without ID)
    ///
    /// # Returns
    /// * `Ok(Message)` - Created message with ID assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, sqlx::Error>;

    /// Reads the messages of one user, newest first
    ///
    /// # Arguments
    /// * `user_id` - Owner of the messages
    /// * `before` - Optional exclusive upper bound on `created_at` (ms)
    /// * `limit` - Optional maximum number of messages to return
    ///
    /// # Returns
    /// * `Ok(Vec<Message>)` - Ordered by `created_at` DESC, then `message_id` DESC (can be empty)
    /// * `Err(sqlx::Error)` - Error during reading
    async fn find_many_by_user_id(
        &self,
        user_id: &str,
        before: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, sqlx::Error>;
}
