//! Message services - Invio e lettura dei messaggi dell'utente corrente

use crate::core::{AppError, AppState, Identity, ListAuthPolicy, require_identity};
use crate::dtos::{CreateMessageDTO, MessageDTO, MessagesQuery, SubmitMessageDTO};
use axum::{
    Extension,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state, identity, body))]
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    // inserita dall'identity_middleware se il token è valido
    identity: Option<Extension<Identity>>,
    body: Result<Json<SubmitMessageDTO>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    // 1. Senza identità: Unauthenticated, nessuna scrittura (prima ancora di guardare il body)
    // 2. Costruire il messaggio con user_id = subject e created_at = adesso (ms)
    // 3. Inserire la riga (una sola, nessuna deduplica sul contenuto)
    // 4. Notificare le connessioni live dello stesso utente
    let identity = require_identity(identity)?;
    let Json(body) = body?;
    debug!(user_id = %identity.subject, "Submitting message");

    let new_message = CreateMessageDTO {
        user_id: identity.subject,
        content: body.content,
        created_at: Utc::now().timestamp_millis(),
    };

    let message = state.msg.create(&new_message).await?;
    info!(
        message_id = message.message_id,
        user_id = %message.user_id,
        "Message stored"
    );

    let user_id = message.user_id.clone();
    state
        .subscriptions
        .publish(&user_id, Arc::new(MessageDTO::from(message)));

    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, params, identity))]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    params: Result<Query<MessagesQuery>, QueryRejection>,
    identity: Option<Extension<Identity>>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let identity = match (identity, state.list_auth_policy) {
        (Some(Extension(identity)), _) => identity,
        (None, ListAuthPolicy::Lenient) => {
            debug!("Anonymous list request, returning empty result");
            return Ok(Json(Vec::new()));
        }
        (None, ListAuthPolicy::Strict) => return Err(AppError::unauthenticated()),
    };
    let Query(params) = params?;
    params.validate()?;

    let messages = load_messages(&state, &identity.subject, &params).await?;
    info!("Retrieved {} messages for user", messages.len());
    Ok(Json(messages))
}

/// Lettura dei messaggi di un utente, più recenti per primi.
/// Condivisa tra la GET e lo snapshot inviato all'apertura del WebSocket.
pub async fn load_messages(
    state: &AppState,
    user_id: &str,
    params: &MessagesQuery,
) -> Result<Vec<MessageDTO>, AppError> {
    let messages = state
        .msg
        .find_many_by_user_id(user_id, params.before, params.limit)
        .await?;

    Ok(messages.into_iter().map(MessageDTO::from).collect())
}
