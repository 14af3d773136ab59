#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Duration;
use message_board::auth::encode_jwt;
use message_board::config::ListAuthPolicy;
use message_board::core::AppState;
use message_board::repositories::MemoryMessageStore;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Crea un AppState per i test, con lo store in memoria
///
/// # Arguments
/// * `policy` - Politica della lista per richieste anonime
///
/// # Returns
/// Arc<AppState> configurato con il JWT secret di test
pub fn create_test_state(policy: ListAuthPolicy) -> Arc<AppState> {
    Arc::new(AppState::in_memory(TEST_JWT_SECRET.to_string(), policy))
}

/// Come `create_test_state`, ma restituisce anche lo store per ispezionarlo
pub fn create_test_state_with_store(
    policy: ListAuthPolicy,
) -> (Arc<AppState>, Arc<MemoryMessageStore>) {
    let store = Arc::new(MemoryMessageStore::new());
    let state = AppState::new(store.clone(), TEST_JWT_SECRET.to_string(), policy);
    (Arc::new(state), store)
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = message_board::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing, come farebbe l'identity provider
///
/// # Arguments
/// * `subject` - Subject dell'identità (diventa lo user_id dei messaggi)
///
/// # Returns
/// Token JWT valido per 24 ore
pub fn create_test_jwt(subject: &str) -> String {
    encode_jwt(subject, Duration::hours(24), TEST_JWT_SECRET).expect("Failed to create JWT token")
}
