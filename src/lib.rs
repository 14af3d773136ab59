//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{any, get},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::identity_middleware;
    use services::*;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .route("/messages", get(list_messages).post(submit_message))
        .route("/ws", any(ws_handler))
        // l'identità viene risolta per tutte le rotte, ogni handler decide se è obbligatoria
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(configure_cors())
        .with_state(state)
}

/// CORS per il client web: token nell'header Authorization, niente cookie cross-origin
fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}
