//! Services module - Handler HTTP dell'applicazione

pub mod message;

// Re-exports per facilitare l'import
pub use message::{list_messages, load_messages, submit_message};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
