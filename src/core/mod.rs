//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Verifica dell'identità (JWT)
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Claims, Identity, decode_jwt, encode_jwt, identity_middleware, require_identity};
pub use config::{Config, ListAuthPolicy};
pub use error::AppError;
pub use state::AppState;
