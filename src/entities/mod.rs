//! Entities module - Entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella nel database (vedi `migrations/`).

pub mod message;

pub use message::Message;
