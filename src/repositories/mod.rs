//! Repositories module - Persistenza dei messaggi
//!
//! Gli handler vedono solo il trait `MessageStore`; dietro c'è MySQL (`MessageRepository`)
//! oppure lo store in memoria (`MemoryMessageStore`).
//!
//! Le query MySQL sono costruite a runtime (`sqlx::query` / `QueryBuilder`) e non con
//! `query!`: il crate deve compilare anche senza un database raggiungibile.
//! Lo schema sta in `migrations/`, applicato all'avvio con `sqlx::migrate!`.

pub mod memory;
pub mod message;
pub mod traits;

pub use traits::MessageStore;

pub use memory::MemoryMessageStore;
pub use message::MessageRepository;
