//! Query DTOs - Data Transfer Objects per query string

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Numero massimo di messaggi restituibili in una pagina
pub const MAX_PAGE_SIZE: i64 = 1000;

/// DTO per query parameters di paginazione messaggi.
/// Senza parametri si ottiene l'intera storia dell'utente.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Validate)]
pub struct MessagesQuery {
    /// Cursore: solo messaggi con `created_at` strettamente minore (ms)
    #[serde(default)]
    pub before: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_validation() {
        let ok = MessagesQuery {
            before: None,
            limit: Some(MAX_PAGE_SIZE),
        };
        assert!(ok.validate().is_ok());

        assert!(MessagesQuery::default().validate().is_ok());

        let zero = MessagesQuery {
            before: None,
            limit: Some(0),
        };
        assert!(zero.validate().is_err());

        let too_big = MessagesQuery {
            before: None,
            limit: Some(MAX_PAGE_SIZE + 1),
        };
        assert!(too_big.validate().is_err());
    }
}
