//! Identità del chiamante
//!
//! Il token viene emesso da un identity provider esterno: qui lo si verifica soltanto
//! e se ne estrae il `sub`, che diventa lo `user_id` dei messaggi.

use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{Error, Extension, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Nome del cookie da cui leggere il token se manca l'header Authorization
pub const TOKEN_COOKIE: &str = "token";

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Identificativo stabile del soggetto
    pub exp: usize,  // Expiry time of the token
    pub iat: usize,  // Issued at time of the token
}

/// Identità verificata del chiamante, inserita nelle Extension della richiesta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

#[instrument(skip(secret), fields(subject = %subject))]
pub fn encode_jwt(subject: &str, ttl: Duration, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for subject");
    let now = Utc::now();
    let claim = Claims {
        sub: subject.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data: TokenData<Claims>| {
        debug!("JWT token decoded successfully for subject: {}", data.claims.sub);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Estrae il token grezzo dalla richiesta: prima `Authorization: Bearer`, poi il cookie `token`
fn extract_token(req: &Request) -> Option<String> {
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let Ok(value) = header.to_str() else {
            warn!("Invalid authorization header format");
            return None;
        };
        let mut parts = value.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
                Some(token.to_string())
            }
            _ => {
                warn!("Authorization header is not a bearer token");
                None
            }
        };
    }

    req.headers()
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// Middleware che risolve l'identità del chiamante senza mai rifiutare la richiesta.
/// Se il token è presente e valido inserisce `Identity` nelle Extension, altrimenti
/// lascia decidere all'handler (vedi `require_identity`).
#[instrument(skip(state, req, next))]
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running identity middleware");
    match extract_token(&req) {
        Some(token) => match decode_jwt(&token, &state.jwt_secret) {
            Ok(data) => {
                debug!("Request authenticated for subject: {}", data.claims.sub);
                req.extensions_mut().insert(Identity {
                    subject: data.claims.sub,
                });
            }
            Err(_) => warn!("Token rejected, continuing as anonymous"),
        },
        None => debug!("No token found, continuing as anonymous"),
    }
    Ok(next.run(req).await)
}

/// Trasforma l'identità opzionale in errore Unauthenticated quando manca
pub fn require_identity(identity: Option<Extension<Identity>>) -> Result<Identity, AppError> {
    match identity {
        Some(Extension(identity)) => Ok(identity),
        None => {
            warn!("Operation requires an authenticated identity");
            Err(AppError::unauthenticated())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const SECRET: &str = "segreto-di-test";

    fn request_with(name: http::HeaderName, value: &str) -> Request {
        http::Request::builder()
            .uri("/messages")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_jwt_round_trip_keeps_subject() {
        let token = encode_jwt("user_123", Duration::hours(1), SECRET).unwrap();
        let data = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(data.claims.sub, "user_123");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_jwt_rejects_wrong_secret_and_expired() {
        let token = encode_jwt("u1", Duration::hours(1), SECRET).unwrap();
        assert!(decode_jwt(&token, "un altro segreto").is_err());

        let expired = encode_jwt("u1", Duration::hours(-2), SECRET).unwrap();
        assert!(decode_jwt(&expired, SECRET).is_err());
    }

    #[test]
    fn test_extract_token_from_header_and_cookie() {
        let req = request_with(http::header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = request_with(http::header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(extract_token(&req), None);

        let req = request_with(http::header::COOKIE, "theme=dark; token=xyz; other=1");
        assert_eq!(extract_token(&req).as_deref(), Some("xyz"));

        let req = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(extract_token(&req), None);
    }

    #[test]
    fn test_require_identity() {
        let identity = Identity {
            subject: "u1".to_string(),
        };
        assert_eq!(
            require_identity(Some(Extension(identity.clone()))).unwrap(),
            identity
        );

        let err = require_identity(None).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
