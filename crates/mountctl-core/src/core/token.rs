//! Offline inspection of the application's JWT tokens
//!
//! Decoding only: the signature is never verified here. This exists to tell
//! an operator why a token is being rejected (expired, wrong user, ...).

use crate::error::ValidationError;
use crate::utils::text::head_chars;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const SIGNATURE_PREVIEW_CHARS: usize = 20;

/// Header and claims of a JWT
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: Map<String, Value>,
    pub claims: Map<String, Value>,
    pub signature_preview: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpiryStatus {
    Valid {
        expires_at: DateTime<Utc>,
        remaining: chrono::Duration,
    },
    Expired {
        expires_at: DateTime<Utc>,
    },
    NoExpiry,
}

/// Split and decode a `header.payload.signature` token
pub fn decode_unverified(token: &str) -> Result<DecodedToken, ValidationError> {
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ValidationError::InvalidToken {
            reason: format!("expected 3 dot-separated segments, found {}", parts.len()),
        });
    }

    Ok(DecodedToken {
        header: decode_segment("header", parts[0])?,
        claims: decode_segment("payload", parts[1])?,
        signature_preview: format!("{}...", head_chars(parts[2], SIGNATURE_PREVIEW_CHARS)),
    })
}

fn decode_segment(name: &str, segment: &str) -> Result<Map<String, Value>, ValidationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| ValidationError::InvalidToken {
            reason: format!("{} is not base64url: {}", name, e),
        })?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::InvalidToken {
            reason: format!("{} is not a JSON object", name),
        }),
        Err(e) => Err(ValidationError::InvalidToken {
            reason: format!("{} is not JSON: {}", name, e),
        }),
    }
}

impl DecodedToken {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Subject of an OpenList token: its `username` claim
    pub fn username(&self) -> Option<&str> {
        self.claim("username").and_then(Value::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.claim("exp")?;
        let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }

    pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        match self.expires_at() {
            Some(expires_at) if expires_at > now => ExpiryStatus::Valid {
                expires_at,
                remaining: expires_at - now,
            },
            Some(expires_at) => ExpiryStatus::Expired { expires_at },
            None => ExpiryStatus::NoExpiry,
        }
    }
}
