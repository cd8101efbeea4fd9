//! JWT payload decoding without signature verification.
//!
//! The storefront only reads `exp` to decide whether a stored token is worth
//! sending or should be reissued first. Signatures are never checked here;
//! the backend remains the authority on whether a token is valid.

use crate::utils::error::{Result, StorefrontError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JwtClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl JwtClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// 沒有 `exp` 的 token 視為不會過期
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                let leeway =
                    chrono::Duration::from_std(leeway).unwrap_or_else(|_| chrono::Duration::zero());
                expires_at <= now + leeway
            }
            None => false,
        }
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let expires_at = self.expires_at()?;
        (expires_at - now).to_std().ok()
    }
}

pub fn decode_claims(token: &str) -> Result<JwtClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(StorefrontError::InvalidToken {
                reason: "expected three dot-separated segments".to_string(),
            })
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| StorefrontError::InvalidToken {
            reason: format!("payload is not base64url: {}", e),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| StorefrontError::InvalidToken {
        reason: format!("payload is not a JSON object: {}", e),
    })
}

/// 可解碼且尚未過期
pub fn is_token_usable(token: &str, now: DateTime<Utc>, leeway: Duration) -> bool {
    match decode_claims(token) {
        Ok(claims) => !claims.is_expired_at(now, leeway),
        Err(e) => {
            tracing::debug!("🔑 Unusable token: {}", e);
            false
        }
    }
}

/// cookie 的 Max-Age 跟著 token 的剩餘時間走
pub fn cookie_max_age(token: &str, now: DateTime<Utc>) -> Option<Duration> {
    decode_claims(token).ok()?.remaining_at(now)
}
