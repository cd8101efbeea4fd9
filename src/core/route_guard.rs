use crate::adapters::HttpTokenReissuer;
use crate::core::jwt;
use crate::domain::model::TokenPair;
use crate::domain::ports::{ConfigProvider, TokenReissuer, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// 不需登入，或 access token 仍有效
    Pass,
    /// access token 已過期，但用 refresh token 換到了新的
    PassWithReissue {
        tokens: TokenPair,
        set_cookies: Vec<String>,
    },
    Redirect {
        location: String,
        clear_cookies: Vec<String>,
    },
}

/// 保護需要登入的頁面路徑（server 端 middleware）
pub struct RouteGuard {
    protected_prefixes: Vec<String>,
    login_path: String,
    leeway: Duration,
    reissuer: Arc<dyn TokenReissuer>,
}

impl RouteGuard {
    pub fn new(config: &impl ConfigProvider) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let reissue_url = format!(
            "{}{}",
            config.api_base_url().trim_end_matches('/'),
            config.reissue_path()
        );

        Ok(Self::with_reissuer(
            config,
            Arc::new(HttpTokenReissuer::new(client, reissue_url)),
        ))
    }

    pub fn with_reissuer(config: &impl ConfigProvider, reissuer: Arc<dyn TokenReissuer>) -> Self {
        Self {
            protected_prefixes: config.protected_prefixes().to_vec(),
            login_path: config.login_path().to_string(),
            leeway: config.expiry_leeway(),
            reissuer,
        }
    }

    /// `/cart` 保護 `/cart`、`/cart/1`，但不包含 `/cartoon`
    pub fn is_protected(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.protected_prefixes.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub async fn evaluate(
        &self,
        path: &str,
        cookie_header: Option<&str>,
        now: DateTime<Utc>,
    ) -> GuardDecision {
        if !self.is_protected(path) {
            return GuardDecision::Pass;
        }

        let cookies = cookie_header.map(parse_cookie_header).unwrap_or_default();
        let access_token = cookies.get(ACCESS_TOKEN_KEY);
        let refresh_token = cookies.get(REFRESH_TOKEN_KEY);

        if access_token.is_some_and(|token| jwt::is_token_usable(token, now, self.leeway)) {
            return GuardDecision::Pass;
        }

        // 解不開的 refresh token 交給後端判斷
        let Some(refresh_token) = refresh_token.filter(|token| match jwt::decode_claims(token) {
            Ok(claims) => !claims.is_expired_at(now, Duration::ZERO),
            Err(_) => true,
        }) else {
            tracing::debug!("🔐 {}: no usable refresh token, redirecting to login", path);
            return self.redirect(path);
        };

        match self.reissuer.reissue(refresh_token).await {
            Ok(mut tokens) => {
                tracing::debug!("🔄 {}: access token silently reissued", path);
                if tokens.refresh_token.is_none() {
                    tokens.refresh_token = Some(refresh_token.clone());
                }
                let set_cookies = token_cookies(&tokens, now);
                GuardDecision::PassWithReissue {
                    tokens,
                    set_cookies,
                }
            }
            Err(e) => {
                tracing::warn!("❌ {}: reissue failed during route guard: {}", path, e);
                self.redirect(path)
            }
        }
    }

    fn redirect(&self, path: &str) -> GuardDecision {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", path)
            .finish();

        GuardDecision::Redirect {
            location: format!("{}?{}", self.login_path, query),
            clear_cookies: vec![
                expired_cookie(ACCESS_TOKEN_KEY),
                expired_cookie(REFRESH_TOKEN_KEY),
            ],
        }
    }
}

pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

pub fn set_cookie_header(name: &str, value: &str, max_age: Option<Duration>) -> String {
    match max_age {
        Some(age) => format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            name,
            value,
            age.as_secs()
        ),
        None => format!("{}={}; Path=/; SameSite=Lax", name, value),
    }
}

fn expired_cookie(name: &str) -> String {
    set_cookie_header(name, "", Some(Duration::ZERO))
}

fn token_cookies(tokens: &TokenPair, now: DateTime<Utc>) -> Vec<String> {
    let mut cookies = vec![set_cookie_header(
        ACCESS_TOKEN_KEY,
        &tokens.access_token,
        jwt::cookie_max_age(&tokens.access_token, now),
    )];
    if let Some(refresh_token) = &tokens.refresh_token {
        cookies.push(set_cookie_header(
            REFRESH_TOKEN_KEY,
            refresh_token,
            jwt::cookie_max_age(refresh_token, now),
        ));
    }
    cookies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::StorefrontConfig;
    use crate::core::jwt::test_support::token_with_exp;
    use crate::utils::error::StorefrontError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubReissuer {
        calls: AtomicUsize,
        access_token: Option<String>,
    }

    #[async_trait]
    impl TokenReissuer for StubReissuer {
        async fn reissue(&self, _refresh_token: &str) -> Result<TokenPair> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.access_token {
                Some(token) => Ok(TokenPair {
                    access_token: token.clone(),
                    refresh_token: None,
                }),
                None => Err(StorefrontError::ApiError {
                    status: 401,
                    message: "expired".to_string(),
                }),
            }
        }
    }

    fn guard(access_token: Option<&str>) -> (RouteGuard, Arc<StubReissuer>) {
        let stub = Arc::new(StubReissuer {
            calls: AtomicUsize::new(0),
            access_token: access_token.map(|s| s.to_string()),
        });
        let config = StorefrontConfig::with_base_url("http://localhost:8080");
        (RouteGuard::with_reissuer(&config, stub.clone()), stub)
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_000_000, 0).unwrap()
    }

    #[test]
    fn test_prefix_matching_is_segment_aware() {
        let (guard, _) = guard(None);
        assert!(guard.is_protected("/cart"));
        assert!(guard.is_protected("/cart/12"));
        assert!(guard.is_protected("/mypage?tab=orders"));
        assert!(!guard.is_protected("/cartoon"));
        assert!(!guard.is_protected("/"));
        assert!(!guard.is_protected("/clients/3"));
    }

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("accessToken=abc; refreshToken=\"def\"; theme=dark;");
        assert_eq!(cookies.get("accessToken").map(String::as_str), Some("abc"));
        assert_eq!(cookies.get("refreshToken").map(String::as_str), Some("def"));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn test_public_path_passes_without_cookies() {
        let (guard, stub) = guard(None);
        assert_eq!(
            tokio_test::block_on(guard.evaluate("/clients/1", None, now())),
            GuardDecision::Pass
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_access_token_passes() {
        let (guard, stub) = guard(None);
        let cookie = format!("accessToken={}", token_with_exp("1", 1_000_600));
        assert_eq!(
            guard.evaluate("/mypage", Some(&cookie), now()).await,
            GuardDecision::Pass
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_access_with_valid_refresh_reissues() {
        let new_access = token_with_exp("1", 1_001_800);
        let (guard, stub) = guard(Some(&new_access));
        let refresh = token_with_exp("1", 2_000_000);
        let cookie = format!(
            "accessToken={}; refreshToken={}",
            token_with_exp("1", 999_000),
            refresh
        );

        match guard.evaluate("/checkout", Some(&cookie), now()).await {
            GuardDecision::PassWithReissue {
                tokens,
                set_cookies,
            } => {
                assert_eq!(tokens.access_token, new_access);
                assert_eq!(tokens.refresh_token.as_deref(), Some(refresh.as_str()));
                assert!(set_cookies[0].starts_with(&format!("accessToken={}", new_access)));
                assert!(set_cookies[0].contains("Max-Age=1800"));
                assert_eq!(set_cookies.len(), 2);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_refresh_redirects_without_network() {
        let (guard, stub) = guard(Some("unused"));
        let cookie = format!("refreshToken={}", token_with_exp("1", 999_999));

        match guard.evaluate("/orders/5", Some(&cookie), now()).await {
            GuardDecision::Redirect {
                location,
                clear_cookies,
            } => {
                assert_eq!(location, "/login?redirect=%2Forders%2F5");
                assert!(clear_cookies.iter().all(|c| c.contains("Max-Age=0")));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_opaque_refresh_token_is_sent_to_reissue() {
        let new_access = token_with_exp("1", 1_001_800);
        let (guard, stub) = guard(Some(&new_access));
        let cookie = format!(
            "accessToken={}; refreshToken=opaque-refresh",
            token_with_exp("1", 999_000)
        );

        match guard.evaluate("/mypage", Some(&cookie), now()).await {
            GuardDecision::PassWithReissue { tokens, .. } => {
                assert_eq!(tokens.access_token, new_access);
                assert_eq!(tokens.refresh_token.as_deref(), Some("opaque-refresh"));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_reissue_redirects() {
        let (guard, stub) = guard(None);
        let cookie = format!("refreshToken={}", token_with_exp("1", 2_000_000));

        assert!(matches!(
            guard.evaluate("/cart", Some(&cookie), now()).await,
            GuardDecision::Redirect { .. }
        ));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }
}
