use crate::adapters::HttpTokenReissuer;
use crate::core::jwt;
use crate::domain::model::{TokenPair, User};
use crate::domain::ports::{
    BrowserStorage, ConfigProvider, Navigator, TokenReissuer, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
    USER_KEY,
};
use crate::utils::error::{Result, StorefrontError};
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::{Arc, Mutex, MutexGuard};

type PendingRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// 購物者的登入狀態：token 的讀寫、reissue 與 401 重試。
///
/// 同一時間最多只有一個 reissue 請求；期間呼叫 `refresh_access_token`
/// 的人都會拿到同一個結果。
pub struct SessionManager<S, N> {
    inner: Arc<SessionInner<S, N>>,
}

struct SessionInner<S, N> {
    storage: S,
    navigator: N,
    reissuer: Arc<dyn TokenReissuer>,
    client: Client,
    login_path: String,
    in_flight: Mutex<Option<PendingRefresh>>,
}

impl<S, N> Clone for SessionManager<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, N> SessionManager<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub fn new(config: &impl ConfigProvider, storage: S, navigator: N) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let reissue_url = format!(
            "{}{}",
            config.api_base_url().trim_end_matches('/'),
            config.reissue_path()
        );
        let reissuer = Arc::new(HttpTokenReissuer::new(client.clone(), reissue_url));

        Ok(Self::with_reissuer(
            client,
            reissuer,
            config.login_path(),
            storage,
            navigator,
        ))
    }

    pub fn with_reissuer(
        client: Client,
        reissuer: Arc<dyn TokenReissuer>,
        login_path: impl Into<String>,
        storage: S,
        navigator: N,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage,
                navigator,
                reissuer,
                client,
                login_path: login_path.into(),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub fn login_path(&self) -> &str {
        &self.inner.login_path
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.storage.get_item(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.storage.get_item(REFRESH_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.inner.store_tokens(tokens)
    }

    pub fn store_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.inner.storage.set_item(USER_KEY, &json)
    }

    pub fn current_user(&self) -> Option<User> {
        let json = self.inner.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("⚠️ Stored user profile is unreadable: {}", e);
                None
            }
        }
    }

    /// 登出：清掉 token、cookie 與使用者資料
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// 以 refresh token 換新的 access token。
    ///
    /// 失敗時（沒有 refresh token、非 2xx、body 格式錯誤）會清除登入資料、
    /// 導向登入頁並回傳 `None`，不會再重試。
    pub async fn refresh_access_token(&self) -> Option<String> {
        let pending = {
            let mut slot = self.inner.lock_in_flight();
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("🔄 Joining in-flight token reissue");
                    pending.clone()
                }
                None => {
                    let pending = SessionInner::reissue(Arc::clone(&self.inner))
                        .boxed()
                        .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// 帶上 Bearer token 送出請求；收到 401 時換一次 token 並重送一次。
    ///
    /// `build` 會被呼叫一到兩次，每次都要產生同樣的請求。
    pub async fn send_authorized<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let used_token = self.access_token();
        let response = with_bearer(build(&self.inner.client), used_token.as_deref())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("🔐 Received 401, obtaining a fresh access token");

        // 別的請求可能已經換好 token，或已經登出了
        let fresh_token = match (used_token.as_deref(), self.access_token()) {
            (used, Some(current)) if used != Some(current.as_str()) => Some(current),
            (Some(_), None) => {
                tracing::debug!("🔐 Session already ended by another request");
                return Err(StorefrontError::AuthenticationRequired);
            }
            _ => self.refresh_access_token().await,
        };
        let fresh_token = fresh_token.ok_or(StorefrontError::AuthenticationRequired)?;

        let retried = with_bearer(build(&self.inner.client), Some(&fresh_token))
            .send()
            .await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("🔐 Request still unauthorized after token reissue");
        }

        Ok(retried)
    }
}

impl<S, N> SessionInner<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<PendingRefresh>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn reissue(inner: Arc<Self>) -> Option<String> {
        let outcome = match inner.storage.get_item(REFRESH_TOKEN_KEY) {
            Some(refresh_token) => inner.reissuer.reissue(&refresh_token).await,
            None => {
                tracing::info!("🔐 No refresh token stored, skipping reissue");
                Err(StorefrontError::AuthenticationRequired)
            }
        };

        let access_token = match outcome.and_then(|tokens| {
            inner.store_tokens(&tokens)?;
            Ok(tokens.access_token)
        }) {
            Ok(token) => {
                tracing::info!("✅ Access token reissued");
                Some(token)
            }
            Err(e) => {
                tracing::warn!("❌ Token reissue failed: {}", e);
                inner.clear();
                inner.navigator.navigate_to(&inner.login_path);
                None
            }
        };

        inner.lock_in_flight().take();
        access_token
    }

    fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        let now = Utc::now();

        self.storage.set_item(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.set_cookie(
            ACCESS_TOKEN_KEY,
            &tokens.access_token,
            jwt::cookie_max_age(&tokens.access_token, now),
        )?;

        if let Some(refresh_token) = &tokens.refresh_token {
            self.storage.set_item(REFRESH_TOKEN_KEY, refresh_token)?;
            self.storage.set_cookie(
                REFRESH_TOKEN_KEY,
                refresh_token,
                jwt::cookie_max_age(refresh_token, now),
            )?;
        }

        Ok(())
    }

    fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!("⚠️ Failed to remove '{}' from storage: {}", key, e);
            }
        }
        for name in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove_cookie(name) {
                tracing::warn!("⚠️ Failed to remove cookie '{}': {}", name, e);
            }
        }
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
