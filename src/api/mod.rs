//! Typed calls against the storefront backend.
//!
//! Every call that needs a signed-in shopper goes through
//! [`SessionManager::send_authorized`], so the 401 reissue-and-retry policy is
//! defined in one place.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod qna;
pub mod response;
pub mod user;

use crate::core::session::SessionManager;
use crate::domain::ports::{BrowserStorage, ConfigProvider, Navigator};
use crate::utils::error::Result;
use reqwest::Method;
use response::{expect_empty, parse_json};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use auth::SocialSignIn;

pub struct StorefrontApi<S, N> {
    session: SessionManager<S, N>,
    base_url: String,
}

impl<S, N> Clone for StorefrontApi<S, N> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub fn new(config: &impl ConfigProvider, session: SessionManager<S, N>) -> Self {
        Self {
            session,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
        }
    }

    pub fn session(&self) -> &SessionManager<S, N> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.session.client().get(self.url(path)).send().await?;
        parse_json(response).await
    }

    async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .session
            .client()
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        parse_json(response).await
    }

    async fn post_public_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .session
            .client()
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        expect_empty(response).await
    }

    async fn get_authorized<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .session
            .send_authorized(|client| client.get(&url))
            .await?;
        parse_json(response).await
    }

    async fn send_authorized_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .session
            .send_authorized(|client| client.request(method.clone(), &url).json(body))
            .await?;
        parse_json(response).await
    }

    async fn delete_authorized(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self
            .session
            .send_authorized(|client| client.delete(&url))
            .await?;
        expect_empty(response).await
    }
}
