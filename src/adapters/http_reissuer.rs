use crate::api::response::parse_json;
use crate::domain::model::{ReissueRequest, TokenPair};
use crate::domain::ports::TokenReissuer;
use crate::utils::error::{Result, StorefrontError};
use async_trait::async_trait;
use reqwest::Client;

/// 呼叫後端 reissue 端點
#[derive(Debug, Clone)]
pub struct HttpTokenReissuer {
    client: Client,
    reissue_url: String,
}

impl HttpTokenReissuer {
    pub fn new(client: Client, reissue_url: String) -> Self {
        Self {
            client,
            reissue_url,
        }
    }

    pub fn reissue_url(&self) -> &str {
        &self.reissue_url
    }
}

#[async_trait]
impl TokenReissuer for HttpTokenReissuer {
    async fn reissue(&self, refresh_token: &str) -> Result<TokenPair> {
        tracing::debug!("🔄 Requesting token reissue: {}", self.reissue_url);

        let response = self
            .client
            .post(&self.reissue_url)
            .json(&ReissueRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;

        let pair: TokenPair = parse_json(response).await?;
        if pair.access_token.trim().is_empty() {
            return Err(StorefrontError::InvalidToken {
                reason: "reissue response carried an empty access token".to_string(),
            });
        }

        Ok(pair)
    }
}
