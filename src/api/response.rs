use crate::utils::error::{Result, StorefrontError};
use reqwest::Response;
use serde::de::DeserializeOwned;

/// 非 2xx 轉成 `ApiError`，訊息優先取 body 的 `message` 欄位
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    tracing::debug!("❌ API responded {}: {}", status, message);
    Err(StorefrontError::ApiError {
        status: status.as_u16(),
        message,
    })
}

pub async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    let value = serde_json::from_str(&body)?;
    Ok(value)
}

pub async fn expect_empty(response: Response) -> Result<()> {
    ensure_success(response).await?;
    Ok(())
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
}
