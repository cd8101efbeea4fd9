#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;

/// 未簽章的測試 token，`exp` 為相對現在的秒數
pub fn token_expiring_in(sub: &str, seconds: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"sub": sub, "exp": Utc::now().timestamp() + seconds})
            .to_string()
            .as_bytes(),
    );
    format!("{}.{}.signature", header, payload)
}

pub fn order_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "orderNumber": format!("GS-20240305-{:04}", id),
        "status": "PAID",
        "totalAmount": 24000,
        "items": [],
        "createdAt": "2024-03-05T09:00:00Z"
    })
}
