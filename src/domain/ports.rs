use crate::domain::model::TokenPair;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";
pub const PENDING_CLIENT_ID_KEY: &str = "pendingClientId";
pub const SELECTED_CLIENT_KEY: &str = "selectedClient";

/// 瀏覽器端的 key-value 儲存：local storage 加上 cookie 鏡像。
///
/// 每一個操作本身是原子的；呼叫端不需要額外上鎖。
pub trait BrowserStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;

    fn get_cookie(&self, name: &str) -> Option<String>;
    /// `max_age` 為 None 時是 session cookie
    fn set_cookie(&self, name: &str, value: &str, max_age: Option<Duration>) -> Result<()>;
    fn remove_cookie(&self, name: &str) -> Result<()>;
}

/// 頁面導向（`window.location`）
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// 以 refresh token 換取新的 access token
#[async_trait]
pub trait TokenReissuer: Send + Sync {
    async fn reissue(&self, refresh_token: &str) -> Result<TokenPair>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn reissue_path(&self) -> &str;
    fn login_path(&self) -> &str;
    fn protected_prefixes(&self) -> &[String];
    fn request_timeout(&self) -> Duration;
    fn expiry_leeway(&self) -> Duration;
}
