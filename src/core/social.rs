use crate::config::toml_config::SocialProviderConfig;
use crate::utils::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Kakao,
    Naver,
    Google,
    Apple,
    Facebook,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 5] = [
        SocialProvider::Kakao,
        SocialProvider::Naver,
        SocialProvider::Google,
        SocialProvider::Apple,
        SocialProvider::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Kakao => "kakao",
            SocialProvider::Naver => "naver",
            SocialProvider::Google => "google",
            SocialProvider::Apple => "apple",
            SocialProvider::Facebook => "facebook",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn authorize_endpoint(&self) -> &'static str {
        match self {
            SocialProvider::Kakao => "https://kauth.kakao.com/oauth/authorize",
            SocialProvider::Naver => "https://nid.naver.com/oauth2.0/authorize",
            SocialProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            SocialProvider::Apple => "https://appleid.apple.com/auth/authorize",
            SocialProvider::Facebook => "https://www.facebook.com/v18.0/dialog/oauth",
        }
    }

    fn default_scope(&self) -> Option<&'static str> {
        match self {
            SocialProvider::Kakao | SocialProvider::Naver => None,
            SocialProvider::Google => Some("openid email profile"),
            SocialProvider::Apple => Some("name email"),
            SocialProvider::Facebook => Some("email public_profile"),
        }
    }

    /// Naver 與 Apple 一定要帶 state
    pub fn requires_state(&self) -> bool {
        matches!(self, SocialProvider::Naver | SocialProvider::Apple)
    }

    /// 後端交換 authorization code 的路徑
    pub fn callback_path(&self) -> String {
        format!("/auth/oauth/{}", self.as_str())
    }

    pub fn authorize_url(&self, config: &SocialProviderConfig, state: Option<&str>) -> Result<Url> {
        if self.requires_state() && state.map_or(true, |s| s.trim().is_empty()) {
            return Err(StorefrontError::validation(
                "state",
                format!("{} login requires a state parameter", self.as_str()),
            ));
        }

        let mut url = Url::parse(self.authorize_endpoint()).map_err(|e| {
            StorefrontError::ConfigError {
                message: format!("invalid authorize endpoint: {}", e),
            }
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &config.client_id)
                .append_pair("redirect_uri", &config.redirect_uri)
                .append_pair("response_type", "code");

            if let Some(scope) = config.scope.as_deref().or(self.default_scope()) {
                query.append_pair("scope", scope);
            }
            if let Some(state) = state {
                query.append_pair("state", state);
            }
            if *self == SocialProvider::Apple {
                query.append_pair("response_mode", "form_post");
            }
        }

        Ok(url)
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
