use crate::core::social::SocialProvider;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, StorefrontError};
use crate::utils::logger::LogOutput;
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub payment: Option<PaymentConfig>,
    #[serde(default)]
    pub social: HashMap<String, SocialProviderConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_reissue_path")]
    pub reissue_path: String,
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
    pub expiry_leeway_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub merchant_id: String,
    pub return_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialProviderConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_reissue_path() -> String {
    "/auth/reissue".to_string()
}

fn default_protected_prefixes() -> Vec<String> {
    ["/mypage", "/cart", "/checkout", "/orders", "/qna"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_storage_path() -> String {
    ".goodspace/storage.json".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            reissue_path: default_reissue_path(),
            protected_prefixes: default_protected_prefixes(),
            expiry_leeway_seconds: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl StorefrontConfig {
    /// 只指定 API 位址，其餘使用預設值
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_seconds: None,
            },
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            payment: None,
            social: HashMap::new(),
            logging: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StorefrontError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StorefrontError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 沒有配置檔時：只靠 `API_BASE_URL`
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var(API_BASE_URL_ENV).map_err(|_| StorefrontError::MissingConfigError {
                field: API_BASE_URL_ENV.to_string(),
            })?;
        Ok(Self::with_base_url(base_url))
    }

    /// `API_BASE_URL` 有設定時覆蓋檔案中的值
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                tracing::debug!("🔧 API base URL overridden from {}", API_BASE_URL_ENV);
                self.api.base_url = base_url;
            }
        }
    }

    /// 替換環境變數 (例如 ${API_BASE_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api.base_url.trim_end_matches('/'), path)
    }

    pub fn social_provider(&self, provider: SocialProvider) -> Result<&SocialProviderConfig> {
        self.social
            .get(provider.as_str())
            .ok_or_else(|| StorefrontError::MissingConfigError {
                field: format!("social.{}", provider.as_str()),
            })
    }

    pub fn storage_path(&self) -> &str {
        &self.storage.path
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// `--verbose` 優先於 `[logging] level`；沒設定時 JSON 用 info，單行輸出用 warn
    pub fn log_output(&self, verbose: bool) -> LogOutput {
        let configured = self.logging.as_ref().and_then(|l| l.level.as_deref());
        let json = self.json_logging();
        let level = match (verbose, configured) {
            (true, _) => "debug",
            (false, Some(level)) => level,
            (false, None) if json => "info",
            (false, None) => "warn",
        }
        .to_string();

        if json {
            LogOutput::Json { level }
        } else {
            LogOutput::Compact { level }
        }
    }
}

impl ConfigProvider for StorefrontConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn reissue_path(&self) -> &str {
        &self.auth.reissue_path
    }

    fn login_path(&self) -> &str {
        &self.auth.login_path
    }

    fn protected_prefixes(&self) -> &[String] {
        &self.auth.protected_prefixes
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(10))
    }

    fn expiry_leeway(&self) -> Duration {
        Duration::from_secs(self.auth.expiry_leeway_seconds.unwrap_or(30))
    }
}

impl Validate for StorefrontConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if self.api.base_url.contains("${") {
            return Err(StorefrontError::ConfigValidationError {
                field: "api.base_url".to_string(),
                message: format!(
                    "Unresolved environment variable in '{}'. Set {} or edit the config file.",
                    self.api.base_url, API_BASE_URL_ENV
                ),
            });
        }
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        validate_route_path("auth.login_path", &self.auth.login_path)?;
        validate_route_path("auth.reissue_path", &self.auth.reissue_path)?;
        for prefix in &self.auth.protected_prefixes {
            validate_route_path("auth.protected_prefixes", prefix)?;
        }

        validate_path("storage.path", &self.storage.path)?;

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            if !LOG_LEVELS.contains(&level) {
                return Err(StorefrontError::ConfigValidationError {
                    field: "logging.level".to_string(),
                    message: format!(
                        "Unknown log level '{}', expected one of {}",
                        level,
                        LOG_LEVELS.join(", ")
                    ),
                });
            }
        }

        if let Some(payment) = &self.payment {
            validate_non_empty_string("payment.merchant_id", &payment.merchant_id)?;
            validate_url("payment.return_url", &payment.return_url)?;
        }

        for (name, social) in &self.social {
            let field = format!("social.{}", name);
            if SocialProvider::from_name(name).is_none() {
                return Err(StorefrontError::ConfigValidationError {
                    field,
                    message: format!("Unknown social login provider '{}'", name),
                });
            }
            validate_non_empty_string(&format!("{}.client_id", field), &social.client_id)?;
            validate_url(&format!("{}.redirect_uri", field), &social.redirect_uri)?;
        }

        Ok(())
    }
}
