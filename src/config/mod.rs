pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CartCommand, CliConfig, Command, InquiryCommand, OrderCommand};

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{StorefrontConfig, API_BASE_URL_ENV};
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "goodspace")]
    #[command(about = "Good Space storefront client")]
    pub struct CliConfig {
        #[arg(long, short, help = "Path to a TOML configuration file")]
        pub config: Option<String>,

        #[arg(long, env = API_BASE_URL_ENV, help = "Backend base URL")]
        pub api_base_url: Option<String>,

        #[arg(long, help = "Where the local session file is kept")]
        pub storage: Option<String>,

        #[arg(long, short, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Sign in with email and password
        SignIn {
            #[arg(long)]
            email: String,
            #[arg(long, env = "GOODSPACE_PASSWORD", hide_env_values = true)]
            password: String,
        },
        SignOut,
        /// Show the signed-in shopper
        Whoami,
        /// Exchange the refresh token for a new access token
        Refresh,
        /// Print the authorization URL of a social login provider
        SocialUrl {
            provider: String,
            #[arg(long)]
            state: Option<String>,
            #[arg(long)]
            client_id: Option<i64>,
        },
        Clients,
        Products {
            client_id: i64,
            #[arg(long, default_value_t = 1)]
            page: usize,
            #[arg(long, default_value_t = 12)]
            per_page: usize,
        },
        Cart {
            #[command(subcommand)]
            action: CartCommand,
        },
        Orders {
            #[command(subcommand)]
            action: OrderCommand,
        },
        Inquiries {
            #[command(subcommand)]
            action: InquiryCommand,
        },
        /// Evaluate the route guard for a path and cookie header
        Guard {
            path: String,
            #[arg(long)]
            cookie: Option<String>,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CartCommand {
        List,
        Add {
            product_id: i64,
            #[arg(long)]
            option_id: Option<i64>,
            #[arg(long, default_value_t = 1)]
            quantity: u32,
        },
        Remove {
            cart_item_id: i64,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum OrderCommand {
        List,
        Show {
            order_id: i64,
        },
        Cancel {
            order_id: i64,
            #[arg(long)]
            reason: String,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum InquiryCommand {
        List,
        Create {
            #[arg(long)]
            title: String,
            #[arg(long)]
            content: String,
            #[arg(long)]
            category: Option<String>,
        },
    }

    impl CliConfig {
        /// 配置檔 → 環境變數 → 命令列參數，後者覆蓋前者
        pub fn resolve(&self) -> Result<StorefrontConfig> {
            let mut config = match (&self.config, &self.api_base_url) {
                (Some(path), _) => {
                    tracing::debug!("📄 Loading configuration from {}", path);
                    let mut config = StorefrontConfig::from_file(path)?;
                    config.apply_env_overrides();
                    config
                }
                (None, Some(base_url)) => StorefrontConfig::with_base_url(base_url.clone()),
                (None, None) => StorefrontConfig::from_env()?,
            };

            if let Some(base_url) = &self.api_base_url {
                config.api.base_url = base_url.clone();
            }
            if let Some(storage) = &self.storage {
                config.storage.path = storage.clone();
            }

            config.validate()?;
            Ok(config)
        }
    }

}
