use chrono::Utc;
use clap::Parser;
use goodspace_storefront::config::{CartCommand, Command, InquiryCommand, OrderCommand};
use goodspace_storefront::core::pagination::paginate;
use goodspace_storefront::core::social::SocialProvider;
use goodspace_storefront::domain::model::{AddCartItemRequest, CreateInquiryRequest};
use goodspace_storefront::utils::error::ErrorSeverity;
use goodspace_storefront::utils::format::{format_date, format_price};
use goodspace_storefront::utils::logger;
use goodspace_storefront::{
    CliConfig, FileStorage, GuardDecision, LoggingNavigator, Result, RouteGuard, SessionManager,
    StorefrontApi, StorefrontConfig, StorefrontError,
};

type Api = StorefrontApi<FileStorage, LoggingNavigator>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let resolved = cli.resolve();

    // 初始化日誌：設定檔讀不到時用預設輸出
    match &resolved {
        Ok(config) => logger::init(&config.log_output(cli.verbose)),
        Err(_) => logger::init_cli_logger(cli.verbose),
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    let result = match resolved {
        Ok(config) => run(&cli.command, &config).await,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            Err(e)
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: &Command, config: &StorefrontConfig) -> Result<()> {
    let storage = FileStorage::new(config.storage_path());
    let session = SessionManager::new(config, storage, LoggingNavigator)?;
    let api: Api = StorefrontApi::new(config, session);

    match command {
        Command::SignIn { email, password } => {
            let user = api.sign_in(email, password).await?;
            println!("✅ Signed in as {} <{}>", user.name, user.email);
        }
        Command::SignOut => {
            api.sign_out().await;
            println!("👋 Signed out");
        }
        Command::Whoami => {
            if !api.session().is_authenticated() {
                return Err(StorefrontError::AuthenticationRequired);
            }
            let user = api.get_profile().await?;
            println!("{} <{}>", user.name, user.email);
            if let Some(phone) = &user.phone {
                println!("📱 {}", phone);
            }
        }
        Command::Refresh => {
            api.session()
                .refresh_access_token()
                .await
                .ok_or(StorefrontError::AuthenticationRequired)?;
            println!("✅ Access token refreshed");
        }
        Command::SocialUrl {
            provider,
            state,
            client_id,
        } => {
            let provider = SocialProvider::from_name(provider).ok_or_else(|| {
                StorefrontError::validation("provider", format!("Unknown provider '{}'.", provider))
            })?;
            let provider_config = config.social_provider(provider)?;
            let url =
                api.begin_social_sign_in(provider, provider_config, state.as_deref(), *client_id)?;
            println!("{}", url);
        }
        Command::Clients => {
            for client in api.list_clients().await? {
                println!("{:>6}  {}", client.id, client.name);
            }
        }
        Command::Products {
            client_id,
            page,
            per_page,
        } => {
            let products = api.list_client_products(*client_id).await?;
            let page = paginate(&products, *page, *per_page);
            for product in &page.items {
                println!(
                    "{:>6}  {}  {}",
                    product.id,
                    product.name,
                    format_price(product.sale_price())
                );
            }
            println!(
                "-- page {}/{} ({} products)",
                page.page, page.total_pages, page.total_items
            );
        }
        Command::Cart { action } => cart(&api, action).await?,
        Command::Orders { action } => orders(&api, action).await?,
        Command::Inquiries { action } => inquiries(&api, action).await?,
        Command::Guard { path, cookie } => guard(config, path, cookie.as_deref()).await?,
    }

    Ok(())
}

async fn cart(api: &Api, action: &CartCommand) -> Result<()> {
    match action {
        CartCommand::List => {
            let summary = api.cart_summary(None).await?;
            for item in &summary.items {
                println!(
                    "{:>6}  {}{}  x{}  {}",
                    item.id,
                    item.product_name,
                    item.option_name
                        .as_deref()
                        .map(|o| format!(" ({})", o))
                        .unwrap_or_default(),
                    item.quantity,
                    format_price(item.line_total())
                );
            }
            println!("🛒 Total {}", format_price(summary.subtotal));
        }
        CartCommand::Add {
            product_id,
            option_id,
            quantity,
        } => {
            let item = api
                .add_to_cart(&AddCartItemRequest {
                    product_id: *product_id,
                    option_id: *option_id,
                    quantity: *quantity,
                })
                .await?;
            println!("🛒 Added {} x{}", item.product_name, item.quantity);
        }
        CartCommand::Remove { cart_item_id } => {
            api.remove_from_cart(*cart_item_id).await?;
            println!("🗑️ Removed cart item {}", cart_item_id);
        }
    }
    Ok(())
}

async fn orders(api: &Api, action: &OrderCommand) -> Result<()> {
    match action {
        OrderCommand::List => {
            for order in api.list_orders().await? {
                println!(
                    "{}  {}  {}  {}",
                    format_date(&order.created_at),
                    order.order_number,
                    order.status.label(),
                    format_price(order.total_amount)
                );
            }
        }
        OrderCommand::Show { order_id } => {
            let order = api.get_order(*order_id).await?;
            println!("{} ({})", order.order_number, order.status.label());
            for line in &order.items {
                println!(
                    "  {} x{}  {}",
                    line.product_name,
                    line.quantity,
                    format_price(line.price * i64::from(line.quantity))
                );
            }
            println!("  Total {}", format_price(order.total_amount));
        }
        OrderCommand::Cancel { order_id, reason } => {
            let order = api.cancel_order(*order_id, reason).await?;
            println!("🚫 {} is now {}", order.order_number, order.status.label());
        }
    }
    Ok(())
}

async fn inquiries(api: &Api, action: &InquiryCommand) -> Result<()> {
    match action {
        InquiryCommand::List => {
            for inquiry in api.list_inquiries().await? {
                println!(
                    "{:>6}  {}  {:?}  {}",
                    inquiry.id,
                    format_date(&inquiry.created_at),
                    inquiry.status,
                    inquiry.title
                );
            }
        }
        InquiryCommand::Create {
            title,
            content,
            category,
        } => {
            let inquiry = api
                .create_inquiry(&CreateInquiryRequest {
                    title: title.clone(),
                    content: content.clone(),
                    category: category.clone(),
                })
                .await?;
            println!("✉️ Inquiry {} submitted", inquiry.id);
        }
    }
    Ok(())
}

async fn guard(config: &StorefrontConfig, path: &str, cookie: Option<&str>) -> Result<()> {
    let guard = RouteGuard::new(config)?;
    match guard.evaluate(path, cookie, Utc::now()).await {
        GuardDecision::Pass => println!("PASS {}", path),
        GuardDecision::PassWithReissue { set_cookies, .. } => {
            println!("PASS {} (reissued)", path);
            for cookie in set_cookies {
                println!("Set-Cookie: {}", cookie);
            }
        }
        GuardDecision::Redirect {
            location,
            clear_cookies,
        } => {
            println!("REDIRECT {}", location);
            for cookie in clear_cookies {
                println!("Set-Cookie: {}", cookie);
            }
        }
    }
    Ok(())
}
