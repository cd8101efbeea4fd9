use super::StorefrontApi;
use crate::api::response::ensure_success;
use crate::config::toml_config::SocialProviderConfig;
use crate::core::selection::{landing_path, ClientSelection};
use crate::core::social::SocialProvider;
use crate::domain::model::{
    EmailCodeRequest, EmailVerifyRequest, SignInRequest, SignInResponse, SignUpRequest,
    SocialCallbackRequest, User,
};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email, validate_mobile_phone, validate_password, validate_required_text,
    validate_verification_code,
};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct SocialSignIn {
    pub user: User,
    /// 登入前所在的商家頁面，沒有的話回首頁
    pub landing_path: String,
}

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        validate_required_text("password", password, 64)?;

        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: SignInResponse = self.post_public("/auth/sign-in", &request).await?;
        self.start_session(&response)?;

        tracing::info!("✅ Signed in as {}", response.user.email);
        Ok(response.user)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        validate_required_text("name", &request.name, 30)?;
        validate_mobile_phone(&request.phone)?;
        validate_verification_code(&request.verification_code)?;

        let user: User = self.post_public("/auth/sign-up", request).await?;
        tracing::info!("✅ Account created for {}", user.email);
        Ok(user)
    }

    pub async fn send_email_code(&self, email: &str) -> Result<()> {
        validate_email(email)?;
        self.post_public_empty(
            "/auth/email/code",
            &EmailCodeRequest {
                email: email.trim().to_string(),
            },
        )
        .await
    }

    pub async fn verify_email_code(&self, email: &str, code: &str) -> Result<()> {
        validate_email(email)?;
        validate_verification_code(code)?;
        self.post_public_empty(
            "/auth/email/verify",
            &EmailVerifyRequest {
                email: email.trim().to_string(),
                code: code.trim().to_string(),
            },
        )
        .await
    }

    /// 記下目前的商家後，回傳要導向的授權頁 URL
    pub fn begin_social_sign_in(
        &self,
        provider: SocialProvider,
        config: &SocialProviderConfig,
        state: Option<&str>,
        current_client_id: Option<i64>,
    ) -> Result<Url> {
        let url = provider.authorize_url(config, state)?;
        if let Some(client_id) = current_client_id {
            ClientSelection::new(self.session.storage()).remember_pending(client_id)?;
        }
        Ok(url)
    }

    /// 用 provider 回傳的 authorization code 換取登入
    pub async fn complete_social_sign_in(
        &self,
        provider: SocialProvider,
        config: &SocialProviderConfig,
        code: &str,
        state: Option<&str>,
    ) -> Result<SocialSignIn> {
        validate_required_text("code", code, 2048)?;

        let request = SocialCallbackRequest {
            code: code.to_string(),
            state: state.map(|s| s.to_string()),
            redirect_uri: config.redirect_uri.clone(),
        };
        let response: SignInResponse = self
            .post_public(&provider.callback_path(), &request)
            .await?;
        self.start_session(&response)?;

        let pending = ClientSelection::new(self.session.storage()).take_pending()?;
        tracing::info!("✅ Signed in with {} as {}", provider, response.user.email);

        Ok(SocialSignIn {
            user: response.user,
            landing_path: landing_path(pending),
        })
    }

    /// 後端登出失敗也一樣清掉本地資料
    pub async fn sign_out(&self) {
        if let Some(token) = self.session.access_token() {
            let result = self
                .session
                .client()
                .post(self.url("/auth/sign-out"))
                .bearer_auth(token)
                .send()
                .await;

            match result {
                Ok(response) => {
                    if let Err(e) = ensure_success(response).await {
                        tracing::debug!("Sign-out request rejected: {}", e);
                    }
                }
                Err(e) => tracing::debug!("Sign-out request failed: {}", e),
            }
        }

        self.session.clear();
        tracing::info!("👋 Signed out");
    }

    fn start_session(&self, response: &SignInResponse) -> Result<()> {
        self.session.store_tokens(&response.tokens())?;
        self.session.store_user(&response.user)
    }
}
