use super::StorefrontApi;
use crate::domain::model::{UpdateProfileRequest, User};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::{validate_mobile_phone, validate_password, validate_required_text};
use reqwest::Method;

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    /// 取最新的會員資料並更新本地快取
    pub async fn get_profile(&self) -> Result<User> {
        let user: User = self.get_authorized("/users/me").await?;
        self.session.store_user(&user)?;
        Ok(user)
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        if request.is_empty() {
            return Err(StorefrontError::validation(
                "profile",
                "There is nothing to update.",
            ));
        }
        if let Some(name) = &request.name {
            validate_required_text("name", name, 30)?;
        }
        if let Some(phone) = &request.phone {
            validate_mobile_phone(phone)?;
        }
        if let Some(new_password) = &request.new_password {
            if request.current_password.is_none() {
                return Err(StorefrontError::validation(
                    "currentPassword",
                    "Enter your current password to set a new one.",
                ));
            }
            validate_password(new_password)?;
        }

        let user: User = self
            .send_authorized_json(Method::PATCH, "/users/me", request)
            .await?;
        self.session.store_user(&user)?;
        tracing::info!("✅ Profile updated for {}", user.email);
        Ok(user)
    }
}
