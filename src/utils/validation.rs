use crate::utils::error::{Result, StorefrontError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 20;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

// 010-1234-5678 / 01012345678 / 011-123-4567
static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^01[016789]-?\d{3,4}-?\d{4}$").expect("mobile pattern is a valid regex")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(StorefrontError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 路由路徑必須以 `/` 開頭
pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.starts_with('/') {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route path must start with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(StorefrontError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// ---- 表單驗證 ----

/// 密碼規則：8~20 字元，需同時包含英文字母、數字、特殊字元，不可有空白
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(StorefrontError::validation(
            "password",
            format!(
                "Password must be {} to {} characters long.",
                PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
            ),
        ));
    }

    if password.chars().any(char::is_whitespace) {
        return Err(StorefrontError::validation("password", "Password cannot contain spaces."));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| c.is_ascii_punctuation());

    if !(has_letter && has_digit && has_special) {
        return Err(StorefrontError::validation(
            "password",
            "Password must include letters, numbers and special characters.",
        ));
    }

    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(StorefrontError::validation("passwordConfirm", "Passwords do not match."));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(StorefrontError::validation("email", "Please enter a valid email address."));
    }
    Ok(())
}

pub fn validate_mobile_phone(phone: &str) -> Result<()> {
    if !MOBILE_PATTERN.is_match(phone.trim()) {
        return Err(StorefrontError::validation("phone", "Please enter a valid mobile number."));
    }
    Ok(())
}

pub fn validate_required_text(field_name: &str, value: &str, max_chars: usize) -> Result<()> {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(StorefrontError::validation(field_name, "This field is required."));
    }
    if length > max_chars {
        return Err(StorefrontError::validation(
            field_name,
            format!("Please keep this under {} characters.", max_chars),
        ));
    }
    Ok(())
}

pub fn validate_verification_code(code: &str) -> Result<()> {
    let code = code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(StorefrontError::validation("code", "The verification code is 6 digits."));
    }
    Ok(())
}
