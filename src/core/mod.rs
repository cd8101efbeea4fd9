pub mod checkout;
pub mod jwt;
pub mod pagination;
pub mod route_guard;
pub mod selection;
pub mod session;
pub mod social;

pub use crate::domain::model::{TokenPair, User};
pub use crate::domain::ports::{BrowserStorage, ConfigProvider, Navigator, TokenReissuer};
pub use crate::utils::error::Result;
