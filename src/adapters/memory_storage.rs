use crate::domain::ports::BrowserStorage;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredCookie {
    pub value: String,
    pub max_age: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    cookies: HashMap<String, StoredCookie>,
}

/// In-memory storage. Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cookie(&self, name: &str) -> Option<StoredCookie> {
        self.lock().cookies.get(name).cloned()
    }
}

impl BrowserStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.lock().items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().items.remove(key);
        Ok(())
    }

    fn get_cookie(&self, name: &str) -> Option<String> {
        self.lock().cookies.get(name).map(|c| c.value.clone())
    }

    fn set_cookie(&self, name: &str, value: &str, max_age: Option<Duration>) -> Result<()> {
        self.lock().cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                max_age,
            },
        );
        Ok(())
    }

    fn remove_cookie(&self, name: &str) -> Result<()> {
        self.lock().cookies.remove(name);
        Ok(())
    }
}
