use crate::domain::ports::Navigator;
use std::sync::{Arc, Mutex};

/// Records every navigation instead of performing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visited: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<String> {
        self.visited().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        match self.visited.lock() {
            Ok(mut visited) => visited.push(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push(path.to_string()),
        }
    }
}

/// 沒有瀏覽器時（CLI）只把導向記錄到 log
#[derive(Debug, Clone, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::warn!("🔐 Navigation requested: {}", path);
    }
}
