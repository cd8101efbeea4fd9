use crate::domain::ports::BrowserStorage;
use crate::utils::error::{Result, StorefrontError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    #[serde(default)]
    items: HashMap<String, String>,
    #[serde(default)]
    cookies: HashMap<String, CookieEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CookieEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CookieEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// CLI 用的 local storage：整份 JSON 檔案。
///
/// 讀寫都持有同一把鎖；寫入先寫到同目錄的暫存檔再 rename，讀取端不會看到寫到一半的檔案。
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 檔案不存在視為空的 storage；其他 I/O 錯誤往上回報
    fn read(&self) -> Result<StorageFile> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StorageFile::default()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(
                "⚠️ Ignoring unreadable storage file {}: {}",
                self.path.display(),
                e
            );
            StorageFile::default()
        }))
    }

    fn write(&self, file: &StorageFile) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)?;
                parent.to_path_buf()
            }
            _ => PathBuf::from("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                StorefrontError::storage(format!(
                    "storage path {} has no file name",
                    self.path.display()
                ))
            })?
            .to_string_lossy();
        let temp_path = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));

        let data = serde_json::to_vec_pretty(file)?;
        fs::write(&temp_path, data)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn snapshot(&self) -> Option<StorageFile> {
        let _guard = self.lock();
        match self.read() {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::error!(
                    "❌ Failed to read storage file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut StorageFile),
    {
        let _guard = self.lock();
        let mut file = self.read()?;
        mutate(&mut file);
        self.write(&file)
    }
}

impl BrowserStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.snapshot()?.items.remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|file| {
            file.items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|file| {
            file.items.remove(key);
        })
    }

    fn get_cookie(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.snapshot()?
            .cookies
            .remove(name)
            .filter(|cookie| cookie.is_live(now))
            .map(|cookie| cookie.value)
    }

    fn set_cookie(&self, name: &str, value: &str, max_age: Option<Duration>) -> Result<()> {
        let expires_at = match max_age {
            Some(age) => Some(
                Utc::now()
                    + chrono::Duration::from_std(age).map_err(|e| {
                        StorefrontError::storage(format!("invalid cookie max-age: {}", e))
                    })?,
            ),
            None => None,
        };

        self.update(|file| {
            file.cookies.insert(
                name.to_string(),
                CookieEntry {
                    value: value.to_string(),
                    expires_at,
                },
            );
        })
    }

    fn remove_cookie(&self, name: &str) -> Result<()> {
        self.update(|file| {
            file.cookies.remove(name);
        })
    }
}
