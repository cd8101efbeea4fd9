use crate::domain::model::Client;
use crate::domain::ports::{BrowserStorage, PENDING_CLIENT_ID_KEY, SELECTED_CLIENT_KEY};
use crate::utils::error::Result;

/// 目前瀏覽中的商家，以及社群登入前暫存的商家 id
pub struct ClientSelection<'a, S: BrowserStorage> {
    storage: &'a S,
}

impl<'a, S: BrowserStorage> ClientSelection<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub fn select(&self, client: &Client) -> Result<()> {
        let json = serde_json::to_string(client)?;
        self.storage.set_item(SELECTED_CLIENT_KEY, &json)
    }

    pub fn selected(&self) -> Option<Client> {
        let json = self.storage.get_item(SELECTED_CLIENT_KEY)?;
        serde_json::from_str(&json)
            .map_err(|e| tracing::warn!("⚠️ Stored client selection is unreadable: {}", e))
            .ok()
    }

    pub fn clear_selected(&self) -> Result<()> {
        self.storage.remove_item(SELECTED_CLIENT_KEY)
    }

    /// 離開網站去做社群登入前記下來
    pub fn remember_pending(&self, client_id: i64) -> Result<()> {
        self.storage
            .set_item(PENDING_CLIENT_ID_KEY, &client_id.to_string())
    }

    /// 取出後即刪除
    pub fn take_pending(&self) -> Result<Option<i64>> {
        let pending = self.storage.get_item(PENDING_CLIENT_ID_KEY);
        if pending.is_some() {
            self.storage.remove_item(PENDING_CLIENT_ID_KEY)?;
        }
        Ok(pending.and_then(|id| id.trim().parse().ok()))
    }
}

/// 登入後要回到的頁面
pub fn landing_path(client_id: Option<i64>) -> String {
    match client_id {
        Some(id) => format!("/clients/{}", id),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    fn client() -> Client {
        Client {
            id: 42,
            name: "Good Coffee".to_string(),
            slug: Some("good-coffee".to_string()),
            logo_url: None,
            banner_url: None,
            description: None,
        }
    }

    #[test]
    fn test_select_and_read_back() {
        let storage = MemoryStorage::new();
        let selection = ClientSelection::new(&storage);

        assert!(selection.selected().is_none());
        selection.select(&client()).unwrap();
        assert_eq!(selection.selected(), Some(client()));

        selection.clear_selected().unwrap();
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_pending_client_is_consumed_once() {
        let storage = MemoryStorage::new();
        let selection = ClientSelection::new(&storage);

        selection.remember_pending(42).unwrap();
        assert_eq!(selection.take_pending().unwrap(), Some(42));
        assert_eq!(selection.take_pending().unwrap(), None);
    }

    #[test]
    fn test_garbage_pending_id_is_dropped() {
        let storage = MemoryStorage::new();
        storage.set_item(PENDING_CLIENT_ID_KEY, "abc").unwrap();

        let selection = ClientSelection::new(&storage);
        assert_eq!(selection.take_pending().unwrap(), None);
        assert!(storage.get_item(PENDING_CLIENT_ID_KEY).is_none());
    }

    #[test]
    fn test_landing_path() {
        assert_eq!(landing_path(Some(7)), "/clients/7");
        assert_eq!(landing_path(None), "/");
    }
}
