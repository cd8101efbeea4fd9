use super::StorefrontApi;
use crate::core::selection::ClientSelection;
use crate::domain::model::{Client, Product};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::Result;

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.get_public("/clients").await
    }

    /// 進入商家頁面時順便記住目前的商家
    pub async fn get_client(&self, client_id: i64) -> Result<Client> {
        let client: Client = self.get_public(&format!("/clients/{}", client_id)).await?;
        ClientSelection::new(self.session.storage()).select(&client)?;
        Ok(client)
    }

    pub async fn list_client_products(&self, client_id: i64) -> Result<Vec<Product>> {
        self.get_public(&format!("/clients/{}/products", client_id))
            .await
    }

    pub async fn get_product(&self, product_id: i64) -> Result<Product> {
        self.get_public(&format!("/products/{}", product_id)).await
    }
}
