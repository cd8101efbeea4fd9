use super::StorefrontApi;
use crate::core::checkout::CartSummary;
use crate::domain::model::{AddCartItemRequest, CartItem, UpdateCartItemRequest};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::{Result, StorefrontError};
use reqwest::Method;

pub const MAX_CART_QUANTITY: u32 = 99;

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 || quantity > MAX_CART_QUANTITY {
        return Err(StorefrontError::validation(
            "quantity",
            format!("Quantity must be between 1 and {}.", MAX_CART_QUANTITY),
        ));
    }
    Ok(())
}

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub async fn list_cart(&self) -> Result<Vec<CartItem>> {
        self.get_authorized("/carts").await
    }

    pub async fn add_to_cart(&self, request: &AddCartItemRequest) -> Result<CartItem> {
        validate_quantity(request.quantity)?;
        let item: CartItem = self
            .send_authorized_json(Method::POST, "/carts", request)
            .await?;
        tracing::info!("🛒 Added {} x{} to cart", item.product_name, item.quantity);
        Ok(item)
    }

    pub async fn update_cart_quantity(&self, cart_item_id: i64, quantity: u32) -> Result<CartItem> {
        validate_quantity(quantity)?;
        self.send_authorized_json(
            Method::PATCH,
            &format!("/carts/{}", cart_item_id),
            &UpdateCartItemRequest { quantity },
        )
        .await
    }

    pub async fn remove_from_cart(&self, cart_item_id: i64) -> Result<()> {
        self.delete_authorized(&format!("/carts/{}", cart_item_id))
            .await
    }

    /// `selected_ids` 為 None 表示全選
    pub async fn cart_summary(&self, selected_ids: Option<&[i64]>) -> Result<CartSummary> {
        let items = self.list_cart().await?;
        Ok(CartSummary::from_selection(&items, selected_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryStorage, RecordingNavigator};
    use crate::config::toml_config::StorefrontConfig;
    use crate::core::session::SessionManager;
    use crate::domain::model::TokenPair;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;

    fn signed_in_api(server: &MockServer) -> StorefrontApi<MemoryStorage, RecordingNavigator> {
        let config = StorefrontConfig::with_base_url(server.base_url());
        let session =
            SessionManager::new(&config, MemoryStorage::new(), RecordingNavigator::new()).unwrap();
        session
            .store_tokens(&TokenPair {
                access_token: "access-1".to_string(),
                refresh_token: Some("refresh-1".to_string()),
            })
            .unwrap();
        StorefrontApi::new(&config, session)
    }

    fn cart_body() -> serde_json::Value {
        serde_json::json!([
            {"id": 1, "productId": 10, "productName": "Tote", "price": 12000, "quantity": 2},
            {"id": 2, "productId": 11, "productName": "Mug", "price": 8000, "quantity": 1}
        ])
    }

    #[tokio::test]
    async fn test_list_cart() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/carts")
                .header("authorization", "Bearer access-1");
            then.status(200).json_body(cart_body());
        });

        let api = signed_in_api(&server);
        let items = api.list_cart().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_total(), 24000);
    }

    #[tokio::test]
    async fn test_cart_summary_for_selection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_body());
        });

        let api = signed_in_api(&server);
        let summary = api.cart_summary(Some(&[2][..])).await.unwrap();

        assert_eq!(summary.subtotal, 8000);
        assert_eq!(summary.item_ids(), vec![2]);
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_zero_quantity() {
        let server = MockServer::start();
        let add_mock = server.mock(|when, then| {
            when.method(POST).path("/carts");
            then.status(201);
        });

        let api = signed_in_api(&server);
        let err = api
            .add_to_cart(&AddCartItemRequest {
                product_id: 10,
                option_id: None,
                quantity: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StorefrontError::ValidationError { .. }));
        add_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_add_update_and_remove() {
        let server = MockServer::start();
        let add_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/carts")
                .json_body(serde_json::json!({"productId": 10, "optionId": 3, "quantity": 1}));
            then.status(201).json_body(serde_json::json!(
                {"id": 7, "productId": 10, "optionId": 3, "productName": "Tote", "optionName": "Navy", "price": 12000, "quantity": 1}
            ));
        });
        let update_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/carts/7")
                .json_body(serde_json::json!({"quantity": 3}));
            then.status(200).json_body(serde_json::json!(
                {"id": 7, "productId": 10, "productName": "Tote", "price": 12000, "quantity": 3}
            ));
        });
        let remove_mock = server.mock(|when, then| {
            when.method(DELETE).path("/carts/7");
            then.status(204);
        });

        let api = signed_in_api(&server);
        let item = api
            .add_to_cart(&AddCartItemRequest {
                product_id: 10,
                option_id: Some(3),
                quantity: 1,
            })
            .await
            .unwrap();
        let updated = api.update_cart_quantity(item.id, 3).await.unwrap();
        api.remove_from_cart(item.id).await.unwrap();

        add_mock.assert();
        update_mock.assert();
        remove_mock.assert();
        assert_eq!(updated.line_total(), 36000);
    }
}
