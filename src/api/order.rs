use super::StorefrontApi;
use crate::config::toml_config::PaymentConfig;
use crate::core::checkout::{build_order_request, CartSummary, PaymentRequest};
use crate::domain::model::{
    CancelOrderRequest, Order, PaymentMethod, PlaceOrderRequest, ShippingAddress,
};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::validate_required_text;
use reqwest::Method;

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Order> {
        if request.cart_item_ids.is_empty() {
            return Err(StorefrontError::validation(
                "cartItemIds",
                "Select at least one item to order.",
            ));
        }
        let order: Order = self
            .send_authorized_json(Method::POST, "/orders", request)
            .await?;
        tracing::info!(
            "📦 Order {} placed ({} KRW)",
            order.order_number,
            order.total_amount
        );
        Ok(order)
    }

    /// 建立訂單並準備支付視窗參數
    pub async fn checkout(
        &self,
        summary: &CartSummary,
        shipping: ShippingAddress,
        payment_method: PaymentMethod,
        payment: &PaymentConfig,
    ) -> Result<(Order, PaymentRequest)> {
        let request = build_order_request(summary, shipping, payment_method)?;
        let order = self.place_order(&request).await?;
        let payment_request = PaymentRequest::for_order(
            &order,
            summary,
            payment_method,
            &payment.merchant_id,
            &payment.return_url,
        )?;
        Ok((order, payment_request))
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.get_authorized("/orders").await
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Order> {
        self.get_authorized(&format!("/orders/{}", order_id)).await
    }

    pub async fn cancel_order(&self, order_id: i64, reason: &str) -> Result<Order> {
        validate_required_text("reason", reason, 500)?;
        let order: Order = self
            .send_authorized_json(
                Method::POST,
                &format!("/orders/{}/cancel", order_id),
                &CancelOrderRequest {
                    reason: reason.trim().to_string(),
                },
            )
            .await?;
        tracing::info!("🚫 Order {} cancelled", order.order_number);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryStorage, RecordingNavigator};
    use crate::config::toml_config::StorefrontConfig;
    use crate::core::session::SessionManager;
    use crate::domain::model::{CartItem, OrderStatus, TokenPair};
    use httpmock::prelude::*;

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

    fn order_body(status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 31,
            "orderNumber": "GS-20240305-0031",
            "status": status,
            "totalAmount": 24000,
            "items": [{"productId": 10, "productName": "Tote", "price": 12000, "quantity": 2}],
            "createdAt": "2024-03-05T09:00:00Z"
        })
    }

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            recipient: "Kim".to_string(),
            phone: "010-1234-5678".to_string(),
            zonecode: "06236".to_string(),
            address: "Seoul Gangnam-gu Teheran-ro 123".to_string(),
            address_detail: "4F".to_string(),
            memo: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_places_order_and_builds_payment() {
        let server = MockServer::start();
        let place_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders")
                .json_body_partial(r#"{"cartItemIds": [1], "paymentMethod": "CARD", "amount": 24000}"#);
            then.status(201).json_body(order_body("PENDING_PAYMENT"));
        });

        let api = signed_in_api(&server);
        let summary = CartSummary::from_selection(
            &[CartItem {
                id: 1,
                product_id: 10,
                option_id: None,
                product_name: "Tote".to_string(),
                option_name: None,
                price: 12000,
                quantity: 2,
                thumbnail_url: None,
            }],
            None,
        );
        let payment = PaymentConfig {
            merchant_id: "goodspace-mid".to_string(),
            return_url: "https://goodspace.co.kr/payments/return".to_string(),
        };

        let (order, payment_request) = api
            .checkout(&summary, shipping(), PaymentMethod::Card, &payment)
            .await
            .unwrap();

        place_mock.assert();
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(payment_request.order_id, "GS-20240305-0031");
        assert_eq!(payment_request.method, "card");
        assert_eq!(payment_request.amount, 24000);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_sends_nothing() {
        let server = MockServer::start();
        let place_mock = server.mock(|when, then| {
            when.method(POST).path("/orders");
            then.status(201).json_body(order_body("PENDING_PAYMENT"));
        });

        let api = signed_in_api(&server);
        let summary = CartSummary::from_selection(&[], None);
        let payment = PaymentConfig {
            merchant_id: "goodspace-mid".to_string(),
            return_url: "https://goodspace.co.kr/payments/return".to_string(),
        };

        assert!(api
            .checkout(&summary, shipping(), PaymentMethod::Card, &payment)
            .await
            .is_err());
        place_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_list_and_get_orders() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(200)
                .json_body(serde_json::json!([order_body("PAID"), order_body("DELIVERED")]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/orders/31");
            then.status(200).json_body(order_body("SHIPPING"));
        });

        let api = signed_in_api(&server);
        let orders = api.list_orders().await.unwrap();
        let order = api.get_order(31).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].status, OrderStatus::Delivered);
        assert_eq!(order.status, OrderStatus::Shipping);
    }

    #[tokio::test]
    async fn test_cancel_requires_reason() {
        let server = MockServer::start();
        let cancel_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders/31/cancel")
                .json_body(serde_json::json!({"reason": "Changed my mind"}));
            then.status(200).json_body(order_body("CANCELLED"));
        });

        let api = signed_in_api(&server);
        assert!(api.cancel_order(31, "  ").await.is_err());
        cancel_mock.assert_hits(0);

        let order = api.cancel_order(31, " Changed my mind ").await.unwrap();
        cancel_mock.assert();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }
}
