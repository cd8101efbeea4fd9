mod common;

use anyhow::Result;
use goodspace_storefront::config::toml_config::PaymentConfig;
use goodspace_storefront::domain::model::{
    AddCartItemRequest, PaymentMethod, ShippingAddress, TokenPair,
};
use goodspace_storefront::{
    MemoryStorage, RecordingNavigator, SessionManager, StorefrontApi, StorefrontConfig,
};
use httpmock::prelude::*;

fn api_for(server: &MockServer) -> Result<StorefrontApi<MemoryStorage, RecordingNavigator>> {
    let config = StorefrontConfig::with_base_url(server.base_url());
    let session = SessionManager::new(&config, MemoryStorage::new(), RecordingNavigator::new())?;
    Ok(StorefrontApi::new(&config, session))
}

/// 登入 → 加入購物車 → token 過期 → 重送 → 結帳
#[tokio::test]
async fn test_shopping_flow_survives_token_expiry() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/auth/sign-in");
        then.status(200).json_body(serde_json::json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "user": {"id": 1, "email": "shopper@goodspace.co.kr", "name": "Shopper"}
        }));
    });
    let expired_add = server.mock(|when, then| {
        when.method(POST)
            .path("/carts")
            .header("authorization", "Bearer access-1");
        then.status(401);
    });
    let reissue = server.mock(|when, then| {
        when.method(POST)
            .path("/auth/reissue")
            .json_body(serde_json::json!({"refreshToken": "refresh-1"}));
        then.status(200)
            .json_body(serde_json::json!({"accessToken": "access-2", "refreshToken": "refresh-2"}));
    });
    let retried_add = server.mock(|when, then| {
        when.method(POST)
            .path("/carts")
            .header("authorization", "Bearer access-2")
            .json_body(serde_json::json!({"productId": 10, "quantity": 2}));
        then.status(201).json_body(serde_json::json!(
            {"id": 1, "productId": 10, "productName": "Tote", "price": 12000, "quantity": 2}
        ));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/carts")
            .header("authorization", "Bearer access-2");
        then.status(200).json_body(serde_json::json!([
            {"id": 1, "productId": 10, "productName": "Tote", "price": 12000, "quantity": 2}
        ]));
    });
    let place_order = server.mock(|when, then| {
        when.method(POST)
            .path("/orders")
            .header("authorization", "Bearer access-2");
        then.status(201).json_body(common::order_json(7));
    });

    let api = api_for(&server)?;
    api.sign_in("shopper@goodspace.co.kr", "goodspace1!").await?;

    let item = api
        .add_to_cart(&AddCartItemRequest {
            product_id: 10,
            option_id: None,
            quantity: 2,
        })
        .await?;
    assert_eq!(item.quantity, 2);
    expired_add.assert_hits(1);
    retried_add.assert_hits(1);
    reissue.assert_hits(1);
    assert_eq!(api.session().refresh_token().as_deref(), Some("refresh-2"));

    let summary = api.cart_summary(None).await?;
    let mut shipping = ShippingAddress::from_postcode("06236", "Seoul Gangnam-gu Teheran-ro 123");
    shipping.recipient = "Shopper".to_string();
    shipping.phone = "010-1234-5678".to_string();
    shipping.address_detail = "4F".to_string();

    let payment = PaymentConfig {
        merchant_id: "goodspace-mid".to_string(),
        return_url: "https://goodspace.co.kr/payments/return".to_string(),
    };
    let (order, payment_request) = api
        .checkout(&summary, shipping, PaymentMethod::VirtualAccount, &payment)
        .await?;

    place_order.assert();
    assert_eq!(order.id, 7);
    assert_eq!(payment_request.method, "vbank");
    assert_eq!(payment_request.goods_name, "Tote");
    Ok(())
}

#[tokio::test]
async fn test_sign_out_then_protected_call_needs_sign_in() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/auth/sign-out");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/users/me");
        then.status(401);
    });
    let reissue = server.mock(|when, then| {
        when.method(POST).path("/auth/reissue");
        then.status(200)
            .json_body(serde_json::json!({"accessToken": "should-not-happen"}));
    });

    let api = api_for(&server)?;
    api.session().store_tokens(&TokenPair {
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
    })?;

    api.sign_out().await;
    assert!(api.get_profile().await.is_err());
    reissue.assert_hits(0);
    Ok(())
}
