use crate::domain::model::{CartItem, Order, PaymentMethod, PlaceOrderRequest, ShippingAddress};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::{validate_mobile_phone, validate_non_empty_string};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub total_quantity: u32,
}

impl CartSummary {
    /// 只計算勾選的品項；`selected_ids` 為 None 表示全選
    pub fn from_selection(items: &[CartItem], selected_ids: Option<&[i64]>) -> Self {
        let items: Vec<CartItem> = items
            .iter()
            .filter(|item| selected_ids.map_or(true, |ids| ids.contains(&item.id)))
            .cloned()
            .collect();

        Self {
            subtotal: items.iter().map(CartItem::line_total).sum(),
            total_quantity: items.iter().map(|item| item.quantity).sum(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// 多個品項時為「<第一個商品> 외 N건」
    pub fn goods_name(&self) -> String {
        match self.items.split_first() {
            None => String::new(),
            Some((first, [])) => first.product_name.clone(),
            Some((first, rest)) => format!("{} 외 {}건", first.product_name, rest.len()),
        }
    }
}

impl ShippingAddress {
    /// 地址查詢視窗完成時只會給郵遞區號與基本地址
    pub fn from_postcode(zonecode: &str, address: &str) -> Self {
        Self {
            recipient: String::new(),
            phone: String::new(),
            zonecode: zonecode.trim().to_string(),
            address: address.trim().to_string(),
            address_detail: String::new(),
            memo: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("recipient", &self.recipient),
            ("zonecode", &self.zonecode),
            ("address", &self.address),
            ("addressDetail", &self.address_detail),
        ];
        for (field, value) in required {
            validate_non_empty_string(field, value).map_err(|_| {
                StorefrontError::validation(field, "Please complete the shipping address.")
            })?;
        }
        validate_mobile_phone(&self.phone)
    }
}

pub fn build_order_request(
    summary: &CartSummary,
    shipping: ShippingAddress,
    payment_method: PaymentMethod,
) -> Result<PlaceOrderRequest> {
    if summary.is_empty() {
        return Err(StorefrontError::validation(
            "cartItemIds",
            "Select at least one item to order.",
        ));
    }
    shipping.validate()?;

    Ok(PlaceOrderRequest {
        cart_item_ids: summary.item_ids(),
        shipping,
        payment_method,
        amount: summary.subtotal,
    })
}

/// 交給支付視窗的參數
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub client_id: String,
    pub method: String,
    pub order_id: String,
    pub amount: i64,
    pub goods_name: String,
    pub return_url: String,
}

impl PaymentRequest {
    pub fn for_order(
        order: &Order,
        summary: &CartSummary,
        payment_method: PaymentMethod,
        merchant_id: &str,
        return_url: &str,
    ) -> Result<Self> {
        if order.total_amount <= 0 {
            return Err(StorefrontError::validation(
                "amount",
                "The order amount must be greater than zero.",
            ));
        }

        Ok(Self {
            client_id: merchant_id.to_string(),
            method: payment_method.widget_code().to_string(),
            order_id: order.order_number.clone(),
            amount: order.total_amount,
            goods_name: summary.goods_name(),
            return_url: return_url.to_string(),
        })
    }
}
