use chrono::{DateTime, Datelike, Utc};

/// `12000` -> `12,000원`
pub fn format_price(amount: i64) -> String {
    format!("{}원", group_thousands(amount))
}

pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `2024-03-05T09:00:00Z` -> `2024.03.05`
pub fn format_date(value: &DateTime<Utc>) -> String {
    format!("{:04}.{:02}.{:02}", value.year(), value.month(), value.day())
}

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y.%m.%d %H:%M").to_string()
}

/// 折扣率（整數百分比），原價為 0 或沒有折扣時回傳 None
pub fn discount_rate(price: i64, discount_price: Option<i64>) -> Option<u32> {
    let discounted = discount_price?;
    if price <= 0 || discounted >= price {
        return None;
    }
    Some((((price - discounted) * 100) / price) as u32)
}
