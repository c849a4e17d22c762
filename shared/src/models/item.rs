//! Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item owned by exactly one restaurant, optionally filed under one of
/// that restaurant's categories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub restaurant_id: i64,
    pub category_id: Option<i64>,
    pub name_ar: String,
    pub name_en: String,
    pub description_ar: String,
    pub description_en: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFields {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description_ar: String,
    #[serde(default)]
    pub description_en: String,
    /// Missing price is stored as zero
    pub price: Option<Decimal>,
    pub image: Option<String>,
}

impl ItemFields {
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// Negative prices are rejected
    pub fn validate_price(&self) -> bool {
        self.price.is_none_or(|p| !p.is_sign_negative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_json_number() {
        let fields: ItemFields =
            serde_json::from_str(r#"{"name_en":"Latte","price":3.5,"category_id":7}"#).unwrap();
        assert_eq!(fields.price_or_zero(), Decimal::new(35, 1));
        assert_eq!(fields.category_id, Some(7));
        assert!(fields.validate_price());
    }

    #[test]
    fn test_missing_price_is_zero() {
        let fields: ItemFields = serde_json::from_str(r#"{"name_en":"Water"}"#).unwrap();
        assert_eq!(fields.price_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_rejected() {
        let fields = ItemFields {
            price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        };
        assert!(!fields.validate_price());
    }
}
