//! Category Model

use serde::{Deserialize, Serialize};

/// Menu category owned by exactly one restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub restaurant_id: i64,
    pub name_ar: String,
    pub name_en: String,
    pub description_ar: String,
    pub description_en: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFields {
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description_ar: String,
    #[serde(default)]
    pub description_en: String,
    /// Relative upload path; `None` keeps the current image on update
    pub image: Option<String>,
}
