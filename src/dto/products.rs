use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::{Customization, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomizationInput {
    pub name: String,
    /// Option labels, in menu order.
    pub options: Vec<String>,
    /// Price delta (cents) per option label. Keys must match `options`.
    #[serde(default)]
    pub price_impact: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub points_value: Option<i64>,
    #[serde(default)]
    pub customizations: Vec<CustomizationInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub points_value: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductWithCustomizations {
    #[serde(flatten)]
    pub product: Product,
    pub customizations: Vec<Customization>,
}
