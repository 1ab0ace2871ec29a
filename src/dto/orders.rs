use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderItem};

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Selected customization options, recorded on the item as submitted.
    #[serde(default)]
    pub customizations: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub use_points: bool,
    pub table_number: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Order item joined with its product name for display.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDetail {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub customizations: Option<Value>,
    pub unit_price: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
