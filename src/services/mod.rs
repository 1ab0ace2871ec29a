pub mod auth_service;
pub mod gift_card_service;
pub mod loyalty_service;
pub mod order_service;
pub mod product_service;
pub mod table_service;
