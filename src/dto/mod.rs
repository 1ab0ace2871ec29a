pub mod auth;
pub mod gift_cards;
pub mod loyalty;
pub mod orders;
pub mod products;
pub mod tables;
