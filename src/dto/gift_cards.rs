use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGiftCardRequest {
    pub receiver_email: String,
    /// Minor currency units (cents).
    pub amount: i64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemGiftCardRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SentGiftCard {
    pub id: Uuid,
    pub code: String,
    pub receiver_email: String,
    pub amount: i64,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expiration_date: NaiveDate,
    pub is_redeemed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceivedGiftCard {
    pub id: Uuid,
    pub code: String,
    pub sender_name: String,
    pub sender_email: String,
    pub amount: i64,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expiration_date: NaiveDate,
    pub is_redeemed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GiftCardLists {
    pub sent_gift_cards: Vec<SentGiftCard>,
    pub received_gift_cards: Vec<ReceivedGiftCard>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemedGiftCard {
    pub id: Uuid,
    pub amount: i64,
    pub redeemed_at: DateTime<Utc>,
}
