use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct PointHistoryEntry {
    pub order_id: Uuid,
    pub date: DateTime<Utc>,
    pub points_earned: i64,
    pub points_used: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointsSummary {
    pub loyalty_points: i64,
    pub point_history: Vec<PointHistoryEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RewardView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub points_required: i64,
    pub is_available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RewardList {
    pub loyalty_points: i64,
    pub available_rewards: Vec<RewardView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedemptionReceipt {
    pub reward_name: String,
    pub remaining_points: i64,
    pub redemption_code: String,
}
