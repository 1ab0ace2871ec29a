use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::loyalty::{PointHistoryEntry, PointsSummary, RedemptionReceipt, RewardList, RewardView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Best-effort redemption code: literal prefix, reward id, a user id fragment,
/// and a time-derived suffix. Uniqueness is not guaranteed and nothing else in
/// the system validates these codes.
pub fn redemption_code(reward_id: i32, user_id: Uuid) -> String {
    let user_hex = user_id.simple().to_string();
    let suffix = Utc::now().format("%y%m%d%H%M%S");
    format!("REWARD{reward_id}-{}-{suffix}", &user_hex[..8])
}

pub async fn get_points(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PointsSummary>> {
    let balance: Option<(i64,)> = sqlx::query_as("SELECT loyalty_points FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let balance = match balance {
        Some((points,)) => points,
        None => return Err(AppError::NotFound),
    };

    #[derive(sqlx::FromRow)]
    struct HistoryRow {
        id: Uuid,
        order_date: chrono::DateTime<Utc>,
        points_earned: i64,
        points_used: i64,
    }

    let rows: Vec<HistoryRow> = sqlx::query_as(
        r#"
        SELECT id, order_date, points_earned, points_used
        FROM orders
        WHERE user_id = $1 AND (points_earned > 0 OR points_used > 0)
        ORDER BY order_date DESC
        LIMIT 10
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let point_history = rows
        .into_iter()
        .map(|row| PointHistoryEntry {
            order_id: row.id,
            date: row.order_date,
            points_earned: row.points_earned,
            points_used: row.points_used,
        })
        .collect();

    Ok(ApiResponse::success(
        "Loyalty points",
        PointsSummary {
            loyalty_points: balance,
            point_history,
        },
        None,
    ))
}

pub async fn list_rewards(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<RewardList>> {
    let balance: Option<(i64,)> = sqlx::query_as("SELECT loyalty_points FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let balance = match balance {
        Some((points,)) => points,
        None => return Err(AppError::NotFound),
    };

    let available_rewards = state
        .loyalty
        .rewards
        .iter()
        .map(|reward| RewardView {
            id: reward.id,
            name: reward.name.to_string(),
            description: reward.description.to_string(),
            points_required: reward.points_required,
            is_available: balance >= reward.points_required,
        })
        .collect();

    Ok(ApiResponse::success(
        "Rewards",
        RewardList {
            loyalty_points: balance,
            available_rewards,
        },
        None,
    ))
}

pub async fn redeem_reward(
    state: &AppState,
    user: &AuthUser,
    reward_id: i32,
) -> AppResult<ApiResponse<RedemptionReceipt>> {
    let reward = state
        .loyalty
        .find_reward(reward_id)
        .ok_or(AppError::NotFound)?;

    let mut txn = state.pool.begin().await?;

    let balance: Option<(i64,)> =
        sqlx::query_as("SELECT loyalty_points FROM users WHERE id = $1 FOR UPDATE")
            .bind(user.user_id)
            .fetch_optional(&mut *txn)
            .await?;
    let balance = match balance {
        Some((points,)) => points,
        None => return Err(AppError::NotFound),
    };

    if balance < reward.points_required {
        return Err(AppError::InsufficientPoints);
    }

    let remaining = balance - reward.points_required;
    sqlx::query("UPDATE users SET loyalty_points = $2 WHERE id = $1")
        .bind(user.user_id)
        .bind(remaining)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    let code = redemption_code(reward_id, user.user_id);

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reward_redeem",
        Some("rewards"),
        Some(serde_json::json!({ "reward_id": reward_id, "code": code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        format!("Successfully redeemed {}", reward.name),
        RedemptionReceipt {
            reward_name: reward.name.to_string(),
            remaining_points: remaining,
            redemption_code: code,
        },
        Some(Meta::empty()),
    ))
}
