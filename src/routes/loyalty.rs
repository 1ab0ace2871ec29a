use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::loyalty::{PointsSummary, RedemptionReceipt, RewardList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::loyalty_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/points", get(get_points))
        .route("/rewards", get(list_rewards))
        .route("/rewards/{reward_id}/redeem", post(redeem_reward))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/points",
    responses(
        (status = 200, description = "Balance and recent point activity", body = ApiResponse<PointsSummary>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Loyalty"
)]
pub async fn get_points(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PointsSummary>>> {
    let resp = loyalty_service::get_points(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/rewards",
    responses(
        (status = 200, description = "Rewards catalog", body = ApiResponse<RewardList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Loyalty"
)]
pub async fn list_rewards(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RewardList>>> {
    let resp = loyalty_service::list_rewards(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/loyalty/rewards/{reward_id}/redeem",
    params(
        ("reward_id" = i32, Path, description = "Reward ID")
    ),
    responses(
        (status = 200, description = "Reward redeemed", body = ApiResponse<RedemptionReceipt>),
        (status = 400, description = "Not enough points"),
        (status = 404, description = "Unknown reward"),
    ),
    security(("bearer_auth" = [])),
    tag = "Loyalty"
)]
pub async fn redeem_reward(
    State(state): State<AppState>,
    user: AuthUser,
    Path(reward_id): Path<i32>,
) -> AppResult<Json<ApiResponse<RedemptionReceipt>>> {
    let resp = loyalty_service::redeem_reward(&state, &user, reward_id).await?;
    Ok(Json(resp))
}
