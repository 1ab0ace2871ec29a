use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::gift_cards::{
        CreateGiftCardRequest, GiftCardLists, RedeemGiftCardRequest, RedeemedGiftCard,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::GiftCard,
    response::ApiResponse,
    services::gift_card_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_gift_card))
        .route("/", get(list_gift_cards))
        .route("/redeem", post(redeem_gift_card))
}

#[utoipa::path(
    post,
    path = "/api/gift-cards",
    request_body = CreateGiftCardRequest,
    responses(
        (status = 201, description = "Gift card created", body = ApiResponse<GiftCard>),
        (status = 400, description = "Invalid amount or missing receiver"),
    ),
    security(("bearer_auth" = [])),
    tag = "Gift Cards"
)]
pub async fn create_gift_card(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGiftCardRequest>,
) -> AppResult<Json<ApiResponse<GiftCard>>> {
    let resp = gift_card_service::create_gift_card(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/gift-cards",
    responses(
        (status = 200, description = "Sent and received gift cards", body = ApiResponse<GiftCardLists>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Gift Cards"
)]
pub async fn list_gift_cards(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<GiftCardLists>>> {
    let resp = gift_card_service::list_gift_cards(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/gift-cards/redeem",
    request_body = RedeemGiftCardRequest,
    responses(
        (status = 200, description = "Gift card redeemed", body = ApiResponse<RedeemedGiftCard>),
        (status = 400, description = "Already redeemed or expired"),
        (status = 404, description = "Unknown code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Gift Cards"
)]
pub async fn redeem_gift_card(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RedeemGiftCardRequest>,
) -> AppResult<Json<ApiResponse<RedeemedGiftCard>>> {
    let resp = gift_card_service::redeem_gift_card(&state, &user, payload).await?;
    Ok(Json(resp))
}
