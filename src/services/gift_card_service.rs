use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::gift_cards::{
        CreateGiftCardRequest, GiftCardLists, ReceivedGiftCard, RedeemGiftCardRequest,
        RedeemedGiftCard, SentGiftCard,
    },
    entity::{
        gift_cards::{
            ActiveModel as GiftCardActive, Column as GiftCardCol, Entity as GiftCards,
            Model as GiftCardModel,
        },
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::GiftCard,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Short shareable code: first eight hex digits of a fresh UUID, uppercased.
pub fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

pub async fn create_gift_card(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGiftCardRequest,
) -> AppResult<ApiResponse<GiftCard>> {
    if payload.amount <= 0 {
        return Err(AppError::Validation(
            "Gift card amount must be greater than 0".into(),
        ));
    }
    if payload.receiver_email.trim().is_empty() {
        return Err(AppError::Validation("Receiver email is required".into()));
    }

    // Best-effort link: receivers who are not registered yet stay email-only.
    let receiver = Users::find()
        .filter(UserCol::Email.eq(payload.receiver_email.clone()))
        .one(&state.orm)
        .await?;
    let receiver_id = receiver.map(|u| u.id);

    let expiration_date = (Utc::now() + Duration::days(365)).date_naive();

    let gift_card = GiftCardActive {
        id: Set(Uuid::new_v4()),
        code: Set(generate_code()),
        sender_id: Set(Some(user.user_id)),
        receiver_id: Set(receiver_id),
        receiver_email: Set(payload.receiver_email),
        amount: Set(payload.amount),
        message: Set(payload.message),
        expiration_date: Set(expiration_date),
        is_redeemed: Set(false),
        redeemed_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "gift_card_create",
        Some("gift_cards"),
        Some(serde_json::json!({ "gift_card_id": gift_card.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Gift card created successfully",
        gift_card_from_entity(gift_card),
        Some(Meta::empty()),
    ))
}

pub async fn list_gift_cards(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<GiftCardLists>> {
    let sent = GiftCards::find()
        .filter(GiftCardCol::SenderId.eq(user.user_id))
        .all(&state.orm)
        .await?;

    let received = GiftCards::find()
        .filter(GiftCardCol::ReceiverId.eq(user.user_id))
        .all(&state.orm)
        .await?;

    let sender_ids: Vec<Uuid> = received.iter().filter_map(|g| g.sender_id).collect();
    let senders: HashMap<Uuid, (String, String)> = Users::find()
        .filter(UserCol::Id.is_in(sender_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| {
            let name = match (&u.first_name, &u.last_name) {
                (Some(first), Some(last)) => format!("{first} {last}"),
                (Some(first), None) => first.clone(),
                _ => u.username.clone(),
            };
            (u.id, (name, u.email))
        })
        .collect();

    let sent_gift_cards = sent
        .into_iter()
        .map(|g| SentGiftCard {
            id: g.id,
            code: g.code,
            receiver_email: g.receiver_email,
            amount: g.amount,
            message: g.message,
            created_at: g.created_at.with_timezone(&Utc),
            expiration_date: g.expiration_date,
            is_redeemed: g.is_redeemed,
        })
        .collect();

    let received_gift_cards = received
        .into_iter()
        .map(|g| {
            let (sender_name, sender_email) = g
                .sender_id
                .and_then(|id| senders.get(&id).cloned())
                .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
            ReceivedGiftCard {
                id: g.id,
                code: g.code,
                sender_name,
                sender_email,
                amount: g.amount,
                message: g.message,
                created_at: g.created_at.with_timezone(&Utc),
                expiration_date: g.expiration_date,
                is_redeemed: g.is_redeemed,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Gift cards",
        GiftCardLists {
            sent_gift_cards,
            received_gift_cards,
        },
        None,
    ))
}

/// Redemption only flips the ledger flag; no balance or currency store is
/// credited anywhere.
pub async fn redeem_gift_card(
    state: &AppState,
    user: &AuthUser,
    payload: RedeemGiftCardRequest,
) -> AppResult<ApiResponse<RedeemedGiftCard>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation("Gift card code is required".into()));
    }

    let txn = state.orm.begin().await?;

    let gift_card = GiftCards::find()
        .filter(GiftCardCol::Code.eq(payload.code.clone()))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let gift_card = match gift_card {
        Some(g) => g,
        None => return Err(AppError::NotFound),
    };

    if gift_card.is_redeemed {
        return Err(AppError::AlreadyRedeemed);
    }

    let now = Utc::now();
    if gift_card.expiration_date < now.date_naive() {
        return Err(AppError::Expired);
    }

    let receiver_id = gift_card.receiver_id;
    let mut active: GiftCardActive = gift_card.into();
    active.is_redeemed = Set(true);
    active.redeemed_at = Set(Some(now.into()));
    if receiver_id.is_none() {
        active.receiver_id = Set(Some(user.user_id));
    }
    let gift_card = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "gift_card_redeem",
        Some("gift_cards"),
        Some(serde_json::json!({ "gift_card_id": gift_card.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let redeemed_at = gift_card
        .redeemed_at
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);

    Ok(ApiResponse::success(
        "Gift card redeemed successfully",
        RedeemedGiftCard {
            id: gift_card.id,
            amount: gift_card.amount,
            redeemed_at,
        },
        Some(Meta::empty()),
    ))
}

fn gift_card_from_entity(model: GiftCardModel) -> GiftCard {
    GiftCard {
        id: model.id,
        code: model.code,
        sender_id: model.sender_id,
        receiver_id: model.receiver_id,
        receiver_email: model.receiver_email,
        amount: model.amount,
        message: model.message,
        expiration_date: model.expiration_date,
        is_redeemed: model.is_redeemed,
        redeemed_at: model.redeemed_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
