use axum_cafe_api::{
    config::LoyaltyConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        gift_cards::{CreateGiftCardRequest, RedeemGiftCardRequest},
        orders::{CartLine, PlaceOrderRequest, UpdateOrderStatusRequest},
        tables::CreateTableRequest,
    },
    entity::{
        gift_cards::{ActiveModel as GiftCardActive, Column as GiftCardCol, Entity as GiftCards},
        products::ActiveModel as ProductActive,
        tables::ActiveModel as TableActive,
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{OrderListQuery, Pagination},
    services::{gift_card_service, loyalty_service, order_service, table_service},
    state::AppState,
};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement,
};
use uuid::Uuid;

// Integration flow: a customer places an order spending loyalty points, redeems
// a reward, exchanges a gift card, while an admin manages tables and statuses.
#[tokio::test]
async fn order_loyalty_gift_card_and_table_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Seed users: a customer with 35 points banked and an admin.
    let user_id = create_user(&state, "user", "casual", "user@example.com", 35).await?;
    let admin_id = create_user(&state, "admin", "boss", "admin@example.com", 0).await?;

    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // Seed catalog: one available product, one taken off the menu.
    let latte = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Latte".into()),
        description: Set(Some("Espresso and steamed milk".into())),
        price: Set(500),
        category: Set("coffee".into()),
        image_url: Set(None),
        is_available: Set(true),
        points_value: Set(5),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let retired = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Pumpkin Spice".into()),
        description: Set(None),
        price: Set(600),
        category: Set("coffee".into()),
        image_url: Set(None),
        is_available: Set(false),
        points_value: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    TableActive {
        id: Set(Uuid::new_v4()),
        table_number: Set(1),
        qr_code_url: Set(None),
        is_occupied: Set(false),
    }
    .insert(&state.orm)
    .await?;

    // Empty cart is rejected outright.
    let err = order_service::place_order(
        &state,
        &auth_user,
        PlaceOrderRequest {
            items: vec![],
            use_points: false,
            table_number: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Unavailable products cannot be ordered.
    let err = order_service::place_order(
        &state,
        &auth_user,
        PlaceOrderRequest {
            items: vec![CartLine {
                product_id: retired.id,
                quantity: 1,
                customizations: None,
            }],
            use_points: false,
            table_number: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ProductUnavailable(_)));

    // Two lattes at $5.00 with 35 points banked: 35 points buy $3.50 off.
    let placed = order_service::place_order(
        &state,
        &auth_user,
        PlaceOrderRequest {
            items: vec![CartLine {
                product_id: latte.id,
                quantity: 2,
                customizations: Some(serde_json::json!({ "Size": "Large" })),
            }],
            use_points: true,
            table_number: Some(1),
        },
    )
    .await?;
    let placed = placed.data.unwrap();
    let order = placed.order;

    assert_eq!(order.status, "pending");
    assert_eq!(order.points_used, 35);
    assert_eq!(order.points_earned, 10);
    assert_eq!(order.total_amount, 650);

    // Item totals sum to the pre-discount amount.
    assert!(!placed.items.is_empty());
    let item_sum: i64 = placed.items.iter().map(|i| i.total_price).sum();
    assert_eq!(item_sum, order.total_amount + order.points_used * 10);

    // Net balance: 35 spent, 10 earned.
    let balance = user_balance(&state, user_id).await?;
    assert_eq!(balance, 10);

    // Reading the order twice yields identical data.
    let first = order_service::get_order(&state, &auth_user, order.id).await?;
    let second = order_service::get_order(&state, &auth_user, order.id).await?;
    let (first, second) = (first.data.unwrap(), second.data.unwrap());
    assert_eq!(first.order.total_amount, second.order.total_amount);
    assert_eq!(first.items.len(), second.items.len());

    // The order is invisible to other users.
    let err = order_service::get_order(&state, &auth_admin, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // The table sees the order while it is pending.
    let tables = table_service::list_tables(&state, &auth_admin).await?;
    let table = tables
        .data
        .unwrap()
        .items
        .into_iter()
        .find(|t| t.table_number == 1)
        .expect("table 1");
    let active = table_service::list_active_orders(&state, &auth_admin, table.id).await?;
    assert_eq!(active.data.unwrap().items.len(), 1);

    // Customers cannot change statuses; admins can set any status.
    let err = order_service::update_order_status(
        &state,
        &auth_user,
        order.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = order_service::update_order_status(
        &state,
        &auth_admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = order_service::update_order_status(
        &state,
        &auth_admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await?;
    assert_eq!(updated.data.unwrap().status, "completed");

    // Completed orders drop off the table's active list.
    let active = table_service::list_active_orders(&state, &auth_admin, table.id).await?;
    assert!(active.data.unwrap().items.is_empty());

    let listed = order_service::list_orders(
        &state,
        &auth_user,
        OrderListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            status: None,
            sort_order: None,
        },
    )
    .await?;
    assert_eq!(listed.data.unwrap().items.len(), 1);

    // Rewards: 10 points buy nothing from a 100-point catalog entry.
    let err = loyalty_service::redeem_reward(&state, &auth_user, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientPoints));
    assert_eq!(user_balance(&state, user_id).await?, 10);

    let err = loyalty_service::redeem_reward(&state, &auth_user, 99)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Top the customer up and redeem for real.
    set_user_balance(&state, user_id, 120).await?;
    let receipt = loyalty_service::redeem_reward(&state, &auth_user, 1).await?;
    let receipt = receipt.data.unwrap();
    assert_eq!(receipt.remaining_points, 20);
    assert!(receipt.redemption_code.starts_with("REWARD1-"));
    assert_eq!(user_balance(&state, user_id).await?, 20);

    // Gift cards: invalid amounts are rejected.
    let err = gift_card_service::create_gift_card(
        &state,
        &auth_user,
        CreateGiftCardRequest {
            receiver_email: "admin@example.com".into(),
            amount: 0,
            message: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A registered receiver gets linked by email at creation time.
    let card = gift_card_service::create_gift_card(
        &state,
        &auth_user,
        CreateGiftCardRequest {
            receiver_email: "admin@example.com".into(),
            amount: 2500,
            message: Some("Happy birthday".into()),
        },
    )
    .await?;
    let card = card.data.unwrap();
    assert_eq!(card.code.len(), 8);
    assert_eq!(card.receiver_id, Some(admin_id));
    assert!(!card.is_redeemed);

    let redeemed = gift_card_service::redeem_gift_card(
        &state,
        &auth_admin,
        RedeemGiftCardRequest {
            code: card.code.clone(),
        },
    )
    .await?;
    assert_eq!(redeemed.data.unwrap().amount, 2500);

    // Redemption is terminal.
    let err = gift_card_service::redeem_gift_card(
        &state,
        &auth_admin,
        RedeemGiftCardRequest {
            code: card.code.clone(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::AlreadyRedeemed));

    // An expired card cannot be redeemed and stays unredeemed.
    let expired = gift_card_service::create_gift_card(
        &state,
        &auth_admin,
        CreateGiftCardRequest {
            receiver_email: "nobody@example.com".into(),
            amount: 1000,
            message: None,
        },
    )
    .await?;
    let expired = expired.data.unwrap();

    let model = GiftCards::find()
        .filter(GiftCardCol::Id.eq(expired.id))
        .one(&state.orm)
        .await?
        .expect("expired card");
    let mut active: GiftCardActive = model.into();
    active.expiration_date = Set((Utc::now() - Duration::days(1)).date_naive());
    active.update(&state.orm).await?;

    let err = gift_card_service::redeem_gift_card(
        &state,
        &auth_user,
        RedeemGiftCardRequest {
            code: expired.code.clone(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Expired));

    let model = GiftCards::find()
        .filter(GiftCardCol::Id.eq(expired.id))
        .one(&state.orm)
        .await?
        .expect("expired card");
    assert!(!model.is_redeemed);

    // Table numbers are unique.
    let created = table_service::create_table(
        &state,
        &auth_admin,
        CreateTableRequest {
            table_number: 7,
            is_occupied: false,
        },
    )
    .await?;
    assert_eq!(created.data.unwrap().table_number, 7);

    let err = table_service::create_table(
        &state,
        &auth_admin,
        CreateTableRequest {
            table_number: 7,
            is_occupied: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = table_service::validate_table(&state, 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(
        table_service::validate_table(&state, 7)
            .await?
            .data
            .unwrap()
            .is_valid
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, gift_cards, customizations, products, tables, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        loyalty: LoyaltyConfig::default(),
        frontend_url: "http://localhost:3000".into(),
    })
}

async fn create_user(
    state: &AppState,
    role: &str,
    username: &str,
    email: &str,
    loyalty_points: i64,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        first_name: Set(None),
        last_name: Set(None),
        birthday: Set(None),
        loyalty_points: Set(loyalty_points),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn user_balance(state: &AppState, user_id: Uuid) -> anyhow::Result<i64> {
    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user exists");
    Ok(user.loyalty_points)
}

async fn set_user_balance(state: &AppState, user_id: Uuid, balance: i64) -> anyhow::Result<()> {
    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user exists");
    let mut active: UserActive = user.into();
    active.loyalty_points = Set(balance);
    active.update(&state.orm).await?;
    Ok(())
}
