use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        OrderDetail, OrderItemDetail, OrderList, OrderWithItems, PlaceOrderRequest,
        UpdateOrderStatusRequest,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::{Column as ProdCol, Entity as Products},
        tables::{Column as TableCol, Entity as Tables},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// How many loyalty points a balance can put toward an order, and the discount
/// they buy, both computed at the fixed points-per-currency-unit rate. Amounts
/// are in minor units (cents).
pub fn points_discount(
    total_amount: i64,
    balance: i64,
    points_per_currency_unit: i64,
) -> (i64, i64) {
    if total_amount <= 0 || balance <= 0 {
        return (0, 0);
    }
    let max_redeemable = total_amount * points_per_currency_unit / 100;
    let points_to_use = balance.min(max_redeemable);
    let discount = points_to_use * 100 / points_per_currency_unit;
    (points_to_use, discount)
}

struct PricedLine {
    product_id: Uuid,
    quantity: i32,
    customizations: Option<Value>,
    unit_price: i64,
    total_price: i64,
}

pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    for line in &payload.items {
        if line.quantity < 1 {
            return Err(AppError::Validation(
                "Item quantity must be at least 1".into(),
            ));
        }
    }

    let txn = state.orm.begin().await?;

    // Concurrent orders from the same user can race on this read; the window
    // is accepted (see DESIGN.md) and the transaction itself stays atomic.
    let user_row = Users::find_by_id(user.user_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(table_number) = payload.table_number {
        let table = Tables::find()
            .filter(TableCol::TableNumber.eq(table_number))
            .one(&txn)
            .await?;
        if table.is_none() {
            return Err(AppError::Validation(format!(
                "Unknown table number {table_number}"
            )));
        }
    }

    let mut total_amount: i64 = 0;
    let mut points_earned: i64 = 0;
    let mut lines: Vec<PricedLine> = Vec::with_capacity(payload.items.len());

    for line in &payload.items {
        let product = Products::find_by_id(line.product_id).one(&txn).await?;
        let product = match product {
            Some(p) if p.is_available => p,
            _ => return Err(AppError::ProductUnavailable(line.product_id)),
        };

        // Customization selections are snapshotted on the item but do not
        // change the unit price; the product's base price is what gets charged.
        let unit_price = product.price;
        let line_total = unit_price * line.quantity as i64;
        total_amount += line_total;

        if product.points_value > 0 {
            points_earned += product.points_value * line.quantity as i64;
        }

        lines.push(PricedLine {
            product_id: product.id,
            quantity: line.quantity,
            customizations: line.customizations.clone(),
            unit_price,
            total_price: line_total,
        });
    }

    let mut points_used: i64 = 0;
    if payload.use_points && user_row.loyalty_points > 0 {
        let (points_to_use, discount) = points_discount(
            total_amount,
            user_row.loyalty_points,
            state.loyalty.points_per_currency_unit,
        );
        if discount > 0 {
            total_amount -= discount;
            points_used = points_to_use;
        }
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Pending.to_string()),
        total_amount: Set(total_amount),
        points_earned: Set(points_earned),
        points_used: Set(points_used),
        table_number: Set(payload.table_number),
        order_date: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            customizations: Set(line.customizations),
            unit_price: Set(line.unit_price),
            total_price: Set(line.total_price),
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(item));
    }

    // One net balance mutation per order: spend first, then credit.
    let new_balance = user_row.loyalty_points - points_used + points_earned;
    let mut active_user: UserActive = user_row.into();
    active_user.loyalty_points = Set(new_balance);
    active_user.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        points_earned,
        points_used,
        balance = new_balance,
        "order placed"
    );

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_place",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_amount": order.total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created successfully",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    // Ownership and existence are deliberately indistinguishable here.
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    let items = with_product_names(state, items).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderDetail {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(AppError::Validation)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    // No transition graph: any status is reachable from any other.
    let mut active: OrderActive = existing.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated successfully",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

async fn with_product_names(
    state: &AppState,
    items: Vec<OrderItemModel>,
) -> AppResult<Vec<OrderItemDetail>> {
    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let names: HashMap<Uuid, String> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| OrderItemDetail {
            product_name: names
                .get(&item.product_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            product_id: item.product_id,
            quantity: item.quantity,
            customizations: item.customizations,
            unit_price: item.unit_price,
            total_price: item.total_price,
        })
        .collect())
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: model.status,
        total_amount: model.total_amount,
        points_earned: model.points_earned,
        points_used: model.points_used,
        table_number: model.table_number,
        order_date: model.order_date.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        customizations: model.customizations,
        unit_price: model.unit_price,
        total_price: model.total_price,
    }
}
