use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::OrderList,
    dto::tables::{
        CreateTableRequest, QrPayload, TableList, TableValidation, UpdateTableStatusRequest,
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        tables::{ActiveModel as TableActive, Column as TableCol, Entity as Tables, Model as TableModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, Table},
    response::{ApiResponse, Meta},
    services::order_service::order_from_entity,
    state::AppState,
};

pub async fn list_tables(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<TableList>> {
    ensure_admin(user)?;
    let items = Tables::find()
        .order_by_asc(TableCol::TableNumber)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(table_from_entity)
        .collect();

    Ok(ApiResponse::success("Tables", TableList { items }, None))
}

pub async fn create_table(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_admin(user)?;

    if payload.table_number < 1 {
        return Err(AppError::Validation(
            "Table number must be at least 1".into(),
        ));
    }

    let existing = Tables::find()
        .filter(TableCol::TableNumber.eq(payload.table_number))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Table {} already exists",
            payload.table_number
        )));
    }

    let id = Uuid::new_v4();
    let table = TableActive {
        id: Set(id),
        table_number: Set(payload.table_number),
        qr_code_url: Set(Some(format!("/api/tables/{id}/qr"))),
        is_occupied: Set(payload.is_occupied),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_create",
        Some("tables"),
        Some(serde_json::json!({ "table_id": table.id, "table_number": table.table_number })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Table created successfully",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

/// The string a QR renderer would encode for this table. Rendering the image
/// itself happens outside this service.
pub async fn table_qr_payload(state: &AppState, table_id: Uuid) -> AppResult<ApiResponse<QrPayload>> {
    let table = Tables::find_by_id(table_id).one(&state.orm).await?;
    let table = match table {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let payload = format!("{}/table/{}", state.frontend_url, table.table_number);

    Ok(ApiResponse::success(
        "QR payload",
        QrPayload {
            table_number: table.table_number,
            payload,
        },
        None,
    ))
}

pub async fn update_table_status(
    state: &AppState,
    user: &AuthUser,
    table_id: Uuid,
    payload: UpdateTableStatusRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_admin(user)?;
    let existing = Tables::find_by_id(table_id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let mut active: TableActive = existing.into();
    active.is_occupied = Set(payload.is_occupied);
    let table = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "table_status_update",
        Some("tables"),
        Some(serde_json::json!({ "table_id": table.id, "is_occupied": table.is_occupied })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Table status updated successfully",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

/// In-progress orders for a table: pending or processing only.
pub async fn list_active_orders(
    state: &AppState,
    user: &AuthUser,
    table_id: Uuid,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let table = Tables::find_by_id(table_id).one(&state.orm).await?;
    let table = match table {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let active_statuses: Vec<String> = OrderStatus::ALL
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.to_string())
        .collect();

    let orders = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::TableNumber.eq(table.table_number))
                .add(OrderCol::Status.is_in(active_statuses)),
        )
        .order_by_desc(OrderCol::OrderDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Active orders",
        OrderList { items: orders },
        None,
    ))
}

pub async fn validate_table(
    state: &AppState,
    table_number: i32,
) -> AppResult<ApiResponse<TableValidation>> {
    let table = Tables::find()
        .filter(TableCol::TableNumber.eq(table_number))
        .one(&state.orm)
        .await?;
    if table.is_none() {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Table is valid",
        TableValidation {
            table_number,
            is_valid: true,
        },
        None,
    ))
}

fn table_from_entity(model: TableModel) -> Table {
    Table {
        id: model.id,
        table_number: model.table_number,
        qr_code_url: model.qr_code_url,
        is_occupied: model.is_occupied,
    }
}
