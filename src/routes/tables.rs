use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::OrderList,
    dto::tables::{
        CreateTableRequest, QrPayload, TableList, TableValidation, UpdateTableStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Table,
    response::ApiResponse,
    services::table_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables))
        .route("/", post(create_table))
        .route("/{id}/qr", get(table_qr))
        .route("/{id}/status", put(update_table_status))
        .route("/{id}/orders", get(list_active_orders))
        .route("/validate/{table_number}", get(validate_table))
}

#[utoipa::path(
    get,
    path = "/api/tables",
    responses(
        (status = 200, description = "List tables (admin only)", body = ApiResponse<TableList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TableList>>> {
    let resp = table_service::list_tables(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<Table>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Table number already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::create_table(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/{id}/qr",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "QR payload for the table", body = ApiResponse<QrPayload>),
        (status = 404, description = "Table not found"),
    ),
    tag = "Tables"
)]
pub async fn table_qr(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<QrPayload>>> {
    let resp = table_service::table_qr_payload(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/tables/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    request_body = UpdateTableStatusRequest,
    responses(
        (status = 200, description = "Occupancy updated", body = ApiResponse<Table>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn update_table_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableStatusRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::update_table_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Pending and processing orders for the table", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Table not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
pub async fn list_active_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = table_service::list_active_orders(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/validate/{table_number}",
    params(
        ("table_number" = i32, Path, description = "Externally visible table number")
    ),
    responses(
        (status = 200, description = "Table exists", body = ApiResponse<TableValidation>),
        (status = 404, description = "Invalid table"),
    ),
    tag = "Tables"
)]
pub async fn validate_table(
    State(state): State<AppState>,
    Path(table_number): Path<i32>,
) -> AppResult<Json<ApiResponse<TableValidation>>> {
    let resp = table_service::validate_table(&state, table_number).await?;
    Ok(Json(resp))
}
