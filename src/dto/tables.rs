use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Table;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub table_number: i32,
    #[serde(default)]
    pub is_occupied: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTableStatusRequest {
    pub is_occupied: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableList {
    pub items: Vec<Table>,
}

/// The string a QR renderer would encode for this table.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrPayload {
    pub table_number: i32,
    pub payload: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableValidation {
    pub table_number: i32,
    pub is_valid: bool,
}
