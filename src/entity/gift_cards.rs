use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gift_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub receiver_email: String,
    pub amount: i64,
    pub message: Option<String>,
    pub expiration_date: Date,
    pub is_redeemed: bool,
    pub redeemed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
}

impl ActiveModelBehavior for ActiveModel {}
