use crate::config::LoyaltyConfig;
use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub loyalty: LoyaltyConfig,
    pub frontend_url: String,
}
