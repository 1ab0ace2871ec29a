use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base URL the table QR payloads point at.
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            frontend_url,
        })
    }
}

/// A reward customers can buy with loyalty points.
#[derive(Debug, Clone)]
pub struct Reward {
    pub id: i32,
    pub name: &'static str,
    pub description: &'static str,
    pub points_required: i64,
}

/// Loyalty program parameters. Held in `AppState` so the conversion rate and
/// the rewards catalog live in one place instead of scattered literals.
#[derive(Debug, Clone)]
pub struct LoyaltyConfig {
    /// Points needed for one currency unit of discount.
    pub points_per_currency_unit: i64,
    pub rewards: Vec<Reward>,
}

impl LoyaltyConfig {
    pub fn find_reward(&self, reward_id: i32) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == reward_id)
    }
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            points_per_currency_unit: 10,
            rewards: vec![
                Reward {
                    id: 1,
                    name: "Free Coffee",
                    description: "Get a free coffee of your choice",
                    points_required: 100,
                },
                Reward {
                    id: 2,
                    name: "Free Pastry",
                    description: "Get a free pastry of your choice",
                    points_required: 150,
                },
                Reward {
                    id: 3,
                    name: "10% Off Next Order",
                    description: "Get 10% off your next order",
                    points_required: 200,
                },
                Reward {
                    id: 4,
                    name: "Free Breakfast Set",
                    description: "Get a free breakfast set",
                    points_required: 300,
                },
            ],
        }
    }
}
