use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_cafe_api::{config::AppConfig, db::create_pool};
use serde_json::json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "customer", "user@example.com", "user123", "user").await?;
    seed_products(&pool).await?;
    seed_tables(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Prices and deltas in cents.
    let size_options = json!(["Small", "Medium", "Large"]);
    let size_impact = json!({"Small": 0, "Medium": 50, "Large": 100});
    let milk_options = json!(["Regular", "Almond", "Oat", "Soy"]);
    let milk_impact = json!({"Regular": 0, "Almond": 75, "Oat": 75, "Soy": 50});

    let products: Vec<(&str, &str, i64, &str, &str, i64, Vec<(&str, serde_json::Value, serde_json::Value)>)> = vec![
        (
            "Espresso",
            "A concentrated coffee beverage brewed by forcing hot water under pressure through finely ground coffee beans.",
            299,
            "coffee",
            "/static/images/espresso.jpg",
            3,
            vec![
                ("Size", json!(["Single", "Double"]), json!({"Single": 0, "Double": 100})),
                ("Add Extra Shot", json!(["No", "Yes"]), json!({"No": 0, "Yes": 75})),
            ],
        ),
        (
            "Cappuccino",
            "An espresso-based coffee drink that is prepared with steamed milk foam.",
            399,
            "coffee",
            "/static/images/cappuccino.jpg",
            4,
            vec![
                ("Size", size_options.clone(), size_impact.clone()),
                ("Milk Type", milk_options.clone(), milk_impact.clone()),
            ],
        ),
        (
            "Latte",
            "A coffee drink made with espresso and steamed milk.",
            450,
            "coffee",
            "/static/images/latte.jpg",
            5,
            vec![
                ("Size", size_options.clone(), size_impact.clone()),
                ("Milk Type", milk_options, milk_impact),
                (
                    "Flavor Syrup",
                    json!(["None", "Vanilla", "Caramel", "Hazelnut"]),
                    json!({"None": 0, "Vanilla": 50, "Caramel": 50, "Hazelnut": 50}),
                ),
            ],
        ),
        (
            "Green Tea",
            "A light, refreshing tea with subtle flavors.",
            250,
            "tea",
            "/static/images/green_tea.jpg",
            3,
            vec![
                ("Size", size_options, size_impact),
                ("Add Honey", json!(["No", "Yes"]), json!({"No": 0, "Yes": 25})),
            ],
        ),
        (
            "Butter Croissant",
            "Flaky, buttery pastry baked fresh each morning.",
            325,
            "pastry",
            "/static/images/croissant.jpg",
            3,
            vec![("Warmed Up", json!(["No", "Yes"]), json!({"No": 0, "Yes": 0}))],
        ),
        (
            "Blueberry Muffin",
            "Moist muffin loaded with wild blueberries.",
            350,
            "pastry",
            "/static/images/blueberry_muffin.jpg",
            3,
            vec![],
        ),
    ];

    for (name, desc, price, category, image_url, points_value, customizations) in products {
        let product_id: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO products (id, name, description, price, category, image_url, points_value)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category)
        .bind(image_url)
        .bind(points_value)
        .fetch_optional(pool)
        .await?;

        let Some((product_id,)) = product_id else {
            continue;
        };

        for (cname, options, price_impact) in customizations {
            sqlx::query(
                r#"
                INSERT INTO customizations (id, product_id, name, options, price_impact)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(cname)
            .bind(options)
            .bind(price_impact)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_tables(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for table_number in 1..=4 {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO tables (id, table_number, qr_code_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (table_number) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(table_number)
        .bind(format!("/api/tables/{id}/qr"))
        .execute(pool)
        .await?;
    }

    println!("Seeded tables");
    Ok(())
}
