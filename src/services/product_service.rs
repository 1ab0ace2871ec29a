use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{
        CreateProductRequest, CustomizationInput, ProductList, ProductWithCustomizations,
        UpdateProductRequest,
    },
    entity::{
        customizations::{
            ActiveModel as CustomizationActive, Column as CustCol, Entity as Customizations,
            Model as CustomizationModel,
        },
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Customization, Product},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

/// Check a customization's option labels against its price deltas. An empty
/// `price_impact` gets zero deltas for every option; otherwise the key sets
/// must match exactly.
pub fn resolve_price_impact(input: &CustomizationInput) -> Result<BTreeMap<String, i64>, String> {
    if input.options.is_empty() {
        return Err(format!(
            "Customization '{}' must have at least one option",
            input.name
        ));
    }
    if input.price_impact.is_empty() {
        return Ok(input.options.iter().map(|o| (o.clone(), 0)).collect());
    }
    let option_set: BTreeSet<&str> = input.options.iter().map(String::as_str).collect();
    let impact_set: BTreeSet<&str> = input.price_impact.keys().map(String::as_str).collect();
    if option_set != impact_set {
        return Err(format!(
            "Customization '{}' price_impact keys must match its options",
            input.name
        ));
    }
    Ok(input.price_impact.clone())
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(Column::IsAvailable.eq(true));

    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ProductWithCustomizations>> {
    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let customizations = Customizations::find()
        .filter(CustCol::ProductId.eq(product.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customization_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Product",
        ProductWithCustomizations {
            product: product_from_entity(product),
            customizations,
        },
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductWithCustomizations>> {
    ensure_admin(user)?;

    if payload.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }

    // Validate all customizations before touching the database.
    let mut resolved: Vec<(&CustomizationInput, BTreeMap<String, i64>)> =
        Vec::with_capacity(payload.customizations.len());
    for input in &payload.customizations {
        let impact = resolve_price_impact(input).map_err(AppError::Validation)?;
        resolved.push((input, impact));
    }

    let txn = state.orm.begin().await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.clone()),
        description: Set(payload.description.clone()),
        price: Set(payload.price),
        category: Set(payload.category.clone()),
        image_url: Set(payload.image_url.clone()),
        is_available: Set(payload.is_available.unwrap_or(true)),
        points_value: Set(payload.points_value.unwrap_or(0)),
        created_at: NotSet,
    };
    let product = active.insert(&txn).await?;

    let mut customizations: Vec<Customization> = Vec::with_capacity(resolved.len());
    for (input, impact) in resolved {
        let model = CustomizationActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            name: Set(input.name.clone()),
            options: Set(serde_json::to_value(&input.options)
                .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?),
            price_impact: Set(serde_json::to_value(&impact)
                .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?),
        }
        .insert(&txn)
        .await?;
        customizations.push(customization_from_entity(model));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created successfully",
        ProductWithCustomizations {
            product: product_from_entity(product),
            customizations,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::Validation("Price must not be negative".into()));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(points_value) = payload.points_value {
        active.points_value = Set(points_value);
    }

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product updated successfully",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

/// Soft delete: the row stays, `is_available` flips off. Order history keeps
/// pointing at the product.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.is_available = Set(false);
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        image_url: model.image_url,
        is_available: model.is_available,
        points_value: model.points_value,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn customization_from_entity(model: CustomizationModel) -> Customization {
    Customization {
        id: model.id,
        product_id: model.product_id,
        name: model.name,
        options: model.options,
        price_impact: model.price_impact,
    }
}
