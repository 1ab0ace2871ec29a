use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest},
        gift_cards::{
            CreateGiftCardRequest, GiftCardLists, ReceivedGiftCard, RedeemGiftCardRequest,
            RedeemedGiftCard, SentGiftCard,
        },
        loyalty::{PointHistoryEntry, PointsSummary, RedemptionReceipt, RewardList, RewardView},
        orders::{
            CartLine, OrderDetail, OrderItemDetail, OrderList, OrderWithItems, PlaceOrderRequest,
            UpdateOrderStatusRequest,
        },
        products::{
            CreateProductRequest, CustomizationInput, ProductList, ProductWithCustomizations,
            UpdateProductRequest,
        },
        tables::{
            CreateTableRequest, QrPayload, TableList, TableValidation, UpdateTableStatusRequest,
        },
    },
    models::{Customization, GiftCard, Order, OrderItem, OrderStatus, Product, Table, User},
    response::{ApiResponse, Meta},
    routes::{auth, gift_cards, health, loyalty, orders, params, products, tables},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        auth::update_profile,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::place_order,
        orders::list_orders,
        orders::list_all_orders,
        orders::get_order,
        orders::update_order_status,
        loyalty::get_points,
        loyalty::list_rewards,
        loyalty::redeem_reward,
        gift_cards::create_gift_card,
        gift_cards::list_gift_cards,
        gift_cards::redeem_gift_card,
        tables::list_tables,
        tables::create_table,
        tables::table_qr,
        tables::update_table_status,
        tables::list_active_orders,
        tables::validate_table
    ),
    components(
        schemas(
            User,
            Product,
            Customization,
            Order,
            OrderItem,
            OrderStatus,
            GiftCard,
            Table,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateProfileRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CustomizationInput,
            ProductList,
            ProductWithCustomizations,
            CartLine,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            OrderItemDetail,
            OrderDetail,
            OrderWithItems,
            OrderList,
            PointHistoryEntry,
            PointsSummary,
            RewardView,
            RewardList,
            RedemptionReceipt,
            CreateGiftCardRequest,
            RedeemGiftCardRequest,
            SentGiftCard,
            ReceivedGiftCard,
            GiftCardLists,
            RedeemedGiftCard,
            CreateTableRequest,
            UpdateTableStatusRequest,
            TableList,
            QrPayload,
            TableValidation,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<GiftCardLists>,
            ApiResponse<TableList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login, profile"),
        (name = "Products", description = "Catalog and customizations"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Loyalty", description = "Points balance and rewards"),
        (name = "Gift Cards", description = "Gift card ledger"),
        (name = "Tables", description = "Table registry and QR entry"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
