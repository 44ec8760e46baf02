use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    commands::purchaseorders::{
        CreatePurchaseOrderCommand, LineItemRequest as CommandLineItemRequest,
        UpdatePurchaseOrderCommand,
    },
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request and response DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItemRequest {
    /// Item description, or the heading text for a heading row
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[serde(default)]
    pub quantity: i32,
    /// Unit price; the line total is always computed server-side
    #[serde(default)]
    pub unit_price: Decimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_heading: bool,
}

impl From<LineItemRequest> for CommandLineItemRequest {
    fn from(item: LineItemRequest) -> Self {
        CommandLineItemRequest {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            notes: item.notes,
            is_heading: item.is_heading,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub items: Vec<LineItemRequest>,
    /// Order date as YYYY-MM-DD
    pub order_date: Option<String>,
    /// Expected delivery date as YYYY-MM-DD
    pub delivery_date: Option<String>,
    pub currency: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    pub supplier_id: Option<Uuid>,
    /// Requested status: draft, pending, approved, delivered, cancelled, voided
    pub status: Option<String>,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// When present, replaces the entire line-item set
    pub line_items: Option<Vec<LineItemRequest>>,
}

fn parse_date(value: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| ApiError::ValidationError(format!("Invalid date '{}': {}", raw, e)))
        })
        .transpose()
}

// Handler functions

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = crate::commands::purchaseorders::create_purchase_order_command::CreatePurchaseOrderResult),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order_date = parse_date(&payload.order_date)?;
    let delivery_date = parse_date(&payload.delivery_date)?;

    let command = CreatePurchaseOrderCommand {
        supplier_id: payload.supplier_id,
        items: payload.items.into_iter().map(Into::into).collect(),
        order_date,
        delivery_date,
        currency: payload.currency,
        notes: payload.notes,
    };

    let result = state
        .services
        .purchase_orders
        .create(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {} ({})", result.po_number, result.id);

    Ok(created_response(result))
}

/// Get a purchase order with its line items
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order fetched", body = crate::services::purchase_orders::PurchaseOrderDetail),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let detail = state
        .services
        .purchase_orders
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(detail))
}

/// List purchase orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Purchase orders listed")
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (orders, total) = state
        .services
        .purchase_orders
        .list(page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders, page, per_page, total,
    )))
}

/// Update a purchase order
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}",
    request_body = UpdatePurchaseOrderRequest,
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order updated", body = crate::commands::purchaseorders::update_purchase_order_command::UpdatePurchaseOrderResult),
        (status = 400, description = "Invalid request or status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 412, description = "Transition or edit not allowed", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order_date = parse_date(&payload.order_date)?;
    let delivery_date = parse_date(&payload.delivery_date)?;

    let command = UpdatePurchaseOrderCommand {
        id,
        supplier_id: payload.supplier_id,
        status: payload.status,
        order_date,
        delivery_date,
        notes: payload.notes,
        line_items: payload
            .line_items
            .map(|items| items.into_iter().map(Into::into).collect()),
    };

    let result = state
        .services
        .purchase_orders
        .update(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {} ({})", result.po_number, result.id);

    Ok(success_response(result))
}

/// Delete a draft purchase order
#[utoipa::path(
    delete,
    path = "/api/v1/purchase-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 412, description = "Purchase order is not a draft", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", id);

    Ok(no_content_response())
}

/// Void an in-flight purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/void",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order voided", body = crate::commands::purchaseorders::void_purchase_order_command::VoidPurchaseOrderResult),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 412, description = "Purchase order cannot be voided", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn void_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let result = state
        .services
        .purchase_orders
        .void(id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order voided: {} ({})", result.po_number, result.id);

    Ok(success_response(result))
}

/// Get purchase orders for a supplier
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/supplier/{supplier_id}",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Purchase orders by supplier")
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_orders_by_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list_by_supplier(supplier_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// Get purchase orders by status
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/status/{status}",
    params(
        ("status" = String, Path, description = "Purchase order status")
    ),
    responses(
        (status = 200, description = "Purchase orders by status"),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_orders_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list_by_status(&status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id", put(update_purchase_order))
        .route("/:id", delete(delete_purchase_order))
        .route("/:id/void", post(void_purchase_order))
        .route(
            "/supplier/:supplier_id",
            get(get_purchase_orders_by_supplier),
        )
        .route("/status/:status", get(get_purchase_orders_by_status))
}
