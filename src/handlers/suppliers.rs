use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    commands::suppliers::{
        CreateSupplierCommand, CreateSupplierContactCommand, UpdateSupplierCommand,
        UpdateSupplierContactCommand,
    },
    errors::ApiError,
    handlers::AppState,
    models::supplier::SupplierStatus,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub company_name: String,
    pub abn: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub website: Option<String>,
    pub status: Option<SupplierStatus>,
    #[serde(default)]
    pub is_gst_registered: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,
    pub abn: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub website: Option<String>,
    pub status: Option<SupplierStatus>,
    pub is_gst_registered: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierContactRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub role: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierContactRequest {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    pub role: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: Option<bool>,
}

// Handler functions

/// Create a supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = crate::models::supplier::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreateSupplierCommand {
        company_name: payload.company_name,
        abn: payload.abn,
        address_line_1: payload.address_line_1,
        address_line_2: payload.address_line_2,
        city: payload.city,
        state: payload.state,
        postal_code: payload.postal_code,
        phone: payload.phone,
        email: payload.email,
        website: payload.website,
        status: payload.status,
        is_gst_registered: payload.is_gst_registered,
    };

    let supplier = state
        .services
        .suppliers
        .create(command)
        .await
        .map_err(map_service_error)?;

    info!("Supplier created: {} ({})", supplier.company_name, supplier.id);

    Ok(created_response(supplier))
}

/// Get a supplier by ID
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier fetched", body = crate::models::supplier::Model),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

/// List suppliers alphabetically
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Suppliers listed")
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (suppliers, total) = state
        .services
        .suppliers
        .list(page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers, page, per_page, total,
    )))
}

/// Update a supplier
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{id}",
    request_body = UpdateSupplierRequest,
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier updated", body = crate::models::supplier::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = UpdateSupplierCommand {
        id,
        company_name: payload.company_name,
        abn: payload.abn,
        address_line_1: payload.address_line_1,
        address_line_2: payload.address_line_2,
        city: payload.city,
        state: payload.state,
        postal_code: payload.postal_code,
        phone: payload.phone,
        email: payload.email,
        website: payload.website,
        status: payload.status,
        is_gst_registered: payload.is_gst_registered,
    };

    let supplier = state
        .services
        .suppliers
        .update(command)
        .await
        .map_err(map_service_error)?;

    info!("Supplier updated: {}", supplier.id);

    Ok(success_response(supplier))
}

/// Delete a supplier with no purchase orders
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier is referenced by purchase orders", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!("Supplier deleted: {}", id);

    Ok(no_content_response())
}

/// Add a contact to a supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers/{supplier_id}/contacts",
    request_body = CreateSupplierContactRequest,
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 201, description = "Contact added", body = crate::models::supplier_contact::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier_contact(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(payload): Json<CreateSupplierContactRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreateSupplierContactCommand {
        supplier_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
        email: payload.email,
        phone: payload.phone,
        is_primary: payload.is_primary,
    };

    let contact = state
        .services
        .suppliers
        .add_contact(command)
        .await
        .map_err(map_service_error)?;

    info!("Supplier contact added: {}", contact.id);

    Ok(created_response(contact))
}

/// List a supplier's contacts, primary first
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{supplier_id}/contacts",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Contacts listed"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn list_supplier_contacts(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let contacts = state
        .services
        .suppliers
        .list_contacts(supplier_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(contacts))
}

/// Update a supplier contact
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{supplier_id}/contacts/{contact_id}",
    request_body = UpdateSupplierContactRequest,
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact updated", body = crate::models::supplier_contact::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Contact not found for this supplier", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier_contact(
    State(state): State<AppState>,
    Path((supplier_id, contact_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSupplierContactRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = UpdateSupplierContactCommand {
        id: contact_id,
        supplier_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
        email: payload.email,
        phone: payload.phone,
        is_primary: payload.is_primary,
    };

    let contact = state
        .services
        .suppliers
        .update_contact(command)
        .await
        .map_err(map_service_error)?;

    info!("Supplier contact updated: {}", contact.id);

    Ok(success_response(contact))
}

/// Remove a supplier contact
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{supplier_id}/contacts/{contact_id}",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 204, description = "Contact removed"),
        (status = 404, description = "Contact not found for this supplier", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier_contact(
    State(state): State<AppState>,
    Path((supplier_id, contact_id)): Path<(Uuid, Uuid)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .delete_contact(supplier_id, contact_id)
        .await
        .map_err(map_service_error)?;

    info!("Supplier contact removed: {}", contact_id);

    Ok(no_content_response())
}

/// Creates the router for supplier endpoints
pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier))
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id", put(update_supplier))
        .route("/:id", delete(delete_supplier))
        .route("/:id/contacts", post(create_supplier_contact))
        .route("/:id/contacts", get(list_supplier_contacts))
        .route("/:id/contacts/:contact_id", put(update_supplier_contact))
        .route("/:id/contacts/:contact_id", delete(delete_supplier_contact))
}
