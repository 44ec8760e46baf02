use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Procurement API",
        description = r#"
# Procurement API

Purchase order and supplier management.

## Features

- **Purchase Orders**: Draft, submit, approve, deliver, cancel and void purchase orders
- **Line Items**: Priced rows and grouping headings; totals are always computed server-side
- **GST**: 10% tax applied on the order subtotal when the supplier is GST-registered
- **Suppliers**: Supplier directory with GST registration tracking

## Lifecycle

Purchase orders move `draft -> pending -> approved -> delivered`, with
`cancelled` reachable from `pending`. Drafts can be deleted; pending and
approved orders are retired by voiding them.

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20, max 100).
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "purchase-orders", description = "Purchase order endpoints"),
        (name = "suppliers", description = "Supplier endpoints")
    ),
    paths(
        // Purchase orders
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
        crate::handlers::purchase_orders::void_purchase_order,
        crate::handlers::purchase_orders::get_purchase_orders_by_supplier,
        crate::handlers::purchase_orders::get_purchase_orders_by_status,

        // Suppliers
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        crate::handlers::suppliers::create_supplier_contact,
        crate::handlers::suppliers::list_supplier_contacts,
        crate::handlers::suppliers::update_supplier_contact,
        crate::handlers::suppliers::delete_supplier_contact,
    ),
    components(
        schemas(
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::handlers::purchase_orders::UpdatePurchaseOrderRequest,
            crate::handlers::purchase_orders::LineItemRequest,
            crate::handlers::suppliers::CreateSupplierRequest,
            crate::handlers::suppliers::UpdateSupplierRequest,
            crate::handlers::suppliers::CreateSupplierContactRequest,
            crate::handlers::suppliers::UpdateSupplierContactRequest,
            crate::services::purchase_orders::PurchaseOrderDetail,
            crate::models::purchase_order::PurchaseOrderStatus,
            crate::models::supplier::SupplierStatus,
            crate::finance::OrderTotals,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
