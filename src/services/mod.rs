pub mod purchase_orders;
pub mod suppliers;

pub use purchase_orders::PurchaseOrderService;
pub use suppliers::SupplierService;
