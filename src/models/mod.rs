pub mod purchase_order;
pub mod purchase_order_line_item;
pub mod supplier;
pub mod supplier_contact;

pub use purchase_order::PurchaseOrderStatus;
pub use supplier::SupplierStatus;
