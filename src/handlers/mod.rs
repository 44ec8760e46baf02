use crate::{
    db::DbPool,
    events::EventSender,
    services::{PurchaseOrderService, SupplierService},
};
use std::sync::Arc;

pub mod common;
pub mod purchase_orders;
pub mod suppliers;

pub use crate::AppState;

/// Service container handed to every handler through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub purchase_orders: PurchaseOrderService,
    pub suppliers: SupplierService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            purchase_orders: PurchaseOrderService::new(db.clone(), event_sender.clone()),
            suppliers: SupplierService::new(db, event_sender),
        }
    }
}
