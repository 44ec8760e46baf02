//! Domain events emitted after successful state changes.
//!
//! The original system pushed row-level change feeds to interested clients;
//! here that ambient stream is explicit message passing: commands publish an
//! `Event` after their transaction commits and a background task consumes
//! the channel.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    PurchaseOrderCreated(Uuid),
    PurchaseOrderUpdated(Uuid),
    PurchaseOrderStatusChanged {
        purchase_order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    PurchaseOrderVoided(Uuid),
    PurchaseOrderDeleted {
        purchase_order_id: Uuid,
        po_number: String,
    },

    SupplierCreated(Uuid),
    SupplierUpdated(Uuid),
    SupplierDeleted(Uuid),

    SupplierContactAdded(Uuid),
    SupplierContactUpdated(Uuid),
    SupplierContactRemoved(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes the event channel for the lifetime of the process. Subscribers
/// (notification fan-out, activity logging) hang off this loop.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = ?event, "Processing domain event");
    }
    info!("Event channel closed; event processor shutting down");
}
