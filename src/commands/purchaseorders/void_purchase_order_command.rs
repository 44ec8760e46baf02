use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::PO_VOIDS,
    models::{purchase_order, purchase_order::PurchaseOrderStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Retires an in-flight (pending or approved) purchase order without erasing
/// it. Drafts are deleted rather than voided, and terminal orders stay as
/// they are.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoidPurchaseOrderCommand {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoidPurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
    pub status: PurchaseOrderStatus,
}

#[async_trait]
impl Command for VoidPurchaseOrderCommand {
    type Result = VoidPurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender), fields(purchase_order_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let po = purchase_order::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", self.id)))?;

        if !po.status.can_void() {
            warn!(
                po_number = %po.po_number,
                status = %po.status,
                "Rejected void of purchase order"
            );
            let message = match po.status {
                PurchaseOrderStatus::Draft => {
                    "Draft purchase orders should be deleted, not voided.".to_string()
                }
                status => format!(
                    "Purchase order {} is already '{}' and cannot be voided",
                    po.po_number, status
                ),
            };
            return Err(ServiceError::PreconditionFailed(message));
        }

        let old_status = po.status;
        let po_number = po.po_number.clone();
        let mut active = po.into_active_model();
        active.status = Set(PurchaseOrderStatus::Voided);
        active.updated_at = Set(Utc::now());
        let voided = active.update(db).await?;

        event_sender
            .send(Event::PurchaseOrderVoided(voided.id))
            .await
            .map_err(ServiceError::EventError)?;
        event_sender
            .send(Event::PurchaseOrderStatusChanged {
                purchase_order_id: voided.id,
                old_status: old_status.to_string(),
                new_status: voided.status.to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        PO_VOIDS.inc();
        info!(po_number = %po_number, "Purchase order voided");
        Ok(VoidPurchaseOrderResult {
            id: voided.id,
            po_number,
            status: voided.status,
        })
    }
}
