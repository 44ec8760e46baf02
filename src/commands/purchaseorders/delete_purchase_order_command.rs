use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::PO_DELETIONS,
    models::{purchase_order, purchase_order_line_item},
};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Hard-deletes a draft purchase order and its line items. Anything past
/// draft has entered the business process and must be voided instead, so the
/// record survives for auditing.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePurchaseOrderCommand {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
}

#[async_trait]
impl Command for DeletePurchaseOrderCommand {
    type Result = DeletePurchaseOrderResult;

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

        if !po.status.can_delete() {
            warn!(
                po_number = %po.po_number,
                status = %po.status,
                "Rejected deletion of non-draft purchase order"
            );
            return Err(ServiceError::PreconditionFailed(
                "Only draft purchase orders can be deleted. Use void instead for non-draft orders."
                    .to_string(),
            ));
        }

        let txn = db.begin().await?;
        purchase_order_line_item::Entity::delete_many()
            .filter(purchase_order_line_item::Column::PurchaseOrderId.eq(po.id))
            .exec(&txn)
            .await?;
        let po_number = po.po_number.clone();
        po.delete(&txn).await?;
        txn.commit().await?;

        event_sender
            .send(Event::PurchaseOrderDeleted {
                purchase_order_id: self.id,
                po_number: po_number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        PO_DELETIONS.inc();
        info!(po_number = %po_number, "Purchase order deleted");
        Ok(DeletePurchaseOrderResult {
            id: self.id,
            po_number,
        })
    }
}
