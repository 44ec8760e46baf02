use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{purchase_order, supplier},
};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Deletes a supplier, provided no purchase orders reference it. The FK is
/// `ON DELETE RESTRICT`; this check exists to turn that constraint into a
/// clear conflict response instead of a database error.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSupplierCommand {
    pub id: Uuid,
}

#[async_trait]
impl Command for DeleteSupplierCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender), fields(supplier_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let existing = supplier::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", self.id)))?;

        let referencing = purchase_order::Entity::find()
            .filter(purchase_order::Column::SupplierId.eq(self.id))
            .count(db)
            .await?;
        if referencing > 0 {
            warn!(
                supplier_id = %self.id,
                purchase_orders = referencing,
                "Rejected deletion of referenced supplier"
            );
            return Err(ServiceError::Conflict(format!(
                "Supplier '{}' is referenced by {} purchase order(s) and cannot be deleted",
                existing.company_name, referencing
            )));
        }

        existing.delete(db).await?;

        event_sender
            .send(Event::SupplierDeleted(self.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = %self.id, "Supplier deleted");
        Ok(())
    }
}
