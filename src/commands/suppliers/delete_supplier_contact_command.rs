use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::supplier_contact,
};
use async_trait::async_trait;
use sea_orm::{EntityTrait, ModelTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSupplierContactCommand {
    pub id: Uuid,
    pub supplier_id: Uuid,
}

#[async_trait]
impl Command for DeleteSupplierContactCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender), fields(contact_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();
        let contact = supplier_contact::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .filter(|c| c.supplier_id == self.supplier_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Contact {} not found for supplier {}",
                    self.id, self.supplier_id
                ))
            })?;

        let contact_id = contact.id;
        contact.delete(db).await?;

        event_sender
            .send(Event::SupplierContactRemoved(contact_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(contact_id = %contact_id, "Supplier contact removed");
        Ok(())
    }
}
