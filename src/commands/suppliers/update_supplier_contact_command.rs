use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::supplier_contact,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Partial update. The contact must belong to `supplier_id`; a contact id
/// under the wrong supplier is treated as not found.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateSupplierContactCommand {
    pub id: Uuid,
    pub supplier_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(length(max = 100))]
    pub role: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    pub is_primary: Option<bool>,
}

#[async_trait]
impl Command for UpdateSupplierContactCommand {
    type Result = supplier_contact::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(contact_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        let existing = supplier_contact::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .filter(|c| c.supplier_id == self.supplier_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Contact {} not found for supplier {}",
                    self.id, self.supplier_id
                ))
            })?;

        let mut active = existing.into_active_model();
        if let Some(first_name) = &self.first_name {
            active.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &self.last_name {
            active.last_name = Set(last_name.clone());
        }
        if self.role.is_some() {
            active.role = Set(self.role.clone());
        }
        if self.email.is_some() {
            active.email = Set(self.email.clone());
        }
        if self.phone.is_some() {
            active.phone = Set(self.phone.clone());
        }
        if let Some(is_primary) = self.is_primary {
            active.is_primary = Set(is_primary);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;

        event_sender
            .send(Event::SupplierContactUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(contact_id = %updated.id, "Supplier contact updated");
        Ok(updated)
    }
}
