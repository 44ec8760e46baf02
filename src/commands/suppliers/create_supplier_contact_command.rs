use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{supplier, supplier_contact},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSupplierContactCommand {
    pub supplier_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(max = 100))]
    pub role: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[serde(default)]
    pub is_primary: bool,
}

#[async_trait]
impl Command for CreateSupplierContactCommand {
    type Result = supplier_contact::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(supplier_id = %self.supplier_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        supplier::Entity::find_by_id(self.supplier_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", self.supplier_id))
            })?;

        let now = Utc::now();
        let contact = supplier_contact::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(self.supplier_id),
            first_name: Set(self.first_name.clone()),
            last_name: Set(self.last_name.clone()),
            role: Set(self.role.clone()),
            email: Set(self.email.clone()),
            phone: Set(self.phone.clone()),
            is_primary: Set(self.is_primary),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        event_sender
            .send(Event::SupplierContactAdded(contact.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(contact_id = %contact.id, "Supplier contact added");
        Ok(contact)
    }
}
