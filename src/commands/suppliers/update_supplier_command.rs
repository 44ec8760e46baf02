use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{supplier, supplier::SupplierStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Partial update: only fields present in the command are written.
///
/// Changing `is_gst_registered` does not retroactively retotal existing
/// purchase orders; each order's tax was fixed by the supplier's
/// registration at the time it was last saved.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateSupplierCommand {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,

    #[validate(length(max = 20))]
    pub abn: Option<String>,

    #[validate(length(max = 255))]
    pub address_line_1: Option<String>,

    #[validate(length(max = 255))]
    pub address_line_2: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub state: Option<String>,

    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 255))]
    pub website: Option<String>,

    pub status: Option<SupplierStatus>,

    pub is_gst_registered: Option<bool>,
}

#[async_trait]
impl Command for UpdateSupplierCommand {
    type Result = supplier::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(supplier_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = db_pool.as_ref();
        let existing = supplier::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", self.id)))?;

        let mut active = existing.into_active_model();
        if let Some(company_name) = &self.company_name {
            active.company_name = Set(company_name.clone());
        }
        if self.abn.is_some() {
            active.abn = Set(self.abn.clone());
        }
        if self.address_line_1.is_some() {
            active.address_line_1 = Set(self.address_line_1.clone());
        }
        if self.address_line_2.is_some() {
            active.address_line_2 = Set(self.address_line_2.clone());
        }
        if self.city.is_some() {
            active.city = Set(self.city.clone());
        }
        if self.state.is_some() {
            active.state = Set(self.state.clone());
        }
        if self.postal_code.is_some() {
            active.postal_code = Set(self.postal_code.clone());
        }
        if self.phone.is_some() {
            active.phone = Set(self.phone.clone());
        }
        if self.email.is_some() {
            active.email = Set(self.email.clone());
        }
        if self.website.is_some() {
            active.website = Set(self.website.clone());
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        if let Some(is_gst_registered) = self.is_gst_registered {
            active.is_gst_registered = Set(is_gst_registered);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;

        event_sender
            .send(Event::SupplierUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = %updated.id, "Supplier updated");
        Ok(updated)
    }
}
