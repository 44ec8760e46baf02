use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{supplier, supplier::SupplierStatus},
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateSupplierCommand {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub company_name: String,

    /// Australian Business Number, stored as entered (spaces allowed).
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

    #[serde(default)]
    pub is_gst_registered: bool,
}

#[async_trait]
impl Command for CreateSupplierCommand {
    type Result = supplier::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(company_name = %self.company_name))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let now = Utc::now();
        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_name: Set(self.company_name.clone()),
            abn: Set(self.abn.clone()),
            address_line_1: Set(self.address_line_1.clone()),
            address_line_2: Set(self.address_line_2.clone()),
            city: Set(self.city.clone()),
            state: Set(self.state.clone()),
            postal_code: Set(self.postal_code.clone()),
            phone: Set(self.phone.clone()),
            email: Set(self.email.clone()),
            website: Set(self.website.clone()),
            status: Set(self.status.unwrap_or(SupplierStatus::Active)),
            is_gst_registered: Set(self.is_gst_registered),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db_pool.as_ref())
        .await?;

        event_sender
            .send(Event::SupplierCreated(supplier.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = %supplier.id, "Supplier created");
        Ok(supplier)
    }
}
