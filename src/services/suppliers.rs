use crate::{
    commands::suppliers::{
        CreateSupplierCommand, CreateSupplierContactCommand, DeleteSupplierCommand,
        DeleteSupplierContactCommand, UpdateSupplierCommand, UpdateSupplierContactCommand,
    },
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    models::{supplier, supplier_contact},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SupplierService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, command))]
    pub async fn create(
        &self,
        command: CreateSupplierCommand,
    ) -> Result<supplier::Model, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(supplier_id = %command.id))]
    pub async fn update(
        &self,
        command: UpdateSupplierCommand,
    ) -> Result<supplier::Model, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        DeleteSupplierCommand { id }
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    /// Lists suppliers alphabetically with the total row count.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let paginator = supplier::Entity::find()
            .order_by_asc(supplier::Column::CompanyName)
            .paginate(self.db.as_ref(), per_page);

        let total = paginator.num_items().await?;
        let suppliers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((suppliers, total))
    }

    #[instrument(skip(self, command), fields(supplier_id = %command.supplier_id))]
    pub async fn add_contact(
        &self,
        command: CreateSupplierContactCommand,
    ) -> Result<supplier_contact::Model, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(contact_id = %command.id))]
    pub async fn update_contact(
        &self,
        command: UpdateSupplierContactCommand,
    ) -> Result<supplier_contact::Model, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_contact(
        &self,
        supplier_id: Uuid,
        contact_id: Uuid,
    ) -> Result<(), ServiceError> {
        DeleteSupplierContactCommand {
            id: contact_id,
            supplier_id,
        }
        .execute(self.db.clone(), self.event_sender.clone())
        .await
    }

    /// Lists a supplier's contacts, primary contact first, then by name.
    #[instrument(skip(self))]
    pub async fn list_contacts(
        &self,
        supplier_id: Uuid,
    ) -> Result<Vec<supplier_contact::Model>, ServiceError> {
        supplier::Entity::find_by_id(supplier_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))?;

        let contacts = supplier_contact::Entity::find()
            .filter(supplier_contact::Column::SupplierId.eq(supplier_id))
            .order_by_desc(supplier_contact::Column::IsPrimary)
            .order_by_asc(supplier_contact::Column::FirstName)
            .all(self.db.as_ref())
            .await?;
        Ok(contacts)
    }
}
