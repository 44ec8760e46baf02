use crate::{
    commands::purchaseorders::{
        create_purchase_order_command::CreatePurchaseOrderResult,
        update_purchase_order_command::UpdatePurchaseOrderResult,
        void_purchase_order_command::VoidPurchaseOrderResult,
        CreatePurchaseOrderCommand, DeletePurchaseOrderCommand, UpdatePurchaseOrderCommand,
        VoidPurchaseOrderCommand,
    },
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    models::{purchase_order, purchase_order_line_item, purchase_order::PurchaseOrderStatus},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// A purchase order together with its line items, ordered as stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub order: purchase_order::Model,
    pub line_items: Vec<purchase_order_line_item::Model>,
}

/// Service for purchase order operations. Mutations run through commands;
/// reads query the entities directly.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, command))]
    pub async fn create(
        &self,
        command: CreatePurchaseOrderCommand,
    ) -> Result<CreatePurchaseOrderResult, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command), fields(purchase_order_id = %command.id))]
    pub async fn update(
        &self,
        command: UpdatePurchaseOrderCommand,
    ) -> Result<UpdatePurchaseOrderResult, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        DeletePurchaseOrderCommand { id }
            .execute(self.db.clone(), self.event_sender.clone())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn void(&self, id: Uuid) -> Result<VoidPurchaseOrderResult, ServiceError> {
        VoidPurchaseOrderCommand { id }
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<PurchaseOrderDetail, ServiceError> {
        let order = purchase_order::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        let line_items = purchase_order_line_item::Entity::find()
            .filter(purchase_order_line_item::Column::PurchaseOrderId.eq(id))
            .order_by_asc(purchase_order_line_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(PurchaseOrderDetail { order, line_items })
    }

    /// Lists purchase orders, newest first. Returns the page plus the total
    /// row count for pagination metadata.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let paginator = purchase_order::Entity::find()
            .order_by_desc(purchase_order::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        let total = paginator.num_items().await?;
        // Page numbers are 1-based on the wire, 0-based in sea-orm.
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    #[instrument(skip(self))]
    pub async fn list_by_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::SupplierId.eq(supplier_id))
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn list_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let status = PurchaseOrderStatus::parse(status)?;
        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::Status.eq(status))
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(orders)
    }
}
