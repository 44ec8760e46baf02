use crate::{
    commands::{purchaseorders::LineItemRequest, Command},
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    finance::{self, LineInput},
    models::{
        purchase_order, purchase_order_line_item,
        purchase_order::PurchaseOrderStatus,
        supplier,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Updates a purchase order: header fields, status, supplier, and (while the
/// order is still editable) a full replacement of its line items. Totals are
/// recomputed server-side from the final line set and the final supplier's
/// GST registration, never trusted from the client.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePurchaseOrderCommand {
    pub id: Uuid,

    pub supplier_id: Option<Uuid>,

    /// Requested status, wire format. Parsed and checked against the
    /// transition table before anything is written.
    pub status: Option<String>,

    pub order_date: Option<NaiveDate>,

    pub delivery_date: Option<NaiveDate>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    /// When present, replaces the entire line-item set.
    #[validate]
    pub line_items: Option<Vec<LineItemRequest>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
    pub supplier_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

#[async_trait]
impl Command for UpdatePurchaseOrderCommand {
    type Result = UpdatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender), fields(purchase_order_id = %self.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if let Some(items) = &self.line_items {
            if items.is_empty() {
                return Err(ServiceError::ValidationError(
                    "At least one line item is required".to_string(),
                ));
            }
        }

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let po = purchase_order::Entity::find_by_id(self.id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", self.id)))?;

        let old_status = po.status;

        // Guards run before any write so a rejected update leaves no trace.
        let new_status = match &self.status {
            Some(raw) => {
                let requested = PurchaseOrderStatus::parse(raw)?;
                if !old_status.can_transition_to(requested) {
                    return Err(ServiceError::PreconditionFailed(format!(
                        "Cannot transition purchase order {} from '{}' to '{}'",
                        po.po_number, old_status, requested
                    )));
                }
                requested
            }
            None => old_status,
        };

        // Terminal orders are immutable records. The only accepted update is
        // a status no-op; any field change would silently rewrite totals.
        let changes_fields = self.supplier_id.is_some()
            || self.order_date.is_some()
            || self.delivery_date.is_some()
            || self.notes.is_some()
            || self.line_items.is_some();
        if old_status.is_terminal() && changes_fields {
            return Err(ServiceError::PreconditionFailed(format!(
                "Purchase order {} is '{}' and can no longer be modified",
                po.po_number, old_status
            )));
        }

        if self.line_items.is_some() && !old_status.line_items_editable() {
            return Err(ServiceError::PreconditionFailed(format!(
                "Line items can only be modified while the purchase order is draft or pending; {} is '{}'",
                po.po_number, old_status
            )));
        }

        let supplier_id = self.supplier_id.unwrap_or(po.supplier_id);
        let supplier = supplier::Entity::find_by_id(supplier_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))?;

        // Replace the line set if requested, then recompute totals from
        // whatever the order now contains.
        let now = Utc::now();
        let inputs: Vec<LineInput> = match &self.line_items {
            Some(items) => {
                purchase_order_line_item::Entity::delete_many()
                    .filter(purchase_order_line_item::Column::PurchaseOrderId.eq(po.id))
                    .exec(&txn)
                    .await?;

                let inputs: Vec<LineInput> =
                    items.iter().map(LineItemRequest::as_line_input).collect();
                for (item, input) in items.iter().zip(&inputs) {
                    purchase_order_line_item::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        purchase_order_id: Set(po.id),
                        item_description: Set(item.description.clone()),
                        quantity: Set(input.quantity),
                        unit_price: Set(input.unit_price),
                        line_total: Set(finance::round_currency(input.line_total())),
                        notes: Set(item.notes.clone()),
                        is_heading: Set(input.is_heading),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&txn)
                    .await?;
                }
                inputs
            }
            None => purchase_order_line_item::Entity::find()
                .filter(purchase_order_line_item::Column::PurchaseOrderId.eq(po.id))
                .all(&txn)
                .await?
                .iter()
                .map(purchase_order_line_item::Model::as_line_input)
                .collect(),
        };

        let totals = finance::compute_totals(&inputs, supplier.is_gst_registered).rounded();

        let po_number = po.po_number.clone();
        let mut active = po.into_active_model();
        active.supplier_id = Set(supplier.id);
        active.status = Set(new_status);
        active.subtotal = Set(totals.subtotal);
        active.tax_amount = Set(totals.tax_amount);
        active.total_amount = Set(totals.total_amount);
        if self.order_date.is_some() {
            active.order_date = Set(self.order_date);
        }
        if self.delivery_date.is_some() {
            active.delivery_date = Set(self.delivery_date);
        }
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        event_sender
            .send(Event::PurchaseOrderUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;
        if new_status != old_status {
            event_sender
                .send(Event::PurchaseOrderStatusChanged {
                    purchase_order_id: updated.id,
                    old_status: old_status.to_string(),
                    new_status: new_status.to_string(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        info!(
            purchase_order_id = %updated.id,
            po_number = %po_number,
            status = %updated.status,
            total_amount = %updated.total_amount,
            "Purchase order updated"
        );

        Ok(UpdatePurchaseOrderResult {
            id: updated.id,
            po_number,
            supplier_id: updated.supplier_id,
            status: updated.status,
            subtotal: updated.subtotal,
            tax_amount: updated.tax_amount,
            total_amount: updated.total_amount,
        })
    }
}
