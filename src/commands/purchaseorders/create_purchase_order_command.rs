use crate::{
    commands::{purchaseorders::next_po_number, Command},
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    finance::{self, LineInput},
    metrics::{PO_CREATIONS, PO_CREATION_FAILURES},
    models::{
        purchase_order, purchase_order_line_item,
        purchase_order::PurchaseOrderStatus,
        supplier,
        supplier::SupplierStatus,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, SqlErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("amount_negative"));
    }
    Ok(())
}

/// One requested line of a purchase order. Clients never supply the line
/// total; it is always recomputed server-side from quantity and unit price.
/// A heading row groups the order visually and carries no monetary value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItemRequest {
    #[validate(length(min = 1, max = 500, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[serde(default)]
    pub quantity: i32,

    #[validate(custom = "validate_non_negative_amount")]
    #[serde(default)]
    pub unit_price: Decimal,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_heading: bool,
}

impl LineItemRequest {
    /// The aggregation view of this request. Heading rows are coerced to
    /// zero quantity and price whatever the client sent.
    pub fn as_line_input(&self) -> LineInput {
        if self.is_heading {
            LineInput::heading()
        } else {
            LineInput::new(self.quantity, self.unit_price)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderCommand {
    pub supplier_id: Uuid,

    #[validate]
    pub items: Vec<LineItemRequest>,

    pub order_date: Option<NaiveDate>,

    pub delivery_date: Option<NaiveDate>,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
    pub supplier_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
}

#[async_trait]
impl Command for CreatePurchaseOrderCommand {
    type Result = CreatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender), fields(supplier_id = %self.supplier_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PO_CREATION_FAILURES.inc();
            ServiceError::ValidationError(e.to_string())
        })?;
        if self.items.is_empty() {
            PO_CREATION_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "At least one line item is required".to_string(),
            ));
        }

        let db = db_pool.as_ref();

        let supplier = supplier::Entity::find_by_id(self.supplier_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                PO_CREATION_FAILURES.inc();
                ServiceError::NotFound(format!("Supplier {} not found", self.supplier_id))
            })?;

        if supplier.status == SupplierStatus::Inactive {
            PO_CREATION_FAILURES.inc();
            return Err(ServiceError::InvalidOperation(format!(
                "Supplier '{}' is inactive and cannot receive new purchase orders",
                supplier.company_name
            )));
        }

        let result = self.persist(db, &supplier).await.map_err(|e| {
            PO_CREATION_FAILURES.inc();
            error!("Failed to create purchase order: {}", e);
            e
        })?;

        event_sender
            .send(Event::PurchaseOrderCreated(result.id))
            .await
            .map_err(ServiceError::EventError)?;

        PO_CREATIONS.inc();
        info!(
            purchase_order_id = %result.id,
            po_number = %result.po_number,
            total_amount = %result.total_amount,
            "Purchase order created"
        );
        Ok(result)
    }
}

impl CreatePurchaseOrderCommand {
    async fn persist(
        &self,
        db: &DbPool,
        supplier: &supplier::Model,
    ) -> Result<CreatePurchaseOrderResult, ServiceError> {
        let txn = db.begin().await?;

        let po_number = next_po_number(&txn).await?;

        let inputs: Vec<LineInput> = self.items.iter().map(LineItemRequest::as_line_input).collect();
        let totals = finance::compute_totals(&inputs, supplier.is_gst_registered).rounded();

        let now = Utc::now();
        let currency = self
            .currency
            .clone()
            .unwrap_or_else(|| "AUD".to_string());

        let po = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            po_number: Set(po_number),
            supplier_id: Set(supplier.id),
            status: Set(PurchaseOrderStatus::Draft),
            subtotal: Set(totals.subtotal),
            tax_amount: Set(totals.tax_amount),
            total_amount: Set(totals.total_amount),
            currency: Set(currency),
            order_date: Set(self.order_date),
            delivery_date: Set(self.delivery_date),
            notes: Set(self.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // Two transactions can read the same highest number; the unique
        // index turns the loser into a retryable conflict instead of a 500.
        let po = po.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict(
                    "Purchase order number was allocated concurrently; retry the request"
                        .to_string(),
                )
            } else {
                ServiceError::from(e)
            }
        })?;

        for (item, input) in self.items.iter().zip(&inputs) {
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

        txn.commit().await?;

        Ok(CreatePurchaseOrderResult {
            id: po.id,
            po_number: po.po_number,
            supplier_id: po.supplier_id,
            status: po.status,
            subtotal: po.subtotal,
            tax_amount: po.tax_amount,
            total_amount: po.total_amount,
            currency: po.currency,
        })
    }
}
