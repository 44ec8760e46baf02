use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Purchase order lifecycle states.
///
/// `draft` is the only state that permits hard deletion; everything past it
/// is retired through `voided` so the audit trail survives. `delivered`,
/// `cancelled` and `voided` are terminal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "voided")]
    Voided,
}

#[derive(Error, Debug)]
pub enum StatusParseError {
    #[error("Unknown purchase order status '{0}'")]
    Unknown(String),
    #[error("Status '{0}' is deprecated and no longer accepted; valid statuses are draft, pending, approved, delivered, cancelled, voided")]
    Deprecated(String),
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "draft",
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Approved => "approved",
            PurchaseOrderStatus::Delivered => "delivered",
            PurchaseOrderStatus::Cancelled => "cancelled",
            PurchaseOrderStatus::Voided => "voided",
        }
    }

    /// Parses a wire-format status. Legacy statuses from the pre-migration
    /// schema (`sent`, `received`, `completed`) are rejected explicitly
    /// rather than silently aliased.
    pub fn parse(value: &str) -> Result<Self, StatusParseError> {
        match value {
            "draft" => Ok(PurchaseOrderStatus::Draft),
            "pending" => Ok(PurchaseOrderStatus::Pending),
            "approved" => Ok(PurchaseOrderStatus::Approved),
            "delivered" => Ok(PurchaseOrderStatus::Delivered),
            "cancelled" => Ok(PurchaseOrderStatus::Cancelled),
            "voided" => Ok(PurchaseOrderStatus::Voided),
            "sent" | "received" | "completed" => {
                Err(StatusParseError::Deprecated(value.to_string()))
            }
            other => Err(StatusParseError::Unknown(other.to_string())),
        }
    }

    /// Validates a status transition against the allowed-transition table.
    /// Self-transitions are permitted (a no-op save keeps the same status).
    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        match (self, next) {
            (Draft, Draft) | (Draft, Pending) => true,
            (Pending, Pending) | (Pending, Approved) | (Pending, Cancelled) => true,
            (Approved, Approved) | (Approved, Delivered) => true,
            (Delivered, Delivered) => true,
            (Cancelled, Cancelled) => true,
            (Voided, Voided) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Delivered
                | PurchaseOrderStatus::Cancelled
                | PurchaseOrderStatus::Voided
        )
    }

    /// Hard deletion is restricted to drafts; anything that has entered the
    /// business process must be voided instead.
    pub fn can_delete(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Draft)
    }

    /// Voiding applies to orders in flight: non-draft and not yet terminal.
    pub fn can_void(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Pending | PurchaseOrderStatus::Approved
        )
    }

    /// Line items stay editable while the order has not advanced past the
    /// pending stage.
    pub fn line_items_editable(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Draft | PurchaseOrderStatus::Pending
        )
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub po_number: String,
    pub supplier_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub order_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::purchase_order_line_item::Entity")]
    LineItems,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::purchase_order_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PurchaseOrderStatus::{self, *};
    use assert_matches::assert_matches;
    use sea_orm::Iterable;

    const ALLOWED: &[(PurchaseOrderStatus, PurchaseOrderStatus)] = &[
        (Draft, Draft),
        (Draft, Pending),
        (Pending, Pending),
        (Pending, Approved),
        (Pending, Cancelled),
        (Approved, Approved),
        (Approved, Delivered),
        (Delivered, Delivered),
        (Cancelled, Cancelled),
        (Voided, Voided),
    ];

    #[test]
    fn every_pair_outside_the_table_is_rejected() {
        for from in PurchaseOrderStatus::iter() {
            for to in PurchaseOrderStatus::iter() {
                let expected = ALLOWED.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn backwards_transitions_are_rejected() {
        assert!(Pending.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Approved));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn delete_and_void_are_mutually_exclusive() {
        assert!(Draft.can_delete());
        assert!(!Draft.can_void());

        for status in [Pending, Approved] {
            assert!(!status.can_delete(), "{status} should not be deletable");
            assert!(status.can_void(), "{status} should be voidable");
        }

        for status in [Delivered, Cancelled, Voided] {
            assert!(!status.can_delete(), "{status} is terminal");
            assert!(!status.can_void(), "{status} is terminal");
        }
    }

    #[test]
    fn line_items_lock_after_pending() {
        assert!(Draft.line_items_editable());
        assert!(Pending.line_items_editable());
        for status in [Approved, Delivered, Cancelled, Voided] {
            assert!(!status.line_items_editable());
        }
    }

    #[test]
    fn parse_accepts_canonical_and_rejects_legacy_statuses() {
        assert_eq!(PurchaseOrderStatus::parse("draft").unwrap(), Draft);
        assert_eq!(PurchaseOrderStatus::parse("voided").unwrap(), Voided);

        assert_matches!(
            PurchaseOrderStatus::parse("sent"),
            Err(super::StatusParseError::Deprecated(_))
        );
        assert_matches!(
            PurchaseOrderStatus::parse("completed"),
            Err(super::StatusParseError::Deprecated(_))
        );
        assert_matches!(
            PurchaseOrderStatus::parse("bogus"),
            Err(super::StatusParseError::Unknown(_))
        );
    }
}
