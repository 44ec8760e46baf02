use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

use crate::{errors::ServiceError, models::purchase_order};

pub mod create_purchase_order_command;
pub mod delete_purchase_order_command;
pub mod update_purchase_order_command;
pub mod void_purchase_order_command;

pub use create_purchase_order_command::{CreatePurchaseOrderCommand, LineItemRequest};
pub use delete_purchase_order_command::DeletePurchaseOrderCommand;
pub use update_purchase_order_command::UpdatePurchaseOrderCommand;
pub use void_purchase_order_command::VoidPurchaseOrderCommand;

/// Allocates the next sequential PO number (`PO-000001`, `PO-000002`, ...).
/// Numbers are zero-padded to six digits and keep growing past `PO-999999`,
/// so the highest number is found by ordering on length before the string
/// itself. Runs inside the creation transaction; the unique index on
/// `po_number` backstops concurrent allocations.
pub(crate) async fn next_po_number<C: ConnectionTrait>(conn: &C) -> Result<String, ServiceError> {
    let last = purchase_order::Entity::find()
        .order_by_desc(SimpleExpr::from(Func::char_length(Expr::col(
            purchase_order::Column::PoNumber,
        ))))
        .order_by_desc(purchase_order::Column::PoNumber)
        .one(conn)
        .await?;

    let next = last
        .and_then(|po| {
            po.po_number
                .strip_prefix("PO-")
                .and_then(|n| n.parse::<u64>().ok())
        })
        .map_or(1, |n| n + 1);

    Ok(format!("PO-{:06}", next))
}
