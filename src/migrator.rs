use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_suppliers_table::Migration),
            Box::new(m20240101_000002_create_purchase_orders_table::Migration),
            Box::new(m20240101_000003_create_purchase_order_line_items_table::Migration),
            Box::new(m20240101_000004_create_supplier_contacts_table::Migration),
        ]
    }
}

mod m20240101_000001_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::CompanyName).string().not_null())
                        .col(ColumnDef::new(Suppliers::Abn).string().null())
                        .col(ColumnDef::new(Suppliers::AddressLine1).string().null())
                        .col(ColumnDef::new(Suppliers::AddressLine2).string().null())
                        .col(ColumnDef::new(Suppliers::City).string().null())
                        .col(ColumnDef::new(Suppliers::State).string().null())
                        .col(ColumnDef::new(Suppliers::PostalCode).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Website).string().null())
                        .col(
                            ColumnDef::new(Suppliers::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(
                            ColumnDef::new(Suppliers::IsGstRegistered)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_suppliers_company_name")
                        .table(Suppliers::Table)
                        .col(Suppliers::CompanyName)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        CompanyName,
        Abn,
        // Default rendering would be "address_line1"; the entity column is
        // "address_line_1".
        #[sea_orm(iden = "address_line_1")]
        AddressLine1,
        #[sea_orm(iden = "address_line_2")]
        AddressLine2,
        City,
        State,
        PostalCode,
        Phone,
        Email,
        Website,
        Status,
        IsGstRegistered,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_purchase_orders_table {
    use super::m20240101_000001_create_suppliers_table::Suppliers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string()
                                .not_null()
                                .default("draft"),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Currency)
                                .string()
                                .not_null()
                                .default("AUD"),
                        )
                        .col(ColumnDef::new(PurchaseOrders::OrderDate).date().null())
                        .col(ColumnDef::new(PurchaseOrders::DeliveryDate).date().null())
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_supplier")
                                .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_supplier_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::SupplierId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrders {
        Table,
        Id,
        PoNumber,
        SupplierId,
        Status,
        Subtotal,
        TaxAmount,
        TotalAmount,
        Currency,
        OrderDate,
        DeliveryDate,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_purchase_order_line_items_table {
    use super::m20240101_000002_create_purchase_orders_table::PurchaseOrders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_purchase_order_line_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLineItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::ItemDescription)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::LineTotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseOrderLineItems::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::IsHeading)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLineItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_line_items_po")
                                .from(
                                    PurchaseOrderLineItems::Table,
                                    PurchaseOrderLineItems::PurchaseOrderId,
                                )
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_order_line_items_po_id")
                        .table(PurchaseOrderLineItems::Table)
                        .col(PurchaseOrderLineItems::PurchaseOrderId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderLineItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrderLineItems {
        Table,
        Id,
        PurchaseOrderId,
        ItemDescription,
        Quantity,
        UnitPrice,
        LineTotal,
        Notes,
        IsHeading,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_supplier_contacts_table {
    use super::m20240101_000001_create_suppliers_table::Suppliers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_supplier_contacts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SupplierContacts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierContacts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierContacts::SupplierId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierContacts::FirstName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierContacts::LastName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierContacts::Role).string().null())
                        .col(ColumnDef::new(SupplierContacts::Email).string().null())
                        .col(ColumnDef::new(SupplierContacts::Phone).string().null())
                        .col(
                            ColumnDef::new(SupplierContacts::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplierContacts::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierContacts::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_contacts_supplier")
                                .from(SupplierContacts::Table, SupplierContacts::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_supplier_contacts_supplier_id")
                        .table(SupplierContacts::Table)
                        .col(SupplierContacts::SupplierId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierContacts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum SupplierContacts {
        Table,
        Id,
        SupplierId,
        FirstName,
        LastName,
        Role,
        Email,
        Phone,
        IsPrimary,
        CreatedAt,
        UpdatedAt,
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::Iden;

    use super::m20240101_000001_create_suppliers_table::Suppliers;
    use super::m20240101_000002_create_purchase_orders_table::PurchaseOrders;
    use super::m20240101_000003_create_purchase_order_line_items_table::PurchaseOrderLineItems;
    use super::m20240101_000004_create_supplier_contacts_table::SupplierContacts;
    use crate::models::{purchase_order, purchase_order_line_item, supplier, supplier_contact};

    // The entities are the source of truth for column names; the migration
    // idens must render identically or inserts fail at runtime.
    #[test]
    fn supplier_column_idens_match_the_entity() {
        assert_eq!(
            Suppliers::AddressLine1.to_string(),
            supplier::Column::AddressLine1.to_string()
        );
        assert_eq!(
            Suppliers::AddressLine2.to_string(),
            supplier::Column::AddressLine2.to_string()
        );
        assert_eq!(Suppliers::AddressLine1.to_string(), "address_line_1");
        assert_eq!(Suppliers::AddressLine2.to_string(), "address_line_2");
        assert_eq!(
            Suppliers::IsGstRegistered.to_string(),
            supplier::Column::IsGstRegistered.to_string()
        );
    }

    #[test]
    fn purchase_order_column_idens_match_the_entities() {
        assert_eq!(
            PurchaseOrders::PoNumber.to_string(),
            purchase_order::Column::PoNumber.to_string()
        );
        assert_eq!(
            PurchaseOrders::TaxAmount.to_string(),
            purchase_order::Column::TaxAmount.to_string()
        );
        assert_eq!(
            PurchaseOrderLineItems::ItemDescription.to_string(),
            purchase_order_line_item::Column::ItemDescription.to_string()
        );
        assert_eq!(
            PurchaseOrderLineItems::IsHeading.to_string(),
            purchase_order_line_item::Column::IsHeading.to_string()
        );
    }

    #[test]
    fn supplier_contact_column_idens_match_the_entity() {
        assert_eq!(
            SupplierContacts::FirstName.to_string(),
            supplier_contact::Column::FirstName.to_string()
        );
        assert_eq!(
            SupplierContacts::IsPrimary.to_string(),
            supplier_contact::Column::IsPrimary.to_string()
        );
    }
}
