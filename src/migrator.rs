use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_restaurant_tables::Migration),
            Box::new(m20240101_000002_create_menu_tables::Migration),
            Box::new(m20240101_000003_create_dining_tables::Migration),
            Box::new(m20240101_000004_create_reservations_table::Migration),
            Box::new(m20240101_000005_create_order_tables::Migration),
            Box::new(m20240101_000006_create_invoices_table::Migration),
            Box::new(m20240101_000007_create_staff_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_restaurant_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_restaurant_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Restaurants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Restaurants::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Restaurants::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Restaurants::Location).string().not_null())
                        .col(
                            ColumnDef::new(Restaurants::ContactNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Restaurants::Description).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Branches::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Branches::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Branches::Address).string().not_null())
                        .col(ColumnDef::new(Branches::City).string().not_null())
                        .col(ColumnDef::new(Branches::RestaurantId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-branches-restaurant_id")
                                .from(Branches::Table, Branches::RestaurantId)
                                .to(Restaurants::Table, Restaurants::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Branches::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Restaurants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Restaurants {
        Table,
        Id,
        Name,
        Location,
        ContactNumber,
        Description,
    }

    #[derive(DeriveIden)]
    enum Branches {
        Table,
        Id,
        Address,
        City,
        RestaurantId,
    }
}

mod m20240101_000002_create_menu_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_menu_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Menus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Menus::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Menus::Name).string().not_null())
                        .col(ColumnDef::new(Menus::Price).decimal().not_null())
                        .col(ColumnDef::new(Menus::Category).string().null())
                        .col(ColumnDef::new(Menus::RestaurantId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-menus-restaurant_id")
                                .from(Menus::Table, Menus::RestaurantId)
                                .to(Restaurants::Table, Restaurants::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::MenuId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-categories-menu_id")
                                .from(Categories::Table, Categories::MenuId)
                                .to(Menus::Table, Menus::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Items::Name).string().not_null())
                        .col(ColumnDef::new(Items::Price).decimal().not_null())
                        .col(ColumnDef::new(Items::Description).string().null())
                        .col(ColumnDef::new(Items::CategoryId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-items-category_id")
                                .from(Items::Table, Items::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Menus::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Menus {
        Table,
        Id,
        Name,
        Price,
        Category,
        RestaurantId,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        MenuId,
    }

    #[derive(DeriveIden)]
    enum Items {
        Table,
        Id,
        Name,
        Price,
        Description,
        CategoryId,
    }

    #[derive(DeriveIden)]
    enum Restaurants {
        Table,
        Id,
    }
}

mod m20240101_000003_create_dining_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_dining_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tables::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tables::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tables::TableNumber).string().not_null())
                        .col(ColumnDef::new(Tables::Seats).integer().not_null())
                        .col(
                            ColumnDef::new(Tables::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Tables::Location).string().null())
                        .col(ColumnDef::new(Tables::BranchId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-tables-branch_id")
                                .from(Tables::Table, Tables::BranchId)
                                .to(Branches::Table, Branches::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tables::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tables {
        Table,
        Id,
        TableNumber,
        Seats,
        IsAvailable,
        Location,
        BranchId,
    }

    #[derive(DeriveIden)]
    enum Branches {
        Table,
        Id,
    }
}

mod m20240101_000004_create_reservations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_reservations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reservations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Reservations::UserId).integer().not_null())
                        .col(ColumnDef::new(Reservations::TableId).integer().not_null())
                        .col(
                            ColumnDef::new(Reservations::ReservationTime)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::GuestsCount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::SpecialRequests)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::Status)
                                .string()
                                .not_null()
                                .default("booked"),
                        )
                        .col(
                            ColumnDef::new(Reservations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-reservations-table_id")
                                .from(Reservations::Table, Reservations::TableId)
                                .to(Tables::Table, Tables::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reservations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Reservations {
        Table,
        Id,
        UserId,
        TableId,
        ReservationTime,
        GuestsCount,
        SpecialRequests,
        Status,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Tables {
        Table,
        Id,
    }
}

mod m20240101_000005_create_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::UserId).integer().not_null())
                        .col(ColumnDef::new(Orders::BranchId).integer().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(Orders::PaymentStatus)
                                .string()
                                .not_null()
                                .default("unpaid"),
                        )
                        .col(ColumnDef::new(Orders::PaymentMethod).string().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-branch_id")
                                .from(Orders::Table, Orders::BranchId)
                                .to(Branches::Table, Branches::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::ItemId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(OrderItems::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::TotalPrice).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-order_items-order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        UserId,
        BranchId,
        TotalAmount,
        Status,
        PaymentStatus,
        PaymentMethod,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        ItemId,
        Quantity,
        UnitPrice,
        TotalPrice,
    }

    #[derive(DeriveIden)]
    enum Branches {
        Table,
        Id,
    }
}

mod m20240101_000006_create_invoices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // order_id carries a UNIQUE constraint: one invoice per order is
            // enforced by the store, not just by the handler's pre-check.
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::OrderId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::IssueDate).timestamp().not_null())
                        .col(ColumnDef::new(Invoices::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Invoices::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-invoices-order_id")
                                .from(Invoices::Table, Invoices::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        OrderId,
        InvoiceNumber,
        IssueDate,
        TotalAmount,
        PaymentStatus,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}

mod m20240101_000007_create_staff_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_staff_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Staff::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Staff::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Staff::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Staff::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Staff::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Staff::Role)
                                .string()
                                .not_null()
                                .default("staff"),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Staff::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Staff {
        Table,
        Id,
        Username,
        Email,
        PasswordHash,
        Role,
    }
}
