use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_products_table::Migration)]
    }
}

mod m20240101_000001_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(ColumnDef::new(Products::Price).big_integer().not_null())
                        .col(ColumnDef::new(Products::Quantity).big_integer().not_null())
                        .col(ColumnDef::new(Products::Description).text().null())
                        .to_owned(),
                )
                .await?;

            // Category backs both the exact-match filter and the distinct
            // lookup that populates the filter UI.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category")
                        .table(Products::Table)
                        .col(Products::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Products {
        Table,
        Id,
        Name,
        Category,
        Price,
        Quantity,
        Description,
    }
}
