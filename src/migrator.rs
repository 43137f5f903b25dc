use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_categories_table::Migration),
            Box::new(m20240601_000002_create_subcategories_table::Migration),
            Box::new(m20240601_000003_create_items_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Image,
    Description,
    TaxApplicability,
    Tax,
    TaxType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subcategories {
    Table,
    Id,
    CategoryId,
    Name,
    Image,
    Description,
    TaxApplicability,
    Tax,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    CategoryId,
    SubcategoryId,
    Name,
    Image,
    Description,
    TaxApplicability,
    Tax,
    BaseAmount,
    Discount,
    TotalAmount,
    CreatedAt,
}

mod m20240601_000001_create_categories_table {
    use super::Categories;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Categories::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Image).string().null())
                        .col(ColumnDef::new(Categories::Description).text().null())
                        .col(
                            ColumnDef::new(Categories::TaxApplicability)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Categories::Tax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Categories::TaxType).string().null())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_categories_name")
                        .table(Categories::Table)
                        .col(Categories::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_categories_created_at")
                        .table(Categories::Table)
                        .col(Categories::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000002_create_subcategories_table {
    use super::{Categories, Subcategories};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_subcategories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Subcategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Subcategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Subcategories::CategoryId).uuid().not_null())
                        .col(ColumnDef::new(Subcategories::Name).string().not_null())
                        .col(ColumnDef::new(Subcategories::Image).string().null())
                        .col(ColumnDef::new(Subcategories::Description).text().null())
                        .col(
                            ColumnDef::new(Subcategories::TaxApplicability)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Subcategories::Tax)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Subcategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_subcategories_category_id")
                                .from(Subcategories::Table, Subcategories::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_subcategories_category_id")
                        .table(Subcategories::Table)
                        .col(Subcategories::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_subcategories_created_at")
                        .table(Subcategories::Table)
                        .col(Subcategories::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Subcategories::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000003_create_items_table {
    use super::{Categories, Items, Subcategories};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Items::CategoryId).uuid().not_null())
                        .col(ColumnDef::new(Items::SubcategoryId).uuid().null())
                        .col(ColumnDef::new(Items::Name).string().not_null())
                        .col(ColumnDef::new(Items::Image).string().null())
                        .col(ColumnDef::new(Items::Description).text().null())
                        .col(
                            ColumnDef::new(Items::TaxApplicability)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Items::Tax).decimal().not_null().default(0))
                        .col(ColumnDef::new(Items::BaseAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Items::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Items::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_category_id")
                                .from(Items::Table, Items::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_subcategory_id")
                                .from(Items::Table, Items::SubcategoryId)
                                .to(Subcategories::Table, Subcategories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            for (name, column) in [
                ("idx_items_category_id", Items::CategoryId),
                ("idx_items_subcategory_id", Items::SubcategoryId),
                ("idx_items_created_at", Items::CreatedAt),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(Items::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }
}
