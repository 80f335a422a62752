use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_catalog_tables::Migration),
            Box::new(m20250101_000002_create_merchandising_tables::Migration),
        ]
    }
}

mod m20250101_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_catalog_tables"
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
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::Description).text().null())
                        .col(
                            ColumnDef::new(Categories::Slug)
                                .string_len(120)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Categories::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Categories::Image).string_len(255).null())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Categories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Images::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Images::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Images::FileName).string_len(255).not_null())
                        .col(ColumnDef::new(Images::File).string_len(255).not_null())
                        .col(ColumnDef::new(Images::AltText).string_len(255).null())
                        .col(
                            ColumnDef::new(Images::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Articles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Articles::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Articles::CategoryId).integer().null())
                        .col(ColumnDef::new(Articles::Name).string_len(200).not_null())
                        .col(ColumnDef::new(Articles::Description).text().null())
                        .col(
                            ColumnDef::new(Articles::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Articles::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Articles::Sku)
                                .string_len(100)
                                .null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Articles::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Articles::IsFeatured)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Articles::PrimaryImage).string_len(255).null())
                        .col(
                            ColumnDef::new(Articles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Articles::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_articles_category_id")
                                .from(Articles::Table, Articles::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_articles_category_id")
                        .table(Articles::Table)
                        .col(Articles::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_articles_created_at")
                        .table(Articles::Table)
                        .col(Articles::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ArticleImages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ArticleImages::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ArticleImages::ArticleId).integer().not_null())
                        .col(ColumnDef::new(ArticleImages::ImageId).integer().not_null())
                        .col(
                            ColumnDef::new(ArticleImages::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ArticleImages::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_article_images_article_id")
                                .from(ArticleImages::Table, ArticleImages::ArticleId)
                                .to(Articles::Table, Articles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_article_images_image_id")
                                .from(ArticleImages::Table, ArticleImages::ImageId)
                                .to(Images::Table, Images::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_article_images_article_image")
                        .table(ArticleImages::Table)
                        .col(ArticleImages::ArticleId)
                        .col(ArticleImages::ImageId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Filters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Filters::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Filters::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Filters::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Filters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Filters::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(FilterValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FilterValues::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(FilterValues::FilterId).integer().not_null())
                        .col(ColumnDef::new(FilterValues::Value).string_len(100).not_null())
                        .col(ColumnDef::new(FilterValues::ColorHex).string_len(7).null())
                        .col(
                            ColumnDef::new(FilterValues::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_filter_values_filter_id")
                                .from(FilterValues::Table, FilterValues::FilterId)
                                .to(Filters::Table, Filters::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_filter_values_filter_value")
                        .table(FilterValues::Table)
                        .col(FilterValues::FilterId)
                        .col(FilterValues::Value)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ArticleFilterValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ArticleFilterValues::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ArticleFilterValues::ArticleId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ArticleFilterValues::FilterValueId)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_article_filter_values_article_id")
                                .from(ArticleFilterValues::Table, ArticleFilterValues::ArticleId)
                                .to(Articles::Table, Articles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_article_filter_values_filter_value_id")
                                .from(
                                    ArticleFilterValues::Table,
                                    ArticleFilterValues::FilterValueId,
                                )
                                .to(FilterValues::Table, FilterValues::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_article_filter_values_pair")
                        .table(ArticleFilterValues::Table)
                        .col(ArticleFilterValues::ArticleId)
                        .col(ArticleFilterValues::FilterValueId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Configurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Configurations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Configurations::Key)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Configurations::Value).text().not_null())
                        .col(
                            ColumnDef::new(Configurations::Description)
                                .string_len(255)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Configurations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Configurations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ArticleFilterValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FilterValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Filters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ArticleImages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Articles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Images::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        Description,
        Slug,
        IsActive,
        SortOrder,
        Image,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Images {
        Table,
        Id,
        FileName,
        File,
        AltText,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Articles {
        Table,
        Id,
        CategoryId,
        Name,
        Description,
        Price,
        Stock,
        Sku,
        IsActive,
        IsFeatured,
        PrimaryImage,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ArticleImages {
        Table,
        Id,
        ArticleId,
        ImageId,
        IsPrimary,
        SortOrder,
    }

    #[derive(DeriveIden)]
    enum Filters {
        Table,
        Id,
        Name,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum FilterValues {
        Table,
        Id,
        FilterId,
        Value,
        ColorHex,
        IsActive,
    }

    #[derive(DeriveIden)]
    enum ArticleFilterValues {
        Table,
        Id,
        ArticleId,
        FilterValueId,
    }

    #[derive(DeriveIden)]
    enum Configurations {
        Table,
        Id,
        Key,
        Value,
        Description,
        UpdatedAt,
    }
}

mod m20250101_000002_create_merchandising_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_merchandising_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Carousels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Carousels::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Carousels::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Carousels::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Carousels::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Carousels::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CarouselSlides::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CarouselSlides::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CarouselSlides::CarouselId).integer().not_null())
                        .col(ColumnDef::new(CarouselSlides::Image).string_len(255).not_null())
                        .col(ColumnDef::new(CarouselSlides::Title).string_len(200).null())
                        .col(ColumnDef::new(CarouselSlides::Subtitle).text().null())
                        .col(ColumnDef::new(CarouselSlides::LinkUrl).string_len(300).null())
                        .col(
                            ColumnDef::new(CarouselSlides::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(CarouselSlides::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(CarouselSlides::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CarouselSlides::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_carousel_slides_carousel_id")
                                .from(CarouselSlides::Table, CarouselSlides::CarouselId)
                                .to(Carousels::Table, Carousels::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_carousel_slides_carousel_order")
                        .table(CarouselSlides::Table)
                        .col(CarouselSlides::CarouselId)
                        .col(CarouselSlides::SortOrder)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(NavigationLinks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(NavigationLinks::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(NavigationLinks::Label).string_len(100).not_null())
                        .col(ColumnDef::new(NavigationLinks::Url).string_len(300).not_null())
                        .col(
                            ColumnDef::new(NavigationLinks::Location)
                                .string_len(20)
                                .not_null()
                                .default("header"),
                        )
                        .col(
                            ColumnDef::new(NavigationLinks::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NavigationLinks::OpenInNewTab)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(NavigationLinks::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_navigation_links_location_order")
                        .table(NavigationLinks::Table)
                        .col(NavigationLinks::Location)
                        .col(NavigationLinks::SortOrder)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ContentBlocks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ContentBlocks::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ContentBlocks::Identifier)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ContentBlocks::Title).string_len(200).null())
                        .col(ColumnDef::new(ContentBlocks::HtmlContent).text().null())
                        .col(ColumnDef::new(ContentBlocks::Image).string_len(255).null())
                        .col(ColumnDef::new(ContentBlocks::LinkUrl).string_len(300).null())
                        .col(
                            ColumnDef::new(ContentBlocks::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ContentBlocks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ContentBlocks::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ContentBlocks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(NavigationLinks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CarouselSlides::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Carousels::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Carousels {
        Table,
        Id,
        Name,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum CarouselSlides {
        Table,
        Id,
        CarouselId,
        Image,
        Title,
        Subtitle,
        LinkUrl,
        SortOrder,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum NavigationLinks {
        Table,
        Id,
        Label,
        Url,
        Location,
        SortOrder,
        OpenInNewTab,
        IsActive,
    }

    #[derive(DeriveIden)]
    enum ContentBlocks {
        Table,
        Id,
        Identifier,
        Title,
        HtmlContent,
        Image,
        LinkUrl,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}
