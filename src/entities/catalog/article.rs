use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sellable catalog item.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub category_id: Option<i32>,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    #[sea_orm(unique, nullable)]
    pub sku: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    #[sea_orm(nullable)]
    pub primary_image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::article_image::Entity")]
    ArticleImages,
    #[sea_orm(has_many = "super::article_filter_value::Entity")]
    ArticleFilterValues,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::article_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleImages.def()
    }
}

impl Related<super::article_filter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleFilterValues.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_image::Relation::Image.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_image::Relation::Article.def().rev())
    }
}

impl Related<super::filter_value::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_filter_value::Relation::FilterValue.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_filter_value::Relation::Article.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
