use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "filter_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub filter_id: i32,
    pub value: String,
    #[sea_orm(nullable)]
    pub color_hex: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::filter::Entity",
        from = "Column::FilterId",
        to = "super::filter::Column::Id",
        on_delete = "Cascade"
    )]
    Filter,
    #[sea_orm(has_many = "super::article_filter_value::Entity")]
    ArticleFilterValues,
}

impl Related<super::filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Filter.def()
    }
}

impl Related<super::article_filter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleFilterValues.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_filter_value::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_filter_value::Relation::FilterValue.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
