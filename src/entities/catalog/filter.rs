use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named facet such as "Color" or "Talla".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "filters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::filter_value::Entity")]
    FilterValues,
}

impl Related<super::filter_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilterValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
