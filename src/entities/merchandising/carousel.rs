use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named, ordered set of promotional banners (e.g. `principal`, `ofertas`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carousels")]
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
    #[sea_orm(has_many = "super::carousel_slide::Entity")]
    Slides,
}

impl Related<super::carousel_slide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
