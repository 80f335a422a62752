use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carousel_slides")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub carousel_id: i32,
    pub image: String,
    #[sea_orm(nullable)]
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub subtitle: Option<String>,
    #[sea_orm(nullable)]
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::carousel::Entity",
        from = "Column::CarouselId",
        to = "super::carousel::Column::Id",
        on_delete = "Cascade"
    )]
    Carousel,
}

impl Related<super::carousel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carousel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
