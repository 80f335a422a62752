use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Uploaded file in the shared image bank.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub file_name: String,
    /// Public path of the stored file, e.g. `/media/banco_imagenes/<name>.png`.
    pub file: String,
    #[sea_orm(nullable)]
    pub alt_text: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_image::Entity")]
    ArticleImages,
}

impl Related<super::article_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleImages.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_image::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_image::Relation::Image.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
