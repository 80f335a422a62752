use crate::{
    entities::merchandising::{content_block, ContentBlock, ContentBlockModel},
    errors::ServiceError,
    services::{
        already_exists, commit, deserialize_some, normalize_optional, search_condition,
        trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid identifier pattern"));

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ContentBlockDraft {
    /// Slug the storefront looks the block up by, e.g. `banner-envio-gratis`.
    #[serde(rename = "identificador")]
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = "IDENTIFIER",
            message = "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens."
        )
    )]
    pub identifier: String,
    #[serde(rename = "titulo", default)]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(rename = "contenido_html", default)]
    pub html_content: Option<String>,
    #[serde(rename = "imagen_asociada", default)]
    #[validate(length(max = 255))]
    pub image: Option<String>,
    #[serde(rename = "enlace_url", default)]
    #[validate(url, length(max = 300))]
    pub link_url: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl From<ContentBlockModel> for ContentBlockDraft {
    fn from(model: ContentBlockModel) -> Self {
        Self {
            identifier: model.identifier,
            title: model.title,
            html_content: model.html_content,
            image: model.image,
            link_url: model.link_url,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContentBlockPatch {
    #[serde(rename = "identificador")]
    pub identifier: Option<String>,
    #[serde(rename = "titulo", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(rename = "contenido_html", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub html_content: Option<Option<String>>,
    #[serde(rename = "imagen_asociada", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(rename = "enlace_url", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub link_url: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl ContentBlockPatch {
    pub fn apply(self, draft: &mut ContentBlockDraft) {
        if let Some(identifier) = self.identifier {
            draft.identifier = identifier;
        }
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(html_content) = self.html_content {
            draft.html_content = html_content;
        }
        if let Some(image) = self.image {
            draft.image = image;
        }
        if let Some(link_url) = self.link_url {
            draft.link_url = link_url;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentBlockQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct ContentBlockService {
    db: Arc<DatabaseConnection>,
}

impl ContentBlockService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active blocks by id, optionally narrowed to one identifier.
    #[instrument(skip(self))]
    pub async fn list_active(
        &self,
        identifier: Option<String>,
    ) -> Result<Vec<ContentBlockModel>, ServiceError> {
        let mut select = ContentBlock::find().filter(content_block::Column::IsActive.eq(true));
        if let Some(identifier) = identifier.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            select = select.filter(content_block::Column::Identifier.eq(identifier));
        }
        select
            .order_by_asc(content_block::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get_active(&self, id: i32) -> Result<ContentBlockModel, ServiceError> {
        ContentBlock::find_by_id(id)
            .filter(content_block::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ContentBlock", id))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: ContentBlockQuery,
        page: PageRequest,
    ) -> Result<Page<ContentBlockModel>, ServiceError> {
        let mut select = ContentBlock::find();
        if let Some(cond) = search_condition(
            [
                content_block::Column::Identifier,
                content_block::Column::Title,
                content_block::Column::HtmlContent,
            ],
            query.search.as_deref(),
        ) {
            select = select.filter(cond);
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(content_block::Column::IsActive.eq(is_active));
        }
        let paginator = select
            .order_by_asc(content_block::Column::Identifier)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ContentBlockModel, ServiceError> {
        ContentBlock::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ContentBlock", id))
    }

    #[instrument(skip(self, draft), fields(identifier = %draft.identifier))]
    pub async fn create(&self, draft: ContentBlockDraft) -> Result<ContentBlockModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        ensure_unique_identifier(&txn, &draft.identifier, None).await?;

        let now = Utc::now();
        let block = content_block::ActiveModel {
            identifier: Set(draft.identifier),
            title: Set(draft.title),
            html_content: Set(draft.html_content),
            image: Set(draft.image),
            link_url: Set(draft.link_url),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "content_block.create").await?;

        info!(block_id = block.id, identifier = %block.identifier, "Created content block");
        Ok(block)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: i32,
        draft: ContentBlockDraft,
    ) -> Result<ContentBlockModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        let existing = ContentBlock::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("ContentBlock", id))?;
        ensure_unique_identifier(&txn, &draft.identifier, Some(id)).await?;

        let mut active: content_block::ActiveModel = existing.into();
        active.identifier = Set(draft.identifier);
        active.title = Set(draft.title);
        active.html_content = Set(draft.html_content);
        active.image = Set(draft.image);
        active.link_url = Set(draft.link_url);
        active.is_active = Set(draft.is_active);
        active.updated_at = Set(Utc::now());
        let block = active.update(&txn).await?;
        commit(txn, "content_block.update").await?;

        info!(block_id = id, "Updated content block");
        Ok(block)
    }

    pub async fn patch(
        &self,
        id: i32,
        patch: ContentBlockPatch,
    ) -> Result<ContentBlockModel, ServiceError> {
        let mut draft = ContentBlockDraft::from(self.get(id).await?);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = ContentBlock::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("ContentBlock", id));
        }
        info!(block_id = id, "Deleted content block");
        Ok(())
    }
}

fn prepare(mut draft: ContentBlockDraft) -> Result<ContentBlockDraft, ServiceError> {
    trim_in_place(&mut draft.identifier);
    draft.title = normalize_optional(draft.title);
    draft.image = normalize_optional(draft.image);
    draft.link_url = normalize_optional(draft.link_url);
    if draft.html_content.as_deref().is_some_and(|html| html.trim().is_empty()) {
        draft.html_content = None;
    }
    draft.validate()?;
    Ok(draft)
}

async fn ensure_unique_identifier<C: ConnectionTrait>(
    conn: &C,
    identifier: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = ContentBlock::find().filter(content_block::Column::Identifier.eq(identifier));
    if let Some(id) = exclude_id {
        query = query.filter(content_block::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::field(
            "identificador",
            already_exists("Content block", "identificador"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn draft(identifier: &str) -> ContentBlockDraft {
        ContentBlockDraft {
            identifier: identifier.to_string(),
            title: None,
            html_content: None,
            image: None,
            link_url: None,
            is_active: true,
        }
    }

    #[test_case("banner-envio-gratis" ; "hyphens")]
    #[test_case("promo_2025" ; "underscore and digits")]
    fn slug_shaped_identifiers_pass(identifier: &str) {
        assert!(prepare(draft(identifier)).is_ok());
    }

    #[test_case("banner envio" ; "space")]
    #[test_case("oferta!" ; "punctuation")]
    #[test_case("   " ; "blank")]
    fn other_identifiers_fail(identifier: &str) {
        let err = prepare(draft(identifier)).unwrap_err();
        assert!(err.field_errors().unwrap().contains("identificador"));
    }

    #[test]
    fn blank_html_is_stored_as_null() {
        let mut block = draft("faq");
        block.html_content = Some("  \n".into());
        assert_eq!(prepare(block).unwrap().html_content, None);
    }
}
