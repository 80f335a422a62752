use super::slug::resolve_slug;
use crate::{
    entities::catalog::{article, category, Article, Category, CategoryModel},
    errors::{FieldErrors, ServiceError},
    services::{
        already_exists, commit, deserialize_some, normalize_optional, search_condition,
        trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

fn default_true() -> bool {
    true
}

/// Full writable representation of a category (create and PUT).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoryDraft {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Derived from `nombre` when blank.
    #[serde(default)]
    #[validate(length(min = 1, max = 120))]
    pub slug: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "orden", default)]
    #[validate(range(min = 0))]
    pub sort_order: i32,
    #[serde(rename = "imagen_categoria", default)]
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

impl From<CategoryModel> for CategoryDraft {
    fn from(model: CategoryModel) -> Self {
        Self {
            name: model.name,
            description: model.description,
            slug: Some(model.slug),
            is_active: model.is_active,
            sort_order: model.sort_order,
            image: model.image,
        }
    }
}

/// Partial update; `null` clears nullable fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub slug: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
    #[serde(rename = "orden")]
    pub sort_order: Option<i32>,
    #[serde(rename = "imagen_categoria", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl CategoryPatch {
    pub fn apply(self, draft: &mut CategoryDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(slug) = self.slug {
            draft.slug = slug;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
        if let Some(sort_order) = self.sort_order {
            draft.sort_order = sort_order;
        }
        if let Some(image) = self.image {
            draft.image = image;
        }
    }
}

/// Admin listing filters.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Category plus the number of articles filed under it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCount {
    pub category: CategoryModel,
    pub article_count: u64,
}

/// Category administration: slug derivation, uniqueness and the
/// delete-nullifies-articles rule.
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Every category, ordered by `orden` then name.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Category::find()
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list_admin(
        &self,
        filter: CategoryFilter,
        page: PageRequest,
    ) -> Result<Page<CategoryWithCount>, ServiceError> {
        let mut query = Category::find();
        if let Some(cond) = search_condition(
            [category::Column::Name, category::Column::Description],
            filter.search.as_deref(),
        ) {
            query = query.filter(cond);
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(category::Column::IsActive.eq(is_active));
        }

        let paginator = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let categories = paginator.fetch_page(page.index()).await?;

        let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
        let counts = article_counts(&*self.db, &ids).await?;

        let items = categories
            .into_iter()
            .map(|category| CategoryWithCount {
                article_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    pub async fn get_with_count(&self, id: i32) -> Result<CategoryWithCount, ServiceError> {
        let category = self.get(id).await?;
        let counts = article_counts(&*self.db, &[id]).await?;
        Ok(CategoryWithCount {
            article_count: counts.get(&id).copied().unwrap_or(0),
            category,
        })
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: CategoryDraft) -> Result<CategoryModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        ensure_unique(&txn, &draft, None).await?;

        let now = Utc::now();
        let category = category::ActiveModel {
            name: Set(draft.name),
            description: Set(draft.description),
            slug: Set(draft.slug.unwrap_or_default()),
            is_active: Set(draft.is_active),
            sort_order: Set(draft.sort_order),
            image: Set(draft.image),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "category.create").await?;

        info!(category_id = category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    /// Replaces every writable field.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i32, draft: CategoryDraft) -> Result<CategoryModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        let existing = Category::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;
        ensure_unique(&txn, &draft, Some(id)).await?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.description = Set(draft.description);
        active.slug = Set(draft.slug.unwrap_or_default());
        active.is_active = Set(draft.is_active);
        active.sort_order = Set(draft.sort_order);
        active.image = Set(draft.image);
        active.updated_at = Set(Utc::now());
        let category = active.update(&txn).await?;
        commit(txn, "category.update").await?;

        info!(category_id = id, slug = %category.slug, "Updated category");
        Ok(category)
    }

    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: i32, patch: CategoryPatch) -> Result<CategoryModel, ServiceError> {
        let mut draft = CategoryDraft::from(self.get(id).await?);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    /// Deletes the category and detaches its articles.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let existing = Category::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;

        let detached = Article::update_many()
            .col_expr(article::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(article::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        Category::delete_by_id(existing.id).exec(&txn).await?;
        commit(txn, "category.delete").await?;

        info!(category_id = id, detached_articles = detached, "Deleted category");
        Ok(())
    }
}

fn prepare(mut draft: CategoryDraft) -> Result<CategoryDraft, ServiceError> {
    trim_in_place(&mut draft.name);
    draft.description = normalize_optional(draft.description);
    draft.image = normalize_optional(draft.image);
    let slug = resolve_slug(draft.slug.as_deref(), &draft.name);
    if slug.is_empty() && !draft.name.is_empty() {
        return Err(ServiceError::field(
            "slug",
            "Could not derive a slug from this name; provide one explicitly.",
        ));
    }
    draft.slug = Some(slug).filter(|s| !s.is_empty());
    draft.validate()?;
    Ok(draft)
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    draft: &CategoryDraft,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut errors = FieldErrors::new();

    let mut by_name = Category::find().filter(category::Column::Name.eq(draft.name.as_str()));
    if let Some(id) = exclude_id {
        by_name = by_name.filter(category::Column::Id.ne(id));
    }
    if by_name.one(conn).await?.is_some() {
        errors.add("nombre", already_exists("Category", "nombre"));
    }

    let slug = draft.slug.as_deref().unwrap_or_default();
    let mut by_slug = Category::find().filter(category::Column::Slug.eq(slug));
    if let Some(id) = exclude_id {
        by_slug = by_slug.filter(category::Column::Id.ne(id));
    }
    if by_slug.one(conn).await?.is_some() {
        errors.add("slug", already_exists("Category", "slug"));
    }

    errors.into_result()
}

async fn article_counts<C: ConnectionTrait>(
    conn: &C,
    category_ids: &[i32],
) -> Result<HashMap<i32, u64>, ServiceError> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Option<i32>, i64)> = Article::find()
        .select_only()
        .column(article::Column::CategoryId)
        .column_as(article::Column::Id.count(), "count")
        .filter(article::Column::CategoryId.is_in(category_ids.iter().copied()))
        .group_by(article::Column::CategoryId)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count.max(0) as u64)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.into(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn prepare_derives_slug_from_name() {
        let prepared = prepare(draft("  Ropa de Niños ")).unwrap();
        assert_eq!(prepared.name, "Ropa de Niños");
        assert_eq!(prepared.slug.as_deref(), Some("ropa-de-ninos"));
    }

    #[test]
    fn prepare_slugifies_explicit_slug() {
        let mut input = draft("Ropa");
        input.slug = Some("Ropa Infantil".into());
        assert_eq!(prepare(input).unwrap().slug.as_deref(), Some("ropa-infantil"));
    }

    #[test]
    fn prepare_rejects_blank_name_and_negative_order() {
        let mut input = draft("   ");
        input.sort_order = -1;
        let err = prepare(input).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("nombre"));
        assert!(fields.contains("orden"));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut current = draft("Ropa");
        current.description = Some("Todo en ropa".into());
        current.slug = Some("ropa".into());

        let patch: CategoryPatch =
            serde_json::from_str(r#"{"descripcion": null, "orden": 3}"#).unwrap();
        patch.apply(&mut current);

        assert_eq!(current.name, "Ropa");
        assert_eq!(current.description, None);
        assert_eq!(current.slug.as_deref(), Some("ropa"));
        assert_eq!(current.sort_order, 3);
    }
}
