use crate::{
    entities::catalog::{
        article_filter_value, filter, filter_value, ArticleFilterValue, Filter, FilterModel,
        FilterValue, FilterValueModel,
    },
    errors::{FieldErrors, ServiceError, NON_FIELD_ERRORS},
    services::{
        already_exists, commit, contains_ci, deserialize_some, missing_reference,
        normalize_optional, search_condition, trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color pattern"));

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct FilterDraft {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl From<FilterModel> for FilterDraft {
    fn from(model: FilterModel) -> Self {
        Self {
            name: model.name,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FilterPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl FilterPatch {
    pub fn apply(self, draft: &mut FilterDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

/// Writable representation of a filter value. `filtro` is taken from the
/// path when the value is created under its filter.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct FilterValueDraft {
    #[serde(rename = "filtro", default)]
    pub filter_id: i32,
    #[serde(rename = "valor")]
    #[validate(length(min = 1, max = 100))]
    pub value: String,
    #[serde(default)]
    #[validate(regex(path = "HEX_COLOR", message = "Enter a valid hex color, e.g. #FF0000."))]
    pub color_hex: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl From<FilterValueModel> for FilterValueDraft {
    fn from(model: FilterValueModel) -> Self {
        Self {
            filter_id: model.filter_id,
            value: model.value,
            color_hex: model.color_hex,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FilterValuePatch {
    #[serde(rename = "filtro")]
    pub filter_id: Option<i32>,
    #[serde(rename = "valor")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub color_hex: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl FilterValuePatch {
    pub fn apply(self, draft: &mut FilterValueDraft) {
        if let Some(filter_id) = self.filter_id {
            draft.filter_id = filter_id;
        }
        if let Some(value) = self.value {
            draft.value = value;
        }
        if let Some(color_hex) = self.color_hex {
            draft.color_hex = color_hex;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterValueQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub filter_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterWithCount {
    pub filter: FilterModel,
    pub value_count: u64,
}

/// Filter value with its parent filter and the number of articles using it.
#[derive(Debug, Clone, Serialize)]
pub struct FilterValueDetail {
    pub value: FilterValueModel,
    pub filter: FilterModel,
    pub article_count: u64,
}

/// Facet administration: filters and their values.
#[derive(Clone)]
pub struct FilterService {
    db: Arc<DatabaseConnection>,
}

impl FilterService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: FilterQuery,
        page: PageRequest,
    ) -> Result<Page<FilterWithCount>, ServiceError> {
        let mut select = Filter::find();
        if let Some(cond) = search_condition([filter::Column::Name], query.search.as_deref()) {
            select = select.filter(cond);
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(filter::Column::IsActive.eq(is_active));
        }

        let paginator = select
            .order_by_asc(filter::Column::Name)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let filters = paginator.fetch_page(page.index()).await?;

        let ids: Vec<i32> = filters.iter().map(|f| f.id).collect();
        let counts = values_per_filter(&*self.db, &ids).await?;
        let items = filters
            .into_iter()
            .map(|filter| FilterWithCount {
                value_count: counts.get(&filter.id).copied().unwrap_or(0),
                filter,
            })
            .collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<FilterWithCount, ServiceError> {
        let filter = Filter::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Filter", id))?;
        let counts = values_per_filter(&*self.db, &[id]).await?;
        Ok(FilterWithCount {
            value_count: counts.get(&id).copied().unwrap_or(0),
            filter,
        })
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: FilterDraft) -> Result<FilterModel, ServiceError> {
        let draft = prepare_filter(draft)?;
        let txn = self.db.begin().await?;
        ensure_unique_filter(&txn, &draft.name, None).await?;

        let now = Utc::now();
        let filter = filter::ActiveModel {
            name: Set(draft.name),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "filter.create").await?;

        info!(filter_id = filter.id, name = %filter.name, "Created filter");
        Ok(filter)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i32, draft: FilterDraft) -> Result<FilterModel, ServiceError> {
        let draft = prepare_filter(draft)?;
        let txn = self.db.begin().await?;
        let existing = Filter::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Filter", id))?;
        ensure_unique_filter(&txn, &draft.name, Some(id)).await?;

        let mut active: filter::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.is_active = Set(draft.is_active);
        active.updated_at = Set(Utc::now());
        let filter = active.update(&txn).await?;
        commit(txn, "filter.update").await?;

        info!(filter_id = id, "Updated filter");
        Ok(filter)
    }

    pub async fn patch(&self, id: i32, patch: FilterPatch) -> Result<FilterModel, ServiceError> {
        let mut draft = FilterDraft::from(self.get(id).await?.filter);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    /// Deletes the filter, its values and every article link to those values.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        Filter::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Filter", id))?;

        let value_ids: Vec<i32> = FilterValue::find()
            .filter(filter_value::Column::FilterId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();
        if !value_ids.is_empty() {
            ArticleFilterValue::delete_many()
                .filter(article_filter_value::Column::FilterValueId.is_in(value_ids.clone()))
                .exec(&txn)
                .await?;
            FilterValue::delete_many()
                .filter(filter_value::Column::Id.is_in(value_ids.clone()))
                .exec(&txn)
                .await?;
        }
        Filter::delete_by_id(id).exec(&txn).await?;
        commit(txn, "filter.delete").await?;

        info!(filter_id = id, values = value_ids.len(), "Deleted filter");
        Ok(())
    }

    /// Values of one filter, ordered by value.
    #[instrument(skip(self))]
    pub async fn values_of(&self, filter_id: i32) -> Result<Vec<FilterValueModel>, ServiceError> {
        Filter::find_by_id(filter_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Filter", filter_id))?;
        FilterValue::find()
            .filter(filter_value::Column::FilterId.eq(filter_id))
            .order_by_asc(filter_value::Column::Value)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list_values(
        &self,
        query: FilterValueQuery,
        page: PageRequest,
    ) -> Result<Page<FilterValueDetail>, ServiceError> {
        let mut select = FilterValue::find().find_also_related(Filter);
        if let Some(needle) = query.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(filter_value::Column::Value, needle))
                    .add(contains_ci(filter::Column::Name, needle)),
            );
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(filter_value::Column::IsActive.eq(is_active));
        }
        if let Some(filter_id) = query.filter_id {
            select = select.filter(filter_value::Column::FilterId.eq(filter_id));
        }

        let paginator = select
            .order_by_asc(filter::Column::Name)
            .order_by_asc(filter_value::Column::Value)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;

        let ids: Vec<i32> = rows.iter().map(|(v, _)| v.id).collect();
        let counts = articles_per_value(&*self.db, &ids).await?;
        let items = rows
            .into_iter()
            .filter_map(|(value, filter)| {
                let filter = filter?;
                Some(FilterValueDetail {
                    article_count: counts.get(&value.id).copied().unwrap_or(0),
                    value,
                    filter,
                })
            })
            .collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get_value(&self, id: i32) -> Result<FilterValueDetail, ServiceError> {
        let (value, filter) = FilterValue::find_by_id(id)
            .find_also_related(Filter)
            .one(&*self.db)
            .await?
            .and_then(|(value, filter)| filter.map(|filter| (value, filter)))
            .ok_or_else(|| ServiceError::not_found("FilterValue", id))?;
        let counts = articles_per_value(&*self.db, &[id]).await?;
        Ok(FilterValueDetail {
            article_count: counts.get(&id).copied().unwrap_or(0),
            value,
            filter,
        })
    }

    #[instrument(skip(self, draft), fields(filter_id = draft.filter_id, value = %draft.value))]
    pub async fn create_value(&self, draft: FilterValueDraft) -> Result<FilterValueModel, ServiceError> {
        let draft = prepare_value(draft)?;
        let txn = self.db.begin().await?;
        check_value(&txn, &draft, None).await?;

        let value = filter_value::ActiveModel {
            filter_id: Set(draft.filter_id),
            value: Set(draft.value),
            color_hex: Set(draft.color_hex),
            is_active: Set(draft.is_active),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "filter_value.create").await?;

        info!(filter_value_id = value.id, filter_id = value.filter_id, "Created filter value");
        Ok(value)
    }

    #[instrument(skip(self, patch))]
    pub async fn patch_value(
        &self,
        id: i32,
        patch: FilterValuePatch,
    ) -> Result<FilterValueModel, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = FilterValue::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("FilterValue", id))?;
        let mut draft = FilterValueDraft::from(existing.clone());
        patch.apply(&mut draft);
        let draft = prepare_value(draft)?;
        check_value(&txn, &draft, Some(id)).await?;

        let mut active: filter_value::ActiveModel = existing.into();
        active.filter_id = Set(draft.filter_id);
        active.value = Set(draft.value);
        active.color_hex = Set(draft.color_hex);
        active.is_active = Set(draft.is_active);
        let value = active.update(&txn).await?;
        commit(txn, "filter_value.update").await?;

        info!(filter_value_id = id, "Updated filter value");
        Ok(value)
    }

    /// Deletes the value and its article links.
    #[instrument(skip(self))]
    pub async fn delete_value(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        FilterValue::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("FilterValue", id))?;
        let unlinked = ArticleFilterValue::delete_many()
            .filter(article_filter_value::Column::FilterValueId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        FilterValue::delete_by_id(id).exec(&txn).await?;
        commit(txn, "filter_value.delete").await?;

        info!(filter_value_id = id, unlinked_articles = unlinked, "Deleted filter value");
        Ok(())
    }
}

fn prepare_filter(mut draft: FilterDraft) -> Result<FilterDraft, ServiceError> {
    trim_in_place(&mut draft.name);
    draft.validate()?;
    Ok(draft)
}

fn prepare_value(mut draft: FilterValueDraft) -> Result<FilterValueDraft, ServiceError> {
    trim_in_place(&mut draft.value);
    draft.color_hex = normalize_optional(draft.color_hex);
    draft.validate()?;
    Ok(draft)
}

async fn ensure_unique_filter<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Filter::find().filter(filter::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(filter::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::field("nombre", already_exists("Filter", "nombre")));
    }
    Ok(())
}

/// Parent filter must exist and (filter, value) must be unique.
async fn check_value<C: ConnectionTrait>(
    conn: &C,
    draft: &FilterValueDraft,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    if Filter::find_by_id(draft.filter_id).one(conn).await?.is_none() {
        return Err(ServiceError::field("filtro", missing_reference(draft.filter_id)));
    }

    let mut query = FilterValue::find()
        .filter(filter_value::Column::FilterId.eq(draft.filter_id))
        .filter(filter_value::Column::Value.eq(draft.value.as_str()));
    if let Some(id) = exclude_id {
        query = query.filter(filter_value::Column::Id.ne(id));
    }
    let mut errors = FieldErrors::new();
    if query.one(conn).await?.is_some() {
        errors.add(
            NON_FIELD_ERRORS,
            "The fields filtro, valor must make a unique set.",
        );
    }
    errors.into_result()
}

async fn values_per_filter<C: ConnectionTrait>(
    conn: &C,
    filter_ids: &[i32],
) -> Result<HashMap<i32, u64>, ServiceError> {
    if filter_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = FilterValue::find()
        .select_only()
        .column(filter_value::Column::FilterId)
        .column_as(filter_value::Column::Id.count(), "count")
        .filter(filter_value::Column::FilterId.is_in(filter_ids.iter().copied()))
        .group_by(filter_value::Column::FilterId)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

async fn articles_per_value<C: ConnectionTrait>(
    conn: &C,
    value_ids: &[i32],
) -> Result<HashMap<i32, u64>, ServiceError> {
    if value_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = ArticleFilterValue::find()
        .select_only()
        .column(article_filter_value::Column::FilterValueId)
        .column_as(article_filter_value::Column::Id.count(), "count")
        .filter(article_filter_value::Column::FilterValueId.is_in(value_ids.iter().copied()))
        .group_by(article_filter_value::Column::FilterValueId)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}
