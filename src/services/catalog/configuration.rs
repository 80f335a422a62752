use crate::{
    entities::catalog::{configuration, Configuration, ConfigurationModel},
    errors::ServiceError,
    services::{
        already_exists, commit, deserialize_some, normalize_optional, search_condition,
        trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ConfigurationDraft {
    #[serde(rename = "clave")]
    #[validate(length(min = 1, max = 100))]
    pub key: String,
    #[serde(rename = "valor", default)]
    pub value: String,
    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

impl ConfigurationDraft {
    pub fn new(key: impl Into<String>, value: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: description.map(str::to_string),
        }
    }
}

impl From<ConfigurationModel> for ConfigurationDraft {
    fn from(model: ConfigurationModel) -> Self {
        Self {
            key: model.key,
            value: model.value,
            description: model.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ConfigurationPatch {
    #[serde(rename = "clave")]
    pub key: Option<String>,
    #[serde(rename = "valor")]
    pub value: Option<String>,
    #[serde(rename = "descripcion", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl ConfigurationPatch {
    pub fn apply(self, draft: &mut ConfigurationDraft) {
        if let Some(key) = self.key {
            draft.key = key;
        }
        if let Some(value) = self.value {
            draft.value = value;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
    }
}

/// Site-wide key/value settings.
#[derive(Clone)]
pub struct ConfigurationService {
    db: Arc<DatabaseConnection>,
}

impl ConfigurationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Settings ordered by key; `q` matches key, description and value.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<ConfigurationModel>, ServiceError> {
        let mut select = Configuration::find();
        if let Some(cond) = search_condition(
            [
                configuration::Column::Key,
                configuration::Column::Description,
                configuration::Column::Value,
            ],
            search.as_deref(),
        ) {
            select = select.filter(cond);
        }
        let paginator = select
            .order_by_asc(configuration::Column::Key)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ConfigurationModel, ServiceError> {
        Configuration::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Configuration", id))
    }

    #[instrument(skip(self))]
    pub async fn get_by_key(&self, key: &str) -> Result<ConfigurationModel, ServiceError> {
        Configuration::find()
            .filter(configuration::Column::Key.eq(key))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Configuration key {} not found", key)))
    }

    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn create(&self, draft: ConfigurationDraft) -> Result<ConfigurationModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        ensure_unique_key(&txn, &draft.key, None).await?;

        let setting = configuration::ActiveModel {
            key: Set(draft.key),
            value: Set(draft.value),
            description: Set(draft.description),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "configuration.create").await?;

        info!(configuration_id = setting.id, key = %setting.key, "Created configuration entry");
        Ok(setting)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: i32,
        draft: ConfigurationDraft,
    ) -> Result<ConfigurationModel, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        let existing = Configuration::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Configuration", id))?;
        ensure_unique_key(&txn, &draft.key, Some(id)).await?;

        let mut active: configuration::ActiveModel = existing.into();
        active.key = Set(draft.key);
        active.value = Set(draft.value);
        active.description = Set(draft.description);
        active.updated_at = Set(Utc::now());
        let setting = active.update(&txn).await?;
        commit(txn, "configuration.update").await?;

        info!(configuration_id = id, key = %setting.key, "Updated configuration entry");
        Ok(setting)
    }

    pub async fn patch(
        &self,
        id: i32,
        patch: ConfigurationPatch,
    ) -> Result<ConfigurationModel, ServiceError> {
        let mut draft = ConfigurationDraft::from(self.get(id).await?);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = Configuration::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Configuration", id));
        }
        info!(configuration_id = id, "Deleted configuration entry");
        Ok(())
    }

    /// Inserts the entry unless its key already exists. Returns whether it was inserted.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub async fn ensure(&self, draft: ConfigurationDraft) -> Result<bool, ServiceError> {
        let exists = Configuration::find()
            .filter(configuration::Column::Key.eq(draft.key.trim()))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            return Ok(false);
        }
        self.create(draft).await?;
        Ok(true)
    }
}

fn prepare(mut draft: ConfigurationDraft) -> Result<ConfigurationDraft, ServiceError> {
    trim_in_place(&mut draft.key);
    draft.description = normalize_optional(draft.description);
    draft.validate()?;
    Ok(draft)
}

async fn ensure_unique_key<C: ConnectionTrait>(
    conn: &C,
    key: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Configuration::find().filter(configuration::Column::Key.eq(key));
    if let Some(id) = exclude_id {
        query = query.filter(configuration::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::field(
            "clave",
            already_exists("Configuration", "clave"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_trimmed_and_required() {
        let prepared = prepare(ConfigurationDraft::new(" telefono ", "999", Some(" "))).unwrap();
        assert_eq!(prepared.key, "telefono");
        assert_eq!(prepared.description, None);

        let err = prepare(ConfigurationDraft::new("", "x", None)).unwrap_err();
        assert!(err.field_errors().unwrap().contains("clave"));
    }
}
