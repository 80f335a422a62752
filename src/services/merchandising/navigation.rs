use crate::{
    entities::merchandising::{navigation_link, LinkLocation, NavigationLink, NavigationLinkModel},
    errors::ServiceError,
    services::{search_condition, trim_in_place, Page, PageRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NavigationLinkDraft {
    #[serde(rename = "texto_del_enlace")]
    #[validate(length(min = 1, max = 100))]
    pub label: String,
    /// Absolute URL or a site path such as `/ofertas`.
    #[serde(rename = "url_o_ruta")]
    #[validate(length(min = 1, max = 300))]
    pub url: String,
    #[serde(rename = "ubicacion", default)]
    pub location: LinkLocation,
    #[serde(rename = "orden", default)]
    #[validate(range(min = 0))]
    pub sort_order: i32,
    #[serde(rename = "abrir_en_nueva_pestana", default)]
    pub open_in_new_tab: bool,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl NavigationLinkDraft {
    pub fn new(label: impl Into<String>, url: impl Into<String>, location: LinkLocation, sort_order: i32) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            location,
            sort_order,
            open_in_new_tab: false,
            is_active: true,
        }
    }
}

impl From<NavigationLinkModel> for NavigationLinkDraft {
    fn from(model: NavigationLinkModel) -> Self {
        Self {
            label: model.label,
            url: model.url,
            location: model.location,
            sort_order: model.sort_order,
            open_in_new_tab: model.open_in_new_tab,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NavigationLinkPatch {
    #[serde(rename = "texto_del_enlace")]
    pub label: Option<String>,
    #[serde(rename = "url_o_ruta")]
    pub url: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<LinkLocation>,
    #[serde(rename = "orden")]
    pub sort_order: Option<i32>,
    #[serde(rename = "abrir_en_nueva_pestana")]
    pub open_in_new_tab: Option<bool>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl NavigationLinkPatch {
    pub fn apply(self, draft: &mut NavigationLinkDraft) {
        if let Some(label) = self.label {
            draft.label = label;
        }
        if let Some(url) = self.url {
            draft.url = url;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(sort_order) = self.sort_order {
            draft.sort_order = sort_order;
        }
        if let Some(open_in_new_tab) = self.open_in_new_tab {
            draft.open_in_new_tab = open_in_new_tab;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationLinkQuery {
    pub search: Option<String>,
    pub location: Option<LinkLocation>,
    pub is_active: Option<bool>,
}

/// Header and footer links.
#[derive(Clone)]
pub struct NavigationLinkService {
    db: Arc<DatabaseConnection>,
}

impl NavigationLinkService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active links ordered by location then order.
    #[instrument(skip(self))]
    pub async fn list_active(
        &self,
        location: Option<LinkLocation>,
    ) -> Result<Vec<NavigationLinkModel>, ServiceError> {
        let mut select = NavigationLink::find().filter(navigation_link::Column::IsActive.eq(true));
        if let Some(location) = location {
            select = select.filter(navigation_link::Column::Location.eq(location));
        }
        select
            .order_by_asc(navigation_link::Column::Location)
            .order_by_asc(navigation_link::Column::SortOrder)
            .order_by_asc(navigation_link::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get_active(&self, id: i32) -> Result<NavigationLinkModel, ServiceError> {
        NavigationLink::find_by_id(id)
            .filter(navigation_link::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("NavigationLink", id))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: NavigationLinkQuery,
        page: PageRequest,
    ) -> Result<Page<NavigationLinkModel>, ServiceError> {
        let mut select = NavigationLink::find();
        if let Some(cond) = search_condition(
            [navigation_link::Column::Label, navigation_link::Column::Url],
            query.search.as_deref(),
        ) {
            select = select.filter(cond);
        }
        if let Some(location) = query.location {
            select = select.filter(navigation_link::Column::Location.eq(location));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(navigation_link::Column::IsActive.eq(is_active));
        }
        let paginator = select
            .order_by_asc(navigation_link::Column::Location)
            .order_by_asc(navigation_link::Column::SortOrder)
            .order_by_asc(navigation_link::Column::Id)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<NavigationLinkModel, ServiceError> {
        NavigationLink::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("NavigationLink", id))
    }

    #[instrument(skip(self, draft), fields(label = %draft.label, location = %draft.location))]
    pub async fn create(&self, draft: NavigationLinkDraft) -> Result<NavigationLinkModel, ServiceError> {
        let draft = prepare(draft)?;
        let link = navigation_link::ActiveModel {
            label: Set(draft.label),
            url: Set(draft.url),
            location: Set(draft.location),
            sort_order: Set(draft.sort_order),
            open_in_new_tab: Set(draft.open_in_new_tab),
            is_active: Set(draft.is_active),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(link_id = link.id, location = %link.location, "Created navigation link");
        Ok(link)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: i32,
        draft: NavigationLinkDraft,
    ) -> Result<NavigationLinkModel, ServiceError> {
        let draft = prepare(draft)?;
        let mut active: navigation_link::ActiveModel = self.get(id).await?.into();
        active.label = Set(draft.label);
        active.url = Set(draft.url);
        active.location = Set(draft.location);
        active.sort_order = Set(draft.sort_order);
        active.open_in_new_tab = Set(draft.open_in_new_tab);
        active.is_active = Set(draft.is_active);
        let link = active.update(&*self.db).await?;

        info!(link_id = id, "Updated navigation link");
        Ok(link)
    }

    pub async fn patch(
        &self,
        id: i32,
        patch: NavigationLinkPatch,
    ) -> Result<NavigationLinkModel, ServiceError> {
        let mut draft = NavigationLinkDraft::from(self.get(id).await?);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = NavigationLink::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("NavigationLink", id));
        }
        info!(link_id = id, "Deleted navigation link");
        Ok(())
    }

    /// Inserts the link unless one with the same location and path exists.
    #[instrument(skip(self, draft), fields(url = %draft.url))]
    pub async fn ensure(&self, draft: NavigationLinkDraft) -> Result<bool, ServiceError> {
        let exists = NavigationLink::find()
            .filter(navigation_link::Column::Location.eq(draft.location))
            .filter(navigation_link::Column::Url.eq(draft.url.trim()))
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

fn prepare(mut draft: NavigationLinkDraft) -> Result<NavigationLinkDraft, ServiceError> {
    trim_in_place(&mut draft.label);
    trim_in_place(&mut draft.url);
    draft.validate()?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_to_header() {
        let draft: NavigationLinkDraft =
            serde_json::from_str(r#"{"texto_del_enlace": "Ofertas", "url_o_ruta": "/ofertas"}"#)
                .unwrap();
        assert_eq!(draft.location, LinkLocation::Header);
        assert!(draft.is_active);
        assert!(!draft.open_in_new_tab);
    }

    #[test]
    fn unknown_location_fails_to_deserialize() {
        let result: Result<NavigationLinkDraft, _> = serde_json::from_str(
            r#"{"texto_del_enlace": "A", "url_o_ruta": "/a", "ubicacion": "sidebar"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_label_and_path_are_rejected() {
        let err = prepare(NavigationLinkDraft::new(" ", "", LinkLocation::FooterCol1, 0)).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("texto_del_enlace"));
        assert!(fields.contains("url_o_ruta"));
    }
}
