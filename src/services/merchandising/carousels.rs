use crate::{
    entities::merchandising::{
        carousel, carousel_slide, Carousel, CarouselModel, CarouselSlide, CarouselSlideModel,
    },
    errors::ServiceError,
    services::{
        already_exists, commit, contains_ci, deserialize_some, missing_reference,
        normalize_optional, search_condition, trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CarouselDraft {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl From<CarouselModel> for CarouselDraft {
    fn from(model: CarouselModel) -> Self {
        Self {
            name: model.name,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CarouselPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl CarouselPatch {
    pub fn apply(self, draft: &mut CarouselDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

/// Writable slide. `carousel` comes from the path when created under a carousel.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SlideDraft {
    #[serde(rename = "carousel", default)]
    pub carousel_id: i32,
    #[serde(rename = "imagen")]
    #[validate(length(min = 1, max = 255))]
    pub image: String,
    #[serde(rename = "titulo", default)]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(rename = "subtitulo", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "enlace_url", default)]
    #[validate(url, length(max = 300))]
    pub link_url: Option<String>,
    #[serde(rename = "orden", default)]
    #[validate(range(min = 0))]
    pub sort_order: i32,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl From<CarouselSlideModel> for SlideDraft {
    fn from(model: CarouselSlideModel) -> Self {
        Self {
            carousel_id: model.carousel_id,
            image: model.image,
            title: model.title,
            subtitle: model.subtitle,
            link_url: model.link_url,
            sort_order: model.sort_order,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SlidePatch {
    #[serde(rename = "carousel")]
    pub carousel_id: Option<i32>,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
    #[serde(rename = "titulo", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(rename = "subtitulo", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub subtitle: Option<Option<String>>,
    #[serde(rename = "enlace_url", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub link_url: Option<Option<String>>,
    #[serde(rename = "orden")]
    pub sort_order: Option<i32>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
}

impl SlidePatch {
    pub fn apply(self, draft: &mut SlideDraft) {
        if let Some(carousel_id) = self.carousel_id {
            draft.carousel_id = carousel_id;
        }
        if let Some(image) = self.image {
            draft.image = image;
        }
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(subtitle) = self.subtitle {
            draft.subtitle = subtitle;
        }
        if let Some(link_url) = self.link_url {
            draft.link_url = link_url;
        }
        if let Some(sort_order) = self.sort_order {
            draft.sort_order = sort_order;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarouselQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub carousel_id: Option<i32>,
}

/// Carousel with its slides in display order.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselWithSlides {
    pub carousel: CarouselModel,
    pub slides: Vec<CarouselSlideModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarouselWithCount {
    pub carousel: CarouselModel,
    pub slide_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlideWithCarousel {
    pub slide: CarouselSlideModel,
    pub carousel_name: Option<String>,
}

/// Banner carousels and their slides.
#[derive(Clone)]
pub struct CarouselService {
    db: Arc<DatabaseConnection>,
}

impl CarouselService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active carousels, optionally narrowed to an exact name, each with its
    /// active slides only.
    #[instrument(skip(self))]
    pub async fn list_active(&self, name: Option<String>) -> Result<Vec<CarouselWithSlides>, ServiceError> {
        let mut select = Carousel::find().filter(carousel::Column::IsActive.eq(true));
        if let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            select = select.filter(carousel::Column::Name.eq(name));
        }
        let carousels = select
            .order_by_asc(carousel::Column::Id)
            .all(&*self.db)
            .await?;
        self.with_slides(carousels, true).await
    }

    /// Active carousel by id; inactive ones are not found.
    #[instrument(skip(self))]
    pub async fn get_active(&self, id: i32) -> Result<CarouselWithSlides, ServiceError> {
        let carousel = Carousel::find_by_id(id)
            .filter(carousel::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Carousel", id))?;
        self.with_slides(vec![carousel], true)
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found("Carousel", id))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: CarouselQuery,
        page: PageRequest,
    ) -> Result<Page<CarouselWithCount>, ServiceError> {
        let mut select = Carousel::find();
        if let Some(cond) = search_condition([carousel::Column::Name], query.search.as_deref()) {
            select = select.filter(cond);
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(carousel::Column::IsActive.eq(is_active));
        }
        let paginator = select
            .order_by_asc(carousel::Column::Name)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let carousels = paginator.fetch_page(page.index()).await?;

        let ids: Vec<i32> = carousels.iter().map(|c| c.id).collect();
        let counts = slides_per_carousel(&*self.db, &ids).await?;
        let items = carousels
            .into_iter()
            .map(|carousel| CarouselWithCount {
                slide_count: counts.get(&carousel.id).copied().unwrap_or(0),
                carousel,
            })
            .collect();
        Ok(Page::new(items, total, page))
    }

    /// Any carousel by id, with every slide.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CarouselWithSlides, ServiceError> {
        let carousel = self.find(id).await?;
        self.with_slides(vec![carousel], false)
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found("Carousel", id))
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: CarouselDraft) -> Result<CarouselModel, ServiceError> {
        let draft = prepare_carousel(draft)?;
        let txn = self.db.begin().await?;
        ensure_unique_name(&txn, &draft.name, None).await?;

        let now = Utc::now();
        let carousel = carousel::ActiveModel {
            name: Set(draft.name),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "carousel.create").await?;

        info!(carousel_id = carousel.id, name = %carousel.name, "Created carousel");
        Ok(carousel)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i32, draft: CarouselDraft) -> Result<CarouselModel, ServiceError> {
        let draft = prepare_carousel(draft)?;
        let txn = self.db.begin().await?;
        let existing = Carousel::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Carousel", id))?;
        ensure_unique_name(&txn, &draft.name, Some(id)).await?;

        let mut active: carousel::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.is_active = Set(draft.is_active);
        active.updated_at = Set(Utc::now());
        let carousel = active.update(&txn).await?;
        commit(txn, "carousel.update").await?;

        info!(carousel_id = id, "Updated carousel");
        Ok(carousel)
    }

    pub async fn patch(&self, id: i32, patch: CarouselPatch) -> Result<CarouselModel, ServiceError> {
        let mut draft = CarouselDraft::from(self.find(id).await?);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    /// Deletes the carousel together with its slides.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        Carousel::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Carousel", id))?;
        let slides = CarouselSlide::delete_many()
            .filter(carousel_slide::Column::CarouselId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        Carousel::delete_by_id(id).exec(&txn).await?;
        commit(txn, "carousel.delete").await?;

        info!(carousel_id = id, slides, "Deleted carousel");
        Ok(())
    }

    /// Every slide of a carousel in display order.
    #[instrument(skip(self))]
    pub async fn slides_of(&self, carousel_id: i32) -> Result<Vec<CarouselSlideModel>, ServiceError> {
        self.find(carousel_id).await?;
        CarouselSlide::find()
            .filter(carousel_slide::Column::CarouselId.eq(carousel_id))
            .order_by_asc(carousel_slide::Column::SortOrder)
            .order_by_asc(carousel_slide::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list_slides(
        &self,
        query: SlideQuery,
        page: PageRequest,
    ) -> Result<Page<SlideWithCarousel>, ServiceError> {
        let mut select = CarouselSlide::find().find_also_related(Carousel);
        if let Some(needle) = query.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(carousel_slide::Column::Title, needle))
                    .add(contains_ci(carousel_slide::Column::Subtitle, needle))
                    .add(contains_ci(carousel::Column::Name, needle)),
            );
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(carousel_slide::Column::IsActive.eq(is_active));
        }
        if let Some(carousel_id) = query.carousel_id {
            select = select.filter(carousel_slide::Column::CarouselId.eq(carousel_id));
        }

        let paginator = select
            .order_by_asc(carousel_slide::Column::CarouselId)
            .order_by_asc(carousel_slide::Column::SortOrder)
            .order_by_asc(carousel_slide::Column::Id)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page.index())
            .await?
            .into_iter()
            .map(|(slide, carousel)| SlideWithCarousel {
                slide,
                carousel_name: carousel.map(|c| c.name),
            })
            .collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get_slide(&self, id: i32) -> Result<CarouselSlideModel, ServiceError> {
        CarouselSlide::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("CarouselSlide", id))
    }

    #[instrument(skip(self, draft), fields(carousel_id = draft.carousel_id))]
    pub async fn create_slide(&self, draft: SlideDraft) -> Result<CarouselSlideModel, ServiceError> {
        let draft = prepare_slide(draft)?;
        let txn = self.db.begin().await?;
        ensure_carousel_exists(&txn, draft.carousel_id).await?;

        let now = Utc::now();
        let slide = carousel_slide::ActiveModel {
            carousel_id: Set(draft.carousel_id),
            image: Set(draft.image),
            title: Set(draft.title),
            subtitle: Set(draft.subtitle),
            link_url: Set(draft.link_url),
            sort_order: Set(draft.sort_order),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "carousel_slide.create").await?;

        info!(slide_id = slide.id, carousel_id = slide.carousel_id, "Created carousel slide");
        Ok(slide)
    }

    #[instrument(skip(self, patch))]
    pub async fn patch_slide(&self, id: i32, patch: SlidePatch) -> Result<CarouselSlideModel, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = CarouselSlide::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("CarouselSlide", id))?;
        let mut draft = SlideDraft::from(existing.clone());
        patch.apply(&mut draft);
        let draft = prepare_slide(draft)?;
        ensure_carousel_exists(&txn, draft.carousel_id).await?;

        let mut active: carousel_slide::ActiveModel = existing.into();
        active.carousel_id = Set(draft.carousel_id);
        active.image = Set(draft.image);
        active.title = Set(draft.title);
        active.subtitle = Set(draft.subtitle);
        active.link_url = Set(draft.link_url);
        active.sort_order = Set(draft.sort_order);
        active.is_active = Set(draft.is_active);
        active.updated_at = Set(Utc::now());
        let slide = active.update(&txn).await?;
        commit(txn, "carousel_slide.update").await?;

        info!(slide_id = id, "Updated carousel slide");
        Ok(slide)
    }

    #[instrument(skip(self))]
    pub async fn delete_slide(&self, id: i32) -> Result<(), ServiceError> {
        let result = CarouselSlide::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("CarouselSlide", id));
        }
        info!(slide_id = id, "Deleted carousel slide");
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<CarouselModel, ServiceError> {
        Carousel::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Carousel", id))
    }

    async fn with_slides(
        &self,
        carousels: Vec<CarouselModel>,
        active_only: bool,
    ) -> Result<Vec<CarouselWithSlides>, ServiceError> {
        if carousels.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = carousels.iter().map(|c| c.id).collect();
        let mut select = CarouselSlide::find().filter(carousel_slide::Column::CarouselId.is_in(ids));
        if active_only {
            select = select.filter(carousel_slide::Column::IsActive.eq(true));
        }
        let slides = select
            .order_by_asc(carousel_slide::Column::SortOrder)
            .order_by_asc(carousel_slide::Column::Id)
            .all(&*self.db)
            .await?;

        let mut grouped: HashMap<i32, Vec<CarouselSlideModel>> = HashMap::new();
        for slide in slides {
            grouped.entry(slide.carousel_id).or_default().push(slide);
        }
        Ok(carousels
            .into_iter()
            .map(|carousel| CarouselWithSlides {
                slides: grouped.remove(&carousel.id).unwrap_or_default(),
                carousel,
            })
            .collect())
    }
}

fn prepare_carousel(mut draft: CarouselDraft) -> Result<CarouselDraft, ServiceError> {
    trim_in_place(&mut draft.name);
    draft.validate()?;
    Ok(draft)
}

fn prepare_slide(mut draft: SlideDraft) -> Result<SlideDraft, ServiceError> {
    trim_in_place(&mut draft.image);
    draft.title = normalize_optional(draft.title);
    draft.subtitle = normalize_optional(draft.subtitle);
    draft.link_url = normalize_optional(draft.link_url);
    draft.validate()?;
    Ok(draft)
}

async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Carousel::find().filter(carousel::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(carousel::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::field("nombre", already_exists("Carousel", "nombre")));
    }
    Ok(())
}

async fn ensure_carousel_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), ServiceError> {
    if Carousel::find_by_id(id).one(conn).await?.is_none() {
        return Err(ServiceError::field("carousel", missing_reference(id)));
    }
    Ok(())
}

async fn slides_per_carousel<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<HashMap<i32, u64>, ServiceError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = CarouselSlide::find()
        .select_only()
        .column(carousel_slide::Column::CarouselId)
        .column_as(carousel_slide::Column::Id.count(), "count")
        .filter(carousel_slide::Column::CarouselId.is_in(ids.to_vec()))
        .group_by(carousel_slide::Column::CarouselId)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(image: &str) -> SlideDraft {
        SlideDraft {
            carousel_id: 1,
            image: image.to_string(),
            title: None,
            subtitle: None,
            link_url: None,
            sort_order: 0,
            is_active: true,
        }
    }

    #[test]
    fn slide_requires_image_and_absolute_link() {
        let err = prepare_slide(slide("  ")).unwrap_err();
        assert!(err.field_errors().unwrap().contains("imagen"));

        let mut draft = slide("/media/banco_imagenes/a.png");
        draft.link_url = Some("ofertas".into());
        let err = prepare_slide(draft).unwrap_err();
        assert!(err.field_errors().unwrap().contains("enlace_url"));

        let mut draft = slide("/media/banco_imagenes/a.png");
        draft.link_url = Some(" https://tienda.example/ofertas ".into());
        draft.title = Some("".into());
        let prepared = prepare_slide(draft).unwrap();
        assert_eq!(prepared.link_url.as_deref(), Some("https://tienda.example/ofertas"));
        assert_eq!(prepared.title, None);
    }

    #[test]
    fn negative_order_is_rejected() {
        let mut draft = slide("a.png");
        draft.sort_order = -1;
        let err = prepare_slide(draft).unwrap_err();
        assert!(err.field_errors().unwrap().contains("orden"));
    }

    #[test]
    fn patch_clears_nullable_fields() {
        let mut draft = slide("a.png");
        draft.title = Some("Verano".into());
        let patch: SlidePatch = serde_json::from_str(r#"{"titulo": null, "orden": 3}"#).unwrap();
        patch.apply(&mut draft);
        assert_eq!(draft.title, None);
        assert_eq!(draft.sort_order, 3);
    }
}
