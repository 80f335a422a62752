use super::buckets::{PriceRange, StockLevel};
use crate::{
    entities::catalog::{
        article, article_filter_value, article_image, category, filter, filter_value,
        Article, ArticleFilterValue, ArticleImage, ArticleImageModel, ArticleModel, Category,
        CategoryModel, Filter, FilterModel, FilterValue, FilterValueModel, Image, ImageModel,
    },
    errors::{FieldErrors, ServiceError, NON_FIELD_ERRORS},
    services::{
        already_exists, commit, contains_ci, deserialize_some, missing_reference,
        normalize_optional, trim_in_place, Page, PageRequest,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

const MAX_PRICE_DIGITS: u32 = 10;
const PRICE_DECIMAL_PLACES: u32 = 2;

fn default_true() -> bool {
    true
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let message = if price.is_sign_negative() && !price.is_zero() {
        "Ensure this value is greater than or equal to 0."
    } else if price.normalize().scale() > PRICE_DECIMAL_PLACES {
        "Ensure that there are no more than 2 decimal places."
    } else if price.trunc() >= Decimal::from(10i64.pow(MAX_PRICE_DIGITS - PRICE_DECIMAL_PLACES)) {
        "Ensure that there are no more than 10 digits in total."
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("price");
    err.message = Some(message.into());
    Err(err)
}

/// Full writable representation of an article (create and PUT).
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ArticleDraft {
    #[serde(rename = "categoria", default)]
    pub category_id: Option<i32>,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    #[validate(custom = "validate_price")]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    /// Blank values are stored as null.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "destacado", default)]
    pub is_featured: bool,
    #[serde(rename = "imagen_principal", default)]
    #[validate(length(max = 255))]
    pub primary_image: Option<String>,
}

impl ArticleDraft {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            category_id: None,
            name: name.into(),
            description: None,
            price,
            stock: 0,
            sku: None,
            is_active: true,
            is_featured: false,
            primary_image: None,
        }
    }
}

impl From<ArticleModel> for ArticleDraft {
    fn from(model: ArticleModel) -> Self {
        Self {
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            // SQLite hands decimals back through f64.
            price: model.price.round_dp(PRICE_DECIMAL_PLACES),
            stock: model.stock,
            sku: model.sku,
            is_active: model.is_active,
            is_featured: model.is_featured,
            primary_image: model.primary_image,
        }
    }
}

/// Partial update; `null` clears nullable fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ArticlePatch {
    #[serde(rename = "categoria", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(rename = "precio")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub sku: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub is_active: Option<bool>,
    #[serde(rename = "destacado")]
    pub is_featured: Option<bool>,
    #[serde(rename = "imagen_principal", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub primary_image: Option<Option<String>>,
}

impl ArticlePatch {
    pub fn apply(self, draft: &mut ArticleDraft) {
        if let Some(category_id) = self.category_id {
            draft.category_id = category_id;
        }
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(stock) = self.stock {
            draft.stock = stock;
        }
        if let Some(sku) = self.sku {
            draft.sku = sku;
        }
        if let Some(is_active) = self.is_active {
            draft.is_active = is_active;
        }
        if let Some(is_featured) = self.is_featured {
            draft.is_featured = is_featured;
        }
        if let Some(primary_image) = self.primary_image {
            draft.primary_image = primary_image;
        }
    }
}

/// Storefront listing filters.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Admin listing filters.
#[derive(Debug, Clone, Default)]
pub struct AdminArticleFilter {
    pub stock: Option<StockLevel>,
    pub price: Option<PriceRange>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub category_id: Option<i32>,
    pub search: Option<String>,
}

/// Article joined with the name of its category.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleWithCategory {
    pub article: ArticleModel,
    pub category_name: Option<String>,
}

impl From<(ArticleModel, Option<CategoryModel>)> for ArticleWithCategory {
    fn from((article, category): (ArticleModel, Option<CategoryModel>)) -> Self {
        Self {
            article,
            category_name: category.map(|c| c.name),
        }
    }
}

/// Request to add a bank image to an article's gallery.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AttachImage {
    #[serde(rename = "imagen")]
    pub image_id: i32,
    #[serde(rename = "es_principal", default)]
    pub is_primary: bool,
    #[serde(rename = "orden", default)]
    #[validate(range(min = 0))]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AttachmentPatch {
    #[serde(rename = "es_principal")]
    pub is_primary: Option<bool>,
    #[serde(rename = "orden")]
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
}

/// Gallery entry with its bank image.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryImage {
    pub link: ArticleImageModel,
    pub image: ImageModel,
}

/// Filter value attached to an article, with its filter.
#[derive(Debug, Clone, Serialize)]
pub struct AttachedFilterValue {
    pub value: FilterValueModel,
    pub filter: FilterModel,
}

/// Article administration, storefront listing, gallery and facet links.
#[derive(Clone)]
pub struct ArticleService {
    db: Arc<DatabaseConnection>,
}

impl ArticleService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Storefront listing, newest first then by name.
    #[instrument(skip(self))]
    pub async fn list(&self, query: ArticleQuery) -> Result<Vec<ArticleWithCategory>, ServiceError> {
        if let Some(category_id) = query.category_id {
            if Category::find_by_id(category_id).one(&*self.db).await?.is_none() {
                return Err(ServiceError::field(
                    "categoria",
                    "Select a valid choice. That choice is not one of the available choices.",
                ));
            }
        }

        let mut select = Article::find().find_also_related(Category);
        if let Some(category_id) = query.category_id {
            select = select.filter(article::Column::CategoryId.eq(category_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(article::Column::IsActive.eq(is_active));
        }
        if let Some(is_featured) = query.is_featured {
            select = select.filter(article::Column::IsFeatured.eq(is_featured));
        }

        let rows = select
            .order_by_desc(article::Column::CreatedAt)
            .order_by_asc(article::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_admin(
        &self,
        filter: AdminArticleFilter,
        page: PageRequest,
    ) -> Result<Page<ArticleWithCategory>, ServiceError> {
        let mut select = Article::find().find_also_related(Category);
        if let Some(level) = filter.stock {
            select = select.filter(level.condition());
        }
        if let Some(range) = filter.price {
            select = select.filter(range.condition());
        }
        if let Some(is_active) = filter.is_active {
            select = select.filter(article::Column::IsActive.eq(is_active));
        }
        if let Some(is_featured) = filter.is_featured {
            select = select.filter(article::Column::IsFeatured.eq(is_featured));
        }
        if let Some(category_id) = filter.category_id {
            select = select.filter(article::Column::CategoryId.eq(category_id));
        }
        if let Some(needle) = filter.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(article::Column::Name, needle))
                    .add(contains_ci(article::Column::Description, needle))
                    .add(contains_ci(article::Column::Sku, needle))
                    .add(contains_ci(category::Column::Name, needle)),
            );
        }

        let paginator = select
            .order_by_desc(article::Column::CreatedAt)
            .order_by_asc(article::Column::Name)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;
        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ArticleWithCategory, ServiceError> {
        Article::find_by_id(id)
            .find_also_related(Category)
            .one(&*self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::not_found("Article", id))
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ArticleDraft) -> Result<ArticleWithCategory, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        let category = check_references(&txn, &draft, None).await?;

        let now = Utc::now();
        let article = article::ActiveModel {
            category_id: Set(draft.category_id),
            name: Set(draft.name),
            description: Set(draft.description),
            price: Set(draft.price),
            stock: Set(draft.stock),
            sku: Set(draft.sku),
            is_active: Set(draft.is_active),
            is_featured: Set(draft.is_featured),
            primary_image: Set(draft.primary_image),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "article.create").await?;

        info!(article_id = article.id, sku = ?article.sku, "Created article");
        Ok(ArticleWithCategory {
            article,
            category_name: category.map(|c| c.name),
        })
    }

    /// Replaces every writable field.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i32, draft: ArticleDraft) -> Result<ArticleWithCategory, ServiceError> {
        let draft = prepare(draft)?;
        let txn = self.db.begin().await?;
        let existing = Article::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Article", id))?;
        let category = check_references(&txn, &draft, Some(id)).await?;

        let mut active: article::ActiveModel = existing.into();
        active.category_id = Set(draft.category_id);
        active.name = Set(draft.name);
        active.description = Set(draft.description);
        active.price = Set(draft.price);
        active.stock = Set(draft.stock);
        active.sku = Set(draft.sku);
        active.is_active = Set(draft.is_active);
        active.is_featured = Set(draft.is_featured);
        active.primary_image = Set(draft.primary_image);
        active.updated_at = Set(Utc::now());
        let article = active.update(&txn).await?;
        commit(txn, "article.update").await?;

        info!(article_id = id, "Updated article");
        Ok(ArticleWithCategory {
            article,
            category_name: category.map(|c| c.name),
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: i32, patch: ArticlePatch) -> Result<ArticleWithCategory, ServiceError> {
        let mut draft = ArticleDraft::from(self.get(id).await?.article);
        patch.apply(&mut draft);
        self.update(id, draft).await
    }

    /// Deletes the article with its gallery and facet links.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        Article::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Article", id))?;

        ArticleImage::delete_many()
            .filter(article_image::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        ArticleFilterValue::delete_many()
            .filter(article_filter_value::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        Article::delete_by_id(id).exec(&txn).await?;
        commit(txn, "article.delete").await?;

        info!(article_id = id, "Deleted article");
        Ok(())
    }

    /// Gallery of an article ordered by `orden`.
    #[instrument(skip(self))]
    pub async fn list_images(&self, article_id: i32) -> Result<Vec<GalleryImage>, ServiceError> {
        self.ensure_article(&*self.db, article_id).await?;
        let rows = ArticleImage::find()
            .filter(article_image::Column::ArticleId.eq(article_id))
            .find_also_related(Image)
            .order_by_asc(article_image::Column::SortOrder)
            .order_by_asc(article_image::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, image)| image.map(|image| GalleryImage { link, image }))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn attach_image(
        &self,
        article_id: i32,
        input: AttachImage,
    ) -> Result<GalleryImage, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;
        self.ensure_article(&txn, article_id).await?;

        let image = Image::find_by_id(input.image_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::field("imagen", missing_reference(input.image_id)))?;

        let duplicate = ArticleImage::find()
            .filter(article_image::Column::ArticleId.eq(article_id))
            .filter(article_image::Column::ImageId.eq(input.image_id))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::field(
                NON_FIELD_ERRORS,
                "The fields articulo, imagen must make a unique set.",
            ));
        }

        if input.is_primary {
            clear_primary(&txn, article_id, None).await?;
        }
        let link = article_image::ActiveModel {
            article_id: Set(article_id),
            image_id: Set(input.image_id),
            is_primary: Set(input.is_primary),
            sort_order: Set(input.sort_order),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "article_image.create").await?;

        info!(article_id, image_id = image.id, link_id = link.id, "Attached image to article");
        Ok(GalleryImage { link, image })
    }

    #[instrument(skip(self))]
    pub async fn update_attachment(
        &self,
        id: i32,
        patch: AttachmentPatch,
    ) -> Result<GalleryImage, ServiceError> {
        patch.validate()?;
        let txn = self.db.begin().await?;
        let (link, image) = ArticleImage::find_by_id(id)
            .find_also_related(Image)
            .one(&txn)
            .await?
            .and_then(|(link, image)| image.map(|image| (link, image)))
            .ok_or_else(|| ServiceError::not_found("ArticleImage", id))?;

        if patch.is_primary == Some(true) {
            clear_primary(&txn, link.article_id, Some(id)).await?;
        }
        let mut active: article_image::ActiveModel = link.into();
        if let Some(is_primary) = patch.is_primary {
            active.is_primary = Set(is_primary);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        let link = active.update(&txn).await?;
        commit(txn, "article_image.update").await?;

        info!(link_id = id, "Updated gallery entry");
        Ok(GalleryImage { link, image })
    }

    #[instrument(skip(self))]
    pub async fn detach_image(&self, id: i32) -> Result<(), ServiceError> {
        let result = ArticleImage::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("ArticleImage", id));
        }
        info!(link_id = id, "Removed gallery entry");
        Ok(())
    }

    /// Filter values attached to an article, ordered by filter then value.
    #[instrument(skip(self))]
    pub async fn list_filter_values(
        &self,
        article_id: i32,
    ) -> Result<Vec<AttachedFilterValue>, ServiceError> {
        self.ensure_article(&*self.db, article_id).await?;
        let ids: Vec<i32> = ArticleFilterValue::find()
            .filter(article_filter_value::Column::ArticleId.eq(article_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|link| link.filter_value_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = FilterValue::find()
            .filter(filter_value::Column::Id.is_in(ids))
            .find_also_related(Filter)
            .order_by_asc(filter::Column::Name)
            .order_by_asc(filter_value::Column::Value)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(value, filter)| filter.map(|filter| AttachedFilterValue { value, filter }))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn attach_filter_value(
        &self,
        article_id: i32,
        filter_value_id: i32,
    ) -> Result<AttachedFilterValue, ServiceError> {
        let txn = self.db.begin().await?;
        self.ensure_article(&txn, article_id).await?;

        let (value, filter) = FilterValue::find_by_id(filter_value_id)
            .find_also_related(Filter)
            .one(&txn)
            .await?
            .and_then(|(value, filter)| filter.map(|filter| (value, filter)))
            .ok_or_else(|| ServiceError::field("filtro_valor", missing_reference(filter_value_id)))?;

        let duplicate = ArticleFilterValue::find()
            .filter(article_filter_value::Column::ArticleId.eq(article_id))
            .filter(article_filter_value::Column::FilterValueId.eq(filter_value_id))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::field(
                NON_FIELD_ERRORS,
                "The fields articulo, filtro_valor must make a unique set.",
            ));
        }

        article_filter_value::ActiveModel {
            article_id: Set(article_id),
            filter_value_id: Set(filter_value_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        commit(txn, "article_filter_value.create").await?;

        info!(article_id, filter_value_id, "Attached filter value to article");
        Ok(AttachedFilterValue { value, filter })
    }

    #[instrument(skip(self))]
    pub async fn detach_filter_value(
        &self,
        article_id: i32,
        filter_value_id: i32,
    ) -> Result<(), ServiceError> {
        let result = ArticleFilterValue::delete_many()
            .filter(article_filter_value::Column::ArticleId.eq(article_id))
            .filter(article_filter_value::Column::FilterValueId.eq(filter_value_id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Filter value {} is not attached to article {}",
                filter_value_id, article_id
            )));
        }
        info!(article_id, filter_value_id, "Detached filter value from article");
        Ok(())
    }

    async fn ensure_article<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<ArticleModel, ServiceError> {
        Article::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Article", id))
    }
}

fn prepare(mut draft: ArticleDraft) -> Result<ArticleDraft, ServiceError> {
    trim_in_place(&mut draft.name);
    draft.description = normalize_optional(draft.description);
    draft.sku = normalize_optional(draft.sku);
    draft.primary_image = normalize_optional(draft.primary_image);
    draft.validate()?;
    Ok(draft)
}

/// Checks the category reference and SKU uniqueness; returns the category.
async fn check_references<C: ConnectionTrait>(
    conn: &C,
    draft: &ArticleDraft,
    exclude_id: Option<i32>,
) -> Result<Option<CategoryModel>, ServiceError> {
    let mut errors = FieldErrors::new();

    let category = match draft.category_id {
        Some(category_id) => {
            let found = Category::find_by_id(category_id).one(conn).await?;
            if found.is_none() {
                errors.add("categoria", missing_reference(category_id));
            }
            found
        }
        None => None,
    };

    if let Some(sku) = draft.sku.as_deref() {
        let mut query = Article::find().filter(article::Column::Sku.eq(sku));
        if let Some(id) = exclude_id {
            query = query.filter(article::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            errors.add("sku", already_exists("Article", "sku"));
        }
    }

    errors.into_result()?;
    Ok(category)
}

async fn clear_primary<C: ConnectionTrait>(
    conn: &C,
    article_id: i32,
    keep_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut update = ArticleImage::update_many()
        .col_expr(
            article_image::Column::IsPrimary,
            sea_orm::sea_query::Expr::value(false),
        )
        .filter(article_image::Column::ArticleId.eq(article_id))
        .filter(article_image::Column::IsPrimary.eq(true));
    if let Some(id) = keep_id {
        update = update.filter(article_image::Column::Id.ne(id));
    }
    update.exec(conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(19.99) ; "two decimals")]
    #[test_case(dec!(99999999.99) ; "ten digits")]
    fn accepts_valid_prices(price: Decimal) {
        assert!(validate_price(&price).is_ok());
    }

    #[test_case(dec!(-0.01), "greater than or equal to 0" ; "negative")]
    #[test_case(dec!(1.999), "no more than 2 decimal places" ; "three decimals")]
    #[test_case(dec!(100000000), "no more than 10 digits" ; "eleven digits")]
    fn rejects_invalid_prices(price: Decimal, fragment: &str) {
        let err = validate_price(&price).unwrap_err();
        assert!(err.message.unwrap().contains(fragment));
    }

    #[test]
    fn prepare_turns_blank_sku_into_null() {
        let mut draft = ArticleDraft::new("  Polo básico ", dec!(25));
        draft.sku = Some("   ".into());
        let prepared = prepare(draft).unwrap();
        assert_eq!(prepared.name, "Polo básico");
        assert_eq!(prepared.sku, None);
    }

    #[test]
    fn prepare_reports_negative_stock_and_price() {
        let mut draft = ArticleDraft::new("Polo", dec!(-1));
        draft.stock = -5;
        let err = prepare(draft).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("precio"));
        assert!(fields.contains("stock"));
    }

    #[test]
    fn patch_can_clear_category() {
        let mut draft = ArticleDraft::new("Polo", dec!(10));
        draft.category_id = Some(4);
        let patch: ArticlePatch = serde_json::from_str(r#"{"categoria": null, "stock": 7}"#).unwrap();
        patch.apply(&mut draft);
        assert_eq!(draft.category_id, None);
        assert_eq!(draft.stock, 7);
    }
}
