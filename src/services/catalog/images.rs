use crate::{
    entities::catalog::{article_image, image, ArticleImage, Image, ImageModel},
    errors::ServiceError,
    services::{commit, deserialize_some, normalize_optional, search_condition, Page, PageRequest},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Directory under the media root that holds the image bank.
pub const IMAGE_BANK_DIR: &str = "banco_imagenes";
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];
const MAX_STEM_LEN: usize = 60;

/// Local directory that uploaded files are written to and served from.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
    max_upload_size: usize,
}

/// Location of a file written by [`MediaStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated file name, e.g. `polo-rojo-1a2b3c4d.png`.
    pub name: String,
    /// Public path, e.g. `/media/banco_imagenes/polo-rojo-1a2b3c4d.png`.
    pub public_path: String,
    pub disk_path: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>, max_upload_size: usize) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
            max_upload_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validated lowercase extension of an uploaded file name.
    pub fn extension_of(file_name: &str) -> Result<String, ServiceError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(ServiceError::field(
                "imagen",
                format!(
                    "File extension \u{201c}{}\u{201d} is not allowed. Allowed extensions are: {}.",
                    extension,
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            ))
        }
    }

    /// Writes an upload into the image bank under a fresh unique name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::field("imagen", "The submitted file is empty."));
        }
        if bytes.len() > self.max_upload_size {
            return Err(ServiceError::field(
                "imagen",
                format!(
                    "Ensure this file is no larger than {} bytes (it is {} bytes).",
                    self.max_upload_size,
                    bytes.len()
                ),
            ));
        }
        let extension = Self::extension_of(original_name)?;

        let stem = Path::new(original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slug::slugify)
            .unwrap_or_default();
        let stem: String = stem.chars().take(MAX_STEM_LEN).collect();
        let stem = stem.trim_end_matches('-');
        let suffix = Uuid::new_v4().simple().to_string();
        let name = if stem.is_empty() {
            format!("{}.{}", &suffix[..12], extension)
        } else {
            format!("{}-{}.{}", stem, &suffix[..8], extension)
        };

        let dir = self.root.join(IMAGE_BANK_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        let disk_path = dir.join(&name);
        tokio::fs::write(&disk_path, bytes).await?;

        Ok(StoredFile {
            public_path: format!("{}{}/{}", self.url_prefix, IMAGE_BANK_DIR, name),
            name,
            disk_path,
        })
    }

    /// Disk location of a public path, if it points inside the media root.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.strip_prefix(&self.url_prefix)?);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Best-effort removal; a missing file is logged and ignored.
    pub async fn delete(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            warn!(public_path, "refusing to delete a file outside the media root");
            return;
        };
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %err, "could not delete media file");
        }
    }
}

/// Multipart upload after the handler has read every part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name the client gave the uploaded file.
    pub original_name: String,
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub alt_text: Option<String>,
}

/// Editable metadata, named as on the wire.
#[derive(Validate)]
struct ImageMeta<'a> {
    #[validate(length(max = 255))]
    nombre_archivo: Option<&'a str>,
    #[validate(length(max = 255))]
    alt_text: Option<&'a str>,
}

fn validate_meta(file_name: Option<&str>, alt_text: Option<&str>) -> Result<(), ServiceError> {
    ImageMeta {
        nombre_archivo: file_name,
        alt_text,
    }
    .validate()
    .map_err(Into::into)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ImagePatch {
    #[serde(rename = "nombre_archivo", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub file_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub alt_text: Option<Option<String>>,
}

/// Image bank: uploads, metadata and deletion of stored files.
#[derive(Clone)]
pub struct ImageService {
    db: Arc<DatabaseConnection>,
    media: MediaStore,
}

impl ImageService {
    pub fn new(db: Arc<DatabaseConnection>, media: MediaStore) -> Self {
        Self { db, media }
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Newest first; `q` matches file name and alt text.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<ImageModel>, ServiceError> {
        let mut select = Image::find();
        if let Some(cond) = search_condition(
            [image::Column::FileName, image::Column::AltText],
            search.as_deref(),
        ) {
            select = select.filter(cond);
        }
        let paginator = select
            .order_by_desc(image::Column::CreatedAt)
            .order_by_desc(image::Column::Id)
            .paginate(&*self.db, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ImageModel, ServiceError> {
        Image::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Image", id))
    }

    #[instrument(skip(self, upload), fields(original_name = %upload.original_name, size = upload.bytes.len()))]
    pub async fn upload(&self, mut upload: ImageUpload) -> Result<ImageModel, ServiceError> {
        upload.file_name = normalize_optional(upload.file_name);
        upload.alt_text = normalize_optional(upload.alt_text);
        validate_meta(upload.file_name.as_deref(), upload.alt_text.as_deref())?;

        let stored = self.media.save(&upload.original_name, &upload.bytes).await?;
        let file_name = upload
            .file_name
            .unwrap_or_else(|| display_name(&upload.original_name, &stored.name));

        let inserted = image::ActiveModel {
            file_name: Set(file_name),
            file: Set(stored.public_path.clone()),
            alt_text: Set(upload.alt_text),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await;

        match inserted {
            Ok(image) => {
                info!(image_id = image.id, file = %image.file, "Stored image");
                Ok(image)
            }
            Err(err) => {
                self.media.delete(&stored.public_path).await;
                Err(err.into())
            }
        }
    }

    /// Updates `nombre_archivo` and `alt_text`; clearing the name falls back
    /// to the stored file name.
    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: i32, patch: ImagePatch) -> Result<ImageModel, ServiceError> {
        let existing = self.get(id).await?;
        let file_name = patch.file_name.map(normalize_optional);
        let alt_text = patch.alt_text.map(normalize_optional);

        validate_meta(
            file_name.as_ref().and_then(|f| f.as_deref()),
            alt_text.as_ref().and_then(|a| a.as_deref()),
        )?;

        let stored_name = stored_name(&existing.file);
        let mut active: image::ActiveModel = existing.into();
        if let Some(file_name) = file_name {
            active.file_name = Set(file_name.unwrap_or(stored_name));
        }
        if let Some(alt_text) = alt_text {
            active.alt_text = Set(alt_text);
        }
        let image = active.update(&*self.db).await?;

        info!(image_id = id, "Updated image metadata");
        Ok(image)
    }

    /// Deletes the image, its gallery links and the stored file.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let existing = Image::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Image", id))?;
        ArticleImage::delete_many()
            .filter(article_image::Column::ImageId.eq(id))
            .exec(&txn)
            .await?;
        Image::delete_by_id(id).exec(&txn).await?;
        commit(txn, "image.delete").await?;

        self.media.delete(&existing.file).await;
        info!(image_id = id, file = %existing.file, "Deleted image");
        Ok(())
    }
}

fn display_name(original_name: &str, stored_name: &str) -> String {
    let name = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(stored_name);
    name.chars().take(255).collect()
}

fn stored_name(public_path: &str) -> String {
    public_path
        .rsplit('/')
        .next()
        .unwrap_or(public_path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> MediaStore {
        MediaStore::new(dir.path(), "/media/", 1024)
    }

    #[test]
    fn only_image_extensions_are_accepted() {
        assert_eq!(MediaStore::extension_of("Foto.JPG").unwrap(), "jpg");
        assert_eq!(MediaStore::extension_of("logo.svg").unwrap(), "svg");
        for bad in ["script.exe", "noextension", "archive.tar.gz"] {
            let err = MediaStore::extension_of(bad).unwrap_err();
            assert!(err.field_errors().unwrap().contains("imagen"), "{bad}");
        }
    }

    #[tokio::test]
    async fn save_writes_into_image_bank() {
        let dir = TempDir::new().unwrap();
        let stored = store(&dir).save("Polo Rojo.png", b"png-bytes").await.unwrap();

        assert!(stored.name.starts_with("polo-rojo-"));
        assert!(stored.name.ends_with(".png"));
        assert_eq!(
            stored.public_path,
            format!("/media/banco_imagenes/{}", stored.name)
        );
        let written = tokio::fs::read(dir.path().join(IMAGE_BANK_DIR).join(&stored.name))
            .await
            .unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn save_rejects_oversized_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        assert!(media.save("big.png", &vec![0u8; 2048]).await.is_err());
        assert!(media.save("empty.png", b"").await.is_err());
    }

    #[tokio::test]
    async fn delete_is_best_effort_and_confined_to_root() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        let stored = media.save("a.gif", b"gif").await.unwrap();

        media.delete(&stored.public_path).await;
        assert!(!stored.disk_path.exists());
        // Second delete of a missing file only logs.
        media.delete(&stored.public_path).await;

        assert_eq!(media.resolve("/media/../etc/passwd"), None);
        assert_eq!(media.resolve("/elsewhere/a.png"), None);
    }

    #[test]
    fn long_metadata_is_rejected_under_wire_names() {
        let long = "x".repeat(256);
        let err = validate_meta(Some(&long), None).unwrap_err();
        assert!(err.field_errors().unwrap().contains("nombre_archivo"));
        let err = validate_meta(None, Some(&long)).unwrap_err();
        assert!(err.field_errors().unwrap().contains("alt_text"));
        assert!(validate_meta(Some("foto.png"), None).is_ok());
    }

    #[test]
    fn display_name_falls_back_to_stored_name() {
        assert_eq!(display_name("foto.png", "foto-1234.png"), "foto.png");
        assert_eq!(display_name("", "foto-1234.png"), "foto-1234.png");
        assert_eq!(stored_name("/media/banco_imagenes/x.png"), "x.png");
    }
}
