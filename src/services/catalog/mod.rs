//! Catalog services: categories, articles and their galleries and facets,
//! the image bank and site configuration.

pub mod articles;
pub mod buckets;
pub mod categories;
pub mod configuration;
pub mod filters;
pub mod images;
pub mod slug;

pub use articles::ArticleService;
pub use buckets::{PriceRange, StockLevel};
pub use categories::CategoryService;
pub use configuration::ConfigurationService;
pub use filters::FilterService;
pub use images::{ImageService, MediaStore};
