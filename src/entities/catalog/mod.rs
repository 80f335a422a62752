//! Catalog entities: categories, articles, the image bank and facets.

pub mod article;
pub mod article_filter_value;
pub mod article_image;
pub mod category;
pub mod configuration;
pub mod filter;
pub mod filter_value;
pub mod image;

pub use article::{Entity as Article, Model as ArticleModel};
pub use article_filter_value::{Entity as ArticleFilterValue, Model as ArticleFilterValueModel};
pub use article_image::{Entity as ArticleImage, Model as ArticleImageModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use configuration::{Entity as Configuration, Model as ConfigurationModel};
pub use filter::{Entity as Filter, Model as FilterModel};
pub use filter_value::{Entity as FilterValue, Model as FilterValueModel};
pub use image::{Entity as Image, Model as ImageModel};
