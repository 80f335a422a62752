//! Storefront merchandising widgets.

pub mod carousel;
pub mod carousel_slide;
pub mod content_block;
pub mod navigation_link;

pub use carousel::{Entity as Carousel, Model as CarouselModel};
pub use carousel_slide::{Entity as CarouselSlide, Model as CarouselSlideModel};
pub use content_block::{Entity as ContentBlock, Model as ContentBlockModel};
pub use navigation_link::{Entity as NavigationLink, LinkLocation, Model as NavigationLinkModel};
