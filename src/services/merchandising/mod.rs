//! Storefront merchandising: banner carousels, navigation links and
//! reusable content blocks.

pub mod carousels;
pub mod content_blocks;
pub mod navigation;

pub use carousels::CarouselService;
pub use content_blocks::ContentBlockService;
pub use navigation::NavigationLinkService;
