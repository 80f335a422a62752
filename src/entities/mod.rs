//! sea-orm entities, grouped by bounded context.

pub mod catalog;
pub mod merchandising;
