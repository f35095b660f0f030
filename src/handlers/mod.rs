//! HTTP handlers for entity listing.

pub mod entity;
pub use entity::*;
