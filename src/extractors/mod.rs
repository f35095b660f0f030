//! Request extractors.

pub mod query_options;
pub use query_options::*;
