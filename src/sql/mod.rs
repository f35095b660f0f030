//! Safe SQL rendering: identifiers quoted, values as parameters.

mod select;
pub mod params;
pub use select::*;
pub use params::*;
