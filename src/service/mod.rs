//! ListService: executes built queries against PostgreSQL.

mod list;
mod rows;
pub use list::ListService;
pub use rows::row_to_json;
