pub mod types;
pub mod registry;
pub mod loader;
pub mod defaults;
pub mod settings;

pub use types::*;
pub use registry::*;
pub use loader::*;
pub use defaults::*;
pub use settings::*;
