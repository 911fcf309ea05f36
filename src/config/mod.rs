pub mod env;
pub mod loader;
pub mod types;

pub use loader::{discover_config_path, load_config};
pub use types::Config;
