// Configuration module for netpong
// Loads client settings from a TOML file; command line flags override them

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from};
pub use types::{Config, DisplayConfig, KeyBindings, PhysicsConfig};
