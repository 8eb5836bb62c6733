// Configuration file loading and creation

use super::types::{Config, PhysicsConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default location: `<config_dir>/netpong/config.toml`
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("netpong");
    path.push("config.toml");
    path
}

/// Load configuration from the default location
pub fn load_config() -> Result<Config, io::Error> {
    load_config_from(&get_config_path())
}

/// Load configuration from `path`, creating a default file if it is missing.
/// A file that fails to parse is reported and replaced by defaults in memory.
pub fn load_config_from(path: &Path) -> Result<Config, io::Error> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        match toml::from_str::<Config>(&contents) {
            Ok(mut config) => {
                if let Err(reason) = config.physics.validate() {
                    eprintln!("Warning: Invalid [physics] in {}: {}", path.display(), reason);
                    eprintln!("Using default physics");
                    config.physics = PhysicsConfig::default();
                }
                Ok(config)
            }
            Err(e) => {
                eprintln!("Warning: Failed to parse config file {}: {}", path.display(), e);
                eprintln!("Using default configuration");
                Ok(Config::default())
            }
        }
    } else {
        create_default_config(path)?;
        Ok(Config::default())
    }
}

/// Write a default configuration file with a short header
pub fn create_default_config(path: &Path) -> Result<(), io::Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let commented_toml = format!(
        "# netpong configuration\n\
         # Restart the client after editing\n\
         #\n\
         # Key binding format: \"Up\", \"Down\", \"Enter\", \"Esc\", \"Tab\", \"Space\"\n\
         #                     or single characters like \"W\", \"S\", \"X\"\n\
         # Colors: RGB values from 0-255\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    Ok(())
}
