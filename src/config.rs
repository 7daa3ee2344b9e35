use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration for the server and the client commands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub server: ServerConfig,
  pub client: ClientConfig,
}

/// Settings for `stockroom serve`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Interface to bind
  pub host: String,
  /// Listening port
  pub port: u16,
  /// SQLite database path (defaults to the platform data directory)
  pub database: Option<PathBuf>,
  /// Origins allowed to call the API from a browser
  pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "127.0.0.1".to_string(),
      port: 5000,
      database: None,
      allowed_origins: vec!["http://localhost:3000".to_string()],
    }
  }
}

/// Settings for the client commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Root URL of the catalog API
  pub api_url: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_url: "http://localhost:5000".to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (missing file is an error)
  /// 2. ./stockroom.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/stockroom/config.yaml
  ///
  /// Environment variables (STOCKROOM_PORT, STOCKROOM_DB, STOCKROOM_API_URL)
  /// win over the file.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("stockroom.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("stockroom").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  fn apply_env_overrides(&mut self) -> Result<()> {
    if let Ok(port) = std::env::var("STOCKROOM_PORT") {
      self.server.port = port
        .parse()
        .map_err(|e| eyre!("Invalid STOCKROOM_PORT '{}': {}", port, e))?;
    }
    if let Ok(database) = std::env::var("STOCKROOM_DB") {
      self.server.database = Some(PathBuf::from(database));
    }
    if let Ok(api_url) = std::env::var("STOCKROOM_API_URL") {
      self.client.api_url = api_url;
    }
    Ok(())
  }
}
