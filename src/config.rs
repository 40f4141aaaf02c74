//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Default values
//! - TOML file (`dujour.toml` in the working directory, or `--config`)
//! - Environment variables
//! - CLI argument overrides (applied by the commands)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DUJOUR_` and use double
//! underscores to separate nested levels:
//! - `DUJOUR_DATA_FOLDER=/srv/data` sets `data_folder`
//! - `DUJOUR_SERVER__BIND=0.0.0.0:9000` sets `server.bind`
//! - `DUJOUR_FILE_WATCH__ENABLED=false` sets `file_watch.enabled`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "dujour.toml";

const ENV_PREFIX: &str = "DUJOUR_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Directory scanned for CSV and JSON files
    #[serde(default = "default_data_folder")]
    pub data_folder: PathBuf,

    /// HTTP/HTTPS server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Hot reload settings
    #[serde(default)]
    pub file_watch: FileWatchConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Serve over TLS with a self-signed certificate
    #[serde(default)]
    pub https: bool,

    /// Where `cert.pem` and `key.pem` are kept
    #[serde(default = "default_cert_folder")]
    pub cert_folder: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FileWatchConfig {
    /// Reload datasources when files in the data folder change
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level: error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `dujour = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_data_folder() -> PathBuf {
    PathBuf::from("data")
}
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_cert_folder() -> PathBuf {
    PathBuf::from("certs")
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder(),
            server: ServerConfig::default(),
            file_watch: FileWatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            https: false,
            cert_folder: default_cert_folder(),
        }
    }
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive built from the default level and module overrides.
    pub fn filter_directive(&self) -> String {
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort();

        let mut directive = self.default.clone();
        for (module, level) in modules {
            directive.push_str(&format!(",{module}={level}"));
        }
        directive
    }
}

impl Settings {
    /// Load configuration from defaults, `dujour.toml` and the environment.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration using a specific TOML file.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref()).extract().map_err(Box::new)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            // Double underscore separates nesting levels; single underscores stay in field names.
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
    }

    /// Save current configuration to file.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Write a default settings file, refusing to overwrite unless `force`.
    pub fn init_config_file(path: impl AsRef<Path>, force: bool) -> anyhow::Result<PathBuf> {
        let path = path.as_ref();
        if !force && path.exists() {
            anyhow::bail!(
                "Configuration file {} already exists. Use --force to overwrite",
                path.display()
            );
        }

        Settings::default().save(path)?;
        Ok(path.to_path_buf())
    }
}
