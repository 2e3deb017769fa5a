//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `pages.dir`
//! - `pages.extension`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override pages directory.
    pub pages_dir: Option<PathBuf>,
    /// Override page file extension.
    pub extension: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

const DEFAULT_PAGES_DIR: &str = "pages";
const DEFAULT_EXTENSION: &str = "md";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pages configuration (paths are relative strings from TOML).
    pages: PagesConfigRaw,
    /// Resolved pages configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Path to the loaded config file, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw `[pages]` section as written in TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
}

/// Resolved pages configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesConfig {
    /// Directory holding page files.
    pub dir: PathBuf,
    /// Page file extension, without the leading dot.
    pub extension: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_PAGES_DIR),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`pages.dir`").
        field: String,
        /// Error message (e.g., "${`PAGES_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Strip a leading dot so `.md` and `md` mean the same thing.
fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_owned()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.pages_dir {
            self.pages_resolved.dir.clone_from(dir);
        }
        if let Some(extension) = &settings.extension {
            self.pages_resolved.extension = normalize_extension(extension);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            pages: PagesConfigRaw::default(),
            pages_resolved: PagesConfig {
                dir: base.join(DEFAULT_PAGES_DIR),
                extension: DEFAULT_EXTENSION.to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pages = &self.pages_resolved;
        require_non_empty(&pages.dir.to_string_lossy(), "pages.dir")?;
        require_non_empty(&pages.extension, "pages.extension")?;

        if pages.extension.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "pages.extension cannot contain path separators".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.pages.dir {
            self.pages.dir = Some(expand::expand_env(dir, "pages.dir")?);
        }
        if let Some(ref extension) = self.pages.extension {
            self.pages.extension = Some(expand::expand_env(extension, "pages.extension")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.pages_resolved = PagesConfig {
            dir: config_dir.join(self.pages.dir.as_deref().unwrap_or(DEFAULT_PAGES_DIR)),
            extension: normalize_extension(
                self.pages.extension.as_deref().unwrap_or(DEFAULT_EXTENSION),
            ),
        };
    }
}
