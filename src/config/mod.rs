#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate, LOG_LEVELS};
pub use storage::LocalStorage;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Effective settings after layering command-line flags over the optional
/// TOML file over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_dir: String,
    pub file: Option<String>,
    pub log_level: Option<String>,
    pub log_json: bool,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            file: None,
            log_level: None,
            log_json: false,
            verbose: false,
        }
    }
}

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_dir: Option<String>,
    pub file: Option<String>,
    pub log_json: bool,
    pub verbose: bool,
}

impl Settings {
    pub fn resolve(file_config: Option<&TomlConfig>, overrides: Overrides) -> Self {
        let defaults = Self::default();
        let (storage, logging) = match file_config {
            Some(cfg) => (cfg.storage.clone(), cfg.logging.clone()),
            None => Default::default(),
        };

        Self {
            base_dir: overrides
                .base_dir
                .or(storage.base_dir)
                .unwrap_or(defaults.base_dir),
            file: overrides.file.or(storage.default_file),
            log_level: logging.level,
            log_json: overrides.log_json || logging.json.unwrap_or(false),
            verbose: overrides.verbose,
        }
    }

    /// The recipe file to operate on; errors when neither flag nor config names one.
    pub fn recipe_file(&self) -> Result<&str> {
        validation::validate_required_field("file", &self.file).map(String::as_str)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("base_dir", &self.base_dir)?;
        if let Some(file) = &self.file {
            validation::validate_path("file", file)?;
        }
        if let Some(level) = &self.log_level {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn base_dir(&self) -> &str {
        &self.base_dir
    }

    fn default_file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the `--config` file (if any) and layers these flags over it.
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => {
                use crate::utils::error::RecipeError;

                let cfg = TomlConfig::from_file(path).map_err(|e| match e {
                    RecipeError::IoError(io) => RecipeError::ConfigError {
                        message: format!("cannot read config file '{path}': {io}"),
                    },
                    other => other,
                })?;
                cfg.validate()?;
                Some(cfg)
            }
            None => None,
        };

        let settings = Settings::resolve(
            file_config.as_ref(),
            Overrides {
                base_dir: self.base_dir.clone(),
                file: self.file.clone(),
                log_json: self.log_json,
                verbose: self.verbose,
            },
        );
        settings.validate()?;
        Ok(settings)
    }
}
