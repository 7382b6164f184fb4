pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, Settings, TomlConfig};

pub use core::{deserialize, serialize, RecipeStore};
pub use domain::model::{Ingredient, Recipe, RecipeBook};
pub use utils::error::{Location, RecipeError, Result};
