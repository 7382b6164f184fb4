use std::fmt;
use thiserror::Error;

/// Where in a recipe document a failure was detected.
///
/// Indices are zero-based positions inside the `recipes` and `ingredients`
/// arrays; `offset` is a byte offset into the document text when known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub recipe: Option<usize>,
    pub ingredient: Option<usize>,
    pub offset: Option<usize>,
}

impl Location {
    pub fn document() -> Self {
        Self::default()
    }

    pub fn recipe(index: usize) -> Self {
        Self {
            recipe: Some(index),
            ..Self::default()
        }
    }

    pub fn ingredient(recipe: usize, ingredient: usize) -> Self {
        Self {
            recipe: Some(recipe),
            ingredient: Some(ingredient),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.recipe, self.ingredient) {
            (Some(r), Some(i)) => write!(f, "recipe [{r}], ingredient [{i}]")?,
            (Some(r), None) => write!(f, "recipe [{r}]")?,
            _ => write!(f, "document")?,
        }
        if let Some(offset) = self.offset {
            write!(f, " (byte {offset})")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Structural error at {location}: {message}")]
    StructuralError { location: Location, message: String },

    #[error("Validation error at {location}: {message}")]
    ValidationError { location: Location, message: String },

    #[error("Invalid recipe data: {message}")]
    InvalidRecipeError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {reason} (value: {value:?})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Validation,
    Domain,
    Io,
    Config,
}

impl RecipeError {
    pub fn structural(location: Location, message: impl Into<String>) -> Self {
        Self::StructuralError {
            location,
            message: message.into(),
        }
    }

    pub fn validation(location: Location, message: impl Into<String>) -> Self {
        Self::ValidationError {
            location,
            message: message.into(),
        }
    }

    pub fn invalid_recipe(message: impl Into<String>) -> Self {
        Self::InvalidRecipeError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StructuralError { .. } => ErrorCategory::Structural,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::InvalidRecipeError { .. } => ErrorCategory::Domain,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    /// Location of a parse failure, `None` for non-parse errors.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::StructuralError { location, .. } | Self::ValidationError { location, .. } => {
                Some(*location)
            }
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Structural => {
                "Check that the file is a JSON object with a \"recipes\" array of objects"
            }
            ErrorCategory::Validation => {
                "Fix the reported field: names must be non-blank, servings and amounts must be greater than 0"
            }
            ErrorCategory::Domain => "Provide a non-blank name and a positive quantity",
            ErrorCategory::Io => "Check that the path exists and is readable/writable",
            ErrorCategory::Config => "Review the command-line flags and the configuration file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::StructuralError { location, message } => {
                format!("The recipe file is malformed ({location}): {message}")
            }
            Self::ValidationError { location, message } => {
                format!("The recipe file contains invalid data ({location}): {message}")
            }
            Self::IoError(e) => format!("Could not access the file: {e}"),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 2,
            ErrorCategory::Io => 3,
            ErrorCategory::Structural => 4,
            ErrorCategory::Validation => 5,
            ErrorCategory::Domain => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
