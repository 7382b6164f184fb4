pub mod extract;
pub mod reader;
pub mod scan;
pub mod store;
pub mod writer;

pub use crate::domain::model::{Ingredient, Recipe, RecipeBook};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
pub use reader::deserialize;
pub use store::RecipeStore;
pub use writer::serialize;
