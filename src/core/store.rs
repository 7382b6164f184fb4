use crate::core::{reader, writer};
use crate::domain::model::RecipeBook;
use crate::domain::ports::Storage;
use crate::utils::error::{Location, RecipeError, Result};
use crate::utils::validation::validate_path;

const UTF8_BOM: &str = "\u{feff}";

/// Persistence boundary: `save` and `load` of whole recipe collections over a
/// [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct RecipeStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecipeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&self, book: &RecipeBook, destination: &str) -> Result<()> {
        validate_path("destination", destination)?;
        let text = writer::serialize(book);
        self.storage.write_file(destination, text.as_bytes())?;
        tracing::info!(
            destination,
            recipes = book.len(),
            bytes = text.len(),
            "recipes saved"
        );
        Ok(())
    }

    /// Reads and validates `source`. On any failure nothing is returned, so a
    /// caller's current collection stays as it was.
    pub fn load(&self, source: &str) -> Result<RecipeBook> {
        validate_path("source", source)?;
        let bytes = self.storage.read_file(source)?;
        let book = decode_document(&bytes).and_then(reader::deserialize)?;
        tracing::info!(source, recipes = book.len(), "recipes loaded");
        Ok(book)
    }
}

fn decode_document(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        RecipeError::structural(
            Location::document().with_offset(e.valid_up_to()),
            "document is not valid UTF-8",
        )
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}
