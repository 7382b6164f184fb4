use crate::utils::error::Result;

/// Byte-level access to named recipe documents.
///
/// Resolving names to locations, existence checks and I/O failures all belong
/// to implementations; the JSON layer only sees complete buffers.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Must not leave a partially written destination behind on failure.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn base_dir(&self) -> &str;
    fn default_file(&self) -> Option<&str>;
}
