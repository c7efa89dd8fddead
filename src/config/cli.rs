use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Reads uploads from the local filesystem. Absolute paths ignore the base.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = fs::read(full_path)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ReportError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_relative_to_base() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sales.csv"), b"Date,Amount\n").unwrap();

        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        let data = storage.read_file("sales.csv").await.unwrap();

        assert_eq!(data, b"Date,Amount\n");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        assert!(matches!(
            storage.read_file("missing.csv").await,
            Err(ReportError::IoError(_))
        ));
    }
}
