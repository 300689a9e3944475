use crate::core::Storage;
use crate::utils::error::{BatchError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Results files under a local output directory, created on first write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn open(&self, name: &str, append: bool) -> Result<(PathBuf, fs::File)> {
        let full_path = self.base_path.join(name);
        let output_error = |source| BatchError::OutputError {
            path: full_path.clone(),
            source,
        };

        fs::create_dir_all(&self.base_path).map_err(output_error)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&full_path)
            .map_err(output_error)?;
        Ok((full_path, file))
    }

    fn write(&self, name: &str, data: &[u8], append: bool) -> Result<PathBuf> {
        let (full_path, mut file) = self.open(name, append)?;
        file.write_all(data)
            .map_err(|source| BatchError::OutputError {
                path: full_path.clone(),
                source,
            })?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path)
    }
}

impl Storage for LocalStorage {
    fn write_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        self.write(name, data, false)
    }

    fn append_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        self.write(name, data, true)
    }
}
