use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cotton_logging::cotton_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

pub type PreviewId = u64;

const PREFIX: &str = "cotton-preview-";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview directory not usable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Keeps a temporary on-disk copy of each selected image until it is released.
///
/// Dropping the store releases every preview it still holds.
#[derive(Debug)]
pub struct PreviewStore {
    dir: Option<PathBuf>,
    entries: HashMap<PreviewId, NamedTempFile>,
}

impl Default for PreviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewStore {
    /// Stores previews in the system temp directory.
    pub fn new() -> Self {
        Self {
            dir: None,
            entries: HashMap::new(),
        }
    }

    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            dir: Some(dir),
            entries: HashMap::new(),
        }
    }

    /// Writes `bytes` to a fresh temp file. An existing preview with the same
    /// id is released first.
    pub fn create(
        &mut self,
        preview_id: PreviewId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, PreviewError> {
        self.release(preview_id);

        let suffix = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX).suffix(&suffix);
        let mut file = match &self.dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(PreviewError::Dir(format!("{} is not a directory", dir.display())));
                }
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.path().to_path_buf();
        cotton_debug!("Preview {} written to {:?}", preview_id, path);
        self.entries.insert(preview_id, file);
        Ok(path)
    }

    /// Deletes the preview file. Returns false if the id was unknown.
    pub fn release(&mut self, preview_id: PreviewId) -> bool {
        match self.entries.remove(&preview_id) {
            Some(file) => {
                if let Err(err) = file.close() {
                    cotton_debug!("Preview {} cleanup failed: {}", preview_id, err);
                }
                true
            }
            None => false,
        }
    }

    pub fn path(&self, preview_id: PreviewId) -> Option<&Path> {
        self.entries.get(&preview_id).map(NamedTempFile::path)
    }
}
