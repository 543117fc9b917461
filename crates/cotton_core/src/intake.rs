use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

/// Largest accepted upload, inclusive.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types the classifier accepts. Parameters and case are ignored.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

const FALLBACK_MIME: &str = "application/octet-stream";

pub type PreviewId = u64;

/// A file handed over by the platform (file picker, drag-and-drop, CLI path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl FileSelection {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A validated selection, owned by the coordinator until reset or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub preview_id: PreviewId,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl UploadCandidate {
    pub(crate) fn from_selection(preview_id: PreviewId, selection: FileSelection) -> Self {
        Self {
            preview_id,
            file_name: selection.file_name,
            mime_type: selection.mime_type,
            bytes: selection.bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,
    #[error("Only one image can be analyzed at a time ({count} selected)")]
    MultipleFiles { count: usize },
    #[error("The selected file is empty")]
    Empty,
    #[error("File size should be less than 5MB")]
    TooLarge { size: u64, max: u64 },
    #[error("Unsupported file type {mime_type}: only JPG, JPEG or PNG images are accepted")]
    UnsupportedType { mime_type: String },
}

/// Picks the single file of an interaction; more or fewer is an error.
pub fn single_selection(mut files: Vec<FileSelection>) -> Result<FileSelection, UploadError> {
    match files.len() {
        0 => Err(UploadError::NoFile),
        1 => Ok(files.remove(0)),
        count => Err(UploadError::MultipleFiles { count }),
    }
}

pub fn validate_selection(selection: &FileSelection) -> Result<(), UploadError> {
    let size = selection.size();
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    if !is_accepted_image_type(&selection.mime_type) {
        return Err(UploadError::UnsupportedType {
            mime_type: selection.mime_type.clone(),
        });
    }
    Ok(())
}

pub fn is_accepted_image_type(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or(mime_type).trim();
    ACCEPTED_IMAGE_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
}

/// Determines a MIME type for a file read from disk: magic bytes first, then
/// the extension, then `application/octet-stream`.
pub fn guess_mime_type(file_name: &str, bytes: &[u8]) -> String {
    sniff_image_type(bytes)
        .or_else(|| mime_from_extension(file_name))
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}
