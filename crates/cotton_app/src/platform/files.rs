use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use cotton_core::{guess_mime_type, FileSelection, MAX_UPLOAD_BYTES};

/// Reads a file from disk into a selection the core can validate.
///
/// At most `MAX_UPLOAD_BYTES + 1` bytes are read, enough for the core to
/// reject an oversized file without buffering all of it.
pub fn load_selection(path: &Path) -> io::Result<FileSelection> {
    let mut bytes = Vec::new();
    File::open(path)?
        .take(MAX_UPLOAD_BYTES + 1)
        .read_to_end(&mut bytes)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = guess_mime_type(&file_name, &bytes);
    Ok(FileSelection::new(file_name, mime_type, bytes))
}

pub fn load_selections<P: AsRef<Path>>(paths: &[P]) -> io::Result<Vec<FileSelection>> {
    paths
        .iter()
        .map(|path| load_selection(path.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotton_core::{update, AppState, Msg, UploadError};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn png_bytes_are_detected_regardless_of_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("capture.bin");
        fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2]).unwrap();

        let selection = load_selection(&path).unwrap();
        assert_eq!(selection.file_name, "capture.bin");
        assert_eq!(selection.mime_type, "image/png");
        assert_eq!(selection.size(), 10);
    }

    #[test]
    fn text_file_keeps_its_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        assert_eq!(load_selection(&path).unwrap().mime_type, "text/plain");
    }

    #[test]
    fn oversized_file_is_read_only_past_the_limit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.jpg");
        let file = File::create(&path).unwrap();
        file.set_len(64 * 1024 * 1024).unwrap();
        drop(file);

        let selection = load_selection(&path).unwrap();
        assert_eq!(selection.size(), MAX_UPLOAD_BYTES + 1);

        let (state, effects) = update(AppState::new(), Msg::FilesSelected(vec![selection]));
        assert!(effects.is_empty());
        assert!(matches!(
            state.upload_error(),
            Some(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn file_at_the_limit_is_read_whole() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("edge.jpg");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES).unwrap();
        drop(file);

        assert_eq!(load_selection(&path).unwrap().size(), MAX_UPLOAD_BYTES);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_selections(&[temp.path().join("nope.jpg")]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
