//! Helpers shared by the command-line binaries

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::warn;

use crate::cascade::Cascade;
use crate::codec::ImageCodec;
use crate::detector::BarcodeDetector;
use crate::error::Result;
use crate::models::DecodeOutcome;

/// Where the encoded image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read bytes from a file on disk
    File(PathBuf),
    /// Base64 text, optionally prefixed with `data:image/<kind>;base64,`
    Base64(String),
}

/// Decode base64 image text into bytes
///
/// A leading data-URL header and any whitespace are ignored.
pub fn decode_base64_image(text: &str) -> Result<Vec<u8>> {
    let body = strip_data_url(text.trim());
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

fn strip_data_url(text: &str) -> &str {
    const MARKER: &str = ";base64,";
    match text.find(MARKER) {
        Some(idx) if text.starts_with("data:") => &text[idx + MARKER.len()..],
        _ => text,
    }
}

/// Read the encoded bytes behind `source`
///
/// An unreadable file yields `Ok(None)` and is reported as a load failure;
/// malformed base64 is an error.
pub fn read_input(source: &InputSource) -> Result<Option<Vec<u8>>> {
    match source {
        InputSource::File(path) => match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => {
                warn!("failed to read {}: {err}", path.display());
                Ok(None)
            }
        },
        InputSource::Base64(text) => decode_base64_image(text).map(Some),
    }
}

/// Load `source` and run the cascade on it, folding every failure into the outcome
pub fn decode_input<D, C>(
    cascade: &mut Cascade<D>,
    codec: &C,
    source: &InputSource,
) -> DecodeOutcome
where
    D: BarcodeDetector,
    C: ImageCodec + ?Sized,
{
    match read_input(source) {
        Ok(Some(bytes)) => cascade.decode_bytes(codec, &bytes),
        Ok(None) => DecodeOutcome::load_failed(),
        Err(err) => DecodeOutcome::from_error(&err),
    }
}

/// Collect image files under `root`, sorted, optionally truncated to `limit`
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp") {
                    images.push(path);
                }
            }
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CascadeError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("barcode_cascade_{nanos}_{sequence}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn test_decode_base64_plain_and_data_url() {
        assert_eq!(decode_base64_image("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_base64_image("data:image/png;base64,aGVs\nbG8=").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_decode_base64_rejects_garbage() {
        assert!(matches!(
            decode_base64_image("not base64!"),
            Err(CascadeError::Base64(_))
        ));
    }

    #[test]
    fn test_missing_file_is_load_failure() {
        let source = InputSource::File(PathBuf::from("/nonexistent/barcode.png"));
        assert!(matches!(read_input(&source), Ok(None)));
    }

    #[test]
    fn test_dataset_iter_filters_and_sorts() {
        let root = temp_dir();
        fs::create_dir_all(root.join("nested")).unwrap();
        for name in ["b.png", "a.JPG", "notes.txt", "nested/c.bmp"] {
            fs::write(root.join(name), b"x").unwrap();
        }

        let found: Vec<PathBuf> = dataset_iter(&root, None).collect();
        assert_eq!(
            found,
            vec![root.join("a.JPG"), root.join("b.png"), root.join("nested/c.bmp")]
        );
        assert_eq!(dataset_iter(&root, Some(1)).count(), 1);

        let _ = fs::remove_dir_all(root);
    }
}
