//! Chart images returned by graph answers

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix that turns a base64 PNG payload into an image source
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A base64-encoded PNG produced by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    payload: String,
}

impl ChartImage {
    pub fn from_base64(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Image source usable by anything that understands data URIs
    pub fn data_uri(&self) -> String {
        format!("{}{}", DATA_URI_PREFIX, self.payload)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload.trim())
            .context("chart payload is not valid base64")
    }

    /// Size of the decoded image, if it decodes
    pub fn byte_len(&self) -> Option<usize> {
        self.decode().ok().map(|bytes| bytes.len())
    }

    /// Write the decoded PNG into `dir` and return the file path
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let bytes = self.decode()?;
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S%3f");
        let path = dir.join(format!("chart-{}.png", stamp));
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC_B64: &str = "iVBORw0KGgo=";

    #[test]
    fn test_data_uri_is_prefix_plus_payload() {
        let chart = ChartImage::from_base64(PNG_MAGIC_B64);
        assert_eq!(chart.data_uri(), format!("data:image/png;base64,{}", PNG_MAGIC_B64));
    }

    #[test]
    fn test_decode() {
        let chart = ChartImage::from_base64(PNG_MAGIC_B64);
        assert_eq!(chart.decode().unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(chart.byte_len(), Some(8));
    }

    #[test]
    fn test_decode_invalid() {
        let chart = ChartImage::from_base64("not base64!!");
        assert!(chart.decode().is_err());
        assert_eq!(chart.byte_len(), None);
    }

    #[test]
    fn test_save_to_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let chart = ChartImage::from_base64(PNG_MAGIC_B64);

        let path = chart.save_to(&dir.path().join("charts")).unwrap();

        assert!(path.extension().is_some_and(|e| e == "png"));
        assert_eq!(fs::read(&path).unwrap().len(), 8);
    }
}
