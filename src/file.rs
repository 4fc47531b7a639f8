/// Reading user-selected files into data URLs
///
/// The file is read fully and encoded as `data:<mime>;base64,<payload>`.
/// The MIME type is sniffed from the bytes, then guessed from the extension,
/// and falls back to `application/octet-stream`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use tracing::debug;

use crate::error::{Error, Result};
use crate::state::data::{sniff_mime, PendingSelection};

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Read a file and turn it into a pending selection
pub async fn read_selection(path: PathBuf) -> Result<PendingSelection> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| Error::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let content = encode_data_url(&bytes, mime_type(&bytes, &path));

    debug!("📄 Read {} ({} bytes)", name, bytes.len());
    Ok(PendingSelection::new(name, content, bytes))
}

/// Encode bytes as a self-describing data URL
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Best guess at the MIME type of a file
pub fn mime_type(bytes: &[u8], path: &Path) -> &'static str {
    sniff_mime(bytes)
        .or_else(|| ImageFormat::from_path(path).ok().map(|f| f.to_mime_type()))
        .unwrap_or(UNKNOWN_MIME)
}
