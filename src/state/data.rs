/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the image API and the UI layer.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use iced::widget::image::Handle;
use serde::{Deserialize, Serialize};

/// MIME type assumed when a payload's format cannot be sniffed
pub const FALLBACK_MIME: &str = "image/jpeg";

/// Represents a single image held by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Server-assigned identifier (opaque)
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name, usually the original filename
    pub name: String,
    /// Raw base64 payload, without a data URL prefix
    pub base64: String,
}

impl ImageRecord {
    /// Decode the base64 payload into bytes
    pub fn decode(&self) -> Option<Vec<u8>> {
        STANDARD.decode(self.base64.trim()).ok()
    }
}

/// Guess the MIME type of image bytes from their magic number
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

/// `GET /api/images` response body
#[derive(Debug, Deserialize)]
pub struct ImageList {
    /// Missing and `null` both mean "no images"
    #[serde(default)]
    pub images: Option<Vec<ImageRecord>>,
}

impl ImageList {
    pub fn into_images(self) -> Vec<ImageRecord> {
        self.images.unwrap_or_default()
    }
}

/// `POST /api/upload` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub name: String,
    pub base64: String,
}

/// `POST /api/upload` response body
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub image: ImageRecord,
}

/// A chosen file that has not been submitted yet
#[derive(Debug, Clone)]
pub struct PendingSelection {
    /// Filename of the chosen file
    pub name: String,
    /// Full data URL (`data:<mime>;base64,<payload>`)
    pub content: String,
    /// Decoded preview for the UI
    pub preview: Handle,
}

impl PendingSelection {
    pub fn new(name: String, content: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            content,
            preview: Handle::from_bytes(bytes),
        }
    }

    /// The base64 payload with the data URL prefix removed.
    /// Splits at the first comma; content without a comma is sent as is.
    pub fn payload(&self) -> &str {
        match self.content.split_once(',') {
            Some((_, payload)) => payload,
            None => &self.content,
        }
    }

    /// Build the upload body for this selection
    pub fn to_upload(&self) -> UploadRequest {
        UploadRequest {
            name: self.name.clone(),
            base64: self.payload().to_string(),
        }
    }
}

/// One entry of the gallery: the server record plus its decoded thumbnail
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub record: ImageRecord,
    /// Sniffed from the payload, JPEG when unknown
    pub mime: &'static str,
    /// None when the payload is not valid base64
    pub thumbnail: Option<Handle>,
}

impl From<ImageRecord> for GalleryItem {
    fn from(record: ImageRecord) -> Self {
        let bytes = record.decode();
        let mime = bytes
            .as_deref()
            .and_then(sniff_mime)
            .unwrap_or(FALLBACK_MIME);
        let thumbnail = bytes.map(Handle::from_bytes);
        Self {
            record,
            mime,
            thumbnail,
        }
    }
}
