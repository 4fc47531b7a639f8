/// Client for the external image API
///
/// | Operation | Request                   | Response              |
/// |-----------|---------------------------|-----------------------|
/// | list      | `GET /api/images`         | `{ images: [...] }`   |
/// | upload    | `POST /api/upload`        | `{ image: {...} }`    |
/// | delete    | `DELETE /api/images/{id}` | any 2xx, body ignored |

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::state::data::{ImageList, ImageRecord, UploadRequest, UploadResponse};

#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn list_images(&self) -> Result<Vec<ImageRecord>>;
    async fn upload_image(&self, request: UploadRequest) -> Result<ImageRecord>;
    async fn delete_image(&self, id: &str) -> Result<()>;
}

/// reqwest-backed implementation. No timeout is set: a request either
/// resolves or is left pending.
pub struct HttpImageApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpImageApi {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("image-gallery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            client,
            base: settings.api_base()?,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ImageApi for HttpImageApi {
    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let url = self.endpoint(&["api", "images"])?;
        debug!(%url, "listing images");

        let list: ImageList = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.into_images())
    }

    async fn upload_image(&self, request: UploadRequest) -> Result<ImageRecord> {
        let url = self.endpoint(&["api", "upload"])?;
        debug!(%url, name = %request.name, "uploading image");

        let response: UploadResponse = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.image)
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "images", id])?;
        debug!(%url, "deleting image");

        self.client
            .delete(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
