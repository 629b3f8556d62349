//! Color-extraction API client.
//!
//! This crate talks to the remote service that turns an image into a palette.
//! It focuses on:
//!
//! - Resolving and validating the service origin ([`ApiConfig`])
//! - Packaging an [`ImageFile`] as a single multipart part named `image`
//! - Decoding the `{ "palette": [...] }` response into a [`Palette`]
//!
//! The primary entry point is [`PaletteClient`]. Callers that only need to
//! extract colors should depend on the [`PaletteService`] trait so tests can
//! substitute a fake.
//!
//! # Example
//!
//! ```ignore
//! use chromapick_api::{ApiConfig, PaletteClient, PaletteService};
//!
//! async fn demo(file: chromapick_types::ImageFile) -> anyhow::Result<()> {
//!     let client = PaletteClient::new(ApiConfig::from_environment()?)?;
//!     let palette = client.extract_palette(&file).await?;
//!     println!("{:?}", palette.colors());
//!     Ok(())
//! }
//! ```

mod config;

use std::env;

use async_trait::async_trait;
use chromapick_types::{ImageFile, Palette, PaletteError, PaletteResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, header};
use tracing::{debug, info};

pub use config::{API_BASE_ENV, ApiConfig, ApiConfigError, DEFAULT_API_BASE, TIMEOUT_ENV};

/// Path of the extraction endpoint relative to the configured origin.
pub const GET_COLORS_PATH: &str = "/get-colors";
/// Name of the multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Something that can turn an image into a palette.
#[async_trait]
pub trait PaletteService: Send + Sync {
    /// Upload `file` and return the palette in server order.
    ///
    /// Every failure (transport, non-2xx status, malformed body) is reported
    /// as [`PaletteError::Transport`].
    async fn extract_palette(&self, file: &ImageFile) -> Result<Palette, PaletteError>;
}

/// Thin wrapper around a configured `reqwest::Client` for the extraction
/// service.
#[derive(Debug, Clone)]
pub struct PaletteClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl PaletteClient {
    /// Build a client for the given configuration. No retries are configured;
    /// a timeout is only applied when the configuration carries one.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
            user_agent: format!("chromapick/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Full URL of the extraction endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GET_COLORS_PATH)
    }

    /// Build the `POST /get-colors` request for `file`.
    pub fn request(&self, file: &ImageFile) -> Result<RequestBuilder, PaletteError> {
        let url = self.endpoint();
        debug!(%url, name = file.name(), media_type = file.media_type(), "building upload request");

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(|error| PaletteError::Transport(error.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        Ok(self
            .http
            .post(url)
            .header(header::USER_AGENT, &self.user_agent)
            .multipart(form))
    }
}

#[async_trait]
impl PaletteService for PaletteClient {
    async fn extract_palette(&self, file: &ImageFile) -> Result<Palette, PaletteError> {
        let response = self
            .request(file)?
            .send()
            .await
            .map_err(|error| PaletteError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaletteError::Transport(format!("{status}: {body}")));
        }

        let body = response
            .json::<PaletteResponse>()
            .await
            .map_err(|error| PaletteError::Transport(format!("malformed response: {error}")))?;
        info!(colors = body.palette.len(), "palette received");
        Ok(body.palette)
    }
}
