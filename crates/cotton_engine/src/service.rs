use std::time::Duration;

use cotton_logging::{cotton_debug, cotton_warn};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, CropQuery, FailureKind, FertilizerQuery, ImageUpload, Prediction};

const PREDICT_PATH: &str = "predict/";
const CROP_PATH: &str = "crop_recommendation";
const FERTILIZER_PATH: &str = "fertilizer_recommendation";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// The remote classifier and recommendation endpoints.
#[async_trait::async_trait]
pub trait AgronomyService: Send + Sync {
    async fn predict(&self, upload: &ImageUpload) -> Result<Prediction, ApiError>;
    async fn recommend_crop(&self, query: &CropQuery) -> Result<String, ApiError>;
    async fn recommend_fertilizer(&self, query: &FertilizerQuery) -> Result<String, ApiError>;
}

#[derive(Deserialize)]
struct CropResponse {
    recommended_crop: String,
}

#[derive(Deserialize)]
struct FertilizerResponse {
    recommended_fertilizer: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    client: reqwest::Client,
    base_url: Url,
    max_response_bytes: u64,
}

impl ReqwestService {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_response_bytes: settings.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let too_large = || {
            ApiError::new(
                FailureKind::TooLarge {
                    max_bytes: self.max_response_bytes,
                },
                "response too large",
            )
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_bytes)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > self.max_response_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        cotton_debug!("Received {} byte response", body.len());

        serde_json::from_slice(&body).map_err(|err| {
            cotton_warn!("Malformed response body: {}", err);
            ApiError::new(FailureKind::MalformedBody, err.to_string())
        })
    }
}

#[async_trait::async_trait]
impl AgronomyService for ReqwestService {
    async fn predict(&self, upload: &ImageUpload) -> Result<Prediction, ApiError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let part = Part::stream_with_length(upload.bytes.clone(), upload.bytes.len() as u64)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|err| ApiError::new(FailureKind::InvalidUpload, err.to_string()))?;
        let form = Form::new().part("file", part);
        cotton_debug!(
            "POST {} ({} bytes, {})",
            url,
            upload.bytes.len(),
            upload.mime_type
        );
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn recommend_crop(&self, query: &CropQuery) -> Result<String, ApiError> {
        let url = self.endpoint(CROP_PATH)?;
        cotton_debug!("POST {}", url);
        let response: CropResponse = self.send(self.client.post(url).json(query)).await?;
        Ok(response.recommended_crop)
    }

    async fn recommend_fertilizer(&self, query: &FertilizerQuery) -> Result<String, ApiError> {
        let url = self.endpoint(FERTILIZER_PATH)?;
        cotton_debug!("POST {}", url);
        let response: FertilizerResponse = self.send(self.client.post(url).json(query)).await?;
        Ok(response.recommended_fertilizer)
    }
}

/// Parses the service root; a missing trailing slash is added so relative
/// endpoint paths resolve beneath it.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(raw).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::MalformedBody, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
