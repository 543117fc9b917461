use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Image bytes as they are sent to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Wraps bytes already held elsewhere without copying them.
    pub fn shared(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Arc<[u8]>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Bytes::from_owner(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub predicted_class: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropQuery {
    pub temperature: f64,
    pub nitrogen: f64,
    pub humidity: f64,
    pub ph: f64,
    pub potassium: f64,
    pub phosphorus: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerQuery {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub soil_type: String,
    pub crop_type: String,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PredictionCompleted {
        request_id: RequestId,
        result: Result<Prediction, ApiError>,
    },
    CropCompleted {
        request_id: RequestId,
        result: Result<String, ApiError>,
    },
    FertilizerCompleted {
        request_id: RequestId,
        result: Result<String, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The upload itself could not be encoded, e.g. a bad MIME type.
    InvalidUpload,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64 },
    MalformedBody,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidUpload => write!(f, "invalid upload"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
