//! Cotton engine: remote service client, request execution and preview files.
mod engine;
mod preview;
mod service;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use preview::{PreviewError, PreviewId, PreviewStore};
pub use service::{AgronomyService, ClientSettings, ReqwestService};
pub use types::{
    ApiError, CropQuery, EngineEvent, FailureKind, FertilizerQuery, ImageUpload, Prediction,
    RequestId,
};
