use std::sync::Arc;

use crate::forms::{CropInput, FertilizerInput};
use crate::intake::{PreviewId, UploadCandidate};
use crate::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CreatePreview {
        preview_id: PreviewId,
        file_name: String,
        bytes: Arc<[u8]>,
    },
    ReleasePreview {
        preview_id: PreviewId,
    },
    SubmitClassification {
        request_id: RequestId,
        upload: UploadCandidate,
    },
    /// The request is no longer current; its completion will be ignored.
    CancelRequest {
        request_id: RequestId,
    },
    RecommendCrop {
        request_id: RequestId,
        input: CropInput,
    },
    RecommendFertilizer {
        request_id: RequestId,
        input: FertilizerInput,
    },
}
