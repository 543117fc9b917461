use crate::forms::{CropField, FertilizerField};
use crate::intake::FileSelection;
use crate::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked or dropped files for analysis.
    FilesSelected(Vec<FileSelection>),
    /// User clicked reset on the preview.
    ResetClicked,
    /// User asked to send the current upload again after a failure.
    ResubmitClicked,
    /// Engine returned a classification.
    PredictionSucceeded {
        request_id: RequestId,
        label: String,
        confidence: f64,
    },
    /// Engine could not produce a classification.
    PredictionFailed { request_id: RequestId, reason: String },
    /// User edited a crop form field.
    CropFieldChanged { field: CropField, value: String },
    /// User submitted the crop form.
    CropSubmitted,
    /// User edited a fertilizer form field.
    FertilizerFieldChanged {
        field: FertilizerField,
        value: String,
    },
    /// User submitted the fertilizer form.
    FertilizerSubmitted,
    /// Engine returned a crop or fertilizer recommendation.
    RecommendationReceived {
        request_id: RequestId,
        recommendation: String,
    },
    /// Engine could not produce a recommendation.
    RecommendationFailed { request_id: RequestId, reason: String },
}
