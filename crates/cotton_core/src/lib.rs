//! Cotton core: pure upload/classification state machine, forms and view-model helpers.
mod catalog;
mod effect;
mod forms;
mod intake;
mod msg;
mod presenter;
mod state;
mod update;
mod view_model;

pub use catalog::{lookup as lookup_disease, DiseaseCatalogEntry};
pub use effect::Effect;
pub use forms::{
    CropField, CropInput, FertilizerField, FertilizerInput, FieldKind, FormField, FormState,
    Submission,
};
pub use intake::{
    guess_mime_type, is_accepted_image_type, FileSelection, PreviewId, UploadCandidate,
    UploadError, ACCEPTED_IMAGE_TYPES, MAX_UPLOAD_BYTES,
};
pub use msg::Msg;
pub use presenter::{format_confidence, ResultPanel, ANALYZING_MESSAGE, PLACEHOLDER_MESSAGE};
pub use state::{AppState, ClassificationResult, ClassificationState, Phase, RequestId};
pub use update::{update, ANALYSIS_FAILED_MESSAGE, RECOMMENDATION_FAILED_MESSAGE};
pub use view_model::{AppViewModel, FieldView, FormView, RecommendationView, UploadView};
