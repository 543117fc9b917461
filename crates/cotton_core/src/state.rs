use crate::forms::{CropField, FertilizerField, FormState};
use crate::intake::{FileSelection, PreviewId, UploadCandidate, UploadError};
use crate::view_model::AppViewModel;

pub type RequestId = u64;

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f64,
}

impl ClassificationResult {
    /// Returns `None` unless `confidence` is a finite value in `[0, 1]`.
    pub fn new(label: impl Into<String>, confidence: f64) -> Option<Self> {
        let label = label.into();
        if label.trim().is_empty() || !(0.0..=1.0).contains(&confidence) {
            return None;
        }
        Some(Self { label, confidence })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// The single current classification request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClassificationState {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Succeeded {
        request_id: RequestId,
        result: ClassificationResult,
    },
    Failed {
        request_id: RequestId,
        message: String,
    },
}

impl ClassificationState {
    pub fn phase(&self) -> Phase {
        match self {
            ClassificationState::Idle => Phase::Idle,
            ClassificationState::Pending { .. } => Phase::Pending,
            ClassificationState::Succeeded { .. } => Phase::Succeeded,
            ClassificationState::Failed { .. } => Phase::Failed,
        }
    }

    pub fn pending_id(&self) -> Option<RequestId> {
        match self {
            ClassificationState::Pending { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    dirty: bool,
    last_request_id: RequestId,
    last_preview_id: PreviewId,
    upload: Option<UploadCandidate>,
    upload_error: Option<UploadError>,
    classification: ClassificationState,
    crop: FormState<CropField>,
    fertilizer: FormState<FertilizerField>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> Phase {
        self.classification.phase()
    }

    /// True while any remote request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.classification.pending_id().is_some()
            || self.crop.submission().pending_id().is_some()
            || self.fertilizer.submission().pending_id().is_some()
    }

    pub fn classification(&self) -> &ClassificationState {
        &self.classification
    }

    pub fn upload(&self) -> Option<&UploadCandidate> {
        self.upload.as_ref()
    }

    pub fn upload_error(&self) -> Option<&UploadError> {
        self.upload_error.as_ref()
    }

    pub fn crop_form(&self) -> &FormState<CropField> {
        &self.crop
    }

    pub fn fertilizer_form(&self) -> &FormState<FertilizerField> {
        &self.fertilizer
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn reject_upload(&mut self, error: UploadError) {
        self.upload_error = Some(error);
        self.mark_dirty();
    }

    /// Installs a validated selection and returns the candidate it replaced.
    pub(crate) fn replace_upload(
        &mut self,
        selection: FileSelection,
    ) -> (UploadCandidate, Option<UploadCandidate>) {
        self.last_preview_id += 1;
        let candidate = UploadCandidate::from_selection(self.last_preview_id, selection);
        let previous = self.upload.replace(candidate.clone());
        self.upload_error = None;
        self.mark_dirty();
        (candidate, previous)
    }

    pub(crate) fn take_upload(&mut self) -> Option<UploadCandidate> {
        let taken = self.upload.take();
        if taken.is_some() {
            self.mark_dirty();
        }
        taken
    }

    pub(crate) fn clear_upload_error(&mut self) {
        if self.upload_error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_classification(&mut self, classification: ClassificationState) {
        if self.classification != classification {
            self.classification = classification;
            self.mark_dirty();
        }
    }

    pub(crate) fn crop_form_mut(&mut self) -> &mut FormState<CropField> {
        self.mark_dirty();
        &mut self.crop
    }

    pub(crate) fn fertilizer_form_mut(&mut self) -> &mut FormState<FertilizerField> {
        self.mark_dirty();
        &mut self.fertilizer
    }
}
