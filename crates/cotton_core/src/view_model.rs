use crate::forms::{FormField, FormState, Submission};
use crate::intake::PreviewId;
use crate::presenter::{present, ResultPanel};
use crate::{AppState, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub preview_id: PreviewId,
    pub file_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecommendationView {
    #[default]
    Empty,
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub status: RecommendationView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: Phase,
    pub upload: Option<UploadView>,
    pub upload_error: Option<String>,
    pub result: ResultPanel,
    pub can_reset: bool,
    pub can_resubmit: bool,
    pub crop: FormView,
    pub fertilizer: FormView,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let phase = state.phase();
        let upload = state.upload().map(|upload| UploadView {
            preview_id: upload.preview_id,
            file_name: upload.file_name.clone(),
            size: upload.size(),
        });
        Self {
            phase,
            can_reset: upload.is_some() || phase != Phase::Idle,
            can_resubmit: phase == Phase::Failed && upload.is_some(),
            upload,
            upload_error: state.upload_error().map(ToString::to_string),
            result: present(state.classification()),
            crop: form_view(state.crop_form()),
            fertilizer: form_view(state.fertilizer_form()),
        }
    }
}

fn form_view<F: FormField>(form: &FormState<F>) -> FormView {
    let fields = F::ALL
        .iter()
        .map(|&field| FieldView {
            key: field.key(),
            label: field.label(),
            value: form.value(field).to_string(),
            error: form.error(field).map(ToOwned::to_owned),
        })
        .collect();
    let status = match form.submission() {
        Submission::Idle => RecommendationView::Empty,
        Submission::Pending { .. } => RecommendationView::Pending,
        Submission::Done { recommendation, .. } => {
            RecommendationView::Ready(recommendation.clone())
        }
        Submission::Failed { message, .. } => RecommendationView::Failed(message.clone()),
    };
    FormView { fields, status }
}
