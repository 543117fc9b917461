use cotton_logging::{cotton_debug, cotton_info, cotton_warn};

use crate::forms::{CropInput, FertilizerInput, Submission};
use crate::intake::{single_selection, validate_selection, FileSelection};
use crate::{AppState, ClassificationResult, ClassificationState, Effect, Msg, RequestId};

/// Shown whenever a classification cannot be completed.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Shown whenever a recommendation cannot be completed.
pub const RECOMMENDATION_FAILED_MESSAGE: &str = "Failed to get a recommendation. Please try again.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => select_files(&mut state, files),
        Msg::ResetClicked => reset(&mut state),
        Msg::ResubmitClicked => resubmit(&mut state),
        Msg::PredictionSucceeded {
            request_id,
            label,
            confidence,
        } => {
            if !is_current_classification(&state, request_id) {
                return (state, Vec::new());
            }
            let next = match ClassificationResult::new(label, confidence) {
                Some(result) => {
                    cotton_info!(
                        "Classification {} succeeded: {} ({:.4})",
                        request_id,
                        result.label,
                        result.confidence
                    );
                    ClassificationState::Succeeded { request_id, result }
                }
                None => {
                    cotton_warn!(
                        "Classification {} returned an invalid result (confidence {})",
                        request_id,
                        confidence
                    );
                    ClassificationState::Failed {
                        request_id,
                        message: ANALYSIS_FAILED_MESSAGE.to_string(),
                    }
                }
            };
            state.set_classification(next);
            Vec::new()
        }
        Msg::PredictionFailed { request_id, reason } => {
            if !is_current_classification(&state, request_id) {
                return (state, Vec::new());
            }
            cotton_warn!("Classification {} failed: {}", request_id, reason);
            state.set_classification(ClassificationState::Failed {
                request_id,
                message: ANALYSIS_FAILED_MESSAGE.to_string(),
            });
            Vec::new()
        }
        Msg::CropFieldChanged { field, value } => {
            state.crop_form_mut().set_value(field, value);
            Vec::new()
        }
        Msg::FertilizerFieldChanged { field, value } => {
            state.fertilizer_form_mut().set_value(field, value);
            Vec::new()
        }
        Msg::CropSubmitted => {
            let Some(parsed) = state.crop_form_mut().validate() else {
                cotton_debug!("Crop form has field errors; not submitting");
                return (state, Vec::new());
            };
            let input = CropInput::from(parsed);
            let request_id = state.allocate_request_id();
            let mut effects = cancel_pending(state.crop_form().submission());
            state
                .crop_form_mut()
                .set_submission(Submission::Pending { request_id });
            effects.push(Effect::RecommendCrop { request_id, input });
            effects
        }
        Msg::FertilizerSubmitted => {
            let Some(parsed) = state.fertilizer_form_mut().validate() else {
                cotton_debug!("Fertilizer form has field errors; not submitting");
                return (state, Vec::new());
            };
            let input = FertilizerInput::from(parsed);
            let request_id = state.allocate_request_id();
            let mut effects = cancel_pending(state.fertilizer_form().submission());
            state
                .fertilizer_form_mut()
                .set_submission(Submission::Pending { request_id });
            effects.push(Effect::RecommendFertilizer { request_id, input });
            effects
        }
        Msg::RecommendationReceived {
            request_id,
            recommendation,
        } => {
            settle_recommendation(
                &mut state,
                request_id,
                Submission::Done {
                    request_id,
                    recommendation,
                },
            );
            Vec::new()
        }
        Msg::RecommendationFailed { request_id, reason } => {
            cotton_debug!("Recommendation {} failed: {}", request_id, reason);
            settle_recommendation(
                &mut state,
                request_id,
                Submission::Failed {
                    request_id,
                    message: RECOMMENDATION_FAILED_MESSAGE.to_string(),
                },
            );
            Vec::new()
        }
    };

    (state, effects)
}

fn select_files(state: &mut AppState, files: Vec<FileSelection>) -> Vec<Effect> {
    let selection = match single_selection(files).and_then(|selection| {
        validate_selection(&selection)?;
        Ok(selection)
    }) {
        Ok(selection) => selection,
        Err(error) => {
            cotton_info!("Upload rejected: {}", error);
            state.reject_upload(error);
            return Vec::new();
        }
    };

    // Superseded request first, so its completion can never land on the new upload.
    let mut effects = cancel_current_classification(state);
    let (candidate, previous) = state.replace_upload(selection);
    if let Some(previous) = previous {
        effects.push(Effect::ReleasePreview {
            preview_id: previous.preview_id,
        });
    }
    effects.push(Effect::CreatePreview {
        preview_id: candidate.preview_id,
        file_name: candidate.file_name.clone(),
        bytes: candidate.bytes.clone(),
    });

    let request_id = state.allocate_request_id();
    cotton_info!(
        "Submitting {} ({} bytes, {}) as request {}",
        candidate.file_name,
        candidate.size(),
        candidate.mime_type,
        request_id
    );
    state.set_classification(ClassificationState::Pending { request_id });
    effects.push(Effect::SubmitClassification {
        request_id,
        upload: candidate,
    });
    effects
}

fn reset(state: &mut AppState) -> Vec<Effect> {
    let mut effects = cancel_current_classification(state);
    if let Some(upload) = state.take_upload() {
        effects.push(Effect::ReleasePreview {
            preview_id: upload.preview_id,
        });
    }
    state.clear_upload_error();
    state.set_classification(ClassificationState::Idle);
    effects
}

fn resubmit(state: &mut AppState) -> Vec<Effect> {
    if !matches!(state.classification(), ClassificationState::Failed { .. }) {
        return Vec::new();
    }
    let Some(upload) = state.upload().cloned() else {
        return Vec::new();
    };
    let request_id = state.allocate_request_id();
    cotton_info!("Resubmitting {} as request {}", upload.file_name, request_id);
    state.set_classification(ClassificationState::Pending { request_id });
    vec![Effect::SubmitClassification { request_id, upload }]
}

fn cancel_current_classification(state: &AppState) -> Vec<Effect> {
    match state.classification().pending_id() {
        Some(request_id) => {
            cotton_debug!("Classification {} superseded", request_id);
            vec![Effect::CancelRequest { request_id }]
        }
        None => Vec::new(),
    }
}

fn cancel_pending(submission: &Submission) -> Vec<Effect> {
    submission
        .pending_id()
        .map(|request_id| Effect::CancelRequest { request_id })
        .into_iter()
        .collect()
}

fn is_current_classification(state: &AppState, request_id: RequestId) -> bool {
    let current = state.classification().pending_id() == Some(request_id);
    if !current {
        cotton_debug!("Discarding stale classification completion {}", request_id);
    }
    current
}

fn settle_recommendation(state: &mut AppState, request_id: RequestId, outcome: Submission) {
    if state.crop_form().submission().pending_id() == Some(request_id) {
        state.crop_form_mut().set_submission(outcome);
    } else if state.fertilizer_form().submission().pending_id() == Some(request_id) {
        state.fertilizer_form_mut().set_submission(outcome);
    } else {
        cotton_debug!("Discarding stale recommendation completion {}", request_id);
    }
}
