use std::sync::Once;

use cotton_core::{
    update, AppState, ClassificationState, Effect, FileSelection, Msg, Phase, UploadError,
    MAX_UPLOAD_BYTES,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(cotton_logging::initialize_for_tests);
}

fn png(name: &str, len: usize) -> FileSelection {
    FileSelection::new(name, "image/png", vec![7u8; len])
}

fn select(state: AppState, files: Vec<FileSelection>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesSelected(files))
}

fn has_submission(effects: &[Effect]) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, Effect::SubmitClassification { .. }))
}

#[test]
fn accepted_upload_creates_preview_and_submits() {
    init_logging();
    let file = png("leaf.png", 16);
    let (mut state, effects) = select(AppState::new(), vec![file.clone()]);

    assert_eq!(state.phase(), Phase::Pending);
    assert!(state.consume_dirty());
    let upload = state.upload().cloned().expect("upload kept");
    assert_eq!(upload.preview_id, 1);
    assert_eq!(upload.size(), 16);
    assert_eq!(
        effects,
        vec![
            Effect::CreatePreview {
                preview_id: 1,
                file_name: "leaf.png".to_string(),
                bytes: file.bytes.clone(),
            },
            Effect::SubmitClassification {
                request_id: 1,
                upload,
            },
        ]
    );
}

#[test]
fn oversized_file_is_rejected_without_submission() {
    init_logging();
    let file = png("huge.png", MAX_UPLOAD_BYTES as usize + 1);
    let (state, effects) = select(AppState::new(), vec![file]);

    assert!(effects.is_empty());
    assert!(!has_submission(&effects));
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.upload().is_none());
    assert!(matches!(
        state.upload_error(),
        Some(UploadError::TooLarge { .. })
    ));
    assert_eq!(
        state.view().upload_error.as_deref(),
        Some("File size should be less than 5MB")
    );
}

#[test]
fn non_image_types_are_rejected() {
    init_logging();
    for mime in ["text/plain", "application/pdf", "image/gif", ""] {
        let file = FileSelection::new("notes", mime, vec![1u8; 8]);
        let (state, effects) = select(AppState::new(), vec![file]);

        assert!(effects.is_empty(), "mime {mime:?} should not proceed");
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            state.upload_error(),
            Some(&UploadError::UnsupportedType {
                mime_type: mime.to_string()
            })
        );
    }
}

#[test]
fn exactly_one_file_per_interaction() {
    init_logging();
    let (state, effects) = select(AppState::new(), Vec::new());
    assert!(effects.is_empty());
    assert_eq!(state.upload_error(), Some(&UploadError::NoFile));

    let (state, effects) = select(state, vec![png("a.png", 4), png("b.png", 4)]);
    assert!(effects.is_empty());
    assert_eq!(
        state.upload_error(),
        Some(&UploadError::MultipleFiles { count: 2 })
    );
}

#[test]
fn rejection_keeps_previous_result_and_valid_upload_clears_error() {
    init_logging();
    let (state, _) = select(AppState::new(), vec![png("a.png", 4)]);
    let (state, _) = update(
        state,
        Msg::PredictionSucceeded {
            request_id: 1,
            label: "healthy".to_string(),
            confidence: 0.9,
        },
    );

    let (state, effects) = select(state, vec![png("big.png", MAX_UPLOAD_BYTES as usize + 10)]);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Succeeded);
    assert_eq!(state.upload().map(|u| u.file_name.as_str()), Some("a.png"));
    assert!(state.upload_error().is_some());

    let (state, effects) = select(state, vec![png("b.png", 4)]);
    assert!(has_submission(&effects));
    assert!(state.upload_error().is_none());
}

#[test]
fn replacing_an_upload_releases_the_previous_preview() {
    init_logging();
    let (state, _) = select(AppState::new(), vec![png("a.png", 4)]);
    let (state, _) = update(
        state,
        Msg::PredictionFailed {
            request_id: 1,
            reason: "http status 500".to_string(),
        },
    );

    let (state, effects) = select(state, vec![png("b.png", 4)]);
    assert_eq!(
        effects[0],
        Effect::ReleasePreview { preview_id: 1 },
        "old preview released before the new one is created"
    );
    assert!(matches!(
        effects[1],
        Effect::CreatePreview { preview_id: 2, .. }
    ));
    assert_eq!(
        state.classification(),
        &ClassificationState::Pending { request_id: 2 }
    );
}

#[test]
fn reset_while_pending_cancels_and_releases_preview() {
    init_logging();
    let (state, _) = select(AppState::new(), vec![png("a.png", 4)]);
    let (mut state, effects) = update(state, Msg::ResetClicked);

    assert_eq!(
        effects,
        vec![
            Effect::CancelRequest { request_id: 1 },
            Effect::ReleasePreview { preview_id: 1 },
        ]
    );
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.upload().is_none());
    assert!(state.consume_dirty());

    let view = state.view();
    assert!(!view.can_reset);
    assert!(view.upload.is_none());
}

#[test]
fn reset_when_idle_is_quiet() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::ResetClicked);

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}
