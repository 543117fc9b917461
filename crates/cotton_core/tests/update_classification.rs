use cotton_core::{
    update, AppState, Effect, FileSelection, Msg, Phase, ResultPanel, ANALYSIS_FAILED_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    cotton_logging::initialize_for_tests();
}

fn select(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    let file = FileSelection::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
    update(state, Msg::FilesSelected(vec![file]))
}

fn submitted_request(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitClassification { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("submission effect")
}

fn succeed(state: AppState, request_id: u64, label: &str, confidence: f64) -> AppState {
    update(
        state,
        Msg::PredictionSucceeded {
            request_id,
            label: label.to_string(),
            confidence,
        },
    )
    .0
}

#[test]
fn healthy_result_shows_catalog_entry() {
    init_logging();
    let (state, effects) = select(AppState::new(), "leaf.jpg");
    let request_id = submitted_request(&effects);
    assert_eq!(state.view().result, ResultPanel::Analyzing);

    let state = succeed(state, request_id, "healthy", 0.9567);
    let view = state.view();

    assert_eq!(view.phase, Phase::Succeeded);
    assert_eq!(
        view.result,
        ResultPanel::Diagnosis {
            name: "Healthy",
            description: "No disease detected.",
            recommendations: vec![
                "Continue regular monitoring.",
                "Maintain current agricultural practices.",
                "Follow preventive measures.",
                "Schedule routine inspections.",
            ],
            confidence: "95.67%".to_string(),
        }
    );
}

#[test]
fn stale_response_is_discarded_last_submission_wins() {
    init_logging();
    let (state, effects_a) = select(AppState::new(), "a.jpg");
    let request_a = submitted_request(&effects_a);

    let (state, effects_b) = select(state, "b.jpg");
    let request_b = submitted_request(&effects_b);
    assert_ne!(request_a, request_b);
    assert_eq!(
        effects_b[0],
        Effect::CancelRequest {
            request_id: request_a
        }
    );

    // B settles first, then A's late response arrives.
    let state = succeed(state, request_b, "target_spot", 0.81);
    let (mut state, effects) = update(
        state,
        Msg::PredictionSucceeded {
            request_id: request_a,
            label: "healthy".to_string(),
            confidence: 0.99,
        },
    );
    assert!(effects.is_empty());

    match state.view().result {
        ResultPanel::Diagnosis {
            name, confidence, ..
        } => {
            assert_eq!(name, "Target Spot");
            assert_eq!(confidence, "81.00%");
        }
        other => panic!("unexpected panel {other:?}"),
    }

    // Late failure of A is equally ignored and does not re-render.
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::PredictionFailed {
            request_id: request_a,
            reason: "network error".to_string(),
        },
    );
    assert_eq!(state.phase(), Phase::Succeeded);
    assert!(!state.consume_dirty());
}

#[test]
fn stale_response_while_newer_still_pending_is_ignored() {
    init_logging();
    let (state, effects_a) = select(AppState::new(), "a.jpg");
    let request_a = submitted_request(&effects_a);
    let (state, _) = select(state, "b.jpg");

    let state = succeed(state, request_a, "healthy", 0.99);

    assert_eq!(state.phase(), Phase::Pending);
    assert_eq!(state.view().result, ResultPanel::Analyzing);
}

#[test]
fn failure_shows_generic_message_and_allows_resubmission() {
    init_logging();
    let (state, effects) = select(AppState::new(), "leaf.jpg");
    let request_id = submitted_request(&effects);

    let (state, effects) = update(
        state,
        Msg::PredictionFailed {
            request_id,
            reason: "http status 502".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Failed);
    assert_eq!(
        view.result,
        ResultPanel::Failed {
            message: ANALYSIS_FAILED_MESSAGE.to_string()
        }
    );
    assert!(view.can_resubmit);
    assert!(view.can_reset);

    let (state, effects) = update(state, Msg::ResubmitClicked);
    let retry_id = submitted_request(&effects);
    assert!(retry_id > request_id);
    assert_eq!(state.phase(), Phase::Pending);

    let state = succeed(state, retry_id, "Aphids", 0.5);
    assert_eq!(state.phase(), Phase::Succeeded);
}

#[test]
fn resubmit_is_ignored_unless_failed() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ResubmitClicked);
    assert!(effects.is_empty());

    let (state, _) = select(state, "leaf.jpg");
    let (_state, effects) = update(state, Msg::ResubmitClicked);
    assert!(effects.is_empty());
}

#[test]
fn out_of_range_confidence_is_treated_as_failure() {
    init_logging();
    for confidence in [1.5, -0.1, f64::NAN] {
        let (state, effects) = select(AppState::new(), "leaf.jpg");
        let request_id = submitted_request(&effects);
        let state = succeed(state, request_id, "healthy", confidence);
        assert_eq!(state.phase(), Phase::Failed, "confidence {confidence}");
    }
}

#[test]
fn unknown_label_renders_fallback_instead_of_failing() {
    init_logging();
    let (state, effects) = select(AppState::new(), "leaf.jpg");
    let request_id = submitted_request(&effects);
    let state = succeed(state, request_id, "leaf_curl", 0.42);

    assert_eq!(state.phase(), Phase::Succeeded);
    assert_eq!(
        state.view().result,
        ResultPanel::Unrecognized {
            label: "leaf_curl".to_string(),
            confidence: "42.00%".to_string(),
        }
    );
}

#[test]
fn reset_after_success_returns_to_placeholder() {
    init_logging();
    let (state, effects) = select(AppState::new(), "leaf.jpg");
    let request_id = submitted_request(&effects);
    let state = succeed(state, request_id, "healthy", 0.7);

    let (state, effects) = update(state, Msg::ResetClicked);
    assert_eq!(effects, vec![Effect::ReleasePreview { preview_id: 1 }]);
    assert_eq!(state.view().result, ResultPanel::Placeholder);

    // A completion for the reset request can no longer revive it.
    let state = succeed(state, request_id, "healthy", 0.7);
    assert_eq!(state.phase(), Phase::Idle);
}
