use std::path::Path;

use cotton_core::{
    AppViewModel, FormView, Phase, RecommendationView, ResultPanel, ANALYZING_MESSAGE,
    PLACEHOLDER_MESSAGE,
};

/// Which panels a render pass should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Analysis,
    Crop,
    Fertilizer,
}

pub const ALL_SECTIONS: [Section; 3] = [Section::Analysis, Section::Crop, Section::Fertilizer];

pub fn render(view: &AppViewModel, preview: Option<&Path>, sections: &[Section]) -> Vec<String> {
    let mut lines = Vec::new();
    for section in sections {
        match section {
            Section::Analysis => render_analysis(&mut lines, view, preview),
            Section::Crop => render_form(
                &mut lines,
                "Crop recommendation",
                "Recommended Crop",
                &view.crop,
            ),
            Section::Fertilizer => render_form(
                &mut lines,
                "Fertilizer recommendation",
                "Recommended Fertilizer",
                &view.fertilizer,
            ),
        }
    }
    lines
}

fn render_analysis(lines: &mut Vec<String>, view: &AppViewModel, preview: Option<&Path>) {
    lines.push(format!("== Analysis [{}] ==", phase_label(view.phase)));

    match &view.upload {
        Some(upload) => {
            lines.push(format!("Image: {} ({} bytes)", upload.file_name, upload.size));
            if let Some(path) = preview {
                lines.push(format!("Preview: {}", path.display()));
            }
        }
        None => lines.push("Image: none".to_string()),
    }
    if let Some(error) = &view.upload_error {
        lines.push(format!("Error: {error}"));
    }

    match &view.result {
        ResultPanel::Placeholder => lines.push(PLACEHOLDER_MESSAGE.to_string()),
        ResultPanel::Analyzing => lines.push(ANALYZING_MESSAGE.to_string()),
        ResultPanel::Diagnosis {
            name,
            description,
            recommendations,
            confidence,
        } => {
            lines.push(format!("Disease: {name}"));
            lines.push(format!("Confidence: {confidence}"));
            lines.push(description.to_string());
            lines.push("Recommendations:".to_string());
            lines.extend(recommendations.iter().map(|step| format!("  - {step}")));
        }
        ResultPanel::Unrecognized { label, confidence } => {
            lines.push(format!("Unrecognized result: {label}"));
            lines.push(format!("Confidence: {confidence}"));
        }
        ResultPanel::Failed { message } => lines.push(format!("Error: {message}")),
    }

    let mut actions = Vec::new();
    if view.can_resubmit {
        actions.push("retry");
    }
    if view.can_reset {
        actions.push("reset");
    }
    if !actions.is_empty() {
        lines.push(format!("Actions: {}", actions.join(", ")));
    }
}

fn render_form(lines: &mut Vec<String>, title: &str, result_label: &str, form: &FormView) {
    lines.push(format!("== {title} =="));
    for field in &form.fields {
        let value = if field.value.is_empty() {
            "-"
        } else {
            field.value.as_str()
        };
        match &field.error {
            Some(error) => lines.push(format!("  {}: {}  ! {}", field.label, value, error)),
            None => lines.push(format!("  {}: {}", field.label, value)),
        }
    }
    match &form.status {
        RecommendationView::Empty => {}
        RecommendationView::Pending => lines.push("Requesting...".to_string()),
        RecommendationView::Ready(recommendation) => {
            lines.push(format!("{result_label} : {recommendation}"))
        }
        RecommendationView::Failed(message) => lines.push(format!("Error: {message}")),
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Pending => "Pending",
        Phase::Succeeded => "Succeeded",
        Phase::Failed => "Failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotton_core::{
        update, AppState, CropField, FertilizerField, FileSelection, FormField, Msg,
        RECOMMENDATION_FAILED_MESSAGE,
    };

    fn jpeg(name: &str) -> FileSelection {
        FileSelection::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn analysis(state: &AppState) -> Vec<String> {
        render(&state.view(), None, &[Section::Analysis])
    }

    #[test]
    fn idle_shows_placeholder() {
        let lines = analysis(&AppState::new());
        assert_eq!(lines[0], "== Analysis [Idle] ==");
        assert!(lines.contains(&PLACEHOLDER_MESSAGE.to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Actions")));
    }

    #[test]
    fn pending_shows_analyzing_and_preview() {
        let (state, _) = update(AppState::new(), Msg::FilesSelected(vec![jpeg("leaf.jpg")]));
        let lines = render(
            &state.view(),
            Some(Path::new("/tmp/cotton-preview-1.jpg")),
            &[Section::Analysis],
        );
        assert!(lines.contains(&"Image: leaf.jpg (4 bytes)".to_string()));
        assert!(lines.contains(&"Preview: /tmp/cotton-preview-1.jpg".to_string()));
        assert!(lines.contains(&ANALYZING_MESSAGE.to_string()));
        assert!(lines.contains(&"Actions: reset".to_string()));
    }

    #[test]
    fn diagnosis_lists_recommendations() {
        let (state, _) = update(AppState::new(), Msg::FilesSelected(vec![jpeg("leaf.jpg")]));
        let (state, _) = update(
            state,
            Msg::PredictionSucceeded {
                request_id: 1,
                label: "healthy".to_string(),
                confidence: 0.9567,
            },
        );
        let lines = analysis(&state);
        assert!(lines.contains(&"Confidence: 95.67%".to_string()));
        assert!(lines.contains(&"No disease detected.".to_string()));
        assert_eq!(lines.iter().filter(|line| line.starts_with("  - ")).count(), 4);
    }

    #[test]
    fn failure_offers_retry() {
        let (state, _) = update(AppState::new(), Msg::FilesSelected(vec![jpeg("leaf.jpg")]));
        let (state, _) = update(
            state,
            Msg::PredictionFailed {
                request_id: 1,
                reason: "timeout".to_string(),
            },
        );
        let lines = analysis(&state);
        assert!(lines.contains(&"Actions: retry, reset".to_string()));
    }

    #[test]
    fn form_errors_are_inline() {
        let (state, _) = update(
            AppState::new(),
            Msg::CropFieldChanged {
                field: CropField::Ph,
                value: "acid".to_string(),
            },
        );
        let (state, _) = update(state, Msg::CropSubmitted);
        let lines = render(&state.view(), None, &[Section::Crop]);
        assert_eq!(lines[0], "== Crop recommendation ==");
        assert!(lines.contains(&"  pH: acid  ! pH must be a number".to_string()));
        assert!(lines.contains(&"  Temperature: -  ! Temperature is required".to_string()));
    }

    fn submitted_crop_form() -> AppState {
        let mut state = AppState::new();
        for &field in CropField::ALL {
            (state, _) = update(
                state,
                Msg::CropFieldChanged {
                    field,
                    value: "1".to_string(),
                },
            );
        }
        let (state, _) = update(state, Msg::CropSubmitted);
        state
    }

    #[test]
    fn pending_recommendation_is_announced() {
        let state = submitted_crop_form();
        let lines = render(&state.view(), None, &[Section::Crop]);
        assert_eq!(lines.last().map(String::as_str), Some("Requesting..."));
    }

    #[test]
    fn crop_result_uses_its_own_label() {
        let (state, _) = update(
            submitted_crop_form(),
            Msg::RecommendationReceived {
                request_id: 1,
                recommendation: "rice".to_string(),
            },
        );
        let lines = render(&state.view(), None, &[Section::Crop]);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Recommended Crop : rice")
        );
    }

    #[test]
    fn fertilizer_result_uses_its_own_label() {
        let mut state = AppState::new();
        for &field in FertilizerField::ALL {
            (state, _) = update(
                state,
                Msg::FertilizerFieldChanged {
                    field,
                    value: "7".to_string(),
                },
            );
        }
        let (state, _) = update(state, Msg::FertilizerSubmitted);
        let (state, _) = update(
            state,
            Msg::RecommendationReceived {
                request_id: 1,
                recommendation: "Urea".to_string(),
            },
        );
        let lines = render(&state.view(), None, &[Section::Fertilizer]);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Recommended Fertilizer : Urea")
        );
    }

    #[test]
    fn failed_recommendation_shows_generic_message() {
        let (state, _) = update(
            submitted_crop_form(),
            Msg::RecommendationFailed {
                request_id: 1,
                reason: "http status 500".to_string(),
            },
        );
        let lines = render(&state.view(), None, &[Section::Crop]);
        assert_eq!(
            lines.last(),
            Some(&format!("Error: {RECOMMENDATION_FAILED_MESSAGE}"))
        );
    }
}
