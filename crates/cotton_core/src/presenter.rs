use crate::catalog;
use crate::ClassificationState;

pub const PLACEHOLDER_MESSAGE: &str = "Upload an image to see the analysis";
pub const ANALYZING_MESSAGE: &str = "Analyzing your image...";

/// What the analysis panel shows for the current classification state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Placeholder,
    Analyzing,
    Diagnosis {
        name: &'static str,
        description: &'static str,
        recommendations: Vec<&'static str>,
        confidence: String,
    },
    /// The classifier returned a label missing from the catalog.
    Unrecognized { label: String, confidence: String },
    Failed { message: String },
}

pub fn present(classification: &ClassificationState) -> ResultPanel {
    match classification {
        ClassificationState::Idle => ResultPanel::Placeholder,
        ClassificationState::Pending { .. } => ResultPanel::Analyzing,
        ClassificationState::Succeeded { result, .. } => {
            let confidence = format_confidence(result.confidence);
            match catalog::lookup(&result.label) {
                Some(entry) => ResultPanel::Diagnosis {
                    name: entry.name,
                    description: entry.description,
                    recommendations: entry.recommendations.to_vec(),
                    confidence,
                },
                None => ResultPanel::Unrecognized {
                    label: result.label.clone(),
                    confidence,
                },
            }
        }
        ClassificationState::Failed { message, .. } => ResultPanel::Failed {
            message: message.clone(),
        },
    }
}

/// Formats a `[0, 1]` confidence as a percentage with two decimals.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}
