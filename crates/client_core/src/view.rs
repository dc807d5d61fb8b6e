//! Text shown by the form views: labels, the submit button and the result panel.

use shared::{domain::FieldName, protocol::PredictionResult};

use crate::submission::SubmissionState;

pub use crate::submission::FAILURE_NOTICE;

pub const SUBMIT_LABEL_IDLE: &str = "Predict Drug";
pub const SUBMIT_LABEL_PENDING: &str = "Predicting...";
pub const SUBMIT_LABEL_DONE: &str = "Drug Predicted";

pub fn submit_label(state: &SubmissionState) -> &'static str {
    match state {
        SubmissionState::Pending => SUBMIT_LABEL_PENDING,
        SubmissionState::Succeeded(_) => SUBMIT_LABEL_DONE,
        SubmissionState::Idle | SubmissionState::Failed => SUBMIT_LABEL_IDLE,
    }
}

/// `n_feature_pos` -> `N Feature Pos`.
pub fn field_label(field: FieldName) -> String {
    field
        .as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn field_placeholder(field: FieldName) -> String {
    format!("Enter {}", field.as_str().replace('_', " "))
}

/// A `[0, 1]` score as a percentage with six decimals, e.g. `12.345679%`.
pub fn format_percentage(value: f64) -> String {
    format!("{:.6}%", value * 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub predicted_drug: String,
    pub confidence: String,
    pub top_predictions: Vec<String>,
}

impl ResultPanel {
    pub fn from_result(result: &PredictionResult) -> Self {
        Self {
            predicted_drug: result.predicted_drug.clone(),
            confidence: format_percentage(result.confidence),
            top_predictions: result
                .top_predictions
                .iter()
                .map(|item| format!("{} - {}", item.drug, format_percentage(item.confidence)))
                .collect(),
        }
    }

    /// Only a succeeded submission has a panel.
    pub fn from_state(state: &SubmissionState) -> Option<Self> {
        state.result().map(Self::from_result)
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Prediction Result".to_string(),
            format!("Predicted Drug: {}", self.predicted_drug),
            format!("Confidence: {}", self.confidence),
        ];
        if !self.top_predictions.is_empty() {
            lines.push("Top Predictions:".to_string());
            lines.extend(self.top_predictions.iter().map(|line| format!("  - {line}")));
        }
        lines
    }
}
