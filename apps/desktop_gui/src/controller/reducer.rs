//! Folds backend events into the status shown around the form.

use client_core::{view::format_percentage, SubmissionEvent};
use shared::protocol::HealthStatus;

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: StatusBannerSeverity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct StatusModel {
    pub status: String,
    pub banner: Option<StatusBanner>,
    pub last_error: Option<UiError>,
    pub health: Option<HealthStatus>,
}

impl StatusModel {
    pub fn show_error(&mut self, error: UiError, banner_message: impl Into<String>) {
        self.status = error.message().to_string();
        self.banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: banner_message.into(),
        });
        self.last_error = Some(error);
    }
}

pub fn apply_ui_event(model: &mut StatusModel, event: UiEvent) {
    match event {
        UiEvent::Info(message) => model.status = message,
        UiEvent::Submission(SubmissionEvent::Started { attempt }) => {
            model.status = format!("Prediction #{attempt} requested");
            model.banner = None;
        }
        UiEvent::Submission(SubmissionEvent::Succeeded { attempt, result }) => {
            model.status = format!(
                "Prediction #{attempt}: {} ({})",
                result.predicted_drug,
                format_percentage(result.confidence)
            );
            model.banner = None;
            model.last_error = None;
        }
        UiEvent::Submission(SubmissionEvent::Failed {
            attempt,
            notice,
            reason,
        }) => {
            tracing::warn!(attempt, %reason, "prediction failed");
            model.show_error(UiError::from_message(UiErrorContext::Submit, reason), notice);
        }
        UiEvent::HealthChecked(health) => {
            model.status = if health.is_healthy() {
                format!("Service healthy (v{})", health.version)
            } else {
                format!("Service reachable but not ready: {}", health.status)
            };
            model.banner = Some(StatusBanner {
                severity: if health.is_healthy() {
                    StatusBannerSeverity::Info
                } else {
                    StatusBannerSeverity::Error
                },
                message: health.message.clone(),
            });
            model.health = Some(health);
        }
        UiEvent::Error(error) => {
            let message = error.message().to_string();
            model.show_error(error, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::view::FAILURE_NOTICE;
    use shared::protocol::PredictionResult;

    use super::*;
    use crate::controller::events::UiErrorCategory;

    fn failed(attempt: u64) -> UiEvent {
        UiEvent::Submission(SubmissionEvent::Failed {
            attempt,
            notice: FAILURE_NOTICE.to_string(),
            reason: "failed to reach prediction service: connection refused".to_string(),
        })
    }

    #[test]
    fn failure_raises_generic_notice_banner() {
        let mut model = StatusModel::default();
        apply_ui_event(&mut model, failed(3));

        let banner = model.banner.clone().expect("banner");
        assert_eq!(banner.severity, StatusBannerSeverity::Error);
        assert_eq!(banner.message, "Something went wrong!");
        let error = model.last_error.as_ref().expect("error");
        assert_eq!(error.category(), UiErrorCategory::Transport);
        assert_eq!(error.context(), UiErrorContext::Submit);
    }

    #[test]
    fn new_submission_clears_failure_banner() {
        let mut model = StatusModel::default();
        apply_ui_event(&mut model, failed(1));
        apply_ui_event(
            &mut model,
            UiEvent::Submission(SubmissionEvent::Started { attempt: 2 }),
        );

        assert!(model.banner.is_none());
        assert_eq!(model.status, "Prediction #2 requested");
    }

    #[test]
    fn success_reports_drug_and_confidence() {
        let mut model = StatusModel::default();
        apply_ui_event(&mut model, failed(1));
        apply_ui_event(
            &mut model,
            UiEvent::Submission(SubmissionEvent::Succeeded {
                attempt: 2,
                result: PredictionResult {
                    predicted_drug: "Erlotinib".to_string(),
                    confidence: 0.123456789,
                    top_predictions: Vec::new(),
                },
            }),
        );

        assert_eq!(model.status, "Prediction #2: Erlotinib (12.345679%)");
        assert!(model.last_error.is_none());
    }

    #[test]
    fn unhealthy_service_is_flagged() {
        let mut model = StatusModel::default();
        apply_ui_event(
            &mut model,
            UiEvent::HealthChecked(HealthStatus {
                message: "Drug Prediction API is running".to_string(),
                status: "healthy".to_string(),
                model_loaded: false,
                version: "1.0.0".to_string(),
            }),
        );

        assert_eq!(
            model.banner.as_ref().map(|banner| banner.severity),
            Some(StatusBannerSeverity::Error)
        );
        assert!(model.health.is_some());
    }
}
