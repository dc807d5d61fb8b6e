//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{SubmissionError, SubmissionEvent};
use shared::protocol::HealthStatus;

pub enum UiEvent {
    Info(String),
    Submission(SubmissionEvent),
    HealthChecked(HealthStatus),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Rejected,
    Decode,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Submit,
    HealthCheck,
    FormEdit,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("rejected the request")
            || message_lower.contains("status 4")
            || message_lower.contains("status 5")
        {
            UiErrorCategory::Rejected
        } else if message_lower.contains("invalid prediction response")
            || message_lower.contains("decod")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("required")
            || message_lower.contains("unknown form field")
            || message_lower.contains("cannot be edited")
            || message_lower.contains("already pending")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("failed to reach")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("queue")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_submission_error(context: UiErrorContext, err: &SubmissionError) -> Self {
        let category = match err {
            SubmissionError::Transport(_) => UiErrorCategory::Transport,
            SubmissionError::Rejected { .. } => UiErrorCategory::Rejected,
            SubmissionError::Decode(_) => UiErrorCategory::Decode,
            SubmissionError::AlreadyPending => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
