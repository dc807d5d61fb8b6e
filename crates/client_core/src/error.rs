use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to reach prediction service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("invalid prediction response payload: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("a prediction request is already pending")]
    AlreadyPending,
}

impl SubmissionError {
    /// Short cause label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::Transport(_) => "transport",
            SubmissionError::Rejected { .. } => "rejected",
            SubmissionError::Decode(_) => "decode",
            SubmissionError::AlreadyPending => "already_pending",
        }
    }
}
