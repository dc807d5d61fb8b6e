//! Client side of the drug response predictor: form state, derived fields and
//! the submission lifecycle against the remote prediction service.

pub mod config;
pub mod error;
pub mod form;
mod session;
pub mod submission;
pub mod transport;
pub mod view;

pub use config::{load_settings, load_settings_from, Settings};
pub use error::SubmissionError;
pub use form::{FormRecord, FormStateStore};
pub use session::FormSession;
pub use submission::{
    PendingSubmission, SubmissionController, SubmissionEvent, SubmissionState, SubmitPolicy,
};
pub use transport::{HttpPredictionTransport, PredictionTransport};
