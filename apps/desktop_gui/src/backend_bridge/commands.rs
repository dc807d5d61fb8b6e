//! Backend commands queued from UI to backend worker.

use client_core::PendingSubmission;

pub enum BackendCommand {
    /// Resolve a submission the UI already moved to Pending.
    Submit(PendingSubmission),
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit(_) => "submit",
            BackendCommand::CheckHealth => "check_health",
        }
    }
}
