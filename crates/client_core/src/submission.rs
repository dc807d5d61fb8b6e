//! Submission lifecycle: Idle -> Pending -> Succeeded/Failed.
//!
//! The controller publishes its state on a `watch` channel so views can read
//! the latest value without locking, and emits [`SubmissionEvent`]s on a
//! broadcast channel for notifications.

use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use shared::{
    domain::FieldName,
    protocol::{PredictionRequest, PredictionResult},
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::{error::SubmissionError, form::FormRecord, transport::PredictionTransport};

/// Generic message shown to the user for every failure kind.
pub const FAILURE_NOTICE: &str = "Something went wrong!";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed,
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Pending => "pending",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }
}

/// What to do with a submit that arrives while another one is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Issue the request anyway; whichever response resolves last wins.
    #[default]
    AllowConcurrent,
    /// Refuse with [`SubmissionError::AlreadyPending`] and leave state alone.
    RejectWhilePending,
}

impl FromStr for SubmitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_concurrent" => Ok(SubmitPolicy::AllowConcurrent),
            "reject_while_pending" => Ok(SubmitPolicy::RejectWhilePending),
            other => Err(format!(
                "unknown submit policy '{other}' (expected allow_concurrent or reject_while_pending)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    Started {
        attempt: u64,
    },
    Succeeded {
        attempt: u64,
        result: PredictionResult,
    },
    Failed {
        attempt: u64,
        notice: String,
        reason: String,
    },
}

/// A submit that has entered Pending and still owes its network call.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    attempt: u64,
    request: PredictionRequest,
}

impl PendingSubmission {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }
}

/// Coerces form text to a number the way the form always has: blank text is
/// zero, anything else that is not a decimal number becomes NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Builds the outbound payload from a form snapshot. The raw counts and
/// log-IC50 means only feed the derived ratios and are not sent.
pub fn build_prediction_request(record: &FormRecord) -> PredictionRequest {
    let number = |field: FieldName| coerce_number(record.get(field));
    PredictionRequest {
        target_pathway: record.get(FieldName::TargetPathway).to_string(),
        feature_name: record.get(FieldName::FeatureName).to_string(),
        ic50_effect_size: number(FieldName::Ic50EffectSize),
        feature_pos_ic50_var: number(FieldName::FeaturePosIc50Var),
        feature_neg_ic50_var: number(FieldName::FeatureNegIc50Var),
        feature_pval: number(FieldName::FeaturePval),
        tissue_pval: number(FieldName::TissuePval),
        msi_pval: number(FieldName::MsiPval),
        mutation_response_ratio: number(FieldName::MutationResponseRatio),
        mutation_ratio: number(FieldName::MutationRatio),
    }
}

pub struct SubmissionController {
    transport: Arc<dyn PredictionTransport>,
    policy: SubmitPolicy,
    state: watch::Sender<SubmissionState>,
    events: broadcast::Sender<SubmissionEvent>,
    next_attempt: AtomicU64,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn PredictionTransport>, policy: SubmitPolicy) -> Arc<Self> {
        let (state, _) = watch::channel(SubmissionState::Idle);
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            transport,
            policy,
            state,
            events,
            next_attempt: AtomicU64::new(1),
        })
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn transport(&self) -> &Arc<dyn PredictionTransport> {
        &self.transport
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    /// Moves to Pending synchronously, dropping any previous result, and
    /// returns the request still to be sent.
    pub fn begin(&self, record: &FormRecord) -> Result<PendingSubmission, SubmissionError> {
        let reject = self.policy == SubmitPolicy::RejectWhilePending;
        let mut rejected = false;
        self.state.send_if_modified(|state| {
            if reject && state.is_pending() {
                rejected = true;
                return false;
            }
            *state = SubmissionState::Pending;
            true
        });
        if rejected {
            warn!("submit ignored while a prediction request is pending");
            return Err(SubmissionError::AlreadyPending);
        }

        let attempt = self.next_attempt.fetch_add(1, Ordering::Relaxed);
        let request = build_prediction_request(record);
        info!(attempt, "prediction submission started");
        let _ = self.events.send(SubmissionEvent::Started { attempt });
        Ok(PendingSubmission { attempt, request })
    }

    /// Sends the request of a pending submission and records the outcome.
    /// The state left behind by the last attempt to resolve is the one kept.
    pub async fn complete(&self, pending: PendingSubmission) -> SubmissionState {
        let PendingSubmission { attempt, request } = pending;
        match self.transport.predict(&request).await {
            Ok(result) => {
                info!(
                    attempt,
                    predicted_drug = %result.predicted_drug,
                    confidence = result.confidence,
                    "prediction succeeded"
                );
                let next = SubmissionState::Succeeded(result.clone());
                self.state.send_replace(next.clone());
                let _ = self
                    .events
                    .send(SubmissionEvent::Succeeded { attempt, result });
                next
            }
            Err(err) => {
                warn!(attempt, kind = err.kind(), error = %err, "prediction failed");
                self.state.send_replace(SubmissionState::Failed);
                let _ = self.events.send(SubmissionEvent::Failed {
                    attempt,
                    notice: FAILURE_NOTICE.to_string(),
                    reason: err.to_string(),
                });
                SubmissionState::Failed
            }
        }
    }

    /// Settles a pending submission whose request was never sent.
    pub fn abort(&self, pending: PendingSubmission, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(attempt = pending.attempt, %reason, "prediction submission aborted");
        self.state.send_replace(SubmissionState::Failed);
        let _ = self.events.send(SubmissionEvent::Failed {
            attempt: pending.attempt,
            notice: FAILURE_NOTICE.to_string(),
            reason,
        });
    }

    /// Runs a whole submission. Only a policy rejection is returned as an
    /// error; request failures end in [`SubmissionState::Failed`].
    pub async fn submit(&self, record: &FormRecord) -> Result<SubmissionState, SubmissionError> {
        let pending = self.begin(record)?;
        Ok(self.complete(pending).await)
    }

    /// Enters Pending immediately and resolves the request on the current
    /// tokio runtime.
    pub fn spawn_submit(
        self: &Arc<Self>,
        record: &FormRecord,
    ) -> Result<JoinHandle<SubmissionState>, SubmissionError> {
        let pending = self.begin(record)?;
        let controller = Arc::clone(self);
        Ok(tokio::spawn(async move { controller.complete(pending).await }))
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
