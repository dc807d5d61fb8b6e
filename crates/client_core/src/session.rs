use std::sync::Arc;

use shared::{domain::FieldName, error::FormError};

use crate::{
    error::SubmissionError,
    form::{FormRecord, FormStateStore},
    submission::{PendingSubmission, SubmissionController, SubmissionState},
};

/// One user's form: a store and the controller that submits it.
///
/// Sessions never share a store; each window or CLI invocation builds its own.
pub struct FormSession {
    store: FormStateStore,
    controller: Arc<SubmissionController>,
}

impl FormSession {
    pub fn new(controller: Arc<SubmissionController>) -> Self {
        Self {
            store: FormStateStore::new(),
            controller,
        }
    }

    pub fn record(&self) -> &FormRecord {
        self.store.record()
    }

    pub fn controller(&self) -> &Arc<SubmissionController> {
        &self.controller
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    pub fn set_field(
        &mut self,
        field: FieldName,
        raw: impl Into<String>,
    ) -> Result<FormRecord, FormError> {
        self.store.set_field(field, raw)
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        raw: impl Into<String>,
    ) -> Result<FormRecord, FormError> {
        self.store.set_field_by_name(name, raw)
    }

    /// Enters Pending with a snapshot of the current record.
    pub fn begin_submit(&self) -> Result<PendingSubmission, SubmissionError> {
        self.controller.begin(self.store.record())
    }

    pub async fn submit_current(&self) -> Result<SubmissionState, SubmissionError> {
        let pending = self.begin_submit()?;
        Ok(self.controller.complete(pending).await)
    }
}
