use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use super::calculator::compute_to_be_paid;
use super::form::ReconcileForm;
use crate::api::RepairApi;
use crate::error::{ApiError, SubmitError, UploadError};
use crate::task::{BillingPatch, RepairTask, TaskStore};

/// Non-fatal problems attached to a successful submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitWarning {
    /// The bill image could not be stored; the task was updated without it.
    Upload(UploadError),
    /// The update went through but the follow-up reload failed.
    Refresh(ApiError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitOutcome {
    pub task: RepairTask,
    pub to_be_paid_amount: f64,
    pub warnings: Vec<SubmitWarning>,
}

/// Releases the in-flight key when the submission finishes, however it finishes.
struct InFlightGuard<'a> {
    keys: &'a Mutex<HashSet<String>>,
    task_no: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.task_no);
    }
}

pub struct Reconciler {
    api: Arc<dyn RepairApi>,
    store: Arc<TaskStore>,
    in_flight: Mutex<HashSet<String>>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn RepairApi>, store: Arc<TaskStore>) -> Self {
        Self {
            api,
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Live payable amount for a stored task, `None` when nothing should be shown.
    pub fn preview(&self, task_no: &str, entered_total: &str) -> Option<f64> {
        let task = self.store.get(task_no);
        compute_to_be_paid(task.as_ref(), entered_total)
    }

    pub fn is_in_flight(&self, task_no: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(task_no)
    }

    fn begin(&self, task_no: &str) -> Result<InFlightGuard<'_>, SubmitError> {
        let mut keys = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(task_no.to_string()) {
            return Err(SubmitError::InFlight(task_no.to_string()));
        }
        Ok(InFlightGuard {
            keys: &self.in_flight,
            task_no: task_no.to_string(),
        })
    }

    /// Attaches billing data to a pending task and marks it reconciled.
    ///
    /// The local copy is patched only after the API accepts the update, then the
    /// whole store is reloaded. Upload and reload failures come back as warnings.
    pub fn submit(
        &self,
        task_no: &str,
        form: &ReconcileForm,
    ) -> Result<SubmitOutcome, SubmitError> {
        // Pending is read while holding the in-flight key.
        let _guard = self.begin(task_no)?;
        let task = self
            .store
            .get(task_no)
            .filter(RepairTask::is_pending)
            .ok_or_else(|| SubmitError::NotPending(task_no.to_string()))?;

        let validated = form.validate()?;
        // Checked before uploading so a rejected form leaves no orphaned image.
        validated.payload(&task, String::new())?;

        let mut warnings = Vec::new();
        let bill_image = match &form.bill_image {
            Some(file) => match self.api.upload_bill(file) {
                Ok(url) => url,
                Err(err) => {
                    warn!(task_no, error = %err, "bill upload failed, submitting without image");
                    warnings.push(SubmitWarning::Upload(UploadError(err)));
                    String::new()
                }
            },
            None => String::new(),
        };

        let payload = validated.payload(&task, bill_image)?;
        self.api.update_task(task_no, &payload)?;
        info!(
            task_no,
            to_be_paid = payload.to_be_paid_amount,
            "repair task reconciled"
        );

        let patched = self
            .store
            .patch(task_no, &BillingPatch::from(&payload))
            .unwrap_or(task);
        if let Err(err) = self.store.reload(self.api.as_ref()) {
            warn!(task_no, error = %err, "reload after reconciliation failed");
            warnings.push(SubmitWarning::Refresh(err));
        }
        let task = self.store.get(task_no).unwrap_or(patched);

        Ok(SubmitOutcome {
            task,
            to_be_paid_amount: payload.to_be_paid_amount,
            warnings,
        })
    }
}
