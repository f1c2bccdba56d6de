use std::sync::{Arc, RwLock};

use tracing::info;

use crate::api::{HttpRepairApi, RepairApi};
use crate::auth::{self, User};
use crate::config::DeskConfig;
use crate::error::{ApiError, AuthError, IndentError, SubmitError};
use crate::indent::{self, FormOptions, IndentForm};
use crate::reconcile::{ReconcileForm, Reconciler, SubmitOutcome};
use crate::task::{Partition, RepairTask, TaskStore};

/// One operator session: the API handle, the task store and who is logged in.
///
/// Views receive a `&RepairDesk` instead of reaching for shared globals.
pub struct RepairDesk {
    pub config: DeskConfig,
    api: Arc<dyn RepairApi>,
    store: Arc<TaskStore>,
    reconciler: Reconciler,
    user: RwLock<Option<User>>,
}

impl RepairDesk {
    pub fn new(config: DeskConfig) -> Result<Self, ApiError> {
        let api = HttpRepairApi::new(&config)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn with_api(config: DeskConfig, api: Arc<dyn RepairApi>) -> Self {
        let store = Arc::new(TaskStore::new());
        let reconciler = Reconciler::new(Arc::clone(&api), Arc::clone(&store));
        Self {
            config,
            api,
            store,
            reconciler,
            user: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = auth::login(self.api.as_ref(), username, password)?;
        if let Ok(mut current) = self.user.write() {
            *current = Some(user.clone());
        }
        Ok(user)
    }

    pub fn logout(&self) {
        if let Ok(mut current) = self.user.write() {
            if let Some(user) = current.take() {
                info!(user = %user.name, "logged out");
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().ok()?.clone()
    }

    pub fn load_all(&self) -> Result<Partition, ApiError> {
        self.store.reload(self.api.as_ref())
    }

    /// The partition scoped to the logged-in user. Nobody logged in sees everything.
    pub fn visible(&self) -> Partition {
        let partition = self.store.partition();
        match self.user() {
            Some(user) => partition.visible_to(&user),
            None => partition,
        }
    }

    pub fn task(&self, task_no: &str) -> Option<RepairTask> {
        self.store.get(task_no)
    }

    pub fn preview(&self, task_no: &str, entered_total: &str) -> Option<f64> {
        self.reconciler.preview(task_no, entered_total)
    }

    pub fn submit(
        &self,
        task_no: &str,
        form: &ReconcileForm,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.reconciler.submit(task_no, form)
    }

    pub fn form_options(&self) -> Result<FormOptions, ApiError> {
        indent::fetch_form_options(self.api.as_ref())
    }

    pub fn create_indent(&self, form: &IndentForm) -> Result<Option<String>, IndentError> {
        indent::create_indent(self.api.as_ref(), form)
    }
}
