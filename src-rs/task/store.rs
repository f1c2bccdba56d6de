use std::sync::RwLock;

use chrono::Utc;
use tracing::{info, warn};

use super::types::{BillType, RepairTask};
use crate::api::RepairApi;
use crate::auth::User;
use crate::error::ApiError;

/// Pending/history view of the store at one read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub pending: Vec<RepairTask>,
    pub history: Vec<RepairTask>,
}

impl Partition {
    pub fn from_tasks(tasks: &[RepairTask]) -> Self {
        Self {
            pending: tasks.iter().filter(|t| t.is_pending()).cloned().collect(),
            history: tasks.iter().filter(|t| t.is_history()).cloned().collect(),
        }
    }

    /// Admins see everything; everyone else only the tasks they indented.
    pub fn visible_to(&self, user: &User) -> Self {
        let keep = |task: &&RepairTask| {
            user.is_admin() || task.name_of_indenter.as_deref() == Some(user.name.as_str())
        };
        Self {
            pending: self.pending.iter().filter(keep).cloned().collect(),
            history: self.history.iter().filter(keep).cloned().collect(),
        }
    }
}

/// Billing fields written onto a task once it is reconciled.
#[derive(Clone, Debug, PartialEq)]
pub struct BillingPatch {
    pub transporter_name: String,
    pub transportation_amount: f64,
    pub bill_no: String,
    pub type_of_bill: BillType,
    pub total_bill_amount: f64,
    pub to_be_paid_amount: f64,
    pub bill_image: String,
}

impl BillingPatch {
    fn apply(&self, task: &mut RepairTask, completed_at: String) {
        task.transporter_name_2 = Some(self.transporter_name.clone());
        task.transportation_charges = Some(self.transportation_amount);
        task.bill_no = Some(self.bill_no.clone());
        task.type_of_bill = Some(self.type_of_bill.to_string());
        task.total_bill_amount = Some(self.total_bill_amount);
        task.to_be_paid_amount = Some(self.to_be_paid_amount);
        if !self.bill_image.is_empty() {
            task.bill_image = Some(self.bill_image.clone());
        }
        task.actual_2 = Some(completed_at);
    }
}

/// Session-owned copy of the repair tasks. The API stays the system of record.
pub struct TaskStore {
    tasks: RwLock<Vec<RepairTask>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Fetches every task and swaps it in. On error the current contents stay as they were.
    pub fn reload(&self, api: &dyn RepairApi) -> Result<Partition, ApiError> {
        let tasks = api.list_tasks()?;
        info!(count = tasks.len(), "loaded repair tasks");
        self.replace(tasks);
        Ok(self.partition())
    }

    pub fn replace(&self, tasks: Vec<RepairTask>) {
        match self.tasks.write() {
            Ok(mut current) => *current = tasks,
            Err(poisoned) => *poisoned.into_inner() = tasks,
        }
    }

    /// Optimistically marks a task reconciled. Returns the patched copy.
    pub fn patch(&self, task_no: &str, patch: &BillingPatch) -> Option<RepairTask> {
        let mut tasks = match self.tasks.write() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(task) = tasks.iter_mut().find(|t| t.task_no == task_no) else {
            warn!(task_no, "patch skipped: task not in store");
            return None;
        };
        patch.apply(task, Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
        Some(task.clone())
    }

    pub fn get(&self, task_no: &str) -> Option<RepairTask> {
        let tasks = self.tasks.read().ok()?;
        tasks.iter().find(|t| t.task_no == task_no).cloned()
    }

    pub fn partition(&self) -> Partition {
        match self.tasks.read() {
            Ok(tasks) => Partition::from_tasks(&tasks),
            Err(_) => Partition::default(),
        }
    }

    pub fn pending(&self) -> Vec<RepairTask> {
        self.partition().pending
    }

    pub fn history(&self) -> Vec<RepairTask> {
        self.partition().history
    }

    pub fn len(&self) -> usize {
        self.tasks.read().map(|tasks| tasks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRepairApi;
    use rstest::{fixture, rstest};

    fn task(task_no: &str, planned_2: Option<&str>, actual_2: Option<&str>) -> RepairTask {
        RepairTask {
            planned_2: planned_2.map(str::to_string),
            actual_2: actual_2.map(str::to_string),
            name_of_indenter: Some("Ravi".to_string()),
            ..RepairTask::new(task_no)
        }
    }

    #[fixture]
    fn tasks() -> Vec<RepairTask> {
        vec![
            task("TK-1", Some("2025-01-01"), None),
            task("TK-2", Some("2025-01-01"), Some("2025-01-03")),
            task("TK-3", None, None),
            task("TK-4", Some("2025-01-02"), Some("")),
        ]
    }

    fn numbers(list: &[RepairTask]) -> Vec<&str> {
        list.iter().map(|t| t.task_no.as_str()).collect()
    }

    #[rstest]
    fn partition_splits_on_second_milestone(tasks: Vec<RepairTask>) {
        let store = TaskStore::new();
        store.replace(tasks);

        let partition = store.partition();
        assert_eq!(numbers(&partition.pending), vec!["TK-1", "TK-4"]);
        assert_eq!(numbers(&partition.history), vec!["TK-2"]);
        assert_eq!(store.len(), 4);
    }

    #[rstest]
    fn failed_reload_keeps_previous_contents(tasks: Vec<RepairTask>) {
        let store = TaskStore::new();
        store.replace(tasks);
        let before = store.partition();

        let mut api = MockRepairApi::new();
        api.expect_list_tasks()
            .times(1)
            .returning(|| Err(ApiError::Application("Failed to fetch tasks".to_string())));

        let result = store.reload(&api);
        assert_eq!(
            result,
            Err(ApiError::Application("Failed to fetch tasks".to_string()))
        );
        assert_eq!(store.partition(), before);
    }

    #[rstest]
    fn reload_replaces_contents(tasks: Vec<RepairTask>) {
        let store = TaskStore::new();
        store.replace(tasks);

        let mut api = MockRepairApi::new();
        api.expect_list_tasks()
            .returning(|| Ok(vec![task("TK-9", Some("2025-02-01"), None)]));

        let partition = store.reload(&api).expect("reload succeeds");
        assert_eq!(numbers(&partition.pending), vec!["TK-9"]);
        assert!(partition.history.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn patch_moves_task_to_history(tasks: Vec<RepairTask>) {
        let store = TaskStore::new();
        store.replace(tasks);

        let patched = store
            .patch(
                "TK-1",
                &BillingPatch {
                    transporter_name: "Acme".to_string(),
                    transportation_amount: 50.0,
                    bill_no: "B-9".to_string(),
                    type_of_bill: BillType::Service,
                    total_bill_amount: 700.0,
                    to_be_paid_amount: 500.0,
                    bill_image: String::new(),
                },
            )
            .expect("task exists");

        assert!(patched.is_history());
        assert_eq!(patched.type_of_bill.as_deref(), Some("Service Bill"));
        assert_eq!(patched.to_be_paid_amount, Some(500.0));
        assert_eq!(patched.bill_image, None);
        assert_eq!(numbers(&store.pending()), vec!["TK-4"]);
        assert_eq!(numbers(&store.history()), vec!["TK-1", "TK-2"]);
    }

    #[test]
    fn patch_of_unknown_task_is_none() {
        let store = TaskStore::new();
        let patch = BillingPatch {
            transporter_name: "Acme".to_string(),
            transportation_amount: 0.0,
            bill_no: "B-1".to_string(),
            type_of_bill: BillType::Labor,
            total_bill_amount: 10.0,
            to_be_paid_amount: 10.0,
            bill_image: String::new(),
        };
        assert_eq!(store.patch("TK-404", &patch), None);
    }

    #[rstest]
    fn visible_to_filters_by_indenter(tasks: Vec<RepairTask>) {
        let mut mine = tasks;
        mine.push(RepairTask {
            name_of_indenter: Some("Meera".to_string()),
            ..task("TK-5", Some("2025-01-05"), None)
        });
        let partition = Partition::from_tasks(&mine);

        let meera = User {
            id: "7".to_string(),
            name: "Meera".to_string(),
            role: "user".to_string(),
            access: vec![],
        };
        let admin = User {
            role: "admin".to_string(),
            ..meera.clone()
        };

        assert_eq!(numbers(&partition.visible_to(&meera).pending), vec!["TK-5"]);
        assert!(partition.visible_to(&meera).history.is_empty());
        assert_eq!(partition.visible_to(&admin), partition);
    }
}
