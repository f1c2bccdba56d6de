//! Client library for the repair-check maintenance API: the task store, the
//! bill reconciliation flow, indent creation and login.

pub mod auth;
pub mod config;
pub mod desk;
pub mod error;
pub mod helpers;

#[path = "api/lib.rs"]
pub mod api;
#[path = "task/lib.rs"]
pub mod task;
#[path = "reconcile/lib.rs"]
pub mod reconcile;
#[path = "indent/lib.rs"]
pub mod indent;

pub use api::{Attachment, HttpRepairApi, RepairApi};
pub use auth::User;
pub use config::DeskConfig;
pub use desk::RepairDesk;
pub use error::{ApiError, AuthError, IndentError, SubmitError, UploadError, ValidationError};
pub use reconcile::{compute_to_be_paid, ReconcileForm, SubmitOutcome, SubmitWarning};
pub use task::{BillType, Partition, PaymentType, RepairTask, TaskStore};
