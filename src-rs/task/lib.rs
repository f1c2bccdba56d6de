pub mod store;
pub mod types;

pub use store::{BillingPatch, Partition, TaskStore};
pub use types::{BillType, PaymentType, RepairTask, TaskState};
