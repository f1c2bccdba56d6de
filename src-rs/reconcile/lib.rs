pub mod calculator;
pub mod form;
pub mod service;

pub use calculator::{compute_to_be_paid, parse_amount, to_be_paid_for};
pub use form::{ReconcileForm, ReconcilePayload, ValidatedForm};
pub use service::{Reconciler, SubmitOutcome, SubmitWarning};
