pub mod types;

use chrono::Utc;
use tracing::info;

use crate::api::RepairApi;
use crate::error::{ApiError, IndentError};

pub use types::{FormOptions, IndentForm, IndentSubmission, SerialOption};

pub fn fetch_form_options(api: &dyn RepairApi) -> Result<FormOptions, ApiError> {
    let options = api.form_options()?;
    info!(
        machines = options.machines.len(),
        serials = options.serials.len(),
        "loaded indent form options"
    );
    Ok(options)
}

/// Validates the form and creates the indent. Returns the server's message, if any.
pub fn create_indent(
    api: &dyn RepairApi,
    form: &IndentForm,
) -> Result<Option<String>, IndentError> {
    let submission = form.validate(Utc::now())?;
    let message = api.create_indent(&submission)?;
    info!(
        machine = %submission.machine_name,
        serial = %submission.serial_no,
        "repair indent created"
    );
    Ok(message)
}
