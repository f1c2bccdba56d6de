use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{Credentials, User};
use crate::error::ApiError;
use crate::indent::{FormOptions, IndentSubmission};
use crate::reconcile::ReconcilePayload;
use crate::task::RepairTask;

/// The repair API as the client sees it. Every call is one blocking request.
#[cfg_attr(test, mockall::automock)]
pub trait RepairApi: Send + Sync {
    /// `GET /repair-check/all`
    fn list_tasks(&self) -> Result<Vec<RepairTask>, ApiError>;

    /// `POST /repair-check/upload-bill`, returning the stored object's URL.
    fn upload_bill(&self, file: &Attachment) -> Result<String, ApiError>;

    /// `PUT /repair-check/update/{task_no}`
    fn update_task(&self, task_no: &str, payload: &ReconcilePayload) -> Result<(), ApiError>;

    /// `GET /repair-options/form-options`
    fn form_options(&self) -> Result<FormOptions, ApiError>;

    /// `POST /repair/create`, returning the server's message if it sent one.
    fn create_indent(&self, indent: &IndentSubmission) -> Result<Option<String>, ApiError>;

    /// `POST /auth/login`
    fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;
}

/// A file picked by the operator, held in memory until it is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime: guess_mime(file_name).map(str::to_string),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(&file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Unwraps a `{success, message?, ...payload}` envelope.
///
/// A missing or false `success` is an application error carrying the server's
/// `message`, or `fallback` when there is none.
pub fn open_envelope<T: DeserializeOwned>(value: Value, fallback: &str) -> Result<T, ApiError> {
    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or(fallback);
        return Err(ApiError::Application(message.to_string()));
    }
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}
