use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{open_envelope, Attachment, RepairApi};
use crate::auth::{Credentials, User};
use crate::config::DeskConfig;
use crate::error::ApiError;
use crate::helpers::join_url;
use crate::indent::{FormOptions, IndentSubmission};
use crate::reconcile::ReconcilePayload;
use crate::task::RepairTask;

pub struct HttpRepairApi {
    base_url: String,
    client: Client,
    upload_timeout: Duration,
}

#[derive(Deserialize)]
struct Acknowledged {}

#[derive(Deserialize)]
struct Uploaded {
    url: String,
}

#[derive(Deserialize)]
struct LoggedIn {
    user: User,
}

#[derive(Deserialize)]
struct Created {
    message: Option<String>,
}

impl HttpRepairApi {
    pub fn new(cfg: &DeskConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.clone(),
            client,
            upload_timeout: Duration::from_secs(cfg.upload_timeout_secs),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// `path` followed by one percent-encoded segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let base = self.url(path);
        let mut url =
            Url::parse(&base).map_err(|err| ApiError::InvalidUrl(format!("{}: {}", base, err)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Sends the request and parses the body as JSON whatever the status.
    /// The API reports application failures as `{success: false}` on 4xx/5xx too.
    fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let resp = request.send()?;
        let status = resp.status();
        let body = resp.text()?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) if value.is_object() => Ok(value),
            _ if !status.is_success() => Err(ApiError::Http {
                status: status.as_u16(),
                body,
            }),
            _ => Err(ApiError::Decode("expected a JSON object".to_string())),
        }
    }
}

impl RepairApi for HttpRepairApi {
    fn list_tasks(&self) -> Result<Vec<RepairTask>, ApiError> {
        let url = self.url("/repair-check/all");
        debug!(%url, "fetching repair tasks");
        let value = self.send(self.client.get(url))?;
        let envelope: Value = open_envelope(value, "Failed to fetch tasks")?;
        let rows = envelope
            .get("tasks")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<RepairTask>(row) {
                Ok(task) => out.push(task),
                Err(err) => warn!(error = %err, "skipping undecodable task row"),
            }
        }
        Ok(out)
    }

    fn upload_bill(&self, file: &Attachment) -> Result<String, ApiError> {
        let url = self.url("/repair-check/upload-bill");
        debug!(%url, file = %file.file_name, "uploading bill image");
        let form = Form::new().part("file", file_part(file)?);
        let value = self.send(
            self.client
                .post(url)
                .timeout(self.upload_timeout)
                .multipart(form),
        )?;
        let uploaded: Uploaded = open_envelope(value, "S3 Upload Failed")?;
        Ok(uploaded.url)
    }

    fn update_task(&self, task_no: &str, payload: &ReconcilePayload) -> Result<(), ApiError> {
        let url = self.url_with_segment("/repair-check/update", task_no)?;
        debug!(%url, "updating repair task");
        let value = self.send(self.client.put(url).json(payload))?;
        let _: Acknowledged = open_envelope(value, "Failed to update task")?;
        Ok(())
    }

    fn form_options(&self) -> Result<FormOptions, ApiError> {
        let url = self.url("/repair-options/form-options");
        debug!(%url, "fetching form options");
        let value = self.send(self.client.get(url))?;
        open_envelope(value, "Failed to fetch form options")
    }

    fn create_indent(&self, indent: &IndentSubmission) -> Result<Option<String>, ApiError> {
        let url = self.url("/repair/create");
        debug!(%url, machine = %indent.machine_name, "creating repair indent");
        let mut form = Form::new();
        for (name, value) in indent.text_fields() {
            form = form.text(name, value);
        }
        if let Some(image) = &indent.image {
            form = form.part("image", file_part(image)?);
        }
        let value = self.send(
            self.client
                .post(url)
                .timeout(self.upload_timeout)
                .multipart(form),
        )?;
        let created: Created = open_envelope(value, "Server Error!")?;
        Ok(created.message)
    }

    fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let url = self.url("/auth/login");
        debug!(%url, username = %credentials.username, "logging in");
        let value = self.send(self.client.post(url).json(credentials))?;
        let logged_in: LoggedIn = open_envelope(value, "Login failed")?;
        Ok(logged_in.user)
    }
}

fn file_part(file: &Attachment) -> Result<Part, ApiError> {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    match &file.mime {
        Some(mime) => Ok(part.mime_str(mime)?),
        None => Ok(part),
    }
}
