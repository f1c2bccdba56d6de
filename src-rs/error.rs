//! Error types shared by the task store, reconciliation, auth and indent flows.

use thiserror::Error;

/// Failures talking to the repair API.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status whose body was not a response envelope.
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    /// The API answered with `success: false`.
    #[error("{0}")]
    Application(String),

    /// The envelope reported success but its payload did not match.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured base URL cannot carry a request path.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// The bill image upload failed; submission proceeded without an image.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("bill upload failed: {0}")]
pub struct UploadError(pub ApiError);

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("transporter name is required")]
    MissingTransporter,
    #[error("transportation amount must be a number, got '{0}'")]
    InvalidTransportationAmount(String),
    #[error("bill number is required")]
    MissingBillNo,
    #[error("unknown bill type '{0}'")]
    InvalidBillType(String),
    #[error("total bill amount must be a positive number, got '{0}'")]
    InvalidTotal(String),
    #[error("total bill amount {total} is below the advance of {advance}")]
    BelowAdvance { total: f64, advance: f64 },
    #[error("Please select Machine Name")]
    MissingMachine,
    #[error("Please select Serial No")]
    MissingSerial,
    #[error("Please select Given By")]
    MissingGivenBy,
    #[error("Please select Doer Name")]
    MissingDoer,
    #[error("Please select Task Start Date & Time")]
    MissingStart,
    #[error("Please select Task End Date & Time")]
    MissingEnd,
    #[error("username and password are required")]
    MissingCredentials,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("task {0} is not pending")]
    NotPending(String),
    #[error("a reconciliation for task {0} is already in flight")]
    InFlight(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to update task: {0}")]
    Api(#[from] ApiError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("login failed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum IndentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unable to submit indent: {0}")]
    Api(#[from] ApiError),
}
