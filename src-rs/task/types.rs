use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ValidationError;
use crate::helpers::is_set;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentType {
    Advance,
    Other(String),
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Advance => "Advance",
            PaymentType::Other(value) => value,
        }
    }
}

impl From<&str> for PaymentType {
    fn from(raw: &str) -> Self {
        if raw == "Advance" {
            PaymentType::Advance
        } else {
            PaymentType::Other(raw.to_string())
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillType {
    #[serde(rename = "Service Bill")]
    Service,
    #[serde(rename = "Material Bill")]
    Material,
    #[serde(rename = "Labor Bill")]
    Labor,
    #[serde(rename = "Combined Bill")]
    Combined,
}

impl BillType {
    pub const ALL: [BillType; 4] = [
        BillType::Service,
        BillType::Material,
        BillType::Labor,
        BillType::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Service => "Service Bill",
            BillType::Material => "Material Bill",
            BillType::Labor => "Labor Bill",
            BillType::Combined => "Combined Bill",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillType {
    type Err = ValidationError;

    /// Accepts the wire label ("Service Bill") or its first word ("service").
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_lowercase();
        BillType::ALL
            .into_iter()
            .find(|bill| {
                let label = bill.as_str().to_lowercase();
                label == wanted || label.split(' ').next() == Some(wanted.as_str())
            })
            .ok_or_else(|| ValidationError::InvalidBillType(raw.to_string()))
    }
}

/// Where a task sits in the second-milestone lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    /// `planned_2` not reached yet.
    Upcoming,
    Pending,
    History,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairTask {
    #[serde(deserialize_with = "task_number")]
    pub task_no: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub machine_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub serial_no: Option<String>,
    #[serde(default, rename = "nameOfIndenter", deserialize_with = "lenient_text")]
    pub name_of_indenter: Option<String>,
    #[serde(default, rename = "doerName", deserialize_with = "lenient_text")]
    pub doer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vendor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lead_time_to_deliver_days: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub planned_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub actual_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub planned_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub actual_2: Option<String>,
    #[serde(default, deserialize_with = "payment_type")]
    pub payment_type: Option<PaymentType>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub how_much: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bill_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub type_of_bill: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_bill_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub to_be_paid_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bill_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub transporter_name_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub transportation_charges: Option<f64>,
}

impl RepairTask {
    pub fn new(task_no: &str) -> Self {
        Self {
            task_no: task_no.to_string(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> TaskState {
        if is_set(&self.actual_2) {
            TaskState::History
        } else if is_set(&self.planned_2) {
            TaskState::Pending
        } else {
            TaskState::Upcoming
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == TaskState::Pending
    }

    pub fn is_history(&self) -> bool {
        self.state() == TaskState::History
    }

    pub fn is_advance(&self) -> bool {
        matches!(self.payment_type, Some(PaymentType::Advance))
    }

    /// Advance already paid. Zero unless the task is on advance terms.
    pub fn advance(&self) -> f64 {
        if self.is_advance() {
            self.how_much.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Task numbers may be text or a numeric serial. Blank or missing ids are rejected.
fn task_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unusable task_no: {}",
            other
        ))),
    }
}

/// Accepts strings, numbers and null; anything else becomes `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

/// Amounts arrive as JSON numbers or as numeric strings (Postgres `numeric`).
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

fn payment_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PaymentType>, D::Error> {
    let raw = lenient_text(deserializer)?;
    Ok(raw
        .filter(|text| !text.trim().is_empty())
        .map(|text| PaymentType::from(text.as_str())))
}
