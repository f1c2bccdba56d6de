use serde::Serialize;

use super::calculator::{parse_amount, to_be_paid_for};
use crate::api::Attachment;
use crate::error::ValidationError;
use crate::task::{BillType, BillingPatch, RepairTask};

/// The bill form as typed by the operator.
#[derive(Clone, Debug, Default)]
pub struct ReconcileForm {
    pub transporter_name: String,
    pub transportation_amount: String,
    pub bill_no: String,
    pub type_of_bill: String,
    pub total_bill_amount: String,
    pub bill_image: Option<Attachment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedForm {
    pub transporter_name: String,
    pub transportation_amount: f64,
    pub bill_no: String,
    pub type_of_bill: BillType,
    pub total_bill_amount: f64,
}

/// Body of `PUT /repair-check/update/{task_no}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePayload {
    pub transporter_name: String,
    pub transportation_amount: f64,
    pub bill_image: String,
    pub bill_no: String,
    pub type_of_bill: BillType,
    pub total_bill_amount: f64,
    pub to_be_paid_amount: f64,
}

impl ReconcileForm {
    pub fn validate(&self) -> Result<ValidatedForm, ValidationError> {
        let transporter_name = self.transporter_name.trim();
        if transporter_name.is_empty() {
            return Err(ValidationError::MissingTransporter);
        }
        // Zero freight is legitimate, so this does not go through parse_amount.
        let transportation_amount = self
            .transportation_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| {
                ValidationError::InvalidTransportationAmount(self.transportation_amount.clone())
            })?;
        let bill_no = self.bill_no.trim();
        if bill_no.is_empty() {
            return Err(ValidationError::MissingBillNo);
        }
        let type_of_bill = self.type_of_bill.parse::<BillType>()?;
        let total_bill_amount = parse_amount(&self.total_bill_amount)
            .filter(|total| *total > 0.0)
            .ok_or_else(|| ValidationError::InvalidTotal(self.total_bill_amount.clone()))?;

        Ok(ValidatedForm {
            transporter_name: transporter_name.to_string(),
            transportation_amount,
            bill_no: bill_no.to_string(),
            type_of_bill,
            total_bill_amount,
        })
    }
}

impl ValidatedForm {
    /// Builds the update body. Fails when the bill does not cover the advance.
    pub fn payload(
        &self,
        task: &RepairTask,
        bill_image: String,
    ) -> Result<ReconcilePayload, ValidationError> {
        let to_be_paid_amount = to_be_paid_for(Some(task), self.total_bill_amount).ok_or(
            ValidationError::BelowAdvance {
                total: self.total_bill_amount,
                advance: task.advance(),
            },
        )?;
        Ok(ReconcilePayload {
            transporter_name: self.transporter_name.clone(),
            transportation_amount: self.transportation_amount,
            bill_image,
            bill_no: self.bill_no.clone(),
            type_of_bill: self.type_of_bill,
            total_bill_amount: self.total_bill_amount,
            to_be_paid_amount,
        })
    }
}

impl From<&ReconcilePayload> for BillingPatch {
    fn from(payload: &ReconcilePayload) -> Self {
        BillingPatch {
            transporter_name: payload.transporter_name.clone(),
            transportation_amount: payload.transportation_amount,
            bill_no: payload.bill_no.clone(),
            type_of_bill: payload.type_of_bill,
            total_bill_amount: payload.total_bill_amount,
            to_be_paid_amount: payload.to_be_paid_amount,
            bill_image: payload.bill_image.clone(),
        }
    }
}
