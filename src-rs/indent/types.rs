use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::Attachment;
use crate::error::ValidationError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SerialOption {
    pub machine_name: String,
    pub serial_no: String,
}

/// Lookup lists for the indent form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub machines: Vec<String>,
    pub serials: Vec<SerialOption>,
    #[serde(rename = "doerNames")]
    pub doer_names: Vec<String>,
    #[serde(rename = "givenBy")]
    pub given_by: Vec<String>,
    pub priority: Vec<String>,
    pub departments: Vec<String>,
}

impl FormOptions {
    pub fn serials_for(&self, machine: &str) -> Vec<&str> {
        self.serials
            .iter()
            .filter(|s| s.machine_name == machine)
            .map(|s| s.serial_no.as_str())
            .collect()
    }
}

/// The indent form as filled in. Dates are `YYYY-MM-DD`, times `HH:MM`.
#[derive(Clone, Debug, Default)]
pub struct IndentForm {
    pub machine_name: String,
    pub serial_no: String,
    pub given_by: String,
    pub doer_name: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub problem_with_machine: String,
    pub department: String,
    pub location: String,
    pub machine_part_name: String,
    pub priority: String,
    pub enable_reminders: bool,
    pub require_attachment: bool,
    pub image: Option<Attachment>,
}

/// A validated indent, ready to be sent as multipart form data.
#[derive(Clone, Debug, PartialEq)]
pub struct IndentSubmission {
    pub time_stamp: String,
    pub serial_no: String,
    pub machine_name: String,
    pub given_by: String,
    pub doer_name: String,
    pub enable_reminders: bool,
    pub require_attachment: bool,
    pub task_start_date: String,
    pub task_ending_date: String,
    pub problem_with_machine: String,
    pub department: String,
    pub location: String,
    pub machine_part_name: String,
    pub priority: String,
    pub image: Option<Attachment>,
}

fn required(value: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed.to_string())
    }
}

fn timestamp(date: &str, time: &str, err: ValidationError) -> Result<String, ValidationError> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        return Err(err);
    }
    Ok(format!("{} {}:00", date, time))
}

impl IndentForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<IndentSubmission, ValidationError> {
        let machine_name = required(&self.machine_name, ValidationError::MissingMachine)?;
        let serial_no = required(&self.serial_no, ValidationError::MissingSerial)?;
        let given_by = required(&self.given_by, ValidationError::MissingGivenBy)?;
        let doer_name = required(&self.doer_name, ValidationError::MissingDoer)?;
        let task_start_date =
            timestamp(&self.start_date, &self.start_time, ValidationError::MissingStart)?;
        let task_ending_date =
            timestamp(&self.end_date, &self.end_time, ValidationError::MissingEnd)?;

        Ok(IndentSubmission {
            time_stamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            serial_no,
            machine_name,
            given_by,
            doer_name,
            enable_reminders: self.enable_reminders,
            require_attachment: self.require_attachment,
            task_start_date,
            task_ending_date,
            problem_with_machine: self.problem_with_machine.trim().to_string(),
            department: self.department.trim().to_string(),
            location: self.location.trim().to_string(),
            machine_part_name: self.machine_part_name.trim().to_string(),
            priority: self.priority.trim().to_string(),
            image: self.image.clone(),
        })
    }
}

impl IndentSubmission {
    /// Text parts of the multipart body, in the order the API expects them.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("time_stamp", self.time_stamp.clone()),
            ("serial_no", self.serial_no.clone()),
            ("machine_name", self.machine_name.clone()),
            ("given_by", self.given_by.clone()),
            ("doer_name", self.doer_name.clone()),
            ("enable_reminders", self.enable_reminders.to_string()),
            ("require_attachment", self.require_attachment.to_string()),
            ("task_start_date", self.task_start_date.clone()),
            ("task_ending_date", self.task_ending_date.clone()),
            ("problem_with_machine", self.problem_with_machine.clone()),
            ("department", self.department.clone()),
            ("location", self.location.clone()),
            ("machine_part_name", self.machine_part_name.clone()),
            ("priority", self.priority.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn form() -> IndentForm {
        IndentForm {
            machine_name: "CNC-2".to_string(),
            serial_no: "SN-204".to_string(),
            given_by: "Plant Head".to_string(),
            doer_name: "Suresh".to_string(),
            start_date: "2025-03-01".to_string(),
            start_time: "09:30".to_string(),
            end_date: "2025-03-02".to_string(),
            end_time: "18:00".to_string(),
            problem_with_machine: " spindle noise ".to_string(),
            ..IndentForm::default()
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 5).single().expect("valid time")
    }

    #[rstest]
    fn validate_builds_timestamps(form: IndentForm) {
        let submission = form.validate(noon()).expect("form is valid");
        assert_eq!(submission.time_stamp, "2025-03-01 12:00:05");
        assert_eq!(submission.task_start_date, "2025-03-01 09:30:00");
        assert_eq!(submission.task_ending_date, "2025-03-02 18:00:00");
        assert_eq!(submission.problem_with_machine, "spindle noise");
        assert_eq!(submission.department, "");

        let fields = submission.text_fields();
        assert_eq!(fields.len(), 14);
        assert!(fields.contains(&("enable_reminders", "false".to_string())));
    }

    #[rstest]
    #[case::machine(|f: &mut IndentForm| f.machine_name.clear(), ValidationError::MissingMachine)]
    #[case::serial(|f: &mut IndentForm| f.serial_no.clear(), ValidationError::MissingSerial)]
    #[case::given_by(|f: &mut IndentForm| f.given_by.clear(), ValidationError::MissingGivenBy)]
    #[case::doer(|f: &mut IndentForm| f.doer_name.clear(), ValidationError::MissingDoer)]
    #[case::start_time(|f: &mut IndentForm| f.start_time.clear(), ValidationError::MissingStart)]
    #[case::end_date(|f: &mut IndentForm| f.end_date.clear(), ValidationError::MissingEnd)]
    fn missing_required_fields(
        mut form: IndentForm,
        #[case] edit: fn(&mut IndentForm),
        #[case] expected: ValidationError,
    ) {
        edit(&mut form);
        assert_eq!(form.validate(noon()), Err(expected));
    }

    #[test]
    fn first_missing_field_wins() {
        let form = IndentForm::default();
        assert_eq!(form.validate(noon()), Err(ValidationError::MissingMachine));
    }

    #[test]
    fn serials_are_narrowed_by_machine() {
        let options: FormOptions = serde_json::from_value(json!({
            "success": true,
            "machines": ["CNC-2", "Lathe"],
            "serials": [
                {"machine_name": "CNC-2", "serial_no": "SN-204"},
                {"machine_name": "Lathe", "serial_no": "SN-11"},
                {"machine_name": "CNC-2", "serial_no": "SN-205"}
            ],
            "doerNames": ["Suresh"]
        }))
        .expect("options decode");

        assert_eq!(options.serials_for("CNC-2"), vec!["SN-204", "SN-205"]);
        assert!(options.serials_for("Press").is_empty());
        assert_eq!(options.doer_names, vec!["Suresh"]);
        assert!(options.departments.is_empty());
    }
}
