use std::io;
use std::path::Path;

use repair_desk_rs::indent::IndentForm;
use repair_desk_rs::{Attachment, DeskConfig, ReconcileForm, RepairDesk};

use crate::render;

pub struct REPL {
    pub desk: RepairDesk,
    pub selected: Option<String>,
}

impl REPL {
    pub fn new(desk: RepairDesk) -> Self {
        Self {
            desk,
            selected: None,
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.desk.config.base_url);
        self.load();
        loop {
            render::prompt("> ");
            let Some(line) = read_line() else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            render::info("unknown input, type /help");
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "login" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next()) {
                    (Some(user), Some(pass)) => match self.desk.login(user, pass) {
                        Ok(user) => {
                            render::info(&format!("logged in as {} ({})", user.name, user.role))
                        }
                        Err(err) => render::error(&err.to_string()),
                    },
                    _ => render::error("usage: /login <user> <password>"),
                }
            }
            "logout" => {
                self.desk.logout();
                render::info("logged out");
            }
            "whoami" => render::user(self.desk.user().as_ref()),
            "load" => self.load(),
            "pending" => render::pending(&self.desk.visible().pending),
            "history" => render::history(&self.desk.visible().history),
            "select" => self.select(rest),
            "show" => {
                let task_no = if rest.is_empty() {
                    self.selected.clone().unwrap_or_default()
                } else {
                    rest.to_string()
                };
                match self.desk.task(&task_no) {
                    Some(task) => render::task(&task),
                    None => render::error("no such task"),
                }
            }
            "preview" => match &self.selected {
                Some(task_no) => render::preview(self.desk.preview(task_no, rest)),
                None => render::error("select a pending task first"),
            },
            "submit" => self.submit(),
            "options" => match self.desk.form_options() {
                Ok(options) => render::options(&options),
                Err(err) => render::error(&format!("Error fetching form options: {}", err)),
            },
            "indent" => self.indent(),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.desk.config.base_url));
                } else {
                    let config = DeskConfig {
                        base_url: rest.to_string(),
                        ..self.desk.config.clone()
                    };
                    match RepairDesk::new(config) {
                        Ok(desk) => {
                            self.desk = desk;
                            self.selected = None;
                            render::info("base url updated, log in again and /load");
                        }
                        Err(err) => render::error(&err.to_string()),
                    }
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn load(&self) {
        match self.desk.load_all() {
            Ok(_) => {
                let visible = self.desk.visible();
                render::info(&format!(
                    "Pending ({})  History ({})",
                    visible.pending.len(),
                    visible.history.len()
                ));
            }
            Err(err) => render::error(&format!("Error fetching tasks: {}", err)),
        }
    }

    fn select(&mut self, task_no: &str) {
        match self.desk.task(task_no) {
            Some(task) if task.is_pending() => {
                render::task(&task);
                self.selected = Some(task.task_no);
            }
            Some(_) => render::error("task is not pending"),
            None => render::error("no such task, try /load"),
        }
    }

    fn submit(&mut self) {
        let Some(task_no) = self.selected.clone() else {
            render::error("select a pending task first");
            return;
        };
        render::bill_types();
        let Some(form) = self.ask_reconcile_form(&task_no) else {
            render::info("cancelled");
            return;
        };
        match self.desk.submit(&task_no, &form) {
            Ok(outcome) => {
                render::outcome(&outcome);
                self.selected = None;
            }
            Err(err) => render::error(&err.to_string()),
        }
    }

    fn ask_reconcile_form(&self, task_no: &str) -> Option<ReconcileForm> {
        let transporter_name = ask("Transporter Name: ")?;
        let transportation_amount = ask("Transportation Amount: ")?;
        let bill_no = ask("Bill No.: ")?;
        let type_of_bill = ask("Type of Bill: ")?;
        let total_bill_amount = ask("Total Bill Amount: ")?;
        render::preview(self.desk.preview(task_no, &total_bill_amount));
        let bill_image = ask_attachment("Bill Image path (blank for none): ")?;
        Some(ReconcileForm {
            transporter_name,
            transportation_amount,
            bill_no,
            type_of_bill,
            total_bill_amount,
            bill_image,
        })
    }

    fn indent(&self) {
        let options = match self.desk.form_options() {
            Ok(options) => options,
            Err(err) => {
                render::error(&format!("Error fetching form options: {}", err));
                return;
            }
        };
        let Some(form) = ask_indent_form(&options) else {
            render::info("cancelled");
            return;
        };
        match self.desk.create_indent(&form) {
            Ok(message) => render::info(
                message
                    .as_deref()
                    .unwrap_or("Repair Task Created Successfully!"),
            ),
            Err(err) => render::error(&err.to_string()),
        }
    }
}

fn ask_indent_form(options: &repair_desk_rs::indent::FormOptions) -> Option<IndentForm> {
    let machines: Vec<&str> = options.machines.iter().map(String::as_str).collect();
    render::choices("machines", &machines);
    let machine_name = ask("Machine Name: ")?;
    render::choices("serials", &options.serials_for(&machine_name));
    let serial_no = ask("Serial No: ")?;
    let given_by_list: Vec<&str> = options.given_by.iter().map(String::as_str).collect();
    render::choices("given by", &given_by_list);
    let given_by = ask("Given By: ")?;
    let doers: Vec<&str> = options.doer_names.iter().map(String::as_str).collect();
    render::choices("doers", &doers);
    let doer_name = ask("Doer Name: ")?;
    let start_date = ask("Task Start Date (YYYY-MM-DD): ")?;
    let start_time = ask("Task Start Time (HH:MM): ")?;
    let end_date = ask("Task End Date (YYYY-MM-DD): ")?;
    let end_time = ask("Task End Time (HH:MM): ")?;
    let problem_with_machine = ask("Problem in Machine: ")?;
    let departments: Vec<&str> = options.departments.iter().map(String::as_str).collect();
    render::choices("departments", &departments);
    let department = ask("Department: ")?;
    let location = ask("Location: ")?;
    let machine_part_name = ask("Machine Part Name: ")?;
    let priorities: Vec<&str> = options.priority.iter().map(String::as_str).collect();
    render::choices("priority", &priorities);
    let priority = ask("Priority: ")?;
    let enable_reminders = parse_yes_no(&ask("Enable reminders? [y/N]: ")?).unwrap_or(false);
    let require_attachment =
        parse_yes_no(&ask("Require attachment? [y/N]: ")?).unwrap_or(false);
    let image = ask_attachment("Image path (blank for none): ")?;
    Some(IndentForm {
        machine_name,
        serial_no,
        given_by,
        doer_name,
        start_date,
        start_time,
        end_date,
        end_time,
        problem_with_machine,
        department,
        location,
        machine_part_name,
        priority,
        enable_reminders,
        require_attachment,
        image,
    })
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// `None` on end of input or when the operator types `/cancel`.
fn ask(label: &str) -> Option<String> {
    render::prompt(label);
    read_line().filter(|line| line != "/cancel")
}

/// Reprompts until the path is blank or readable.
fn ask_attachment(label: &str) -> Option<Option<Attachment>> {
    loop {
        let raw = ask(label)?;
        if raw.is_empty() {
            return Some(None);
        }
        match Attachment::from_path(Path::new(&raw)) {
            Ok(file) => return Some(Some(file)),
            Err(err) => render::error(&format!("cannot read {}: {}", raw, err)),
        }
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Some(true),
        "n" | "no" | "false" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}
