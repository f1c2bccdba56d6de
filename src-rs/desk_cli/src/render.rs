use std::io::{self, Write};

use repair_desk_rs::indent::FormOptions;
use repair_desk_rs::{BillType, RepairTask, SubmitOutcome, SubmitWarning, User};

pub fn banner(base_url: &str) {
    println!("Repair Desk");
    println!("API: {}", base_url);
    println!("Type /help for commands.");
}

pub fn prompt(label: &str) {
    print!("{}", label);
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /login <user> <pass>   Log in");
    println!("  /logout                Log out");
    println!("  /whoami                Show the logged-in user");
    println!("  /load                  Reload tasks from the API");
    println!("  /pending               List tasks awaiting a bill");
    println!("  /history               List reconciled tasks");
    println!("  /select <task_no>      Select a pending task");
    println!("  /show [task_no]        Show a task in full");
    println!("  /preview <total>       Amount to be paid for the selected task");
    println!("  /submit                Reconcile the selected task");
    println!("  /options               Show indent form options");
    println!("  /indent                Raise a new repair indent");
    println!("  /base <url>            Update base URL");
}

fn dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

pub fn amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("₹{:.2}", v),
        None => "-".to_string(),
    }
}

pub fn pending(tasks: &[RepairTask]) {
    if tasks.is_empty() {
        println!("no pending tasks");
        return;
    }
    println!("Pending ({})", tasks.len());
    for task in tasks {
        println!(
            "[{}] {} sn={} planned={} indenter={} vendor={} payment={} advance={}",
            task.task_no,
            dash(task.machine_name.as_deref()),
            dash(task.serial_no.as_deref()),
            dash(task.planned_2.as_deref()),
            dash(task.name_of_indenter.as_deref()),
            dash(task.vendor_name.as_deref()),
            dash(task.payment_type.as_ref().map(|p| p.as_str())),
            amount(task.how_much),
        );
    }
}

pub fn history(tasks: &[RepairTask]) {
    if tasks.is_empty() {
        println!("no history");
        return;
    }
    println!("History ({})", tasks.len());
    for task in tasks {
        println!(
            "[{}] {} bill={} type={} total={} to_be_paid={} transporter={} image={}",
            task.task_no,
            dash(task.machine_name.as_deref()),
            dash(task.bill_no.as_deref()),
            dash(task.type_of_bill.as_deref()),
            amount(task.total_bill_amount),
            amount(task.to_be_paid_amount),
            dash(task.transporter_name_2.as_deref()),
            dash(task.bill_image.as_deref()),
        );
    }
}

pub fn task(task: &RepairTask) {
    println!("task {}", task.task_no);
    println!("  machine:      {}", dash(task.machine_name.as_deref()));
    println!("  serial:       {}", dash(task.serial_no.as_deref()));
    println!("  indenter:     {}", dash(task.name_of_indenter.as_deref()));
    println!("  doer:         {}", dash(task.doer_name.as_deref()));
    println!("  vendor:       {}", dash(task.vendor_name.as_deref()));
    println!("  lead time:    {}", dash(task.lead_time_to_deliver_days.as_deref()));
    println!("  planned 2:    {}", dash(task.planned_2.as_deref()));
    println!("  actual 2:     {}", dash(task.actual_2.as_deref()));
    println!(
        "  payment:      {}",
        dash(task.payment_type.as_ref().map(|p| p.as_str()))
    );
    if task.is_advance() {
        println!("  advance:      {}", amount(task.how_much));
    }
    if task.is_history() {
        println!(
            "  bill:         {} ({})",
            dash(task.bill_no.as_deref()),
            dash(task.type_of_bill.as_deref())
        );
        println!("  total:        {}", amount(task.total_bill_amount));
        println!("  to be paid:   {}", amount(task.to_be_paid_amount));
        println!("  transporter:  {}", dash(task.transporter_name_2.as_deref()));
        println!("  freight:      {}", amount(task.transportation_charges));
        println!("  image:        {}", dash(task.bill_image.as_deref()));
    }
}

pub fn preview(value: Option<f64>) {
    match value {
        Some(v) => println!("to be paid: {:.2}", v),
        None => println!("to be paid: (empty)"),
    }
}

pub fn bill_types() {
    let labels: Vec<&str> = BillType::ALL.iter().map(|b| b.as_str()).collect();
    println!("bill types: {}", labels.join(", "));
}

pub fn outcome(outcome: &SubmitOutcome) {
    println!(
        "Task {} updated successfully, to be paid {:.2}",
        outcome.task.task_no, outcome.to_be_paid_amount
    );
    for warning in &outcome.warnings {
        match warning {
            SubmitWarning::Upload(err) => println!("warning: {} (submitted without image)", err),
            SubmitWarning::Refresh(err) => println!("warning: task list not refreshed: {}", err),
        }
    }
}

pub fn options(options: &FormOptions) {
    println!("machines:    {}", options.machines.join(", "));
    println!("doers:       {}", options.doer_names.join(", "));
    println!("given by:    {}", options.given_by.join(", "));
    println!("priority:    {}", options.priority.join(", "));
    println!("departments: {}", options.departments.join(", "));
}

pub fn choices(label: &str, values: &[&str]) {
    if !values.is_empty() {
        println!("{}: {}", label, values.join(", "));
    }
}

pub fn user(user: Option<&User>) {
    match user {
        Some(user) => println!(
            "{} (id {}, role {}, access: {})",
            user.name,
            user.id,
            user.role,
            user.access.join(", ")
        ),
        None => println!("not logged in"),
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
