//! In-process stand-in for the repair API, served by axum on an ephemeral port.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    Ok,
    Envelope,
    BadGateway,
}

#[derive(Debug)]
pub struct StubState {
    pub tasks: Vec<Value>,
    pub list_mode: ListMode,
    pub upload_ok: bool,
    pub uploads: Vec<(String, usize)>,
    pub updates: Vec<(String, Value)>,
    pub indents: Vec<HashMap<String, String>>,
    pub indent_files: Vec<String>,
}

impl StubState {
    pub fn with_tasks(tasks: Vec<Value>) -> Self {
        Self {
            tasks,
            list_mode: ListMode::Ok,
            upload_ok: true,
            uploads: Vec::new(),
            updates: Vec::new(),
            indents: Vec::new(),
            indent_files: Vec::new(),
        }
    }
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct StubServer {
    pub base_url: String,
    pub state: Shared,
}

impl StubServer {
    pub fn start(state: StubState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/repair-check/all", get(list_tasks))
            .route("/api/repair-check/upload-bill", post(upload_bill))
            .route("/api/repair-check/update/:task_no", put(update_task))
            .route("/api/repair-options/form-options", get(form_options))
            .route("/api/repair/create", post(create_indent))
            .route("/api/auth/login", post(login))
            .with_state(Arc::clone(&state));

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(async move {
                let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
                    .serve(app.into_make_service());
                tx.send(server.local_addr()).expect("report stub address");
                server.await.expect("stub server");
            });
        });
        let addr = rx.recv().expect("stub server started");
        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state")
    }
}

/// A base URL nothing listens on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("ephemeral address");
    drop(listener);
    format!("http://{}/api", addr)
}

async fn list_tasks(State(state): State<Shared>) -> (StatusCode, String) {
    let state = state.lock().expect("stub state");
    match state.list_mode {
        ListMode::Ok => (
            StatusCode::OK,
            json!({"success": true, "tasks": state.tasks}).to_string(),
        ),
        ListMode::Envelope => (StatusCode::OK, json!({"success": false}).to_string()),
        ListMode::BadGateway => (StatusCode::BAD_GATEWAY, "upstream down".to_string()),
    }
}

async fn upload_bill(State(state): State<Shared>, mut multipart: Multipart) -> Json<Value> {
    let mut stored = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        stored = Some((file_name, size));
    }
    let mut state = state.lock().expect("stub state");
    match stored {
        Some((file_name, size)) if state.upload_ok => {
            let url = format!("https://bucket.test/bills/{}", file_name);
            state.uploads.push((file_name, size));
            Json(json!({"success": true, "url": url}))
        }
        _ => Json(json!({"success": false})),
    }
}

async fn update_task(
    State(state): State<Shared>,
    Path(task_no): Path<String>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("stub state");
    let Some(task) = state
        .tasks
        .iter_mut()
        .find(|t| t["task_no"].as_str() == Some(task_no.as_str()))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Task not found"})),
        );
    };
    task["actual_2"] = json!("2025-01-05 11:00:00");
    task["bill_no"] = payload["billNo"].clone();
    task["type_of_bill"] = payload["typeOfBill"].clone();
    task["total_bill_amount"] = payload["totalBillAmount"].clone();
    task["to_be_paid_amount"] = payload["toBePaidAmount"].clone();
    task["bill_image"] = payload["billImage"].clone();
    task["transporter_name_2"] = payload["transporterName"].clone();
    state.updates.push((task_no, payload));
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn form_options() -> Json<Value> {
    Json(json!({
        "success": true,
        "machines": ["CNC-2", "Lathe"],
        "serials": [
            {"machine_name": "CNC-2", "serial_no": "SN-204"},
            {"machine_name": "Lathe", "serial_no": "SN-11"}
        ],
        "doerNames": ["Suresh"],
        "givenBy": ["Plant Head"],
        "priority": ["High", "Low"],
        "departments": ["Maintenance"]
    }))
}

async fn create_indent(State(state): State<Shared>, mut multipart: Multipart) -> Json<Value> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name() {
            files.push(format!("{}:{}", name, file_name));
            continue;
        }
        if let Ok(text) = field.text().await {
            fields.insert(name, text);
        }
    }
    let mut state = state.lock().expect("stub state");
    state.indents.push(fields);
    state.indent_files.extend(files);
    Json(json!({"success": true, "message": "Repair task created"}))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret" {
        let name = body["username"].as_str().unwrap_or_default().to_string();
        let role = if name == "asha" { "admin" } else { "user" };
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user": {"id": 7, "name": name, "role": role, "access": ["check-machine"]}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid credentials"})),
        )
    }
}
