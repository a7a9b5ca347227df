//! In-process health tracker backend for tests
//!
//! Serves the same routes and status codes as the real backend from an
//! ephemeral port. `MockBehavior` switches on the misbehaviours the checks
//! are expected to detect.

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const RESOURCES: [&str; 3] = ["waters", "sleeps", "activities"];

/// Switchable server quirks
#[derive(Clone, Debug)]
pub struct MockBehavior {
    /// Status returned by every successful delete
    pub delete_status: StatusCode,
    /// Whether PATCH responses include the updated fields
    pub echo_updates: bool,
    /// Note returned by item updates instead of the submitted one
    pub item_note_override: Option<String>,
    pub issue_register_token: bool,
    pub accept_login: bool,
    pub reject_creates: bool,
    /// Resource lists come back empty even after a create
    pub hide_from_list: bool,
    /// Category item adds are refused; category creates still succeed
    pub reject_item_add: bool,
    pub healthy: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            delete_status: StatusCode::NO_CONTENT,
            echo_updates: true,
            item_note_override: None,
            issue_register_token: true,
            accept_login: true,
            reject_creates: false,
            hide_from_list: false,
            reject_item_add: false,
            healthy: true,
        }
    }
}

#[derive(Default)]
struct Store {
    users: HashMap<String, Map<String, Value>>,
    tokens: HashMap<String, String>,
    records: HashMap<String, BTreeMap<usize, Map<String, Value>>>,
    categories: BTreeMap<String, BTreeMap<usize, Map<String, Value>>>,
    next_id: usize,
    next_token: usize,
}

impl Store {
    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn issue_token(&mut self, name: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}-{}", name, self.next_token);
        self.tokens.insert(token.clone(), name.to_string());
        token
    }
}

struct Shared {
    behavior: MockBehavior,
    store: Mutex<Store>,
    requests: AtomicUsize,
}

type AppState = Arc<Shared>;

/// Running mock backend
pub struct MockBackend {
    addr: SocketAddr,
    shared: AppState,
}

impl MockBackend {
    /// Bind an ephemeral port and serve in the background
    pub async fn start(behavior: MockBehavior) -> Self {
        let shared = Arc::new(Shared {
            behavior,
            store: Mutex::new(Store::default()),
            requests: AtomicUsize::new(0),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(shared.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, shared }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.shared.requests.load(Ordering::SeqCst)
    }

    /// Register a user directly and hand back a valid token
    pub fn issue_token(&self, name: &str) -> String {
        let mut store = self.shared.store.lock().unwrap();
        store.users.insert(
            name.to_string(),
            profile(0, name, "pw", 30, 75.0, 1.8, "male"),
        );
        store.issue_token(name)
    }
}

fn router(shared: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user/profile", get(user_profile))
        .route("/user/bmi", get(user_bmi))
        .route("/category/list", get(list_categories))
        .route("/category/create", post(create_category))
        .route("/category/:cat/list", get(list_items))
        .route("/category/:cat/add", post(add_item))
        .route("/category/:cat/:item", patch(update_item).delete(delete_item));

    for resource in RESOURCES {
        app = app
            .route(
                &format!("/{resource}"),
                get(move |state: State<AppState>, headers: HeaderMap| {
                    list_records(state, headers, resource)
                })
                .post(
                    move |state: State<AppState>, headers: HeaderMap, body: Json<Value>| {
                        create_record(state, headers, resource, body)
                    },
                ),
            )
            .route(
                &format!("/{resource}/:id"),
                patch(
                    move |state: State<AppState>,
                          headers: HeaderMap,
                          id: Path<usize>,
                          body: Json<Value>| {
                        update_record(state, headers, resource, id, body)
                    },
                )
                .delete(
                    move |state: State<AppState>, headers: HeaderMap, id: Path<usize>| {
                        delete_record(state, headers, resource, id)
                    },
                ),
            );
    }

    app.layer(middleware::from_fn_with_state(shared.clone(), count_requests))
        .with_state(shared)
}

async fn count_requests(State(shared): State<AppState>, req: Request, next: Next) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errorMessage": message }))).into_response()
}

fn created(body: Value) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

fn profile(
    id: usize,
    name: &str,
    password: &str,
    age: u64,
    weight_kg: f64,
    height_m: f64,
    gender: &str,
) -> Map<String, Value> {
    let value = json!({
        "id": id.to_string(),
        "name": name,
        "password": password,
        "age": age,
        "weightKg": weight_kg,
        "heightM": height_m,
        "gender": gender,
    });
    value.as_object().cloned().unwrap_or_default()
}

/// Resolve the bearer token to a user name
fn authorize(shared: &Shared, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            error(
                StatusCode::UNAUTHORIZED,
                "Missing or invalid Authorization token",
            )
        })?;

    let store = shared.store.lock().unwrap();
    store
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

async fn health(State(shared): State<AppState>) -> Response {
    if shared.behavior.healthy {
        Json(json!({"status": "ok", "message": "health_backend server running"})).into_response()
    } else {
        error(StatusCode::SERVICE_UNAVAILABLE, "Backend is starting")
    }
}

async fn register(State(shared): State<AppState>, Json(body): Json<Value>) -> Response {
    if !shared.behavior.issue_register_token {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error when generating token",
        );
    }

    let fields = ["name", "password", "age", "weightKg", "heightM", "gender"];
    if fields.iter().any(|field| body.get(field).is_none()) {
        return error(StatusCode::BAD_REQUEST, "Missing or invalid fields");
    }

    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut store = shared.store.lock().unwrap();
    if store.users.contains_key(&name) {
        return error(StatusCode::CONFLICT, "User already exists");
    }

    let id = store.users.len() + 1;
    store.users.insert(
        name.clone(),
        profile(
            id,
            &name,
            body["password"].as_str().unwrap_or_default(),
            body["age"].as_u64().unwrap_or_default(),
            body["weightKg"].as_f64().unwrap_or_default(),
            body["heightM"].as_f64().unwrap_or_default(),
            body["gender"].as_str().unwrap_or_default(),
        ),
    );
    let token = store.issue_token(&name);
    created(json!({ "token": token }))
}

async fn login(State(shared): State<AppState>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let mut store = shared.store.lock().unwrap();
    let known = store
        .users
        .get(name)
        .is_some_and(|user| user.get("password").and_then(Value::as_str) == Some(password));

    if !shared.behavior.accept_login || !known {
        return error(StatusCode::UNAUTHORIZED, "Invalid name or password");
    }

    let token = store.issue_token(name);
    Json(json!({ "token": token })).into_response()
}

async fn user_profile(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    let name = match authorize(&shared, &headers) {
        Ok(name) => name,
        Err(response) => return response,
    };

    let store = shared.store.lock().unwrap();
    match store.users.get(&name) {
        Some(user) => {
            let mut user = user.clone();
            user.remove("password");
            Json(Value::Object(user)).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn user_bmi(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    let name = match authorize(&shared, &headers) {
        Ok(name) => name,
        Err(response) => return response,
    };

    let store = shared.store.lock().unwrap();
    let Some(user) = store.users.get(&name) else {
        return error(StatusCode::NOT_FOUND, "User not found");
    };
    let weight = user.get("weightKg").and_then(Value::as_f64).unwrap_or_default();
    let height = user.get("heightM").and_then(Value::as_f64).unwrap_or(1.0);
    Json(json!({ "bmi": weight / (height * height) })).into_response()
}

async fn create_record(
    State(shared): State<AppState>,
    headers: HeaderMap,
    resource: &'static str,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }
    if shared.behavior.reject_creates {
        return error(StatusCode::BAD_REQUEST, "Missing or invalid fields");
    }

    let mut store = shared.store.lock().unwrap();
    let id = store.allocate_id();
    let mut record = body.as_object().cloned().unwrap_or_default();
    record.insert("id".to_string(), json!(id.to_string()));
    store
        .records
        .entry(resource.to_string())
        .or_default()
        .insert(id, record.clone());
    created(Value::Object(record))
}

async fn list_records(
    State(shared): State<AppState>,
    headers: HeaderMap,
    resource: &'static str,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    if shared.behavior.hide_from_list {
        return Json(json!([])).into_response();
    }

    let store = shared.store.lock().unwrap();
    let records: Vec<Value> = store
        .records
        .get(resource)
        .map(|records| records.values().cloned().map(Value::Object).collect())
        .unwrap_or_default();
    Json(Value::Array(records)).into_response()
}

async fn update_record(
    State(shared): State<AppState>,
    headers: HeaderMap,
    resource: &'static str,
    Path(id): Path<usize>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let mut store = shared.store.lock().unwrap();
    let Some(record) = store
        .records
        .get_mut(resource)
        .and_then(|records| records.get_mut(&id))
    else {
        return error(StatusCode::NOT_FOUND, "Record not found");
    };

    if let Some(fields) = body.as_object() {
        record.extend(fields.clone());
    }

    if shared.behavior.echo_updates {
        Json(Value::Object(record.clone())).into_response()
    } else {
        Json(json!({ "id": id.to_string(), "datetime": record.get("datetime") })).into_response()
    }
}

async fn delete_record(
    State(shared): State<AppState>,
    headers: HeaderMap,
    resource: &'static str,
    Path(id): Path<usize>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let mut store = shared.store.lock().unwrap();
    let removed = store
        .records
        .get_mut(resource)
        .and_then(|records| records.remove(&id));
    match removed {
        Some(_) => shared.behavior.delete_status.into_response(),
        None => error(StatusCode::NOT_FOUND, "Record not found"),
    }
}

async fn list_categories(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let store = shared.store.lock().unwrap();
    let categories: Vec<Value> = store
        .categories
        .keys()
        .map(|name| json!({ "id": name, "categoryName": name }))
        .collect();
    Json(Value::Array(categories)).into_response()
}

async fn create_category(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }
    if shared.behavior.reject_creates {
        return error(StatusCode::BAD_REQUEST, "Missing categoryName");
    }

    let Some(name) = body.get("categoryName").and_then(Value::as_str) else {
        return error(StatusCode::BAD_REQUEST, "Missing categoryName");
    };

    let mut store = shared.store.lock().unwrap();
    store.categories.entry(name.to_string()).or_default();
    created(json!({ "id": name, "categoryName": name }))
}

async fn list_items(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Path(cat): Path<String>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let store = shared.store.lock().unwrap();
    match store.categories.get(&cat) {
        Some(items) => {
            let items: Vec<Value> = items.values().cloned().map(Value::Object).collect();
            Json(Value::Array(items)).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Category not found"),
    }
}

async fn add_item(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Path(cat): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    if shared.behavior.reject_item_add {
        return error(StatusCode::BAD_REQUEST, "Missing or invalid fields");
    }

    let mut store = shared.store.lock().unwrap();
    if !store.categories.contains_key(&cat) {
        return error(StatusCode::NOT_FOUND, "Category not found");
    }

    let id = store.allocate_id();
    let item = json!({
        "id": id.to_string(),
        "categoryId": cat,
        "datetime": body.get("datetime"),
        "note": body.get("note"),
    });
    let item = item.as_object().cloned().unwrap_or_default();
    if let Some(items) = store.categories.get_mut(&cat) {
        items.insert(id, item.clone());
    }
    created(Value::Object(item))
}

async fn update_item(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Path((cat, item)): Path<(String, usize)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let mut store = shared.store.lock().unwrap();
    let Some(record) = store
        .categories
        .get_mut(&cat)
        .and_then(|items| items.get_mut(&item))
    else {
        return error(StatusCode::NOT_FOUND, "Category or item not found");
    };

    if let Some(note) = body.get("note") {
        record.insert("note".to_string(), note.clone());
    }

    let mut response = record.clone();
    if let Some(note) = &shared.behavior.item_note_override {
        response.insert("note".to_string(), json!(note));
    }
    Json(Value::Object(response)).into_response()
}

async fn delete_item(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Path((cat, item)): Path<(String, usize)>,
) -> Response {
    if let Err(response) = authorize(&shared, &headers) {
        return response;
    }

    let mut store = shared.store.lock().unwrap();
    let removed = store
        .categories
        .get_mut(&cat)
        .and_then(|items| items.remove(&item));
    match removed {
        Some(_) => shared.behavior.delete_status.into_response(),
        None => error(StatusCode::NOT_FOUND, "Category or item not found"),
    }
}
