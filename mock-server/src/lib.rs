//! In-memory stand-in for the Onfleet `/api/v2/` surface.
//!
//! Stores documents as JSON keyed by generated ids and answers failures with
//! the provider's error envelope. Geocoding is a substring search over a
//! small fixed gazetteer, so an address that matches several entries yields
//! the ambiguous-destination error with an `Options = [...]` cause.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const ORGANIZATION_ID: &str = "org-mock-0001";

const GAZETTEER: &[(&str, [f64; 2])] = &[
    ("1252 Howard St, San Francisco, CA", [-122.4108, 37.7749]),
    ("73 Sumner St, San Francisco, CA", [-122.4101, 37.7768]),
    ("123 Main St, Springfield", [-89.6501, 39.7817]),
    ("123 Main St, Shelbyville", [-88.7889, 39.4064]),
    ("456 Oak Ave, Springfield", [-89.6442, 39.7990]),
];

type Store = Arc<RwLock<HashMap<String, Value>>>;

#[derive(Clone, Default)]
pub struct Db {
    workers: Store,
    tasks: Store,
    recipients: Store,
    destinations: Store,
    admins: Store,
}

/// Error envelope in the provider's wire shape.
#[derive(Debug)]
pub struct ProviderError {
    status: StatusCode,
    code: &'static str,
    error: u32,
    message: String,
    cause: Value,
}

impl ProviderError {
    fn invalid_argument(cause: Value) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "InvalidArgument",
            error: 1000,
            message: "The values of one or more parameters are invalid.".to_string(),
            cause,
        }
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "ResourceNotFound",
            error: 1402,
            message: format!("The requested {kind} was not found."),
            cause: json!({"id": id}),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "InvalidCredentials",
            error: 1102,
            message: "The API key is invalid or missing.".to_string(),
            cause: Value::Null,
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    code: &'a str,
    message: EnvelopeDetail<'a>,
}

#[derive(Debug, Serialize)]
struct EnvelopeDetail<'a> {
    error: u32,
    message: &'a str,
    cause: &'a Value,
}

impl ProviderError {
    fn envelope(&self) -> Envelope<'_> {
        Envelope {
            code: self.code,
            message: EnvelopeDetail {
                error: self.error,
                message: &self.message,
                cause: &self.cause,
            },
        }
    }
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope())).into_response()
    }
}

type ApiResult<T> = Result<T, ProviderError>;

pub fn app() -> Router {
    Router::new()
        .route("/api/v2/organization", get(get_organization))
        .route("/api/v2/workers", get(list_workers).post(create_worker))
        .route(
            "/api/v2/workers/{id}",
            get(get_worker).put(update_worker).delete(delete_worker),
        )
        .route("/api/v2/admins", get(list_admins).post(create_admin))
        .route("/api/v2/recipients", post(create_recipient))
        .route("/api/v2/recipients/{id}", get(get_recipient))
        .route("/api/v2/destinations", post(create_destination))
        .route("/api/v2/destinations/{id}", get(get_destination))
        .route("/api/v2/tasks", post(create_task))
        .route("/api/v2/tasks/{id}", get(get_task).delete(delete_task))
        .with_state(Db::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock provider listening");
    }
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> ApiResult<()> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if authorized {
        Ok(())
    } else {
        warn!("rejected request without credentials");
        Err(ProviderError::unauthorized())
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn required_strings(body: &Value, keys: &[&str]) -> ApiResult<()> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !body.get(*key).is_some_and(Value::is_string))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::invalid_argument(
            json!({"missingProperties": missing}),
        ))
    }
}

async fn fetch(store: &Store, kind: &str, id: &str) -> ApiResult<Value> {
    store
        .read()
        .await
        .get(id)
        .cloned()
        .ok_or_else(|| ProviderError::not_found(kind, id))
}

async fn insert(store: &Store, mut doc: Map<String, Value>) -> Value {
    let id = new_id();
    doc.insert("id".to_string(), json!(id));
    let doc = Value::Object(doc);
    store.write().await.insert(id, doc.clone());
    doc
}

// --- organization ---

async fn get_organization(headers: HeaderMap) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    Ok(Json(json!({
        "id": ORGANIZATION_ID,
        "name": "Mock Deliveries",
        "email": "ops@mock.example",
        "country": "US",
        "timezone": "America/Los_Angeles",
        "delegatees": [],
        "timeCreated": 1_455_072_025_000i64
    })))
}

// --- workers ---

async fn list_workers(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Value>>> {
    authorize(&headers)?;
    Ok(Json(db.workers.read().await.values().cloned().collect()))
}

async fn create_worker(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    required_strings(&input, &["name", "phone"])?;
    let mut doc = Map::new();
    doc.insert("organization".to_string(), json!(ORGANIZATION_ID));
    doc.insert("name".to_string(), input["name"].clone());
    doc.insert("phone".to_string(), input["phone"].clone());
    doc.insert("teams".to_string(), input.get("team_ids").cloned().unwrap_or_else(|| json!([])));
    doc.insert("tasks".to_string(), input.get("tasks").cloned().unwrap_or_else(|| json!([])));
    doc.insert("vehicle".to_string(), input.get("vehicle").cloned().unwrap_or(Value::Null));
    doc.insert("onDuty".to_string(), json!(false));
    Ok(Json(insert(&db.workers, doc).await))
}

async fn get_worker(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    fetch(&db.workers, "worker", &id).await.map(Json)
}

async fn update_worker(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    let mut workers = db.workers.write().await;
    let worker = workers
        .get_mut(&id)
        .ok_or_else(|| ProviderError::not_found("worker", &id))?;
    for key in ["name", "phone", "vehicle", "tasks"] {
        if let Some(value) = input.get(key) {
            worker[key] = value.clone();
        }
    }
    if let Some(teams) = input.get("team_ids") {
        worker["teams"] = teams.clone();
    }
    Ok(Json(worker.clone()))
}

async fn delete_worker(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    authorize(&headers)?;
    db.workers
        .write()
        .await
        .remove(&id)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| ProviderError::not_found("worker", &id))
}

// --- admins ---

async fn list_admins(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Value>>> {
    authorize(&headers)?;
    Ok(Json(db.admins.read().await.values().cloned().collect()))
}

async fn create_admin(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    required_strings(&input, &["name", "email"])?;
    let mut doc = input.as_object().cloned().unwrap_or_default();
    doc.insert("type".to_string(), json!("standard"));
    doc.insert("isActive".to_string(), json!(false));
    Ok(Json(insert(&db.admins, doc).await))
}

// --- recipients ---

async fn store_recipient(db: &Db, input: &Value) -> ApiResult<Value> {
    required_strings(input, &["name", "phone"])?;
    let doc = input.as_object().cloned().unwrap_or_default();
    Ok(insert(&db.recipients, doc).await)
}

async fn create_recipient(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    store_recipient(&db, &input).await.map(Json)
}

async fn get_recipient(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    fetch(&db.recipients, "recipient", &id).await.map(Json)
}

// --- destinations ---

/// Resolve an address document against the gazetteer.
fn geocode(address: &Value) -> ApiResult<(String, [f64; 2])> {
    let query = match address.get("unparsed").and_then(Value::as_str) {
        Some(unparsed) => unparsed.to_string(),
        None => ["number", "street", "city"]
            .iter()
            .filter_map(|key| address.get(*key).and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(" "),
    };
    let needle = query.to_lowercase();
    let matches: Vec<&(&str, [f64; 2])> = GAZETTEER
        .iter()
        .filter(|(place, _)| !needle.is_empty() && place.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => Err(ProviderError::invalid_argument(json!("Geocoding failed entirely"))),
        [(place, location)] => Ok((place.to_string(), *location)),
        many => {
            let options: Vec<&str> = many.iter().map(|(place, _)| *place).collect();
            let cause = format!(
                "Multiple destinations found for {query:?}. Options = {}",
                json!(options)
            );
            Err(ProviderError::invalid_argument(json!(cause)))
        }
    }
}

async fn store_destination(db: &Db, input: &Value) -> ApiResult<Value> {
    let address = input
        .get("address")
        .ok_or_else(|| ProviderError::invalid_argument(json!({"missingProperties": ["address"]})))?;
    let (resolved, location) = geocode(address)?;
    let mut address = address.as_object().cloned().unwrap_or_default();
    address.insert("unparsed".to_string(), json!(resolved));

    let mut doc = Map::new();
    doc.insert("address".to_string(), Value::Object(address));
    doc.insert("location".to_string(), json!(location));
    doc.insert("notes".to_string(), input.get("notes").cloned().unwrap_or(json!("")));
    Ok(insert(&db.destinations, doc).await)
}

async fn create_destination(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    store_destination(&db, &input).await.map(Json)
}

async fn get_destination(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    fetch(&db.destinations, "destination", &id).await.map(Json)
}

// --- tasks ---

async fn create_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    let destination = match input.get("destination") {
        Some(Value::String(id)) => fetch(&db.destinations, "destination", id).await?,
        Some(inline @ Value::Object(_)) => store_destination(&db, inline).await?,
        _ => {
            return Err(ProviderError::invalid_argument(
                json!({"missingProperties": ["destination"]}),
            ))
        }
    };

    let mut recipients = Vec::new();
    for recipient in input["recipients"].as_array().into_iter().flatten() {
        let stored = match recipient {
            Value::String(id) => fetch(&db.recipients, "recipient", id).await?,
            inline => store_recipient(&db, inline).await?,
        };
        recipients.push(stored);
    }

    let mut doc = Map::new();
    doc.insert("merchant".to_string(), input["merchant"].clone());
    doc.insert("executor".to_string(), input["executor"].clone());
    doc.insert("state".to_string(), json!(0));
    doc.insert("worker".to_string(), Value::Null);
    doc.insert("destination".to_string(), destination);
    doc.insert("recipients".to_string(), json!(recipients));
    for key in ["notes", "pickupTask", "dependencies", "completeAfter", "completeBefore"] {
        if let Some(value) = input.get(key) {
            doc.insert(key.to_string(), value.clone());
        }
    }
    let mut task = insert(&db.tasks, doc).await;
    if let Some(id) = task["id"].as_str().map(str::to_string) {
        let short_id: String = id.chars().take(8).collect();
        task["shortId"] = json!(short_id);
        db.tasks.write().await.insert(id, task.clone());
    }
    Ok(Json(task))
}

async fn get_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    authorize(&headers)?;
    fetch(&db.tasks, "task", &id).await.map(Json)
}

async fn delete_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    authorize(&headers)?;
    db.tasks
        .write()
        .await
        .remove(&id)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| ProviderError::not_found("task", &id))
}
