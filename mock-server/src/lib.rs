use std::{collections::HashMap, sync::Arc, time::Instant};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-key";

/// VPS seeded into every fresh store.
pub const SEEDED_VPS_ID: &str = "1";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: String,
    pub created_at: String,
    pub description: String,
    pub id: i64,
    pub method_id: i64,
    pub service_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub plan_name: String,
    pub active: bool,
    pub created_at: String,
    pub payed_to: String,
    pub ip: String,
    pub name: String,
    pub node_id: i64,
    pub service_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdosAttack {
    pub id: i64,
    pub ip: String,
    pub started_at: i64,
    pub ended_at: i64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortRange {
    pub from: u16,
    pub to: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UdpFilterException {
    pub id: i64,
    pub ports: Vec<PortRange>,
    pub protocol: String,
    pub state: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub amount: String,
    pub redirect_url: Option<String>,
    pub webhook_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsQuery {
    pub limit: Option<usize>,
    pub before_id: Option<i64>,
    pub after_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFiltering {
    pub filtering_enabled: bool,
}

#[derive(Deserialize)]
pub struct NewException {
    pub ports: Vec<PortRange>,
    pub protocol: String,
}

pub struct Vps {
    pub service: Service,
    pub started_at: Option<Instant>,
    pub filtering_enabled: bool,
    pub exceptions: Vec<UdpFilterException>,
    pub attacks: Vec<DdosAttack>,
}

pub struct Store {
    pub balance_pln_int: i64,
    pub history: Vec<Payment>,
    /// Amount in grosze of each created payment, keyed by payment id.
    pub pending: HashMap<String, i64>,
    pub vps: HashMap<String, Vps>,
    pub next_exception_id: i64,
}

impl Store {
    /// A wallet with five past top-ups and a single stopped VPS.
    pub fn seeded() -> Self {
        let history = (1..=5)
            .map(|id| Payment {
                amount: format!("{id}.00"),
                created_at: format!("2021-03-0{id}T12:00:00.000Z"),
                description: "Wallet top-up".to_string(),
                id,
                method_id: 1,
                service_id: 0,
            })
            .collect();
        let vps = Vps {
            service: Service {
                id: 1,
                plan_name: "VPS Ryzen S".to_string(),
                active: true,
                created_at: "2021-01-01T00:00:00.000Z".to_string(),
                payed_to: "2021-02-01T00:00:00.000Z".to_string(),
                ip: "51.83.0.1".to_string(),
                name: "game server".to_string(),
                node_id: 3,
                service_id: 10,
            },
            started_at: None,
            filtering_enabled: false,
            exceptions: Vec::new(),
            attacks: vec![DdosAttack {
                id: 1,
                ip: "51.83.0.1".to_string(),
                started_at: 1_614_556_800,
                ended_at: 1_614_557_400,
            }],
        };
        Self {
            balance_pln_int: 1500,
            history,
            pending: HashMap::new(),
            vps: HashMap::from([(SEEDED_VPS_ID.to_string(), vps)]),
            next_exception_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

type ApiResult<T> = Result<T, (StatusCode, &'static str)>;

const SERVICE_NOT_FOUND: (StatusCode, &str) = (StatusCode::NOT_FOUND, "service not found");

/// Router serving the lvlup v4 API under `/v4`, accepting only `Bearer {api_key}`.
pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Store::seeded())),
    };
    let api = Router::new()
        .route("/wallet", get(wallet_balance))
        .route("/wallet/up", post(create_payment))
        .route("/wallet/up/{id}", get(inspect_payment))
        .route("/payments", get(list_payments))
        .route("/services", get(list_services))
        .route("/services/vps/{id}/attacks", get(list_attacks))
        .route(
            "/services/vps/{id}/filtering",
            get(get_filtering).put(set_filtering),
        )
        .route(
            "/services/vps/{id}/filtering/whitelist",
            get(list_exceptions).post(add_exception),
        )
        .route(
            "/services/vps/{id}/filtering/whitelist/{exception_id}",
            delete(remove_exception),
        )
        .route("/services/vps/{id}/proxmo", post(proxmo_user))
        .route("/services/vps/{id}/start", post(start_vps))
        .route("/services/vps/{id}/stop", post(stop_vps))
        .route("/services/vps/{id}/state", get(vps_state))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);
    Router::new().nest("/v4", api)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let expected = format!("Bearer {}", state.api_key);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented != Some(expected.as_str()) {
        tracing::debug!(path = %request.uri().path(), "rejected request without valid bearer token");
        return Err((StatusCode::UNAUTHORIZED, "invalid api key"));
    }
    Ok(next.run(request).await)
}

async fn wallet_balance(State(state): State<AppState>) -> Json<serde_json::Value> {
    let balance = state.db.read().await.balance_pln_int;
    Json(serde_json::json!({
        "balancePlnFormatted": format!("{},{:02}", balance / 100, balance % 100),
        "balancePlnInt": balance,
    }))
}

async fn create_payment(
    State(state): State<AppState>,
    Json(input): Json<CreatePayment>,
) -> ApiResult<Json<serde_json::Value>> {
    let amount_int = parse_amount(&input.amount).ok_or((StatusCode::BAD_REQUEST, "invalid amount"))?;
    let id = Uuid::new_v4().simple().to_string();
    let url = format!("https://lvlup.pro/pay/{id}");
    tracing::info!(
        %id,
        amount_int,
        redirect_url = ?input.redirect_url,
        webhook_url = ?input.webhook_url,
        "created payment"
    );
    state.db.write().await.pending.insert(id.clone(), amount_int);
    Ok(Json(serde_json::json!({ "id": id, "url": url })))
}

/// Grosze from a decimal PLN string with at most two fraction digits.
fn parse_amount(amount: &str) -> Option<i64> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, "0"));
    if fraction.is_empty() || fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = format!("{fraction:0<2}").parse().ok()?;
    let total = whole.checked_mul(100)?.checked_add(fraction)?;
    (whole >= 0 && total > 0).then_some(total)
}

fn format_amount(grosze: i64) -> String {
    format!("{}.{:02}", grosze / 100, grosze % 100)
}

async fn inspect_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.db.read().await;
    let amount_int = *store
        .pending
        .get(&id)
        .ok_or((StatusCode::NOT_FOUND, "payment not found"))?;
    let with_fee = amount_int + amount_int * 3 / 100;
    // Nothing settles payments here, so they stay unpaid.
    Ok(Json(serde_json::json!({
        "amountInt": amount_int,
        "amountStr": format_amount(amount_int),
        "amountWithFeeInt": with_fee,
        "amountWithFeeStr": format_amount(with_fee),
        "payed": false,
    })))
}

async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
) -> Json<serde_json::Value> {
    let store = state.db.read().await;
    let items: Vec<Payment> = store
        .history
        .iter()
        .filter(|p| query.before_id.map_or(true, |before| p.id < before))
        .filter(|p| query.after_id.map_or(true, |after| p.id > after))
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(serde_json::json!({ "count": items.len(), "items": items }))
}

async fn list_services(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.db.read().await;
    let mut services: Vec<Service> = store.vps.values().map(|vps| vps.service.clone()).collect();
    services.sort_by_key(|service| service.id);
    Json(serde_json::json!({ "services": services }))
}

async fn list_attacks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.db.read().await;
    let vps = store.vps.get(&id).ok_or(SERVICE_NOT_FOUND)?;
    Ok(Json(serde_json::json!({
        "count": vps.attacks.len(),
        "items": vps.attacks,
    })))
}

fn filter_state(vps: &Vps) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "filteringEnabled": vps.filtering_enabled,
        "state": "ok",
    }))
}

async fn get_filtering(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.db.read().await;
    let vps = store.vps.get(&id).ok_or(SERVICE_NOT_FOUND)?;
    Ok(filter_state(vps))
}

async fn set_filtering(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetFiltering>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut store = state.db.write().await;
    let vps = store.vps.get_mut(&id).ok_or(SERVICE_NOT_FOUND)?;
    vps.filtering_enabled = input.filtering_enabled;
    Ok(filter_state(vps))
}

async fn list_exceptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UdpFilterException>>> {
    let store = state.db.read().await;
    let vps = store.vps.get(&id).ok_or(SERVICE_NOT_FOUND)?;
    Ok(Json(vps.exceptions.clone()))
}

async fn add_exception(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewException>,
) -> ApiResult<StatusCode> {
    if input.ports.is_empty() || input.ports.iter().any(|range| range.from > range.to) {
        return Err((StatusCode::BAD_REQUEST, "invalid port range"));
    }
    let mut store = state.db.write().await;
    let exception_id = store.next_exception_id;
    let vps = store.vps.get_mut(&id).ok_or(SERVICE_NOT_FOUND)?;
    vps.exceptions.push(UdpFilterException {
        id: exception_id,
        ports: input.ports,
        protocol: input.protocol,
        state: "ok".to_string(),
    });
    store.next_exception_id += 1;
    Ok(StatusCode::OK)
}

async fn remove_exception(
    State(state): State<AppState>,
    Path((id, exception_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    let vps = store.vps.get_mut(&id).ok_or(SERVICE_NOT_FOUND)?;
    let before = vps.exceptions.len();
    vps.exceptions.retain(|exception| exception.id != exception_id);
    if vps.exceptions.len() == before {
        return Err((StatusCode::NOT_FOUND, "exception not found"));
    }
    Ok(StatusCode::OK)
}

async fn proxmo_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.db.read().await;
    store.vps.get(&id).ok_or(SERVICE_NOT_FOUND)?;
    let mut password = Uuid::new_v4().simple().to_string();
    password.truncate(16);
    Ok(Json(serde_json::json!({
        "password": password,
        "url": "https://proxmox.lvlup.pro",
        "username": format!("vps{id}@pve"),
    })))
}

async fn start_vps(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    let vps = store.vps.get_mut(&id).ok_or(SERVICE_NOT_FOUND)?;
    vps.started_at.get_or_insert_with(Instant::now);
    Ok(StatusCode::OK)
}

async fn stop_vps(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = state.db.write().await;
    let vps = store.vps.get_mut(&id).ok_or(SERVICE_NOT_FOUND)?;
    vps.started_at = None;
    Ok(StatusCode::OK)
}

async fn vps_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.db.read().await;
    let vps = store.vps.get(&id).ok_or(SERVICE_NOT_FOUND)?;
    let (status, uptime) = match vps.started_at {
        Some(started) => ("running", started.elapsed().as_secs()),
        None => ("stopped", 0),
    };
    Ok(Json(serde_json::json!({ "status": status, "vmUptimeS": uptime })))
}
