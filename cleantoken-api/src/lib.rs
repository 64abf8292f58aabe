use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cleantoken_forecast::Forecaster;
use cleantoken_ledger::{Ledger, LedgerError};
use cleantoken_policy::IncentivePolicy;
use cleantoken_types::{ForecastMethod, ForecastResult, PerkCatalog, Transaction};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared service state. The ledger sits behind a mutex so every
/// mint/redeem is one critical section: the balance check and the
/// debit can never interleave with another request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
    pub forecaster: Forecaster,
    pub policy: IncentivePolicy,
    pub catalog: Arc<PerkCatalog>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new())),
            forecaster: Forecaster::default(),
            policy: IncentivePolicy::default(),
            catalog: Arc::new(PerkCatalog::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/wallet", get(get_wallet))
        .route("/transactions", get(get_transactions))
        .route("/forecast", post(post_forecast))
        .route("/mint", post(post_mint))
        .route("/redeem", post(post_redeem))
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state).layer(CorsLayer::permissive());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> &'static str {
    "CleanToken Core API v0.1"
}

#[derive(Serialize)]
struct WalletView {
    balance: u64,
}

async fn get_wallet(State(state): State<AppState>) -> Json<WalletView> {
    let ledger = state.ledger.lock().await;
    Json(WalletView {
        balance: ledger.balance(),
    })
}

async fn get_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.transactions().to_vec())
}

#[derive(Deserialize)]
struct ForecastRequest {
    values: Vec<f64>,
}

async fn post_forecast(
    State(state): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<ForecastResult>, (StatusCode, String)> {
    state
        .forecaster
        .predict(&req.values)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(Deserialize)]
struct MintRequest {
    action: String,
    impact: f64,
    /// Explicit multiplier wins; otherwise the policy is applied to
    /// `forecast_value` when supplied, and 1.0 when it is not.
    multiplier: Option<f64>,
    forecast_value: Option<f64>,
}

async fn post_mint(
    State(state): State<AppState>,
    Json(req): Json<MintRequest>,
) -> Result<Json<Transaction>, (StatusCode, String)> {
    let multiplier = req.multiplier.unwrap_or_else(|| match req.forecast_value {
        Some(value) => state.policy.multiplier(&ForecastResult {
            value,
            method: ForecastMethod::Model,
        }),
        None => 1.0,
    });

    let mut ledger = state.ledger.lock().await;
    ledger
        .mint(&req.action, req.impact, multiplier)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(Deserialize)]
struct RedeemRequest {
    name: String,
}

#[derive(Serialize)]
struct RedeemResponse {
    redeemed: String,
    cost: u64,
    balance: u64,
}

async fn post_redeem(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, (StatusCode, String)> {
    let Some(perk) = state.catalog.get(&req.name) else {
        return Err((StatusCode::NOT_FOUND, format!("unknown perk: {}", req.name)));
    };

    let mut ledger = state.ledger.lock().await;
    match ledger.redeem(&perk) {
        Ok(()) => Ok(Json(RedeemResponse {
            redeemed: perk.name,
            cost: perk.cost,
            balance: ledger.balance(),
        })),
        Err(err @ LedgerError::InsufficientBalance { .. }) => {
            Err((StatusCode::PAYMENT_REQUIRED, err.to_string()))
        }
        Err(err) => Err((StatusCode::BAD_REQUEST, err.to_string())),
    }
}
