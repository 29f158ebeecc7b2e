use std::{
    collections::HashMap,
    io::ErrorKind,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, OnceLock},
    time::{Duration, Instant},
};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{info, warn};

use webtherm_common::{Controller, ControllerConfig, Mode, SettingsStore, ThermostatSettings};

use crate::{
    page,
    sim::{RelayPin, SimulatedSensor},
    storage::EepromFile,
};

/// Loop pass period. Sampling and decision cadences are gated inside the
/// controller; the pass itself just has to be fast.
const LOOP_PASS_MS: u64 = 10;

const SIMULATED_ROOM_F: f32 = 71.0;

#[derive(Clone)]
struct AppState {
    controller: Arc<Mutex<Controller>>,
    store: Arc<Mutex<SettingsStore<EepromFile>>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir = std::env::var("WEBTHERM_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./.webtherm"));

    let config = load_controller_config(data_dir.join("config.json"))
        .await
        .unwrap_or_else(|err| {
            warn!("failed to load controller config: {err:#}");
            ControllerConfig::default()
        });

    let medium =
        EepromFile::open(data_dir.join("eeprom.bin")).context("failed to open settings image")?;
    let mut store = SettingsStore::new(medium);

    let settings = match store.load().context("failed to read settings image")? {
        Some(settings) => {
            info!(
                setpoint = settings.setpoint_f,
                power = settings.power_on,
                mode = settings.mode.as_str(),
                "loaded persisted settings"
            );
            settings
        }
        None => {
            info!("no persisted settings, using compiled-in defaults");
            ThermostatSettings::default()
        }
    };

    let app_state = AppState {
        controller: Arc::new(Mutex::new(Controller::new(config, settings))),
        store: Arc::new(Mutex::new(store)),
    };

    spawn_control_loop(app_state.clone());

    let app = Router::new()
        .route("/", get(handle_home))
        .route("/settings", get(handle_settings_page))
        .route("/api/status", get(handle_get_status))
        .route("/api/setpoint/up", post(handle_setpoint_up))
        .route("/api/setpoint/down", post(handle_setpoint_down))
        .route("/api/power", post(handle_set_power))
        .route("/api/mode", post(handle_set_mode))
        .route("/api/settings/save", post(handle_save))
        .route("/api/settings/erase", post(handle_erase))
        .fallback(handle_not_found)
        .with_state(app_state);

    let port = std::env::var("CONTROLLER_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse().unwrap();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind controller server at {addr}"))?;

    info!("controller listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn load_controller_config(path: PathBuf) -> anyhow::Result<ControllerConfig> {
    match tokio::fs::read(&path).await {
        Ok(raw) => Ok(serde_json::from_slice::<ControllerConfig>(&raw)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ControllerConfig::default()),
        Err(err) => Err(err.into()),
    }
}

/// The request handlers and this loop share one lock, so a settings
/// mutation lands strictly between ticks, never inside one.
fn spawn_control_loop(app_state: AppState) {
    tokio::spawn(async move {
        let mut sensor = SimulatedSensor::new(SIMULATED_ROOM_F);
        let mut relay = RelayPin;
        let mut interval = tokio::time::interval(Duration::from_millis(LOOP_PASS_MS));

        loop {
            interval.tick().await;
            let now_ms = monotonic_ms();
            let mut controller = app_state.controller.lock().await;
            controller.tick(&mut sensor, &mut relay, now_ms);
        }
    });
}

async fn handle_home(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.controller.lock().await.status();
    Html(page::home(&status))
}

async fn handle_settings_page() -> impl IntoResponse {
    Html(page::settings())
}

async fn handle_get_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.controller.lock().await.status();
    Json(status)
}

async fn handle_setpoint_up(State(state): State<AppState>) -> impl IntoResponse {
    let setpoint = state.controller.lock().await.setpoint_up();
    info!(setpoint, "setpoint raised");
    Redirect::to("/")
}

async fn handle_setpoint_down(State(state): State<AppState>) -> impl IntoResponse {
    let setpoint = state.controller.lock().await.setpoint_down();
    info!(setpoint, "setpoint lowered");
    Redirect::to("/")
}

async fn handle_set_power(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let Some(value) = params.get("value") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'value' parameter");
    };

    let on = match value.to_ascii_lowercase().as_str() {
        "on" => true,
        "off" => false,
        _ => return error_response(StatusCode::BAD_REQUEST, "Invalid power value. Use 'on' or 'off'"),
    };

    if state.controller.lock().await.set_power(on) {
        info!(on, "power switched");
    }
    Redirect::to("/").into_response()
}

async fn handle_set_mode(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let Some(value) = params.get("value") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'value' parameter");
    };

    let mode = match value.to_ascii_uppercase().as_str() {
        "HEAT" => Mode::Heat,
        "COOL" => Mode::Cool,
        _ => return error_response(StatusCode::BAD_REQUEST, "Invalid mode. Use 'heat' or 'cool'"),
    };

    if state.controller.lock().await.set_mode(mode) {
        info!(mode = mode.as_str(), "mode switched");
    }
    Redirect::to("/").into_response()
}

async fn handle_save(State(state): State<AppState>) -> impl IntoResponse {
    let settings = *state.controller.lock().await.settings();

    match state.store.lock().await.save(&settings) {
        Ok(report) => {
            if report.any_written() {
                info!(?report, "settings persisted");
            }
            Html(page::save_report(&report)).into_response()
        }
        Err(err) => {
            warn!("failed to persist settings: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist settings")
        }
    }
}

async fn handle_erase(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(err) = state.store.lock().await.erase() {
        warn!("failed to erase settings: {err}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to erase settings");
    }
    Redirect::to("/").into_response()
}

async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn monotonic_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START
        .get_or_init(Instant::now)
        .elapsed()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}
