//! Portal server binary.
//!
//! Boots the event broadcaster and room manager, wires the HTTP and
//! WebSocket surfaces onto them, and serves the portal API.
//!
//! The realtime gateway channel is registered on the broadcaster before the
//! listener starts accepting traffic, so no published event can miss the
//! bridge to connected clients.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use tol_portal::adapters::auth::{JwtConfig, JwtTokenVerifier};
use tol_portal::adapters::crm::InMemoryCustomerRepository;
use tol_portal::adapters::http::middleware::{
    activity_log, auth_middleware, record_on_success, ActivityLogState, AuthState, RecordSpec,
    RecordState,
};
use tol_portal::adapters::http::{
    customer_routes, notification_routes, CustomersAppState, NotificationsAppState,
};
use tol_portal::adapters::websocket::{
    live_routes, EventBridge, RoomManager, WebSocketState, BRIDGE_CHANNEL,
};
use tol_portal::adapters::Broadcaster;
use tol_portal::config::{AppConfig, ServerConfig};
use tol_portal::domain::foundation::{ChannelId, Role};
use tol_portal::domain::notify::EventKind;
use tol_portal::ports::{CustomerRepository, EventSubscriber, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .init();

    config.validate()?;
    info!(
        environment = ?config.server.environment,
        "configuration loaded"
    );

    // Core event plumbing. The bridge is the broadcaster's only standing
    // channel; HTTP recording middleware publishes through the same
    // broadcaster, so everything funnels into one history window.
    let broadcaster = Arc::new(Broadcaster::new(config.notify.history_capacity));
    let rooms = Arc::new(RoomManager::new(config.notify.client_buffer));
    let bridge = EventBridge::new_shared(rooms.clone());
    broadcaster
        .subscribe(ChannelId::new(BRIDGE_CHANNEL)?, bridge)
        .await;
    info!(
        history_capacity = config.notify.history_capacity,
        client_buffer = config.notify.client_buffer,
        "event broadcaster online"
    );

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtTokenVerifier::new(JwtConfig::new(
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.secret.expose_secret().as_str(),
    )));
    let repository: Arc<dyn CustomerRepository> = Arc::new(InMemoryCustomerRepository::new());

    let notifications = NotificationsAppState {
        publisher: broadcaster.clone(),
        subscriber: broadcaster.clone(),
    };
    let customers = CustomersAppState {
        repository: repository.clone(),
    };
    let websocket = WebSocketState::new(
        rooms.clone(),
        verifier.clone(),
        broadcaster.clone(),
        config.notify.backfill_limit,
    );
    let health = HealthState {
        broadcaster: broadcaster.clone(),
        rooms: rooms.clone(),
    };

    // Customer mutations record a staff-targeted crm-update; every
    // successful /api exchange records an admin-facing activity-update.
    let crm_recorder = RecordState::new(
        broadcaster.clone(),
        RecordSpec::new(EventKind::CrmUpdate).target_roles([Role::Admin, Role::Agent]),
    );
    let activity = ActivityLogState::new(broadcaster.clone());
    let auth_state: AuthState = verifier.clone();

    let api = Router::new()
        .nest(
            "/notifications",
            notification_routes().with_state(notifications),
        )
        .nest(
            "/customers",
            customer_routes()
                .with_state(customers)
                .layer(middleware::from_fn_with_state(
                    crm_recorder,
                    record_on_success,
                )),
        )
        .merge(live_routes().with_state(websocket))
        .layer(middleware::from_fn_with_state(activity, activity_log))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let app = Router::new()
        .nest("/api", api)
        .route("/health", get(health_check).with_state(health))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    info!(%addr, "portal listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// State for the health endpoint.
#[derive(Clone)]
struct HealthState {
    broadcaster: Arc<Broadcaster>,
    rooms: Arc<RoomManager>,
}

/// GET /health
///
/// Liveness probe with a view of the broadcast plumbing: how many channels
/// are registered and how many WebSocket clients are connected.
async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "channels": state.broadcaster.channel_count().await,
        "clients": state.rooms.client_count().await,
    }))
}

/// Time-ordered request correlation ids, so access logs sort chronologically.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the CORS layer from configured origins.
///
/// With no origins configured the layer is permissive, which suits local
/// development; deployments set `TOL_PORTAL__SERVER__CORS_ORIGINS`.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
