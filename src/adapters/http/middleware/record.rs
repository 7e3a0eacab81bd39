//! Event-recording middleware for axum.
//!
//! This module turns completed HTTP exchanges into portal events without
//! touching the wrapped handlers:
//!
//! - `record_on_success` - publishes one event of a configured kind after the
//!   wrapped route completes with a success status (used for `crm-update`)
//! - `activity_log` - publishes an `activity-update` event for every
//!   successful exchange, capturing the acting user
//!
//! # Architecture
//!
//! Recording is an explicit middleware stage layered onto the router; the
//! wrapped handler's response is never altered, and a non-success status
//! publishes nothing.
//!
//! ```text
//! Request → handler → Response ──status ok?──▶ RecordSpec::evaluate → publish
//!                        │
//!                        └──────────────────▶ returned unchanged either way
//! ```
//!
//! Handlers may attach an [`EventDetail`] response extension to enrich the
//! recorded payload (for example the id of the customer that was created).

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{AuthenticatedUser, Role, UserId};
use crate::domain::notify::{Event, EventKind};
use crate::ports::EventPublisher;

/// Extra payload data a handler attaches to its response for the recorder.
///
/// Inserted into response extensions; the recording middleware folds it into
/// the published event's payload under `"detail"`.
#[derive(Debug, Clone)]
pub struct EventDetail(pub JsonValue);

/// Attaches an [`EventDetail`] to a response.
pub fn with_event_detail(mut response: Response, detail: JsonValue) -> Response {
    response.extensions_mut().insert(EventDetail(detail));
    response
}

/// What the recorder saw of a completed exchange.
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    /// Acting user, if the auth middleware identified one.
    pub actor: Option<AuthenticatedUser>,
    /// Handler-supplied detail, if any.
    pub detail: Option<JsonValue>,
}

/// Payload and targeting for an event about to be published.
///
/// Returned by a [`RecordSpec`] projection. Targets left empty fall back to
/// the spec's defaults; both empty means a global broadcast.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub payload: JsonValue,
    pub target_user_ids: Vec<UserId>,
    pub target_roles: Vec<Role>,
}

impl EventDraft {
    pub fn new(payload: JsonValue) -> Self {
        Self {
            payload,
            target_user_ids: Vec::new(),
            target_roles: Vec::new(),
        }
    }

    pub fn for_users(mut self, user_ids: impl IntoIterator<Item = UserId>) -> Self {
        self.target_user_ids = user_ids.into_iter().collect();
        self
    }

    pub fn for_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.target_roles = roles.into_iter().collect();
        self
    }
}

type SuccessPredicate = Box<dyn Fn(StatusCode) -> bool + Send + Sync>;
type Projection = Box<dyn Fn(&RecordContext) -> Option<EventDraft> + Send + Sync>;

/// Describes the event a route family records on success.
///
/// # Example
///
/// ```ignore
/// let spec = RecordSpec::new(EventKind::CrmUpdate)
///     .target_roles([Role::Admin, Role::Agent])
///     .project(|ctx| {
///         Some(EventDraft::new(serde_json::json!({
///             "path": ctx.path,
///             "status": ctx.status.as_u16(),
///         })))
///     });
/// ```
pub struct RecordSpec {
    kind: EventKind,
    success: SuccessPredicate,
    project: Projection,
    target_roles: Vec<Role>,
}

impl RecordSpec {
    /// Creates a spec for the given event kind.
    ///
    /// Defaults: success is any 2xx status, the projection captures
    /// method/path/status plus any [`EventDetail`], and the event is a
    /// global broadcast.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            success: Box::new(|status| status.is_success()),
            project: Box::new(default_projection),
            target_roles: Vec::new(),
        }
    }

    /// Overrides the success predicate.
    pub fn success_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(StatusCode) -> bool + Send + Sync + 'static,
    {
        self.success = Box::new(predicate);
        self
    }

    /// Overrides the payload projection. Returning `None` suppresses
    /// publication for that exchange.
    pub fn project<F>(mut self, projection: F) -> Self
    where
        F: Fn(&RecordContext) -> Option<EventDraft> + Send + Sync + 'static,
    {
        self.project = Box::new(projection);
        self
    }

    /// Sets default target roles for recorded events.
    pub fn target_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.target_roles = roles.into_iter().collect();
        self
    }

    /// Returns the event this spec records for a completed exchange, if any.
    ///
    /// `None` when the status is outside the success range or the projection
    /// declined.
    pub fn evaluate(&self, ctx: &RecordContext) -> Option<Event> {
        if !(self.success)(ctx.status) {
            return None;
        }
        let draft = (self.project)(ctx)?;

        let mut event = Event::new(self.kind, draft.payload);
        if !draft.target_user_ids.is_empty() {
            event = event.for_users(draft.target_user_ids);
        }
        let roles = if draft.target_roles.is_empty() {
            self.target_roles.clone()
        } else {
            draft.target_roles
        };
        if !roles.is_empty() {
            event = event.for_roles(roles);
        }
        if let Some(actor) = &ctx.actor {
            event = event.with_origin(actor.id.clone(), actor.role);
        }
        Some(event)
    }
}

impl std::fmt::Debug for RecordSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSpec")
            .field("kind", &self.kind)
            .field("target_roles", &self.target_roles)
            .finish_non_exhaustive()
    }
}

fn default_projection(ctx: &RecordContext) -> Option<EventDraft> {
    Some(EventDraft::new(exchange_payload(ctx, false)))
}

/// Full request path, unaffected by router nesting.
fn request_path(request: &Request) -> String {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Base payload for recorded exchanges. With `with_actor`, the acting
/// user's id and role are included in the payload itself.
fn exchange_payload(ctx: &RecordContext, with_actor: bool) -> JsonValue {
    let mut payload = serde_json::Map::new();
    payload.insert("method".to_string(), ctx.method.as_str().into());
    payload.insert("path".to_string(), ctx.path.clone().into());
    payload.insert("status".to_string(), ctx.status.as_u16().into());
    if with_actor {
        if let Some(actor) = &ctx.actor {
            payload.insert("actor_id".to_string(), actor.id.as_str().into());
            payload.insert("actor_role".to_string(), actor.role.as_str().into());
        }
    }
    if let Some(detail) = &ctx.detail {
        payload.insert("detail".to_string(), detail.clone());
    }
    JsonValue::Object(payload)
}

/// State for [`record_on_success`].
#[derive(Clone)]
pub struct RecordState {
    publisher: Arc<dyn EventPublisher>,
    spec: Arc<RecordSpec>,
}

impl RecordState {
    pub fn new(publisher: Arc<dyn EventPublisher>, spec: RecordSpec) -> Self {
        Self {
            publisher,
            spec: Arc::new(spec),
        }
    }
}

/// Middleware that publishes the spec's event after a successful exchange.
///
/// Use with `middleware::from_fn_with_state`:
///
/// ```ignore
/// let state = RecordState::new(publisher, RecordSpec::new(EventKind::CrmUpdate));
/// router.layer(middleware::from_fn_with_state(state, record_on_success))
/// ```
pub async fn record_on_success(
    State(state): State<RecordState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request_path(&request);
    let actor = request.extensions().get::<AuthenticatedUser>().cloned();

    let response = next.run(request).await;

    let ctx = RecordContext {
        method,
        path,
        status: response.status(),
        actor,
        detail: response
            .extensions()
            .get::<EventDetail>()
            .map(|d| d.0.clone()),
    };

    if let Some(event) = state.spec.evaluate(&ctx) {
        tracing::debug!(
            event_id = %event.id,
            kind = %event.kind,
            path = %ctx.path,
            "recording event for completed exchange"
        );
        state.publisher.publish(event).await;
    }

    response
}

/// State for [`activity_log`].
#[derive(Clone)]
pub struct ActivityLogState {
    publisher: Arc<dyn EventPublisher>,
    spec: Arc<RecordSpec>,
}

impl ActivityLogState {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        // Activity events feed the admin dashboard; payload carries the
        // actor explicitly so the feed survives origin-field filtering.
        let spec = RecordSpec::new(EventKind::ActivityUpdate)
            .target_roles([Role::Admin])
            .project(|ctx| Some(EventDraft::new(exchange_payload(ctx, true))));
        Self {
            publisher,
            spec: Arc::new(spec),
        }
    }
}

/// Middleware that records an `activity-update` event for every successful
/// exchange on the wrapped routes.
pub async fn activity_log(
    State(state): State<ActivityLogState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request_path(&request);
    let actor = request.extensions().get::<AuthenticatedUser>().cloned();

    let response = next.run(request).await;

    let ctx = RecordContext {
        method,
        path,
        status: response.status(),
        actor,
        detail: response
            .extensions()
            .get::<EventDetail>()
            .map(|d| d.0.clone()),
    };

    if let Some(event) = state.spec.evaluate(&ctx) {
        tracing::debug!(
            event_id = %event.id,
            path = %ctx.path,
            status = ctx.status.as_u16(),
            "recording activity"
        );
        state.publisher.publish(event).await;
    }

    response
}
