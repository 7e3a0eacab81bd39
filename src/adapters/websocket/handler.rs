//! WebSocket upgrade handler for the live event feed.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Verify the token passed as a query parameter
//! 2. Upgrade to WebSocket
//! 3. Join the client's user, role and broadcast rooms
//! 4. Send the connected frame, then backfill recent events
//! 5. Relay queued events until disconnect
//! 6. Clean up room membership

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};
use crate::domain::notify::Membership;
use crate::ports::{EventSubscriber, TokenVerifier};

use super::messages::{ClientMessage, ConnectedMessage, PongMessage, ServerMessage};
use super::rooms::RoomManager;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    /// Room manager for identity-based routing.
    pub rooms: Arc<RoomManager>,
    /// Token verifier for the query-parameter token.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Source of the recent-event backfill.
    pub subscriber: Arc<dyn EventSubscriber>,
    /// Maximum number of history events replayed to a new connection.
    pub backfill_limit: usize,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(
        rooms: Arc<RoomManager>,
        verifier: Arc<dyn TokenVerifier>,
        subscriber: Arc<dyn EventSubscriber>,
        backfill_limit: usize,
    ) -> Self {
        Self {
            rooms,
            verifier,
            subscriber,
            backfill_limit,
        }
    }
}

/// Query parameters for the live endpoint.
///
/// Browsers cannot set headers on WebSocket upgrades, so the token rides
/// in the query string.
#[derive(Debug, Deserialize)]
pub struct LiveParams {
    pub token: String,
}

/// Handle WebSocket upgrade requests for the live event feed.
///
/// Route: `GET /api/live?token=<jwt>`
///
/// The token is verified before the upgrade; an invalid token never
/// reaches the socket stage.
pub async fn ws_handler(
    Query(params): Query<LiveParams>,
    State(state): State<WebSocketState>,
    ws: WebSocketUpgrade,
) -> Response {
    let user = match state.verifier.verify(&params.token).await {
        Ok(user) => user,
        Err(err) => return auth_failure_response(&err),
    };

    tracing::debug!(user_id = %user.id, role = %user.role, "live connection authenticated");

    ws.on_upgrade(move |socket| handle_socket(socket, user, state))
}

/// Build the HTTP response for a failed pre-upgrade token check.
fn auth_failure_response(err: &AuthError) -> Response {
    let (status, message) = match err {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::UnknownRole(_) => (StatusCode::UNAUTHORIZED, "Unknown role in token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
        _ => (StatusCode::UNAUTHORIZED, "Authentication failed"),
    };

    (
        status,
        Json(serde_json::json!({
            "error": message,
            "code": "AUTH_ERROR"
        })),
    )
        .into_response()
}

/// Handle an established WebSocket connection.
///
/// This function runs for the lifetime of the connection, handling:
/// - Joining the client's rooms
/// - Sending the connected frame and the recent-event backfill
/// - Relaying queued events to the client
/// - Responding to client pings
/// - Cleanup on disconnect
async fn handle_socket(socket: WebSocket, user: AuthenticatedUser, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let (client_id, mut queue) = state.rooms.connect(&user.id, user.role).await;

    let connected = ServerMessage::Connected(ConnectedMessage {
        client_id: client_id.to_string(),
        user_id: user.id.to_string(),
        role: user.role,
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
    });

    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!(client_id = %client_id, "failed to send connected frame: {}", e);
        state.rooms.disconnect(&client_id).await;
        return;
    }

    // Replay the recent history this client is allowed to see. Events
    // published during the replay are already queued behind it, so the
    // client observes history before live traffic.
    let membership = Membership::of_user(user.id.clone(), user.role);
    for event in state.subscriber.recent_events(state.backfill_limit).await {
        if !event.delivery().matches(&membership) {
            continue;
        }
        if let Err(e) = send_message(&mut sender, &ServerMessage::from(event)).await {
            tracing::debug!(client_id = %client_id, "failed to send backfill frame: {}", e);
            state.rooms.disconnect(&client_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            queued = queue.recv() => {
                match queued {
                    Some(message) => {
                        if let Err(e) = send_message(&mut sender, &message).await {
                            tracing::debug!(
                                client_id = %client_id,
                                "send error, closing connection: {}",
                                e
                            );
                            break;
                        }
                    }
                    // Manager dropped the queue; connection is stale.
                    None => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Ping) => {
                                let pong = ServerMessage::Pong(PongMessage {
                                    timestamp: Timestamp::now().as_datetime().to_rfc3339(),
                                });
                                if send_message(&mut sender, &pong).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => {
                                tracing::trace!(
                                    client_id = %client_id,
                                    "ignoring unrecognized client message"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(
                            client_id = %client_id,
                            "received unsupported binary message"
                        );
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        // WebSocket protocol frames - handled automatically by axum
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::debug!(client_id = %client_id, "client sent close frame");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(client_id = %client_id, "receive error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    state.rooms.disconnect(&client_id).await;
    tracing::debug!(client_id = %client_id, user_id = %user.id, "live connection closed");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).expect("ServerMessage serialization should not fail");
    sender.send(Message::Text(json)).await
}

/// Create the axum router for the live endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", live_routes())
///     .with_state(ws_state);
/// ```
pub fn live_routes() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/live", get(ws_handler))
}
