//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscription commands and forwarding filtered events.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{ActivityEvent, SubjectId, UserId};
use crate::service::EventReader;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and answers each one. Subscriptions are
///   checked against the entities `user_id` owns at the time of the command.
/// - Forwards events for followed subjects from the [`broadcast::Receiver`].
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<ActivityEvent>,
    reader: Arc<EventReader>,
    user_id: UserId,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let owned = owned_subjects(&reader, &user_id).await;
                        let response = handle_text_message(&text, &mut subs, &owned);
                        if let Ok(json) = serde_json::to_string(&response)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !subs.matches(&event.subject_id) {
                            continue;
                        }
                        let Some(json) = event_message(&event) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(%user_id, "ws connection closed");
}

/// Subjects `user_id` owns right now. A failed lookup owns nothing.
async fn owned_subjects(reader: &EventReader, user_id: &UserId) -> HashSet<SubjectId> {
    match reader.owned_subject_ids(user_id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "owned entity lookup failed");
            HashSet::new()
        }
    }
}

/// Wraps a recorded event in an `event` envelope.
fn event_message(event: &ActivityEvent) -> Option<String> {
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Handles a text message from the client and builds the reply.
fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    owned: &HashSet<SubjectId>,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error("", 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }

    match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(WsCommand::Subscribe { subject_ids }) => {
            let outcome = subs.subscribe(&subject_ids, owned);
            tracing::debug!(
                added = outcome.added.len(),
                rejected = outcome.rejected.len(),
                "ws subscribe"
            );
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": outcome.added,
                    "rejected": outcome.rejected,
                    "count": subs.count(),
                }),
            )
        }
        Ok(WsCommand::Unsubscribe { subject_ids }) => {
            let removed = subs.unsubscribe(&subject_ids);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": removed,
                    "remaining_count": subs.count(),
                }),
            )
        }
        Err(_) => WsMessage::error(msg.id, 404, "unknown command"),
    }
}
