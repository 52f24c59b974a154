//! WebSocket transport for the signaling router
//!
//! Each socket gets a connection id, a writer task that turns outbound
//! [`ServerMessage`]s into JSON text frames (plus periodic pings), and a
//! reader loop that parses inbound frames and hands them to the router.
//! When the reader ends for any reason the router is told the connection
//! is gone.

use crate::config::SignalingConfig;
use crate::metrics::DropReason;
use crate::signaling::{ClientMessage, ConnectionId, ServerMessage};
use crate::web::SharedState;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Handle a signaling WebSocket connection until it closes
pub async fn handle_signaling_connection(socket: WebSocket, state: Arc<SharedState>) {
    let id = ConnectionId::new();
    let config = state.config.signaling.clone();

    let outbound = match state.router.connect(id) {
        Ok(rx) => rx,
        Err(e) => {
            error!("Rejecting connection {}: {}", id, e);
            return;
        }
    };
    info!("New signaling connection {}", id);

    let (ws_sender, mut ws_receiver) = socket.split();
    let send_task = tokio::spawn(write_loop(ws_sender, outbound, config.clone(), id));

    loop {
        let next = match time::timeout(config.idle_timeout(), ws_receiver.next()).await {
            Ok(next) => next,
            Err(_) => {
                info!("Connection {} idle for {}s, closing", id, config.idle_timeout_secs);
                break;
            }
        };

        match next {
            Some(Ok(Message::Text(text))) => {
                let text_str: &str = text.as_str();
                match ClientMessage::from_json(text_str) {
                    Ok(message) => {
                        if state.router.message(id, message).is_err() {
                            error!("Signaling router closed, dropping connection {}", id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Invalid signaling message from {}: {}", id, e);
                        state.metrics.record_drop(DropReason::Malformed);
                    }
                }
            }
            Some(Ok(Message::Binary(_))) => {
                debug!("Ignoring binary frame from {}", id);
            }
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
            Some(Ok(Message::Close(_))) => {
                debug!("Connection {} sent close", id);
                break;
            }
            Some(Err(e)) => {
                warn!("WebSocket error on {}: {}", id, e);
                break;
            }
            None => break,
        }
    }

    if state.router.disconnect(id).is_err() {
        debug!("Signaling router already stopped");
    }

    // The router drops our outbound sender on disconnect, which lets the
    // writer flush and send a close frame
    let abort = send_task.abort_handle();
    if time::timeout(CLOSE_GRACE, send_task).await.is_err() {
        debug!("Writer for {} did not finish, aborting", id);
        abort.abort();
    }

    info!("Signaling connection {} finished", id);
}

async fn write_loop(
    mut ws_sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
    config: SignalingConfig,
    id: ConnectionId,
) {
    let mut ping = time::interval(config.ping_interval());
    // First tick fires immediately
    ping.tick().await;

    loop {
        tokio::select! {
            message = outbound.recv() => {
                let Some(message) = message else { break };
                let text = match message.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode {} for {}: {}", message.event(), id, e);
                        continue;
                    }
                };
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if ws_sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = ws_sender.close().await;
}
