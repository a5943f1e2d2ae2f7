use crate::game::engine::Engine;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Pumps one socket: connecting queues the join, text frames queue inputs,
/// and a paired task forwards engine broadcasts back out. The engine never
/// sees the socket itself, only the session's channel.
pub async fn handle_socket(socket: WebSocket, engine: Arc<Engine>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let session_id = engine.add_session(tx).await;

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                engine.handle_message(session_id, &text).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    engine.remove_session(session_id).await;
    send_task.abort();
}
