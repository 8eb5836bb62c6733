// Connection runtime - owns the coordinator WebSocket on a background thread
// Bridges the async socket with the synchronous frame loop via channels

use anyhow::{anyhow, Result};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::client::{NetworkCommand, NetworkEvent};
use super::protocol::ServerMessage;

/// Spawn the connection thread. Connect failures are reported as
/// [`NetworkEvent::Error`] followed by [`NetworkEvent::Disconnected`].
pub fn spawn_network_thread(
    server_url: String,
    connect_timeout: Duration,
    event_tx: mpsc::Sender<NetworkEvent>,
    cmd_rx: UnboundedReceiver<NetworkCommand>,
    connected: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("netpong-network".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(NetworkEvent::Error(e.to_string()));
                    let _ = event_tx.send(NetworkEvent::Disconnected);
                    return;
                }
            };

            let result = rt.block_on(run_connection(
                &server_url,
                connect_timeout,
                &event_tx,
                cmd_rx,
                &connected,
            ));

            connected.store(false, Ordering::Relaxed);
            if let Err(e) = result {
                error!("Coordinator connection error: {:#}", e);
                let _ = event_tx.send(NetworkEvent::Error(e.to_string()));
            }
            let _ = event_tx.send(NetworkEvent::Disconnected);
            info!("Network thread exiting");
        })
}

/// Connect, then pump commands out and events in until either side closes
async fn run_connection(
    server_url: &str,
    connect_timeout: Duration,
    event_tx: &mpsc::Sender<NetworkEvent>,
    mut cmd_rx: UnboundedReceiver<NetworkCommand>,
    connected: &AtomicBool,
) -> Result<()> {
    info!("Connecting to coordinator at {}", server_url);
    let (ws_stream, _response) = tokio::time::timeout(connect_timeout, connect_async(server_url))
        .await
        .map_err(|_| anyhow!("timed out after {:?} connecting to {}", connect_timeout, server_url))??;

    connected.store(true, Ordering::Relaxed);
    info!("Connected to coordinator at {}", server_url);
    if event_tx
        .send(NetworkEvent::Connected {
            server: server_url.to_string(),
        })
        .is_err()
    {
        // Frame loop is gone
        return Ok(());
    }

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            command = cmd_rx.recv() => match command {
                Some(NetworkCommand::Send(msg)) => {
                    let text = msg.to_json()?;
                    ws_sender.send(Message::Text(text)).await?;
                }
                Some(NetworkCommand::Disconnect) | None => {
                    info!("Closing coordinator connection");
                    let _ = ws_sender.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text) {
                    Ok(msg) => {
                        debug!("<- {:?}", msg);
                        if event_tx.send(NetworkEvent::Received(msg)).is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => warn!("Dropping malformed coordinator message {:?}: {}", text, e),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!("Coordinator closed the connection: {:?}", frame);
                    return Ok(());
                }
                // Ping/pong are answered by tungstenite; binary frames are not part of the protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => {
                    info!("Coordinator stream ended");
                    return Ok(());
                }
            },
        }
    }
}
