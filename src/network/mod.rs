// Coordinator networking for netpong
// WebSocket connection, wire protocol, and the frame loop's handle to both

pub mod client;
pub mod protocol;
pub mod runtime;

pub use client::{ConnectionStatus, NetworkClient, NetworkEvent};
pub use protocol::{ClientMessage, ServerMessage};

use std::io;
use std::sync::{atomic::AtomicBool, mpsc, Arc};
use std::time::Duration;

/// Start the connection thread and return the frame loop's handle to it
pub fn start_network(server_url: String, connect_timeout: Duration) -> io::Result<NetworkClient> {
    let (event_tx, event_rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();

    let connected = Arc::new(AtomicBool::new(false));

    let thread =
        runtime::spawn_network_thread(server_url, connect_timeout, event_tx, cmd_rx, connected.clone())?;

    Ok(NetworkClient::new(cmd_tx, event_rx, connected).with_thread(thread))
}
