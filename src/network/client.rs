// Network client interface for the frame loop
// Channels to and from the connection thread; sends never block

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use super::protocol::{ClientMessage, ServerMessage};

/// Handle for the frame loop to talk to the coordinator connection
pub struct NetworkClient {
    /// Commands TO the connection thread
    tx: UnboundedSender<NetworkCommand>,

    /// Events FROM the connection thread
    rx: mpsc::Receiver<NetworkEvent>,

    connected: Arc<AtomicBool>,

    /// Connection thread, joined on shutdown
    thread: Option<JoinHandle<()>>,
}

/// Commands the frame loop sends to the connection thread
#[derive(Debug)]
pub enum NetworkCommand {
    Send(ClientMessage),

    /// Close the socket and stop the thread
    Disconnect,
}

/// Events the connection thread sends to the frame loop
#[derive(Debug)]
pub enum NetworkEvent {
    /// WebSocket handshake completed
    Connected { server: String },

    /// A well-formed event from the coordinator
    Received(ServerMessage),

    /// Socket closed; nothing more will arrive
    Disconnected,

    /// Transport failure (logged, never retried)
    Error(String),
}

/// Transport status as shown to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Closed,
    Failed(String),
}

impl ConnectionStatus {
    /// Fold a transport event into the status. Inbound messages leave it as is.
    pub fn apply(&mut self, event: &NetworkEvent) {
        match event {
            NetworkEvent::Connected { .. } => *self = ConnectionStatus::Connected,
            NetworkEvent::Disconnected => {
                // Keep the failure reason rather than a bare "closed"
                if !matches!(self, ConnectionStatus::Failed(_)) {
                    *self = ConnectionStatus::Closed;
                }
            }
            NetworkEvent::Error(msg) => *self = ConnectionStatus::Failed(msg.clone()),
            NetworkEvent::Received(_) => {}
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "Connecting to coordinator...".to_string(),
            ConnectionStatus::Connected => "Connected".to_string(),
            ConnectionStatus::Closed => "Connection closed".to_string(),
            ConnectionStatus::Failed(msg) => format!("Connection failed: {}", msg),
        }
    }
}

impl NetworkClient {
    pub fn new(
        tx: UnboundedSender<NetworkCommand>,
        rx: mpsc::Receiver<NetworkEvent>,
        connected: Arc<AtomicBool>,
    ) -> Self {
        Self {
            tx,
            rx,
            connected,
            thread: None,
        }
    }

    pub fn with_thread(mut self, thread: JoinHandle<()>) -> Self {
        self.thread = Some(thread);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Queue a message for the coordinator (fire-and-forget)
    pub fn send(&self, msg: ClientMessage) -> io::Result<()> {
        self.tx
            .send(NetworkCommand::Send(msg))
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }

    /// Non-blocking; None when nothing is pending
    pub fn try_recv_event(&self) -> Option<NetworkEvent> {
        self.rx.try_recv().ok()
    }

    pub fn disconnect(&self) -> io::Result<()> {
        self.tx
            .send(NetworkCommand::Disconnect)
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }

    /// Ask the connection thread to close the socket and wait up to `grace`
    /// for it to finish. Returns whether the thread was joined.
    pub fn shutdown(&mut self, grace: Duration) -> bool {
        let Some(thread) = self.thread.take() else {
            return true;
        };
        let _ = self.disconnect();

        // Still connecting: nothing to close, and the connect may take the full timeout
        if !self.is_connected() && !thread.is_finished() {
            return false;
        }

        let deadline = Instant::now() + grace;
        while !thread.is_finished() {
            if Instant::now() >= deadline {
                warn!("Connection thread still running after {:?}; leaving it", grace);
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        if thread.join().is_err() {
            warn!("Connection thread panicked");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_send_queues_command() {
        let (cmd_tx, mut cmd_rx) = unbounded_channel();
        let (_event_tx, event_rx) = mpsc::channel();
        let client = NetworkClient::new(cmd_tx, event_rx, Arc::new(AtomicBool::new(false)));

        client.send(ClientMessage::FindGame).unwrap();

        match cmd_rx.try_recv() {
            Ok(NetworkCommand::Send(ClientMessage::FindGame)) => {}
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_send_after_thread_exit_is_broken_pipe() {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (_event_tx, event_rx) = mpsc::channel();
        let client = NetworkClient::new(cmd_tx, event_rx, Arc::new(AtomicBool::new(false)));
        drop(cmd_rx);

        let err = client.send(ClientMessage::Surrender).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_try_recv_event_drains_in_order() {
        let (cmd_tx, _cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = NetworkClient::new(cmd_tx, event_rx, Arc::new(AtomicBool::new(true)));

        event_tx.send(NetworkEvent::Received(ServerMessage::Waiting)).unwrap();
        event_tx.send(NetworkEvent::Disconnected).unwrap();

        assert!(client.is_connected());
        assert!(matches!(
            client.try_recv_event(),
            Some(NetworkEvent::Received(ServerMessage::Waiting))
        ));
        assert!(matches!(client.try_recv_event(), Some(NetworkEvent::Disconnected)));
        assert!(client.try_recv_event().is_none());
    }

    #[test]
    fn test_shutdown_waits_for_thread_to_close() {
        let (cmd_tx, mut cmd_rx) = unbounded_channel();
        let (_event_tx, event_rx) = mpsc::channel();
        let (closed_tx, closed_rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            if let Some(NetworkCommand::Disconnect) = cmd_rx.blocking_recv() {
                thread::sleep(Duration::from_millis(20));
                closed_tx.send(()).unwrap();
            }
        });
        let mut client = NetworkClient::new(cmd_tx, event_rx, Arc::new(AtomicBool::new(true)))
            .with_thread(thread);

        assert!(client.shutdown(Duration::from_secs(5)));
        assert!(closed_rx.try_recv().is_ok());
    }

    #[test]
    fn test_shutdown_gives_up_after_grace() {
        let (cmd_tx, _cmd_rx) = unbounded_channel::<NetworkCommand>();
        let (_event_tx, event_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let thread = thread::spawn(move || {
            let _ = release_rx.recv();
        });
        let mut client = NetworkClient::new(cmd_tx, event_rx, Arc::new(AtomicBool::new(true)))
            .with_thread(thread);

        assert!(!client.shutdown(Duration::from_millis(20)));
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_connection_status_keeps_failure_reason() {
        let mut status = ConnectionStatus::Connecting;

        status.apply(&NetworkEvent::Connected { server: "ws://x".into() });
        assert_eq!(status, ConnectionStatus::Connected);

        status.apply(&NetworkEvent::Error("reset by peer".into()));
        status.apply(&NetworkEvent::Disconnected);
        assert_eq!(status, ConnectionStatus::Failed("reset by peer".into()));
    }
}
