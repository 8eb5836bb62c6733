use std::io;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::game::{poll_input, Bindings, InputAction, KeyState, Playfield};
use crate::lobby::LobbyState;
use crate::network::{self, ClientMessage, ConnectionStatus, NetworkClient, NetworkEvent};
use crate::session::{MatchClient, Phase};
use crate::ui::{self, View};

use super::common::{frame_duration, limit_frame_rate};

/// How long quitting waits for the close frame to go out
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// What the loop should do after an input action
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// Connect to the coordinator and run the client until the player quits.
///
/// One iteration per frame: input, inbound events, the state machine's
/// per-frame update, outbound flush, render.
pub fn run_online<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    name: Option<String>,
) -> Result<(), io::Error> {
    let mut network_client = network::start_network(
        config.network.server_url.clone(),
        Duration::from_secs(config.network.connect_timeout_secs),
    )?;

    let mut client = MatchClient::new(Playfield::from_config(&config.physics));
    let mut lobby = LobbyState::new(name);
    let mut connection = ConnectionStatus::Connecting;
    let mut keys = KeyState::new(config.display.key_hold_frames);
    let bindings = Bindings::from_config(&config.keybindings);
    let frame = frame_duration(config.display.target_fps);
    let mut rng = rand::thread_rng();

    info!("Frame loop started at {} fps", config.display.target_fps);

    loop {
        let frame_start = Instant::now();
        let mut outbound = Vec::new();

        let actions = poll_input(&bindings, client.phase().accepts_text(), &mut keys)?;
        for action in actions {
            if handle_action(action, &mut client, &mut lobby, &mut outbound) == Flow::Quit {
                info!("Player quit");
                network_client.shutdown(SHUTDOWN_GRACE);
                return Ok(());
            }
        }

        drain_network(&network_client, &mut client, &mut lobby, &mut connection, &mut outbound);

        outbound.extend(client.tick(keys.direction(), &mut rng));
        keys.end_frame();

        // Fire-and-forget: a dead connection is already reported via events
        for msg in outbound {
            if let Err(e) = network_client.send(msg) {
                debug!("Dropping outbound message: {}", e);
                break;
            }
        }

        terminal.draw(|f| {
            ui::render(
                f,
                &View {
                    client: &client,
                    lobby: &lobby,
                    connection: &connection,
                    display: &config.display,
                },
            )
        })?;

        limit_frame_rate(frame_start, frame);
    }
}

fn handle_action(
    action: InputAction,
    client: &mut MatchClient,
    lobby: &mut LobbyState,
    outbound: &mut Vec<ClientMessage>,
) -> Flow {
    match action {
        InputAction::Quit => return Flow::Quit,
        InputAction::Type(c) => lobby.add_char(c),
        InputAction::Backspace => lobby.backspace(),
        InputAction::Submit => outbound.extend(client.submit_name(&lobby.name_input)),
        InputAction::Surrender => outbound.extend(client.surrender()),
        InputAction::PlayAgain => {
            if client.acknowledge() {
                if let Some(name) = &client.profile().name {
                    lobby.name_input = name.clone();
                }
            }
        }
        InputAction::Leaderboard => outbound.extend(client.request_leaderboard()),
    }
    Flow::Continue
}

fn drain_network(
    network_client: &NetworkClient,
    client: &mut MatchClient,
    lobby: &mut LobbyState,
    connection: &mut ConnectionStatus,
    outbound: &mut Vec<ClientMessage>,
) {
    while let Some(event) = network_client.try_recv_event() {
        outbound.extend(apply_network_event(event, client, lobby, connection));
    }
}

fn apply_network_event(
    event: NetworkEvent,
    client: &mut MatchClient,
    lobby: &mut LobbyState,
    connection: &mut ConnectionStatus,
) -> Vec<ClientMessage> {
    connection.apply(&event);

    match event {
        NetworkEvent::Connected { server } => {
            info!("Coordinator ready at {}", server);
            if matches!(client.phase(), Phase::Idle) && lobby.take_auto_submit() {
                return client.submit_name(&lobby.name_input);
            }
            Vec::new()
        }
        NetworkEvent::Received(msg) => client.handle(msg),
        NetworkEvent::Disconnected => {
            // No reconnect: a match in progress simply stops receiving updates
            warn!("Coordinator connection closed during {}", client.phase().name());
            Vec::new()
        }
        NetworkEvent::Error(msg) => {
            error!("Network error: {}", msg);
            Vec::new()
        }
    }
}
