#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session orchestrating the gateway, the state cache and the controller.
//!
//! [`GameSession`] is the single writer of client state. Input first passes
//! through the interaction controller; when that yields a command the session
//! sends it through the [`CommandGateway`], merges the reply into the cache
//! and reports the outcome in the player-facing [`MessageLog`].

mod driver;
mod log;

use std::{path::Path, sync::Arc, time::Duration};

use conquest_core::{
    Command, CommandGateway, CommandReply, GameSnapshot, GatewayError, HexLayout, SelectionState,
    UnitId, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, HUMAN_PLAYER,
};
use conquest_system_interaction::{InputEvent, InteractionController, Transition};
use conquest_world::{query, GameStateCache};
use glam::Vec2;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};

pub use driver::{channel, SessionDriver, SessionHandle, SessionRequest};
pub use log::{LogEntry, LogKind, MessageLog, MESSAGE_LOG_CAPACITY};

/// Default window granted to the server for answering a command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Save name used when the player does not provide one.
pub const DEFAULT_SAVE_NAME: &str = "savegame";

/// Tunables the session is created with.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Map width requested for new games.
    pub map_width: u32,
    /// Map height requested for new games.
    pub map_height: u32,
    /// Upper bound on the wait for a single command.
    pub command_timeout: Duration,
    /// Name sent with save requests.
    pub save_name: String,
    /// Screen layout of the hex grid.
    pub layout: HexLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            save_name: DEFAULT_SAVE_NAME.to_owned(),
            layout: HexLayout::default(),
        }
    }
}

/// Control panel actions that do not depend on the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// Starts a fresh game with the configured map size.
    NewGame,
    /// Re-reads the server state.
    Refresh,
    /// Ends the human player's turn.
    EndTurn,
    /// Saves under the configured save name.
    Save,
    /// Loads the named save.
    Load {
        /// Save name or server-side file name.
        filename: String,
    },
    /// Loads the save written most recently by this session.
    LoadLastSave,
}

/// Immutable picture of the session handed to presentation adapters.
#[derive(Clone, Debug, Default)]
pub struct SessionView {
    /// Latest snapshot, if any game has been loaded.
    pub snapshot: Option<Arc<GameSnapshot>>,
    /// Local selection, mode and highlights.
    pub selection: SelectionState,
    /// Retained log entries, oldest first.
    pub log: Vec<LogEntry>,
    /// Whether a command is awaiting its response.
    pub pending: bool,
    /// Layout the view was produced with.
    pub layout: HexLayout,
    /// File name remembered from the last successful save.
    pub last_save: Option<String>,
}

/// Client session bound to one command gateway.
#[derive(Debug)]
pub struct GameSession<G> {
    gateway: G,
    cache: GameStateCache,
    controller: InteractionController,
    log: MessageLog,
    config: SessionConfig,
    last_save: Option<String>,
    announced_game_over: bool,
}

impl<G: CommandGateway> GameSession<G> {
    /// Creates a session with an empty cache.
    pub fn new(gateway: G, config: SessionConfig) -> Self {
        Self {
            gateway,
            cache: GameStateCache::new(),
            controller: InteractionController::new(),
            log: MessageLog::new(),
            config,
            last_save: None,
            announced_game_over: false,
        }
    }

    /// Cached server state.
    #[must_use]
    pub fn cache(&self) -> &GameStateCache {
        &self.cache
    }

    /// Local selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.controller.state()
    }

    /// Player-facing message log.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Screen layout used to resolve clicks.
    #[must_use]
    pub fn layout(&self) -> &HexLayout {
        &self.config.layout
    }

    /// File name remembered from the last successful save.
    #[must_use]
    pub fn last_save(&self) -> Option<&str> {
        self.last_save.as_deref()
    }

    /// Reports whether a command is awaiting its response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Updates the viewport used to centre the grid.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.config.layout.set_viewport(viewport);
    }

    /// Captures the current state for presentation.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            snapshot: query::shared_snapshot(&self.cache),
            selection: self.controller.state().clone(),
            log: self.log.iter().cloned().collect(),
            pending: self.controller.is_pending(),
            layout: self.config.layout,
            last_save: self.last_save.clone(),
        }
    }

    /// Feeds pointer or selection input through the controller.
    ///
    /// Returns the command the caller must pass to [`GameSession::execute`],
    /// if the input produced one.
    pub fn input(&mut self, event: InputEvent) -> Option<Command> {
        let transition = self
            .controller
            .handle(event, &self.cache, &self.config.layout);
        self.resolve(transition)
    }

    /// Turns a panel action into a command, subject to the single-command rule.
    pub fn panel(&mut self, action: PanelAction) -> Option<Command> {
        let command = match action {
            PanelAction::NewGame => Command::NewGame {
                width: self.config.map_width,
                height: self.config.map_height,
            },
            PanelAction::Refresh => Command::GetState,
            PanelAction::EndTurn => Command::EndTurn,
            PanelAction::Save => Command::SaveGame {
                filename: self.config.save_name.clone(),
            },
            PanelAction::Load { filename } => Command::LoadGame { filename },
            PanelAction::LoadLastSave => match self.last_save.clone() {
                Some(filename) => Command::LoadGame { filename },
                None => {
                    self.log.push(LogKind::Error, "No saved game to load");
                    return None;
                }
            },
        };
        let transition = self.controller.request(command);
        self.resolve(transition)
    }

    /// Handles one input end to end, awaiting the server when needed.
    pub async fn handle(&mut self, event: InputEvent) {
        if let Some(command) = self.input(event) {
            self.execute(command).await;
        }
    }

    /// Performs one panel action end to end, awaiting the server when needed.
    pub async fn perform(&mut self, action: PanelAction) {
        if let Some(command) = self.panel(action) {
            self.execute(command).await;
        }
    }

    /// Sends a command obtained from [`GameSession::input`] or
    /// [`GameSession::panel`] and merges the outcome.
    ///
    /// The selection is reset afterwards whatever the outcome. Failures keep
    /// the last good snapshot.
    pub async fn execute(&mut self, command: Command) {
        let span = info_span!("command", verb = command.verb());
        let window = self.config.command_timeout;
        let outcome = timeout(window, self.gateway.execute(&command))
            .instrument(span)
            .await
            .unwrap_or(Err(GatewayError::TimedOut(window)));

        match outcome {
            Ok(reply) => self.apply(&command, reply),
            Err(error) => self.report_failure(&command, &error),
        }
        self.controller.complete();
    }

    fn resolve(&mut self, transition: Transition) -> Option<Command> {
        match transition {
            Transition::Dispatch(command) => {
                self.announce(&command);
                Some(command)
            }
            Transition::Rejected(rejection) => {
                self.log.push(LogKind::Error, rejection.to_string());
                None
            }
            Transition::Busy => {
                debug!("input refused while a command is outstanding");
                None
            }
            Transition::Ignored | Transition::Updated => None,
        }
    }

    fn announce(&mut self, command: &Command) {
        match command {
            Command::NewGame { .. } => self.log.push(LogKind::Neutral, "Starting new game..."),
            Command::EndTurn => self.log.push(LogKind::Neutral, "Ending turn..."),
            _ => {}
        }
    }

    fn unit_label(&self, id: &UnitId) -> String {
        query::unit_by_id(&self.cache, id)
            .map_or_else(|| "unit".to_owned(), |unit| unit.kind.to_string())
    }

    fn apply(&mut self, command: &Command, reply: CommandReply) {
        match (command, &reply) {
            (Command::NewGame { .. }, _) => {
                self.log.push(LogKind::Victory, "New game started!");
            }
            (Command::MoveUnit { unit, .. }, CommandReply::Moved(report)) => {
                let label = self.unit_label(unit);
                self.log.push(LogKind::Neutral, format!("{label} moved"));
                if report.captured_city {
                    self.log.push(LogKind::Victory, "Captured city!");
                }
            }
            (Command::Attack { attacker, defender }, CommandReply::Attacked(report)) => {
                let attacker = self.unit_label(attacker);
                let defender = self.unit_label(defender);
                self.log.push(
                    LogKind::Combat,
                    format!(
                        "{attacker} attacks {defender}! Damage: {}",
                        report.damage_to_defender
                    ),
                );
                if report.defender_destroyed {
                    self.log
                        .push(LogKind::Combat, format!("{defender} destroyed!"));
                }
            }
            (Command::ProduceUnit { unit_type, .. }, _) => {
                self.log
                    .push(LogKind::Production, format!("Started producing {unit_type}"));
            }
            (Command::EndTurn, CommandReply::Snapshot(snapshot)) => {
                self.log.push(
                    LogKind::Neutral,
                    format!("Turn {} - Your turn", snapshot.turn),
                );
            }
            (Command::SaveGame { filename }, CommandReply::Saved(receipt)) => {
                let written = receipt.filepath.as_deref().unwrap_or(filename);
                self.log
                    .push(LogKind::Production, format!("Game saved: {written}"));
                self.last_save = Some(save_file_name(written));
                info!(path = written, "game saved");
            }
            (Command::LoadGame { .. }, _) => {
                self.log.push(LogKind::Production, "Game loaded successfully");
            }
            _ => {}
        }

        if let Some(snapshot) = reply.into_snapshot() {
            self.merge(snapshot);
        }
    }

    fn merge(&mut self, snapshot: GameSnapshot) {
        let game_over = snapshot.game_over;
        let human_won = snapshot
            .winner
            .as_ref()
            .is_some_and(|winner| winner.as_str() == HUMAN_PLAYER);
        debug!(turn = snapshot.turn, units = snapshot.units.len(), "snapshot applied");
        conquest_world::replace(&mut self.cache, snapshot);

        if !game_over {
            self.announced_game_over = false;
            return;
        }
        if self.announced_game_over {
            return;
        }
        self.announced_game_over = true;
        if human_won {
            info!("game won");
            self.log.push(
                LogKind::Victory,
                "VICTORY! You have conquered all enemy cities!",
            );
        } else {
            info!("game lost");
            self.log.push(
                LogKind::Error,
                "DEFEAT. All your cities have been captured.",
            );
        }
    }

    fn report_failure(&mut self, command: &Command, error: &GatewayError) {
        if error.is_rejection() {
            debug!(verb = command.verb(), %error, "command rejected");
        } else {
            warn!(verb = command.verb(), %error, "command failed");
        }
        self.log
            .push(LogKind::Error, format!("{}: {error}", failure_prefix(command)));
    }
}

fn failure_prefix(command: &Command) -> &'static str {
    match command {
        Command::NewGame { .. } => "Failed to start game",
        Command::GetState => "Failed to refresh state",
        Command::MoveUnit { .. } => "Cannot move",
        Command::Attack { .. } => "Cannot attack",
        Command::ProduceUnit { .. } => "Cannot build",
        Command::EndTurn => "Failed to end turn",
        Command::SaveGame { .. } => "Save failed",
        Command::LoadGame { .. } => "Load failed",
    }
}

/// Reduces a server-reported save path to the name the load route expects.
fn save_file_name(written: &str) -> String {
    Path::new(written)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(written)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_is_reduced_to_its_file_name() {
        assert_eq!(
            save_file_name("saves/savegame_20240101_120000.json"),
            "savegame_20240101_120000.json"
        );
        assert_eq!(save_file_name("plain.json"), "plain.json");
    }

    #[test]
    fn failures_use_player_facing_prefixes() {
        assert_eq!(
            failure_prefix(&Command::SaveGame {
                filename: "x".to_owned()
            }),
            "Save failed"
        );
        assert_eq!(failure_prefix(&Command::EndTurn), "Failed to end turn");
    }
}
