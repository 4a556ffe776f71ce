//! Request/response seam between the client and the authoritative server.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{AxialCoord, CityId, Command, GameSnapshot, UnitId, UnitType};

/// Successful outcome of a move request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    /// State after the move was applied.
    pub snapshot: GameSnapshot,
    /// Whether the move captured a city.
    pub captured_city: bool,
}

/// Successful outcome of an attack request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackReport {
    /// State after combat was resolved.
    pub snapshot: GameSnapshot,
    /// Damage dealt to the defending unit.
    pub damage_to_defender: u32,
    /// Whether the defending unit was destroyed.
    pub defender_destroyed: bool,
}

/// Acknowledgement returned once the server persisted a save.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Server-side path of the written save, when reported.
    pub filepath: Option<String>,
}

/// Successful reply to any [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandReply {
    /// Full replacement state.
    Snapshot(GameSnapshot),
    /// Reply to [`Command::MoveUnit`].
    Moved(MoveReport),
    /// Reply to [`Command::Attack`].
    Attacked(AttackReport),
    /// Reply to [`Command::SaveGame`].
    Saved(SaveReceipt),
}

impl CommandReply {
    /// Snapshot carried by the reply, if the command returns state.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::Moved(report) => Some(&report.snapshot),
            Self::Attacked(report) => Some(&report.snapshot),
            Self::Saved(_) => None,
        }
    }

    /// Consumes the reply and yields its snapshot, if any.
    #[must_use]
    pub fn into_snapshot(self) -> Option<GameSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::Moved(report) => Some(report.snapshot),
            Self::Attacked(report) => Some(report.snapshot),
            Self::Saved(_) => None,
        }
    }
}

/// Reasons a command failed to produce a reply.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The server processed the request and reported failure.
    #[error("{message}")]
    Rejected {
        /// Message supplied by the server, verbatim.
        message: String,
    },
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),
    /// No response arrived within the configured window.
    #[error("no response after {0:?}")]
    TimedOut(Duration),
}

impl GatewayError {
    /// Creates a rejection carrying the server's message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Reports whether the server itself refused the command.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Stateless request/response functions for every player command.
///
/// Implementations own no game state; they only translate calls to the wire
/// and back. Success is decided solely by the server's success flag.
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// Starts a new game on a freshly generated map.
    async fn new_game(&self, width: u32, height: u32) -> Result<GameSnapshot, GatewayError>;

    /// Fetches the current state.
    async fn get_state(&self) -> Result<GameSnapshot, GatewayError>;

    /// Moves a unit to the target hex.
    async fn move_unit(
        &self,
        unit: &UnitId,
        target: AxialCoord,
    ) -> Result<MoveReport, GatewayError>;

    /// Attacks `defender` with `attacker`.
    async fn attack(
        &self,
        attacker: &UnitId,
        defender: &UnitId,
    ) -> Result<AttackReport, GatewayError>;

    /// Starts production of `unit_type` in `city`.
    async fn produce_unit(
        &self,
        city: &CityId,
        unit_type: UnitType,
    ) -> Result<GameSnapshot, GatewayError>;

    /// Ends the current turn.
    async fn end_turn(&self) -> Result<GameSnapshot, GatewayError>;

    /// Saves the game under `filename`.
    async fn save_game(&self, filename: &str) -> Result<SaveReceipt, GatewayError>;

    /// Loads the save identified by `filename`.
    async fn load_game(&self, filename: &str) -> Result<GameSnapshot, GatewayError>;

    /// Routes a [`Command`] value to the matching request.
    async fn execute(&self, command: &Command) -> Result<CommandReply, GatewayError> {
        match command {
            Command::NewGame { width, height } => self
                .new_game(*width, *height)
                .await
                .map(CommandReply::Snapshot),
            Command::GetState => self.get_state().await.map(CommandReply::Snapshot),
            Command::MoveUnit { unit, target } => self
                .move_unit(unit, *target)
                .await
                .map(CommandReply::Moved),
            Command::Attack { attacker, defender } => self
                .attack(attacker, defender)
                .await
                .map(CommandReply::Attacked),
            Command::ProduceUnit { city, unit_type } => self
                .produce_unit(city, *unit_type)
                .await
                .map(CommandReply::Snapshot),
            Command::EndTurn => self.end_turn().await.map(CommandReply::Snapshot),
            Command::SaveGame { filename } => {
                self.save_game(filename).await.map(CommandReply::Saved)
            }
            Command::LoadGame { filename } => {
                self.load_game(filename).await.map(CommandReply::Snapshot)
            }
        }
    }
}
