#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system translating pointer and panel input into commands.
//!
//! The controller owns the local [`SelectionState`] and reads everything else
//! from the [`GameStateCache`]. It never talks to the network: commands leave
//! through [`Transition::Dispatch`] and the caller reports their completion
//! through [`InteractionController::complete`].

use std::fmt;

use conquest_core::{
    AxialCoord, Command, HexLayout, Highlight, HighlightKind, Mode, SelectionState, Unit, UnitType,
};
use conquest_world::{query, GameStateCache};
use glam::Vec2;
use tracing::debug;

/// Input delivered to the controller by an adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary click at a screen-space position.
    Click {
        /// Pointer position in pixels.
        position: Vec2,
    },
    /// Arms the selected unit for a move.
    ArmMove,
    /// Arms the selected unit for an attack.
    ArmAttack,
    /// Drops the current selection.
    Deselect,
    /// Starts production in the selected city.
    Produce {
        /// Unit type to build.
        unit_type: UnitType,
    },
}

/// Input refused locally without contacting the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalRejection {
    /// The attack target belongs to the current player.
    AttackOwnUnit,
    /// Production was requested without a selected city.
    NoCitySelected,
    /// A move or attack was armed without a selected unit.
    NoUnitSelected,
}

impl fmt::Display for LocalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::AttackOwnUnit => "Cannot attack own units",
            Self::NoCitySelected => "Select a city first",
            Self::NoUnitSelected => "Select a unit first",
        };
        f.write_str(message)
    }
}

/// Outcome of feeding one input to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The input had no effect.
    Ignored,
    /// Selection, highlights or mode changed locally.
    Updated,
    /// The caller must send the command and later call
    /// [`InteractionController::complete`].
    Dispatch(Command),
    /// The input was refused locally and should be reported to the player.
    Rejected(LocalRejection),
    /// A command is still outstanding, so nothing new may be issued.
    Busy,
}

/// Selection state machine for the local player.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: SelectionState,
    pending: Option<Command>,
}

impl InteractionController {
    /// Creates a controller in [`Mode::Select`] with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection, mode and highlights.
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Reports whether a dispatched command still awaits its response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Command awaiting its response, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    /// Feeds one adapter input through the state machine.
    pub fn handle(
        &mut self,
        event: InputEvent,
        cache: &GameStateCache,
        layout: &HexLayout,
    ) -> Transition {
        if self.is_pending() {
            return Transition::Busy;
        }

        match event {
            InputEvent::Click { position } => {
                let coord = layout.pixel_to_hex(position);
                if !query::is_valid_hex(cache, coord) {
                    return Transition::Ignored;
                }
                match self.state.mode() {
                    Mode::Select => self.select_at(coord, cache),
                    Mode::Move => self.move_to(coord),
                    Mode::Attack => self.attack_at(coord, cache),
                }
            }
            InputEvent::ArmMove => self.arm(Mode::Move),
            InputEvent::ArmAttack => self.arm(Mode::Attack),
            InputEvent::Deselect => {
                self.state.clear();
                Transition::Updated
            }
            InputEvent::Produce { unit_type } => {
                let Some(city) = self.state.selected_city() else {
                    return Transition::Rejected(LocalRejection::NoCitySelected);
                };
                let command = Command::ProduceUnit {
                    city: city.id.clone(),
                    unit_type,
                };
                self.dispatch(command)
            }
        }
    }

    /// Issues a panel command that does not depend on the selection.
    pub fn request(&mut self, command: Command) -> Transition {
        if self.is_pending() {
            return Transition::Busy;
        }
        self.dispatch(command)
    }

    /// Records that the outstanding command received a response.
    ///
    /// Success and failure are handled alike: the selection is cleared and
    /// the pointer returns to [`Mode::Select`].
    pub fn complete(&mut self) {
        if let Some(command) = self.pending.take() {
            debug!(verb = command.verb(), "command completed");
        }
        self.state.clear();
    }

    fn dispatch(&mut self, command: Command) -> Transition {
        self.state.disarm();
        self.pending = Some(command.clone());
        Transition::Dispatch(command)
    }

    fn arm(&mut self, mode: Mode) -> Transition {
        if self.state.arm(mode) {
            Transition::Updated
        } else {
            Transition::Rejected(LocalRejection::NoUnitSelected)
        }
    }

    fn select_at(&mut self, coord: AxialCoord, cache: &GameStateCache) -> Transition {
        let Some(current) = query::current_player(cache) else {
            return Transition::Ignored;
        };

        if let Some(unit) = query::unit_at(cache, coord).filter(|unit| &unit.owner == current) {
            let highlighted = compute_highlights(unit, cache);
            self.state.select_unit(unit.clone(), highlighted);
        } else if let Some(city) = query::city_at(cache, coord)
            .filter(|city| city.owner.as_ref() == Some(current))
        {
            self.state.select_city(city.clone());
        } else {
            self.state.clear();
        }
        Transition::Updated
    }

    fn move_to(&mut self, target: AxialCoord) -> Transition {
        let Some(unit) = self.state.selected_unit() else {
            self.state.disarm();
            return Transition::Ignored;
        };
        let command = Command::MoveUnit {
            unit: unit.id.clone(),
            target,
        };
        self.dispatch(command)
    }

    fn attack_at(&mut self, coord: AxialCoord, cache: &GameStateCache) -> Transition {
        let Some(attacker) = self.state.selected_unit() else {
            self.state.disarm();
            return Transition::Ignored;
        };
        let Some(target) = query::unit_at(cache, coord) else {
            return Transition::Ignored;
        };

        if target.owner == attacker.owner {
            self.state.clear();
            return Transition::Rejected(LocalRejection::AttackOwnUnit);
        }

        let command = Command::Attack {
            attacker: attacker.id.clone(),
            defender: target.id.clone(),
        };
        self.dispatch(command)
    }
}

/// Computes move and attack highlights for `unit` against the cached snapshot.
///
/// Move targets are unoccupied map hexes within the unit's remaining movement,
/// listed in map order. Attack targets are units not owned by the current
/// player within the unit's range, listed in snapshot order.
#[must_use]
pub fn compute_highlights(unit: &Unit, cache: &GameStateCache) -> Vec<Highlight> {
    let origin = unit.position;
    let mut highlighted: Vec<Highlight> = query::hexes(cache)
        .iter()
        .filter(|hex| {
            let distance = origin.distance(hex.coord);
            distance > 0
                && distance <= unit.movement_remaining
                && query::unit_at(cache, hex.coord).is_none()
        })
        .map(|hex| Highlight::new(hex.coord, HighlightKind::Move))
        .collect();

    let current = query::current_player(cache);
    highlighted.extend(
        query::units(cache)
            .iter()
            .filter(|other| Some(&other.owner) != current)
            .filter(|other| origin.distance(other.position) <= unit.stats.range)
            .map(|other| Highlight::new(other.position, HighlightKind::Attack)),
    );
    highlighted
}
