//! Client-local selection state shared by the interaction system and renderers.
//!
//! The mutators only allow legal shapes: a unit and a city can never be
//! selected together, and armed modes require a selected unit.

use crate::{AxialCoord, City, Unit};

/// Interaction mode of the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Clicks select units and cities.
    #[default]
    Select,
    /// A unit is armed and the next click picks its destination.
    Move,
    /// A unit is armed and the next click picks its target.
    Attack,
}

/// Currently selected entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing is selected.
    #[default]
    None,
    /// One of the player's units is selected.
    Unit(Unit),
    /// One of the player's cities is selected.
    City(City),
}

/// Meaning of a highlighted hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Free hex the selected unit can reach this turn.
    Move,
    /// Enemy unit within range of the selected unit.
    Attack,
}

/// Hex highlighted around the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Highlight {
    /// Highlighted hex.
    pub coord: AxialCoord,
    /// Why the hex is highlighted.
    pub kind: HighlightKind,
}

impl Highlight {
    /// Creates a new highlight descriptor.
    #[must_use]
    pub const fn new(coord: AxialCoord, kind: HighlightKind) -> Self {
        Self { coord, kind }
    }
}

/// Selection, mode and derived highlights of the local player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selection: Selection,
    mode: Mode,
    highlighted: Vec<Highlight>,
}

impl SelectionState {
    /// Creates an empty selection in [`Mode::Select`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current pointer mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Hexes highlighted for the current selection.
    #[must_use]
    pub fn highlighted(&self) -> &[Highlight] {
        &self.highlighted
    }

    /// Selected unit, if a unit is selected.
    #[must_use]
    pub fn selected_unit(&self) -> Option<&Unit> {
        match &self.selection {
            Selection::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Selected city, if a city is selected.
    #[must_use]
    pub fn selected_city(&self) -> Option<&City> {
        match &self.selection {
            Selection::City(city) => Some(city),
            _ => None,
        }
    }

    /// Hex of the selected entity.
    #[must_use]
    pub fn selected_hex(&self) -> Option<AxialCoord> {
        match &self.selection {
            Selection::None => None,
            Selection::Unit(unit) => Some(unit.position),
            Selection::City(city) => Some(city.position),
        }
    }

    /// Selects a unit together with its freshly computed highlights.
    pub fn select_unit(&mut self, unit: Unit, highlighted: Vec<Highlight>) {
        self.selection = Selection::Unit(unit);
        self.mode = Mode::Select;
        self.highlighted = highlighted;
    }

    /// Selects a city. Cities carry no highlights.
    pub fn select_city(&mut self, city: City) {
        self.selection = Selection::City(city);
        self.mode = Mode::Select;
        self.highlighted.clear();
    }

    /// Arms the selected unit for a move or attack.
    ///
    /// Returns `false` and leaves the state untouched when no unit is selected.
    pub fn arm(&mut self, mode: Mode) -> bool {
        if self.selected_unit().is_none() {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Returns to [`Mode::Select`] while keeping the selection visible.
    pub fn disarm(&mut self) {
        self.mode = Mode::Select;
    }

    /// Clears the selection, its highlights and any armed mode.
    pub fn clear(&mut self) {
        self.selection = Selection::None;
        self.mode = Mode::Select;
        self.highlighted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CityId, PlayerId, UnitId, UnitStats, UnitType};

    fn unit() -> Unit {
        Unit {
            id: UnitId::new("u1"),
            kind: UnitType::Infantry,
            owner: PlayerId::new("player1"),
            position: AxialCoord::new(2, 3),
            health: 10,
            movement_remaining: 2,
            has_attacked: false,
            stats: UnitStats::default(),
        }
    }

    fn city() -> City {
        City {
            id: CityId::new("c1"),
            name: "Harbor".to_owned(),
            owner: Some(PlayerId::new("player1")),
            position: AxialCoord::new(-1, 0),
            current_production: None,
            production_progress: 0,
            production_capacity: 10,
        }
    }

    #[test]
    fn selecting_a_city_replaces_the_unit_and_its_highlights() {
        let mut state = SelectionState::new();
        state.select_unit(
            unit(),
            vec![Highlight::new(AxialCoord::new(2, 2), HighlightKind::Move)],
        );
        assert!(state.arm(Mode::Move));

        state.select_city(city());

        assert!(state.selected_unit().is_none());
        assert_eq!(state.selected_city().map(|c| c.id.as_str()), Some("c1"));
        assert!(state.highlighted().is_empty());
        assert_eq!(state.mode(), Mode::Select);
        assert_eq!(state.selected_hex(), Some(AxialCoord::new(-1, 0)));
    }

    #[test]
    fn arming_requires_a_selected_unit() {
        let mut state = SelectionState::new();
        assert!(!state.arm(Mode::Attack));
        assert_eq!(state.mode(), Mode::Select);

        state.select_city(city());
        assert!(!state.arm(Mode::Move));
        assert_eq!(state.mode(), Mode::Select);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = SelectionState::new();
        state.select_unit(
            unit(),
            vec![Highlight::new(AxialCoord::new(2, 2), HighlightKind::Attack)],
        );
        assert!(state.arm(Mode::Attack));

        state.clear();

        assert_eq!(state, SelectionState::new());
    }
}
