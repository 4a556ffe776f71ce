#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Strategic Conquest client.
//!
//! This crate defines the message surface that connects adapters, the cached
//! server state and the pure interaction system. The server owns every
//! authoritative fact; the client receives [`GameSnapshot`] values, answers
//! spatial queries against the latest one, and expresses player intent as
//! [`Command`] values delivered through a [`CommandGateway`].

mod gateway;
pub mod hex;
mod selection;

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

pub use gateway::{
    AttackReport, CommandGateway, CommandReply, GatewayError, MoveReport, SaveReceipt,
};
pub use hex::{AxialCoord, FractionalHex, HexLayout};
pub use selection::{Highlight, HighlightKind, Mode, Selection, SelectionState};

/// Identifier of the human seat as reported by the server.
pub const HUMAN_PLAYER: &str = "player1";

/// Identifier of the computer-controlled seat as reported by the server.
pub const AI_PLAYER: &str = "player2";

/// Default map width requested when starting a new game.
pub const DEFAULT_MAP_WIDTH: u32 = 30;

/// Default map height requested when starting a new game.
pub const DEFAULT_MAP_HEIGHT: u32 = 20;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps the raw identifier issued by the server.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrows the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a player seat.
    PlayerId
);

string_id!(
    /// Unique identifier assigned to a unit by the server.
    UnitId
);

string_id!(
    /// Unique identifier assigned to a city by the server.
    CityId
);

impl PlayerId {
    /// Reports whether the seat belongs to the human player.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.0 == HUMAN_PLAYER
    }
}

/// Terrain covering a single hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Open sea, passable by ships and aircraft.
    Water,
    /// Plains.
    Land,
    /// Wooded land.
    Forest,
    /// Mountain range.
    Mountain,
}

/// Unit classes the server can field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Foot soldiers, the only unit able to capture cities.
    Infantry,
    /// Armoured ground unit.
    Tank,
    /// Fast air superiority unit.
    Fighter,
    /// Heavy air strike unit.
    Bomber,
    /// Naval troop carrier.
    Transport,
    /// Naval combat unit.
    Destroyer,
}

impl UnitType {
    /// Every unit type in production-menu order.
    pub const ALL: [UnitType; 6] = [
        UnitType::Infantry,
        UnitType::Tank,
        UnitType::Fighter,
        UnitType::Bomber,
        UnitType::Transport,
        UnitType::Destroyer,
    ];

    /// Wire name of the unit type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Infantry => "infantry",
            Self::Tank => "tank",
            Self::Fighter => "fighter",
            Self::Bomber => "bomber",
            Self::Transport => "transport",
            Self::Destroyer => "destroyer",
        }
    }

    /// Production cost shown next to an active build order.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Infantry => 50,
            Self::Tank => 100,
            Self::Fighter => 80,
            Self::Bomber => 120,
            Self::Transport => 70,
            Self::Destroyer => 90,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single hex of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    /// Position of the hex on the grid.
    #[serde(flatten)]
    pub coord: AxialCoord,
    /// Terrain covering the hex.
    pub terrain: Terrain,
}

impl Hex {
    /// Creates a new hex descriptor.
    #[must_use]
    pub const fn new(coord: AxialCoord, terrain: Terrain) -> Self {
        Self { coord, terrain }
    }
}

/// Map portion of a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// Width in offset columns the map was generated with.
    #[serde(default)]
    pub width: u32,
    /// Height in offset rows the map was generated with.
    #[serde(default)]
    pub height: u32,
    /// Every hex that belongs to the map.
    pub hexes: Vec<Hex>,
}

/// Static combat profile attached to every unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Health of an undamaged unit.
    pub max_health: u32,
    /// Attack strength.
    pub attack: u32,
    /// Defense strength.
    pub defense: u32,
    /// Maximum attack distance in hexes.
    pub range: u32,
    /// Movement points restored each turn.
    #[serde(default)]
    pub movement: u32,
    /// Production cost.
    #[serde(default)]
    pub cost: u32,
}

/// Unit as last reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Identity of the unit.
    pub id: UnitId,
    /// Class of the unit.
    #[serde(rename = "type")]
    pub kind: UnitType,
    /// Seat controlling the unit.
    pub owner: PlayerId,
    /// Hex occupied by the unit.
    #[serde(with = "hex::axial_pair")]
    pub position: AxialCoord,
    /// Remaining health.
    pub health: u32,
    /// Movement points left this turn.
    pub movement_remaining: u32,
    /// Whether the unit already attacked this turn.
    #[serde(default)]
    pub has_attacked: bool,
    /// Static combat profile.
    pub stats: UnitStats,
}

/// City as last reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Identity of the city.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Controlling seat, `None` while the city is neutral.
    pub owner: Option<PlayerId>,
    /// Hex occupied by the city.
    #[serde(with = "hex::axial_pair")]
    pub position: AxialCoord,
    /// Unit currently being built, if any.
    #[serde(default)]
    pub current_production: Option<UnitType>,
    /// Production points accumulated toward the current build.
    #[serde(default)]
    pub production_progress: u32,
    /// Production points gained per turn.
    #[serde(default)]
    pub production_capacity: u32,
}

/// Complete server-authoritative game state at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current turn number, starting at one.
    pub turn: u32,
    /// Seat whose turn it is.
    pub current_player: PlayerId,
    /// Resource stockpile of every seat.
    #[serde(default)]
    pub resources: BTreeMap<PlayerId, i64>,
    /// Hex map.
    pub map: MapData,
    /// Units on the map.
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Cities on the map.
    #[serde(default)]
    pub cities: Vec<City>,
    /// Whether the game has ended.
    #[serde(default)]
    pub game_over: bool,
    /// Winning seat once the game has ended.
    #[serde(default)]
    pub winner: Option<PlayerId>,
}

/// Commands that express every player intent the server accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a fresh game on a generated map.
    NewGame {
        /// Number of offset columns to generate.
        width: u32,
        /// Number of offset rows to generate.
        height: u32,
    },
    /// Fetches the current state without mutating it.
    GetState,
    /// Moves a unit to a destination hex.
    MoveUnit {
        /// Unit being moved.
        unit: UnitId,
        /// Destination hex.
        target: AxialCoord,
    },
    /// Attacks a defending unit.
    Attack {
        /// Unit initiating the attack.
        attacker: UnitId,
        /// Unit being attacked.
        defender: UnitId,
    },
    /// Starts production of a unit type in a city.
    ProduceUnit {
        /// City that should build the unit.
        city: CityId,
        /// Type of unit to build.
        unit_type: UnitType,
    },
    /// Ends the current player's turn.
    EndTurn,
    /// Persists the game on the server under the provided name.
    SaveGame {
        /// Save name requested by the player.
        filename: String,
    },
    /// Replaces the running game with a saved one.
    LoadGame {
        /// Save name or server path to load.
        filename: String,
    },
}

impl Command {
    /// Short verb describing the command, used when reporting failures.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::NewGame { .. } => "start game",
            Self::GetState => "refresh",
            Self::MoveUnit { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::ProduceUnit { .. } => "build",
            Self::EndTurn => "end turn",
            Self::SaveGame { .. } => "save",
            Self::LoadGame { .. } => "load",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r#"{
        "turn": 3,
        "current_player": "player1",
        "resources": {"player1": 120, "player2": 90},
        "map": {
            "width": 2,
            "height": 1,
            "hexes": [
                {"q": 0, "r": 0, "terrain": "land", "unit_id": "u1", "city_id": null},
                {"q": 1, "r": 0, "terrain": "water", "unit_id": null, "city_id": null}
            ]
        },
        "units": [{
            "id": "u1",
            "type": "infantry",
            "owner": "player1",
            "position": [0, 0],
            "health": 7,
            "movement_remaining": 2,
            "has_attacked": false,
            "stats": {
                "name": "Infantry", "movement": 2, "attack": 3, "defense": 4,
                "range": 1, "cost": 50, "max_health": 10, "can_capture": true
            }
        }],
        "cities": [{
            "id": "c1",
            "name": "Avalon",
            "position": [1, 0],
            "owner": null,
            "production_capacity": 10,
            "current_production": "tank",
            "production_progress": 20
        }],
        "game_over": false,
        "winner": null
    }"#;

    #[test]
    fn snapshot_decodes_server_payload() {
        let snapshot: GameSnapshot = serde_json::from_str(SNAPSHOT_JSON).expect("decode");

        assert_eq!(snapshot.turn, 3);
        assert!(snapshot.current_player.is_human());
        assert_eq!(snapshot.resources.get(&PlayerId::new("player2")), Some(&90));
        assert_eq!(
            snapshot.map.hexes[1],
            Hex::new(AxialCoord::new(1, 0), Terrain::Water)
        );

        let unit = &snapshot.units[0];
        assert_eq!(unit.kind, UnitType::Infantry);
        assert_eq!(unit.position, AxialCoord::new(0, 0));
        assert_eq!(unit.stats.max_health, 10);
        assert_eq!(unit.stats.range, 1);

        let city = &snapshot.cities[0];
        assert!(city.owner.is_none());
        assert_eq!(city.current_production, Some(UnitType::Tank));
        assert_eq!(city.position, AxialCoord::new(1, 0));
    }

    #[test]
    fn unit_type_names_match_wire_format() {
        for unit_type in UnitType::ALL {
            let encoded = serde_json::to_string(&unit_type).expect("encode");
            assert_eq!(encoded, format!("\"{}\"", unit_type.name()));
        }
    }

    #[test]
    fn unit_costs_match_production_table() {
        let costs: Vec<u32> = UnitType::ALL.iter().map(|kind| kind.cost()).collect();
        assert_eq!(costs, vec![50, 100, 80, 120, 70, 90]);
    }

    #[test]
    fn ai_seat_is_not_human() {
        assert!(!PlayerId::new(AI_PLAYER).is_human());
        assert_eq!(PlayerId::new(HUMAN_PLAYER).to_string(), "player1");
    }
}
