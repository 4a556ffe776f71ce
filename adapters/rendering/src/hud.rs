use conquest_core::{City, GameSnapshot, Selection, SelectionState, Unit, HUMAN_PLAYER};

use crate::Color;

/// Outcome banner shown once the game has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// The human seat won.
    Victory,
    /// Any other outcome.
    Defeat,
}

impl Banner {
    /// Headline of the banner.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Victory => "VICTORY!",
            Self::Defeat => "DEFEAT",
        }
    }

    /// Explanation shown below the headline.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory => "You have conquered all enemy cities! You win!",
            Self::Defeat => "All your cities have been captured. Better luck next time!",
        }
    }
}

/// Colored line of the message log.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLine {
    /// Text to display.
    pub text: String,
    /// Text color.
    pub color: Color,
}

/// Text content drawn around the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    /// Turn, seat and resource lines.
    pub status: Vec<String>,
    /// Description of the selected unit or city.
    pub details: Vec<String>,
    /// Game-over banner.
    pub banner: Option<Banner>,
    /// Message log, oldest first.
    pub log: Vec<HudLine>,
    /// Whether a command is awaiting its response.
    pub pending: bool,
    /// Whether build buttons apply to a selected city.
    pub city_selected: bool,
    /// Whether move and attack buttons apply to a selected unit.
    pub unit_selected: bool,
}

impl Hud {
    /// Describes the snapshot and selection. The log starts empty.
    #[must_use]
    pub fn compose(snapshot: Option<&GameSnapshot>, selection: &SelectionState) -> Self {
        let mut hud = Self::default();
        if let Some(snapshot) = snapshot {
            hud.status = status_lines(snapshot);
            if snapshot.game_over {
                let human_won = snapshot
                    .winner
                    .as_ref()
                    .is_some_and(|winner| winner.as_str() == HUMAN_PLAYER);
                hud.banner = Some(if human_won {
                    Banner::Victory
                } else {
                    Banner::Defeat
                });
            }
        }
        match selection.selection() {
            Selection::None => {}
            Selection::Unit(unit) => {
                hud.details = unit_details(unit);
                hud.unit_selected = true;
            }
            Selection::City(city) => {
                hud.details = city_details(city);
                hud.city_selected = true;
            }
        }
        hud
    }

    /// Appends a log line.
    pub fn push_log(&mut self, text: impl Into<String>, color: Color) {
        self.log.push(HudLine {
            text: text.into(),
            color,
        });
    }
}

fn status_lines(snapshot: &GameSnapshot) -> Vec<String> {
    let seat = if snapshot.current_player.is_human() {
        "HUMAN"
    } else {
        "AI"
    };
    let resources = snapshot
        .resources
        .get(&snapshot.current_player)
        .copied()
        .unwrap_or(0);
    vec![
        format!("Turn: {}", snapshot.turn),
        format!("Player: {seat}"),
        format!("Resources: {resources}"),
    ]
}

fn unit_details(unit: &Unit) -> Vec<String> {
    vec![
        unit.kind.to_string(),
        format!("Health: {}/{}", unit.health, unit.stats.max_health),
        format!("Movement: {}", unit.movement_remaining),
        format!("Attack: {}", unit.stats.attack),
        format!("Defense: {}", unit.stats.defense),
    ]
}

fn city_details(city: &City) -> Vec<String> {
    let owner = city
        .owner
        .as_ref()
        .map_or_else(|| "Neutral".to_owned(), ToString::to_string);
    let production = city.current_production.map_or_else(
        || "None".to_owned(),
        |kind| format!("{kind} ({}/{})", city.production_progress, kind.cost()),
    );
    vec![
        city.name.clone(),
        format!("Owner: {owner}"),
        format!("Production: {production}"),
    ]
}
