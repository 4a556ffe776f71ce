//! JSON bodies exchanged with the game server.

use conquest_core::{
    AttackReport, AxialCoord, CityId, GameSnapshot, GatewayError, MoveReport, SaveReceipt,
    UnitId, UnitType,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct NewGameBody {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TargetHex {
    q: i32,
    r: i32,
}

impl From<AxialCoord> for TargetHex {
    fn from(coord: AxialCoord) -> Self {
        Self {
            q: coord.q(),
            r: coord.r(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MoveBody<'a> {
    pub(crate) unit_id: &'a UnitId,
    pub(crate) target_hex: TargetHex,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttackBody<'a> {
    pub(crate) attacker_id: &'a UnitId,
    pub(crate) defender_id: &'a UnitId,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProduceBody<'a> {
    pub(crate) city_id: &'a CityId,
    pub(crate) unit_type: UnitType,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileBody<'a> {
    pub(crate) filename: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct CombatOutcome {
    #[serde(default)]
    damage_to_defender: u32,
    #[serde(default)]
    defender_destroyed: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Response envelope shared by every route.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    state: Option<GameSnapshot>,
    #[serde(default)]
    result: Option<CombatOutcome>,
    #[serde(default)]
    filepath: Option<String>,
    #[serde(default)]
    captured_city: Option<Value>,
}

/// Decodes a response body regardless of the HTTP status it arrived with.
///
/// A `success: false` envelope becomes [`GatewayError::Rejected`] carrying the
/// server's message unchanged.
pub(crate) fn parse(status: u16, body: &str) -> Result<Envelope, GatewayError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|error| GatewayError::Decode(format!("HTTP {status}: {error}")))?;
    if envelope.success {
        Ok(envelope)
    } else {
        Err(GatewayError::rejected(envelope.failure_message()))
    }
}

fn non_empty(text: Option<&String>) -> Option<&str> {
    text.map(String::as_str).filter(|text| !text.is_empty())
}

impl Envelope {
    fn failure_message(&self) -> String {
        non_empty(self.message.as_ref())
            .or_else(|| non_empty(self.error.as_ref()))
            .or_else(|| {
                self.result
                    .as_ref()
                    .and_then(|result| non_empty(result.message.as_ref()))
            })
            .unwrap_or("request failed")
            .to_owned()
    }

    pub(crate) fn into_snapshot(self) -> Result<GameSnapshot, GatewayError> {
        self.state
            .ok_or_else(|| GatewayError::Decode("response carries no state".to_owned()))
    }

    pub(crate) fn into_move_report(self) -> Result<MoveReport, GatewayError> {
        let flagged = match &self.captured_city {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        let announced = self
            .message
            .as_deref()
            .is_some_and(|message| message.starts_with("Captured"));
        let captured_city = flagged || announced;
        Ok(MoveReport {
            snapshot: self.into_snapshot()?,
            captured_city,
        })
    }

    pub(crate) fn into_attack_report(mut self) -> Result<AttackReport, GatewayError> {
        let outcome = self.result.take().unwrap_or_default();
        Ok(AttackReport {
            snapshot: self.into_snapshot()?,
            damage_to_defender: outcome.damage_to_defender,
            defender_destroyed: outcome.defender_destroyed,
        })
    }

    pub(crate) fn into_save_receipt(self) -> SaveReceipt {
        SaveReceipt {
            filepath: self.filepath,
        }
    }
}
