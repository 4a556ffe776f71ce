#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! HTTP adapter that speaks the game server's JSON API.
//!
//! Every route answers with an envelope carrying a `success` flag. The flag
//! alone decides between success and rejection; HTTP status codes only show up
//! in diagnostics.

mod wire;

use async_trait::async_trait;
use conquest_core::{
    AttackReport, AxialCoord, CityId, CommandGateway, GameSnapshot, GatewayError, MoveReport,
    SaveReceipt, UnitId, UnitType,
};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, trace};

use crate::wire::{AttackBody, Envelope, FileBody, MoveBody, NewGameBody, ProduceBody};

/// Address used when no server URL is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// [`CommandGateway`] backed by the server's `/api/game` routes.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway talking to the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a gateway reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            let _ = base_url.pop();
        }
        Self { client, base_url }
    }

    /// Server address requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/api/game/{route}", self.base_url)
    }

    async fn get(&self, route: &str) -> Result<Envelope, GatewayError> {
        self.send(route, self.client.get(self.endpoint(route))).await
    }

    async fn post<B: Serialize + Sync>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<Envelope, GatewayError> {
        let request = self.client.post(self.endpoint(route)).json(body);
        self.send(route, request).await
    }

    async fn send(&self, route: &str, request: RequestBuilder) -> Result<Envelope, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))?;
        debug!(route, status = status.as_u16(), bytes = body.len(), "response received");
        trace!(route, body = %body, "response body");
        wire::parse(status.as_u16(), &body)
    }
}

#[async_trait]
impl CommandGateway for HttpGateway {
    async fn new_game(&self, width: u32, height: u32) -> Result<GameSnapshot, GatewayError> {
        self.post("new", &NewGameBody { width, height })
            .await?
            .into_snapshot()
    }

    async fn get_state(&self) -> Result<GameSnapshot, GatewayError> {
        self.get("state").await?.into_snapshot()
    }

    async fn move_unit(
        &self,
        unit: &UnitId,
        target: AxialCoord,
    ) -> Result<MoveReport, GatewayError> {
        let body = MoveBody {
            unit_id: unit,
            target_hex: target.into(),
        };
        self.post("move", &body).await?.into_move_report()
    }

    async fn attack(
        &self,
        attacker: &UnitId,
        defender: &UnitId,
    ) -> Result<AttackReport, GatewayError> {
        let body = AttackBody {
            attacker_id: attacker,
            defender_id: defender,
        };
        self.post("attack", &body).await?.into_attack_report()
    }

    async fn produce_unit(
        &self,
        city: &CityId,
        unit_type: UnitType,
    ) -> Result<GameSnapshot, GatewayError> {
        let body = ProduceBody {
            city_id: city,
            unit_type,
        };
        self.post("produce", &body).await?.into_snapshot()
    }

    async fn end_turn(&self) -> Result<GameSnapshot, GatewayError> {
        let request = self.client.post(self.endpoint("end-turn"));
        self.send("end-turn", request).await?.into_snapshot()
    }

    async fn save_game(&self, filename: &str) -> Result<SaveReceipt, GatewayError> {
        let envelope = self.post("save", &FileBody { filename }).await?;
        Ok(envelope.into_save_receipt())
    }

    async fn load_game(&self, filename: &str) -> Result<GameSnapshot, GatewayError> {
        self.post("load", &FileBody { filename })
            .await?
            .into_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_base_url_without_double_slashes() {
        let gateway = HttpGateway::new("http://localhost:5000//");

        assert_eq!(gateway.base_url(), "http://localhost:5000");
        assert_eq!(
            gateway.endpoint("end-turn"),
            "http://localhost:5000/api/game/end-turn"
        );
    }
}
