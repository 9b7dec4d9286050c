//! Typed access to the simulation server's JSON API.

mod export;
mod request;

pub use export::download_csv;
pub use request::{RequestClient, RequestOptions};

use crate::error::RequestError;
use crate::model::{
    CreatePayload, CreatedRecord, DashboardConfig, DetailRecord, ServerConfig, SimId,
    SimulationRecord, TeamRecord,
};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct SimulationApi {
    client: RequestClient,
}

impl SimulationApi {
    pub fn new(cfg: &DashboardConfig) -> Result<Self> {
        // No request timeout: every exchange waits for resolution or rejection.
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self::with_client(RequestClient::new(http, &cfg.base_url)))
    }

    pub fn with_client(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub async fn config(&self) -> Result<ServerConfig, RequestError> {
        self.client
            .request_json("/config", RequestOptions::get())
            .await
    }

    pub async fn teams(&self) -> Result<Vec<TeamRecord>, RequestError> {
        self.client.request_json("/teams", RequestOptions::get()).await
    }

    pub async fn list_simulations(&self) -> Result<Vec<SimulationRecord>, RequestError> {
        self.client
            .request_json("/simulations", RequestOptions::get())
            .await
    }

    pub async fn simulation(&self, id: SimId) -> Result<DetailRecord, RequestError> {
        self.client
            .request_json(&format!("/simulations/{}", id.0), RequestOptions::get())
            .await
    }

    pub async fn create(&self, payload: &CreatePayload) -> Result<CreatedRecord, RequestError> {
        let body = serde_json::to_value(payload).map_err(|e| RequestError::Decode {
            path: "/simulations".into(),
            reason: e.to_string(),
        })?;
        self.client
            .request_json("/simulations", RequestOptions::post().json(body))
            .await
    }

    /// The response body is not needed, only success.
    pub async fn start(&self, id: SimId) -> Result<(), RequestError> {
        self.client
            .request(&format!("/simulations/{}/start", id.0), RequestOptions::post())
            .await
            .map(|_| ())
    }

    pub async fn clone_simulation(&self, id: SimId) -> Result<CreatedRecord, RequestError> {
        self.client
            .request_json(&format!("/simulations/{}/clone", id.0), RequestOptions::post())
            .await
    }

    pub async fn delete(&self, id: SimId) -> Result<(), RequestError> {
        self.client
            .request(&format!("/simulations/{}", id.0), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    pub fn export_url(&self, id: SimId) -> String {
        self.client.url(&format!("/simulations/{}/export.csv", id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SimMode, SimStatus};

    fn api_for(server: &mockito::ServerGuard) -> SimulationApi {
        SimulationApi::with_client(RequestClient::new(reqwest::Client::new(), &server.url()))
    }

    #[tokio::test]
    async fn lists_simulations_in_server_order() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/simulations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                {"id":2,"mode":"single","status":"completed","seed":7,"teams":["A","B"],
                 "title":"Match: A vs B","progress":"Completed","scoreboard":"A 2-1 B","outcome":"A 2-1 B"},
                {"id":0,"mode":"knockout4","status":"pending","seed":9,"teams":[],
                 "title":"4-Team Knockout","progress":"Ready to start","scoreboard":"Waiting for kickoff...","outcome":"No result yet"}
            ]"#,
            )
            .create_async()
            .await;

        let sims = api_for(&server).list_simulations().await.unwrap();
        assert_eq!(sims.len(), 2);
        assert_eq!(sims[0].id, SimId(2));
        assert_eq!(sims[0].status, SimStatus::Completed);
        assert_eq!(sims[1].mode, "knockout4");
    }

    #[tokio::test]
    async fn create_posts_payload_and_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/simulations")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "mode": "single",
                "auto_fill": false,
                "teams": ["Arsenal", "Ajax"]
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":11}"#)
            .create_async()
            .await;

        let payload = CreatePayload {
            mode: SimMode::Single,
            auto_fill: false,
            teams: Some(vec!["Arsenal".into(), "Ajax".into()]),
        };
        let created = api_for(&server).create(&payload).await.unwrap();
        assert_eq!(created.id, SimId(11));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn start_accepts_any_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/simulations/4/start")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":4,"status":"running"}"#)
            .create_async()
            .await;

        api_for(&server).start(SimId(4)).await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_record_reports_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/simulations/8")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"simulation 8 not found"}"#)
            .create_async()
            .await;

        let err = api_for(&server).delete(SimId(8)).await.unwrap_err();
        assert_eq!(err.to_string(), "simulation 8 not found");
    }
}
