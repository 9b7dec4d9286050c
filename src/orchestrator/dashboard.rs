//! The controller's state context.
//!
//! `Dashboard` owns the store, the rendering surface, the detail panel, the overlay
//! flags and the status line. Only the controller task holds one, so every state
//! change goes through these methods in completion-arrival order.

use super::actions::{ActionOutcome, Completion, RefreshOutcome};
use crate::error::{ActionError, RequestError};
use crate::model::{
    CreatePayload, DetailRecord, ServerConfig, SimId, SimMode, SimulationRecord, Snapshot,
    TeamRecord,
};
use crate::payload::build_create_payload;
use crate::store::StateStore;
use crate::view::{
    reconcile, sync_selection, DashboardView, DetailPanel, DetailSync, DetailViewController,
    ModalController, Overlay,
};
use std::fmt::Display;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct Dashboard {
    store: StateStore,
    view: DashboardView,
    detail: DetailViewController,
    modals: ModalController,
    status: String,
    last_refresh: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn detail_panel(&self) -> Option<&DetailPanel> {
        self.detail.panel()
    }

    pub fn modals(&self) -> &ModalController {
        &self.modals
    }

    pub fn last_refresh(&self) -> Option<&str> {
        self.last_refresh.as_deref()
    }

    pub fn record(&self, id: SimId) -> Option<&SimulationRecord> {
        self.store.simulations().iter().find(|s| s.id == id)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn report_failure(&mut self, action: &str, err: &dyn Display) {
        warn!(action, error = %err, "operation failed");
        self.status = format!("{action} failed: {err}");
    }

    /// Apply any completion. Returns true when an immediate refresh should follow.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Config(result) => {
                self.apply_config(result);
                false
            }
            Completion::Teams(result) => {
                self.apply_teams(result);
                false
            }
            Completion::Refresh(outcome) => {
                self.apply_refresh(outcome);
                false
            }
            Completion::Detail(id, result) => {
                self.apply_detail(id, result);
                false
            }
            Completion::Action(outcome) => self.apply_action(outcome),
        }
    }

    pub fn apply_config(&mut self, result: Result<ServerConfig, RequestError>) {
        match result {
            Ok(cfg) => {
                debug!(demo = cfg.demo, "server config loaded");
                self.store.set_demo(cfg.demo);
            }
            Err(e) => {
                self.store.set_demo(false);
                self.report_failure("Config", &e);
            }
        }
    }

    pub fn apply_teams(&mut self, result: Result<Vec<TeamRecord>, RequestError>) {
        match result {
            Ok(teams) => {
                debug!(count = teams.len(), "teams loaded");
                self.store.set_teams(teams);
            }
            Err(e) => self.report_failure("Teams", &e),
        }
    }

    /// Reconcile the surface with the polled list and keep the detail selection consistent.
    pub fn apply_refresh(&mut self, outcome: RefreshOutcome) {
        let simulations = match outcome.simulations {
            Ok(list) => list,
            Err(e) => {
                self.report_failure("Refresh", &e);
                return;
            }
        };

        let report = reconcile(&mut self.view, &simulations);
        if !report.is_noop() {
            debug!(
                ?report,
                mutations = self.view.mutation_count(),
                placeholder = self.view.has_placeholder(),
                "dashboard reconciled"
            );
        }
        self.store.apply_refresh(simulations);
        self.last_refresh = Some(clock_label());

        match sync_selection(self.store.selection(), self.store.simulations()) {
            DetailSync::Idle => {}
            DetailSync::Orphaned(id) => {
                info!(%id, "selected simulation disappeared; closing detail");
                self.close_overlay(Overlay::Detail);
            }
            DetailSync::Refetch(id) => match outcome.detail {
                // Fetched for a selection that has since changed: drop it.
                Some((fetched, _)) if fetched != id => {}
                Some((_, Ok(record))) => self.detail.show(&record),
                Some((_, Err(e))) => self.report_failure("Refresh", &e),
                None => {}
            },
        }
    }

    /// Result of an explicit view request: select, render and open the overlay.
    pub fn apply_detail(&mut self, id: SimId, result: Result<DetailRecord, RequestError>) {
        match result {
            Ok(record) => {
                self.store.select(id);
                self.detail.show(&record);
                self.modals.open(Overlay::Detail);
            }
            Err(e) => self.report_failure("View", &e),
        }
    }

    /// Returns true when the action succeeded and changed server state.
    pub fn apply_action(&mut self, outcome: ActionOutcome) -> bool {
        match outcome {
            ActionOutcome::Created(Ok(created)) => {
                info!(id = %created.id, "simulation created");
                self.modals.close(Overlay::Create, &mut self.store);
                self.status = format!("Created {}", created.id);
                true
            }
            ActionOutcome::Created(Err(e)) => {
                self.report_failure("Create", &e);
                false
            }
            ActionOutcome::Started(id, Ok(())) => {
                info!(%id, "simulation started");
                self.status = format!("Started {id}");
                true
            }
            ActionOutcome::Started(_, Err(e)) => {
                self.report_failure("Start", &e);
                false
            }
            ActionOutcome::Cloned(id, Ok(created)) => {
                info!(%id, clone = %created.id, "simulation cloned");
                self.status = format!("Cloned {id} as {}", created.id);
                true
            }
            ActionOutcome::Cloned(_, Err(e)) => {
                self.report_failure("Clone", &e);
                false
            }
            ActionOutcome::Deleted(id, Ok(())) => {
                info!(%id, "simulation deleted");
                self.status = format!("Deleted {id}");
                true
            }
            ActionOutcome::Deleted(_, Err(e)) => {
                self.report_failure("Delete", &e);
                false
            }
            ActionOutcome::Exported(id, Ok(path)) => {
                self.status = format!("Exported {id} to {}", path.display());
                false
            }
            ActionOutcome::Exported(_, Err(e)) => {
                let message = format!("{e:#}");
                self.report_failure("Export", &message);
                false
            }
        }
    }

    /// Validate a create request locally. Nothing is sent when this returns `None`.
    pub fn prepare_create(
        &mut self,
        mode: SimMode,
        auto_fill: bool,
        selections: &[String],
    ) -> Option<CreatePayload> {
        match build_create_payload(mode, auto_fill, selections) {
            Ok(payload) => Some(payload),
            Err(e) => {
                self.report_failure("Create", &ActionError::from(e));
                None
            }
        }
    }

    pub fn open_overlay(&mut self, overlay: Overlay) {
        self.modals.open(overlay);
    }

    pub fn close_overlay(&mut self, overlay: Overlay) {
        self.modals.close(overlay, &mut self.store);
        if overlay == Overlay::Detail {
            self.detail.clear();
        }
    }

    pub fn backdrop_click(&mut self, overlay: Overlay, inside_content: bool) {
        if self
            .modals
            .backdrop_click(overlay, inside_content, &mut self.store)
            && overlay == Overlay::Detail
        {
            self.detail.clear();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view().clone(),
            detail: self.detail_panel().cloned(),
            open_overlays: self.modals().open_overlays(),
            status_line: self.status.clone(),
            teams: self.store.teams().to_vec(),
            demo: self.store.demo(),
            last_refresh: self.last_refresh().map(str::to_owned),
        }
    }
}

fn clock_label() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreatedRecord;
    use crate::orchestrator::actions;
    use crate::remote::{RequestClient, SimulationApi};
    use crate::view::SectionKind;

    const SIM_5: &str = r#"{"id":5,"mode":"single","status":"running","seed":3,"teams":["A","B"],
        "title":"Match: A vs B","progress":"Running 10/90","scoreboard":"A 0-0 B","outcome":"No result yet"}"#;
    const SIM_6: &str = r#"{"id":6,"mode":"single","status":"pending","seed":4,"teams":["C","D"],
        "title":"Match: C vs D","progress":"Ready to start","scoreboard":"Waiting for kickoff...","outcome":"No result yet"}"#;
    const DETAIL_5: &str = r#"{"id":5,"mode":"single","status":"running","seed":3,"teams":["A","B"],
        "title":"Match: A vs B","progress":"Running 10/90","scoreboard":"A 0-0 B","outcome":"No result yet",
        "logs":["Kickoff"],"stats_lines":[],"competition_lines":[],"history_lines":[]}"#;

    fn api_for(server: &mockito::ServerGuard) -> SimulationApi {
        SimulationApi::with_client(RequestClient::new(reqwest::Client::new(), &server.url()))
    }

    // Same chains the controller spawns, applied inline.
    async fn poll_once(dash: &mut Dashboard, api: &SimulationApi) {
        let outcome = actions::refresh_cycle(api, dash.store().selection()).await;
        dash.apply(Completion::Refresh(outcome));
    }

    async fn open_detail(dash: &mut Dashboard, api: &SimulationApi, id: SimId) {
        let completion = actions::load_detail(api, id).await;
        dash.apply(completion);
    }

    fn status_line(dash: &Dashboard) -> String {
        dash.snapshot().status_line
    }

    async fn mock_list(server: &mut mockito::ServerGuard, body: String) -> mockito::Mock {
        server
            .mock("GET", "/simulations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn mock_detail(server: &mut mockito::ServerGuard, hits: usize) -> mockito::Mock {
        server
            .mock("GET", "/simulations/5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DETAIL_5)
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn detail_closes_when_selection_disappears() {
        let mut server = mockito::Server::new_async().await;
        let api = api_for(&server);
        let _detail = mock_detail(&mut server, 1).await;
        let mut dash = Dashboard::new();

        open_detail(&mut dash, &api, SimId(5)).await;
        assert_eq!(dash.store().selection(), Some(SimId(5)));
        assert!(dash.modals().is_open(Overlay::Detail));
        let panel = dash.detail_panel().unwrap();
        assert_eq!(
            panel.section(SectionKind::Stats).unwrap().lines[0],
            "No stats available yet. Start a simulation first."
        );

        let _list = mock_list(&mut server, format!("[{SIM_6}]")).await;
        poll_once(&mut dash, &api).await;

        assert_eq!(dash.store().selection(), None);
        assert!(!dash.modals().is_open(Overlay::Detail));
        assert!(dash.detail_panel().is_none());
        assert!(status_line(&dash).is_empty());
    }

    #[tokio::test]
    async fn listed_selection_is_fetched_again() {
        let mut server = mockito::Server::new_async().await;
        let api = api_for(&server);
        let detail = mock_detail(&mut server, 2).await;
        let _list = mock_list(&mut server, format!("[{SIM_5},{SIM_6}]")).await;
        let mut dash = Dashboard::new();

        open_detail(&mut dash, &api, SimId(5)).await;
        poll_once(&mut dash, &api).await;

        detail.assert_async().await;
        assert_eq!(dash.store().selection(), Some(SimId(5)));
        assert!(dash.modals().is_open(Overlay::Detail));
        assert_eq!(dash.view().order(), &[SimId(5), SimId(6)]);
        assert!(dash.last_refresh().is_some());
    }

    #[tokio::test]
    async fn failing_poll_reports_server_message() {
        let mut server = mockito::Server::new_async().await;
        let api = api_for(&server);
        let _list = server
            .mock("GET", "/simulations")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"boom"}"#)
            .create_async()
            .await;
        let mut dash = Dashboard::new();

        poll_once(&mut dash, &api).await;
        assert_eq!(status_line(&dash), "Refresh failed: boom");
        assert!(dash.view().is_empty());
        assert!(dash.last_refresh().is_none());
    }

    #[test]
    fn stale_detail_result_is_ignored() {
        let mut dash = Dashboard::new();
        let sims: Vec<SimulationRecord> = vec![
            serde_json::from_str(SIM_5).unwrap(),
            serde_json::from_str(SIM_6).unwrap(),
        ];
        dash.store_mut().select(SimId(6));
        let detail: DetailRecord = serde_json::from_str(DETAIL_5).unwrap();

        dash.apply_refresh(RefreshOutcome {
            simulations: Ok(sims),
            detail: Some((SimId(5), Ok(detail))),
        });
        assert!(dash.detail_panel().is_none());
        assert_eq!(dash.store().selection(), Some(SimId(6)));
    }

    #[test]
    fn invalid_create_is_reported_without_payload() {
        let mut dash = Dashboard::new();
        let picks = vec!["A".to_string(), "A".to_string()];
        assert!(dash.prepare_create(SimMode::Single, false, &picks).is_none());
        assert_eq!(status_line(&dash), "Create failed: select unique teams for this mode");
    }

    #[test]
    fn successful_mutations_request_refresh() {
        let mut dash = Dashboard::new();
        dash.open_overlay(Overlay::Create);
        let created = Ok(CreatedRecord { id: SimId(9) });
        assert!(dash.apply_action(ActionOutcome::Created(created)));
        assert!(!dash.modals().is_open(Overlay::Create));
        assert_eq!(status_line(&dash), "Created sim-9");

        let failed = Err(RequestError::Status {
            status: 404,
            message: "simulation 9 not found".into(),
        });
        assert!(!dash.apply_action(ActionOutcome::Deleted(SimId(9), failed)));
        assert_eq!(status_line(&dash), "Delete failed: simulation 9 not found");
    }

    #[test]
    fn failed_config_falls_back_to_non_demo() {
        let mut dash = Dashboard::new();
        dash.apply_config(Err(RequestError::Transport("connection refused".into())));
        assert!(!dash.store().demo());
        assert_eq!(status_line(&dash), "Config failed: connection refused");
    }
}
