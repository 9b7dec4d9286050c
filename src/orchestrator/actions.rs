//! Network halves of every dashboard operation.
//!
//! Each function performs its exchanges and returns a `Completion`; none of them
//! touch dashboard state. The controller applies completions in arrival order.

use crate::error::{ActionError, RequestError};
use crate::model::{
    CreatePayload, CreatedRecord, DetailRecord, ServerConfig, SimId, SimulationRecord, TeamRecord,
};
use crate::remote::{download_csv, SimulationApi};
use crate::view::{sync_selection, DetailSync};
use std::path::{Path, PathBuf};

/// Result of one refresh cycle.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub simulations: Result<Vec<SimulationRecord>, RequestError>,
    /// Re-fetched detail for the selection current when the cycle started, if it was still listed.
    pub detail: Option<(SimId, Result<DetailRecord, RequestError>)>,
}

#[derive(Debug)]
pub enum ActionOutcome {
    Created(Result<CreatedRecord, ActionError>),
    Started(SimId, Result<(), RequestError>),
    Cloned(SimId, Result<CreatedRecord, RequestError>),
    Deleted(SimId, Result<(), RequestError>),
    Exported(SimId, anyhow::Result<PathBuf>),
}

#[derive(Debug)]
pub enum Completion {
    Config(Result<ServerConfig, RequestError>),
    Teams(Result<Vec<TeamRecord>, RequestError>),
    Refresh(RefreshOutcome),
    Detail(SimId, Result<DetailRecord, RequestError>),
    Action(ActionOutcome),
}

pub async fn fetch_config(api: &SimulationApi) -> Completion {
    Completion::Config(api.config().await)
}

pub async fn fetch_teams(api: &SimulationApi) -> Completion {
    Completion::Teams(api.teams().await)
}

/// Poll the simulation list, then re-fetch the selection when it is still listed.
/// Teams are not re-polled.
pub async fn refresh_cycle(api: &SimulationApi, selection: Option<SimId>) -> RefreshOutcome {
    let simulations = api.list_simulations().await;
    let detail = match &simulations {
        Ok(list) => match sync_selection(selection, list) {
            DetailSync::Refetch(id) => Some((id, api.simulation(id).await)),
            DetailSync::Idle | DetailSync::Orphaned(_) => None,
        },
        Err(_) => None,
    };
    RefreshOutcome {
        simulations,
        detail,
    }
}

pub async fn load_detail(api: &SimulationApi, id: SimId) -> Completion {
    Completion::Detail(id, api.simulation(id).await)
}

pub async fn create(api: &SimulationApi, payload: CreatePayload) -> Completion {
    let result = api.create(&payload).await.map_err(ActionError::from);
    Completion::Action(ActionOutcome::Created(result))
}

pub async fn start(api: &SimulationApi, id: SimId) -> Completion {
    Completion::Action(ActionOutcome::Started(id, api.start(id).await))
}

pub async fn clone_simulation(api: &SimulationApi, id: SimId) -> Completion {
    Completion::Action(ActionOutcome::Cloned(id, api.clone_simulation(id).await))
}

pub async fn delete(api: &SimulationApi, id: SimId) -> Completion {
    Completion::Action(ActionOutcome::Deleted(id, api.delete(id).await))
}

pub async fn export(api: &SimulationApi, id: SimId, mode: &str, dir: &Path) -> Completion {
    let result = download_csv(api, id, mode, dir).await;
    Completion::Action(ActionOutcome::Exported(id, result))
}
