//! Single in-memory mirror of remote state plus UI selection.

use crate::model::{SimId, SimulationRecord, TeamRecord};
use crate::orchestrator::PollTimer;
use tracing::debug;

#[derive(Debug, Default)]
pub struct StateStore {
    teams: Vec<TeamRecord>,
    simulations: Vec<SimulationRecord>,
    selection: Option<SimId>,
    demo: bool,
    poll_timer: Option<PollTimer>,
}

impl StateStore {
    pub fn teams(&self) -> &[TeamRecord] {
        &self.teams
    }

    pub fn simulations(&self) -> &[SimulationRecord] {
        &self.simulations
    }

    pub fn selection(&self) -> Option<SimId> {
        self.selection
    }

    pub fn demo(&self) -> bool {
        self.demo
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
    }

    pub fn set_teams(&mut self, teams: Vec<TeamRecord>) {
        self.teams = teams;
    }

    /// Replace the mirrored sequence with the latest poll result, keeping server order.
    pub fn apply_refresh(&mut self, simulations: Vec<SimulationRecord>) {
        self.simulations = simulations;
    }

    pub fn select(&mut self, id: SimId) {
        self.selection = Some(id);
    }

    pub fn clear_selection(&mut self) -> Option<SimId> {
        self.selection.take()
    }

    /// Install the active poll timer. The previous timer, if any, is stopped.
    pub fn install_poll_timer(&mut self, timer: PollTimer) {
        if let Some(previous) = self.poll_timer.replace(timer) {
            previous.stop();
        }
    }

    pub fn stop_polling(&mut self) {
        if let Some(timer) = self.poll_timer.take() {
            debug!(
                was_active = timer.is_active(),
                interval_ms = timer.interval().as_millis() as u64,
                "poll timer stopped"
            );
            timer.stop();
        }
    }

    #[cfg(test)]
    pub fn poll_timer(&self) -> Option<&PollTimer> {
        self.poll_timer.as_ref()
    }
}
