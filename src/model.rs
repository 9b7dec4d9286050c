use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::view::DetailPanel;
use crate::view::DashboardView;
use crate::view::Overlay;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub user_agent: String,
    pub export_dir: PathBuf,
    pub prefs_path: Option<PathBuf>,
}

/// Server-assigned simulation identifier. Never reused once deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimId(pub u64);

impl fmt::Display for SimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sim-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimMode {
    Single,
    League4,
    Knockout4,
}

impl SimMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SimMode::Single => "single",
            SimMode::League4 => "league4",
            SimMode::Knockout4 => "knockout4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimMode::Single => "Single Match",
            SimMode::League4 => "4-Team League",
            SimMode::Knockout4 => "4-Team Knockout",
        }
    }

    /// Number of distinct teams a run of this mode needs.
    pub fn required_teams(self) -> usize {
        match self {
            SimMode::Single => 2,
            SimMode::League4 | SimMode::Knockout4 => 4,
        }
    }

    pub fn next(self) -> Self {
        match self {
            SimMode::Single => SimMode::League4,
            SimMode::League4 => SimMode::Knockout4,
            SimMode::Knockout4 => SimMode::Single,
        }
    }
}

impl fmt::Display for SimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a run as reported by the server. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimStatus {
    Pending,
    Running,
    Completed,
}

impl SimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SimStatus::Pending => "pending",
            SimStatus::Running => "running",
            SimStatus::Completed => "completed",
        }
    }

    /// Fixed action set offered for each status class.
    pub fn actions(self) -> &'static [Action] {
        match self {
            SimStatus::Pending => &[Action::View, Action::Start, Action::Clone, Action::Delete],
            SimStatus::Running => &[Action::View, Action::Clone, Action::Delete],
            SimStatus::Completed => &[Action::View, Action::Export, Action::Clone, Action::Delete],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Start,
    Export,
    Clone,
    Delete,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Start => "start",
            Action::Export => "export",
            Action::Clone => "clone",
            Action::Delete => "delete",
        }
    }

    /// Key that triggers the action in the dashboard list.
    pub fn key(self) -> char {
        match self {
            Action::View => 'v',
            Action::Start => 's',
            Action::Export => 'e',
            Action::Clone => 'c',
            Action::Delete => 'd',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: SimId,
    /// Mode id as the server reports it. Display only, so unknown modes still decode.
    pub mode: String,
    pub status: SimStatus,
    pub seed: u64,
    #[serde(default)]
    pub teams: Vec<String>,
    pub title: String,
    pub progress: String,
    pub scoreboard: String,
    pub outcome: String,
}

impl SimulationRecord {
    pub fn identity_line(&self) -> String {
        format!("{} | {} | seed={}", self.id, self.mode, self.seed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(flatten)]
    pub summary: SimulationRecord,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub stats_lines: Vec<String>,
    #[serde(default)]
    pub competition_lines: Vec<String>,
    #[serde(default)]
    pub history_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub demo: bool,
}

/// Body returned by create and clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: SimId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub mode: SimMode,
    pub auto_fill: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,
}

/// Everything the presentation layer needs to paint one frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub view: DashboardView,
    pub detail: Option<DetailPanel>,
    pub open_overlays: Vec<Overlay>,
    pub status_line: String,
    pub teams: Vec<TeamRecord>,
    pub demo: bool,
    pub last_refresh: Option<String>,
}

/// Events emitted by the controller and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Snapshot(Box<Snapshot>),
    Exported(PathBuf),
}
