//! Detail overlay contents and the rule that keeps a selection consistent with polls.

use crate::model::{DetailRecord, SimId, SimStatus, SimulationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Logs,
    Stats,
    Competition,
    History,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Logs,
        SectionKind::Stats,
        SectionKind::Competition,
        SectionKind::History,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Logs => "Logs",
            SectionKind::Stats => "Stats",
            SectionKind::Competition => "Standings / Bracket",
            SectionKind::History => "History",
        }
    }

    /// Shown in place of an empty section.
    pub fn fallback(self) -> &'static str {
        match self {
            SectionKind::Logs => "No log lines yet.",
            SectionKind::Stats => "No stats available yet. Start a simulation first.",
            SectionKind::Competition => "No standings/bracket available for this simulation yet.",
            SectionKind::History => "No history entries yet.",
        }
    }

    fn lines(self, record: &DetailRecord) -> &[String] {
        match self {
            SectionKind::Logs => &record.logs,
            SectionKind::Stats => &record.stats_lines,
            SectionKind::Competition => &record.competition_lines,
            SectionKind::History => &record.history_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
    pub is_fallback: bool,
}

impl DetailSection {
    fn render(kind: SectionKind, record: &DetailRecord) -> Self {
        let lines = kind.lines(record);
        if lines.is_empty() {
            Self {
                kind,
                lines: vec![kind.fallback().to_string()],
                is_fallback: true,
            }
        } else {
            Self {
                kind,
                lines: lines.to_vec(),
                is_fallback: false,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub id: SimId,
    pub mode: String,
    pub status: SimStatus,
    pub title: String,
    pub identity: String,
    pub progress: String,
    pub scoreboard: String,
    pub outcome: String,
    pub teams: Vec<String>,
    pub sections: Vec<DetailSection>,
}

impl DetailPanel {
    pub fn from_record(record: &DetailRecord) -> Self {
        let s = &record.summary;
        Self {
            id: s.id,
            mode: s.mode.clone(),
            status: s.status,
            title: s.title.clone(),
            identity: s.identity_line(),
            progress: s.progress.clone(),
            scoreboard: s.scoreboard.clone(),
            outcome: s.outcome.clone(),
            teams: s.teams.clone(),
            sections: SectionKind::ALL
                .iter()
                .map(|kind| DetailSection::render(*kind, record))
                .collect(),
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&DetailSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Owns the rendered detail panel, if any.
#[derive(Debug, Clone, Default)]
pub struct DetailViewController {
    panel: Option<DetailPanel>,
}

impl DetailViewController {
    pub fn show(&mut self, record: &DetailRecord) {
        self.panel = Some(DetailPanel::from_record(record));
    }

    pub fn clear(&mut self) {
        self.panel = None;
    }

    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }
}

/// What a refresh cycle must do about the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSync {
    Idle,
    /// Selection still listed: fetch it again so the overlay stays live.
    Refetch(SimId),
    /// Selection deleted elsewhere: clear it and close the overlay.
    Orphaned(SimId),
}

pub fn sync_selection(selection: Option<SimId>, latest: &[SimulationRecord]) -> DetailSync {
    match selection {
        None => DetailSync::Idle,
        Some(id) if latest.iter().any(|r| r.id == id) => DetailSync::Refetch(id),
        Some(id) => DetailSync::Orphaned(id),
    }
}
