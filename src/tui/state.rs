use crate::model::{SimId, SimMode, Snapshot, TeamRecord};
use crate::theme::Theme;
use crate::view::{Overlay, ViewNode};
use std::path::PathBuf;

/// Create-form contents. Lives only on the UI thread until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDraft {
    pub mode: SimMode,
    pub auto_fill: bool,
    /// One index into the team list per required slot.
    pub slots: Vec<usize>,
    pub selected_slot: usize,
    /// Set once a snapshot has shown the create overlay open.
    pub confirmed: bool,
}

impl CreateDraft {
    pub fn new(mode: SimMode, team_count: usize) -> Self {
        let mut draft = Self {
            mode,
            auto_fill: false,
            slots: Vec::new(),
            selected_slot: 0,
            confirmed: false,
        };
        draft.reset_slots(team_count);
        draft
    }

    fn reset_slots(&mut self, team_count: usize) {
        let n = team_count.max(1);
        self.slots = (0..self.mode.required_teams()).map(|i| i % n).collect();
        self.selected_slot = 0;
    }

    pub fn cycle_mode(&mut self, team_count: usize) {
        self.mode = self.mode.next();
        self.reset_slots(team_count);
    }

    pub fn toggle_auto_fill(&mut self) {
        self.auto_fill = !self.auto_fill;
    }

    pub fn select_next_slot(&mut self) {
        if !self.slots.is_empty() {
            self.selected_slot = (self.selected_slot + 1) % self.slots.len();
        }
    }

    pub fn select_prev_slot(&mut self) {
        if !self.slots.is_empty() {
            self.selected_slot = (self.selected_slot + self.slots.len() - 1) % self.slots.len();
        }
    }

    pub fn cycle_team(&mut self, delta: i32, team_count: usize) {
        if team_count == 0 {
            return;
        }
        if let Some(slot) = self.slots.get_mut(self.selected_slot) {
            let n = team_count as i64;
            *slot = (*slot as i64 + delta as i64).rem_euclid(n) as usize;
        }
    }

    /// Team names for each slot. Slots pointing past the list are skipped.
    pub fn selections(&self, teams: &[TeamRecord]) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(|i| teams.get(*i).map(|t| t.name.clone()))
            .collect()
    }
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub snapshot: Option<Snapshot>,
    pub cursor: usize,
    /// Id under the cursor, so the highlight follows the record when the list reorders.
    pub cursor_id: Option<SimId>,
    pub draft: Option<CreateDraft>,
    pub detail_scroll: u16,
    pub theme: Theme,
    pub prefs_path: Option<PathBuf>,
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            info: String::new(),
            snapshot: None,
            cursor: 0,
            cursor_id: None,
            draft: None,
            detail_scroll: 0,
            theme: Theme::default(),
            prefs_path: None,
            last_exported_path: None,
        }
    }
}

impl UiState {
    pub fn apply_snapshot(&mut self, snap: Snapshot) {
        let status_changed = self
            .snapshot
            .as_ref()
            .map(|prev| prev.status_line != snap.status_line)
            .unwrap_or(!snap.status_line.is_empty());
        if status_changed {
            self.info = snap.status_line.clone();
        }

        let create_open = snap.open_overlays.contains(&Overlay::Create);
        if let Some(draft) = self.draft.as_mut() {
            if create_open {
                draft.confirmed = true;
            } else if draft.confirmed {
                self.draft = None;
            }
        }

        if !snap.open_overlays.contains(&Overlay::Detail) {
            self.detail_scroll = 0;
        }

        let order = snap.view.order();
        self.cursor = match self.cursor_id.and_then(|id| order.iter().position(|x| *x == id)) {
            Some(pos) => pos,
            None => self.cursor.min(order.len().saturating_sub(1)),
        };
        self.cursor_id = order.get(self.cursor).copied();
        self.snapshot = Some(snap);
    }

    pub fn teams(&self) -> &[TeamRecord] {
        self.snapshot.as_ref().map(|s| s.teams.as_slice()).unwrap_or(&[])
    }

    pub fn selected_node(&self) -> Option<&ViewNode> {
        self.snapshot.as_ref()?.view.node_at(self.cursor)
    }

    pub fn overlay_open(&self, overlay: Overlay) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.open_overlays.contains(&overlay))
            .unwrap_or(false)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.snapshot.as_ref().map(|s| s.view.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let next = (self.cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        self.cursor = next;
        self.cursor_id = self.snapshot.as_ref().and_then(|s| s.view.order().get(next).copied());
    }
}
