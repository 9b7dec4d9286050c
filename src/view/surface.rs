//! Retained view tree painted by the presentation layer.
//!
//! Every primitive that changes the tree bumps a mutation counter, which is how
//! callers observe that a reconcile pass was (or was not) a no-op.

use crate::model::{Action, SimId, SimStatus, SimulationRecord};
use std::collections::HashMap;

pub const EMPTY_PLACEHOLDER: &str = "No simulations yet. Press n, l, or o to create one.";

/// Instance identity of a node. Assigned once at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Identity,
    Progress,
    Scoreboard,
    Outcome,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Title,
        TextField::Identity,
        TextField::Progress,
        TextField::Scoreboard,
        TextField::Outcome,
    ];

    /// Value of this field as the record would render it.
    pub fn render(self, record: &SimulationRecord) -> String {
        match self {
            TextField::Title => record.title.clone(),
            TextField::Identity => record.identity_line(),
            TextField::Progress => record.progress.clone(),
            TextField::Scoreboard => record.scoreboard.clone(),
            TextField::Outcome => record.outcome.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    key: NodeKey,
    id: SimId,
    title: String,
    identity: String,
    progress: String,
    scoreboard: String,
    outcome: String,
    status: SimStatus,
    actions: Vec<Action>,
    action_builds: u32,
}

impl ViewNode {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn id(&self) -> SimId {
        self.id
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title => &self.title,
            TextField::Identity => &self.identity,
            TextField::Progress => &self.progress,
            TextField::Scoreboard => &self.scoreboard,
            TextField::Outcome => &self.outcome,
        }
    }

    /// Last rendered status tag.
    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn offers(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// How many times the action region has been built, including the first build.
    pub fn action_builds(&self) -> u32 {
        self.action_builds
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Title => &mut self.title,
            TextField::Identity => &mut self.identity,
            TextField::Progress => &mut self.progress,
            TextField::Scoreboard => &mut self.scoreboard,
            TextField::Outcome => &mut self.outcome,
        }
    }
}

/// One child of the surface, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child<'a> {
    Node(&'a ViewNode),
    Placeholder,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    nodes: HashMap<SimId, ViewNode>,
    order: Vec<SimId>,
    placeholder: bool,
    next_key: u64,
    mutations: u64,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn node(&self, id: SimId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    pub fn order(&self) -> &[SimId] {
        &self.order
    }

    pub fn position(&self, id: SimId) -> Option<usize> {
        self.order.iter().position(|x| *x == id)
    }

    /// Nodes in paint order.
    pub fn nodes(&self) -> impl Iterator<Item = &ViewNode> + '_ {
        self.order.iter().filter_map(move |id| self.nodes.get(id))
    }

    pub fn node_at(&self, index: usize) -> Option<&ViewNode> {
        self.order.get(index).and_then(|id| self.nodes.get(id))
    }

    pub fn children(&self) -> Vec<Child<'_>> {
        let mut out: Vec<Child<'_>> = self.nodes().map(Child::Node).collect();
        if self.placeholder {
            out.push(Child::Placeholder);
        }
        out
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub(crate) fn append_node(&mut self, record: &SimulationRecord) {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        let node = ViewNode {
            key,
            id: record.id,
            title: TextField::Title.render(record),
            identity: TextField::Identity.render(record),
            progress: TextField::Progress.render(record),
            scoreboard: TextField::Scoreboard.render(record),
            outcome: TextField::Outcome.render(record),
            status: record.status,
            actions: record.status.actions().to_vec(),
            action_builds: 1,
        };
        self.nodes.insert(record.id, node);
        self.order.push(record.id);
        self.mutations += 1;
    }

    /// Write `value` only when it differs from what is rendered.
    pub(crate) fn set_text(&mut self, id: SimId, field: TextField, value: &str) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let slot = node.text_mut(field);
        if slot == value {
            return false;
        }
        slot.clear();
        slot.push_str(value);
        self.mutations += 1;
        true
    }

    pub(crate) fn set_status(&mut self, id: SimId, status: SimStatus) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.status == status {
            return false;
        }
        node.status = status;
        self.mutations += 1;
        true
    }

    pub(crate) fn rebuild_actions(&mut self, id: SimId, status: SimStatus) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.actions = status.actions().to_vec();
            node.action_builds += 1;
            self.mutations += 1;
        }
    }

    /// Relocate an existing node to `index` without recreating it.
    pub(crate) fn move_node(&mut self, id: SimId, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        if from == index {
            return false;
        }
        let id = self.order.remove(from);
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        self.mutations += 1;
        true
    }

    pub(crate) fn remove_node(&mut self, id: SimId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|x| *x != id);
        self.mutations += 1;
        true
    }

    /// No-op when a placeholder is already present.
    pub(crate) fn insert_placeholder(&mut self) -> bool {
        if self.placeholder {
            return false;
        }
        self.placeholder = true;
        self.mutations += 1;
        true
    }

    pub(crate) fn remove_placeholder(&mut self) -> bool {
        if !self.placeholder {
            return false;
        }
        self.placeholder = false;
        self.mutations += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> SimulationRecord {
        SimulationRecord {
            id: SimId(id),
            mode: "single".into(),
            status: SimStatus::Pending,
            seed: 100 + id,
            teams: Vec::new(),
            title: format!("Match {id}"),
            progress: "Ready to start".into(),
            scoreboard: "Waiting for kickoff...".into(),
            outcome: "No result yet".into(),
        }
    }

    #[test]
    fn append_assigns_fresh_keys() {
        let mut view = DashboardView::new();
        view.append_node(&record(1));
        view.append_node(&record(2));
        let a = view.node(SimId(1)).unwrap().key();
        let b = view.node(SimId(2)).unwrap().key();
        assert_ne!(a, b);
        assert_eq!(view.node(SimId(1)).unwrap().text(TextField::Identity), "sim-1 | single | seed=101");
        assert_eq!(view.mutation_count(), 2);
    }

    #[test]
    fn set_text_skips_identical_values() {
        let mut view = DashboardView::new();
        view.append_node(&record(1));
        let before = view.mutation_count();
        assert!(!view.set_text(SimId(1), TextField::Title, "Match 1"));
        assert_eq!(view.mutation_count(), before);
        assert!(view.set_text(SimId(1), TextField::Title, "Renamed"));
        assert_eq!(view.mutation_count(), before + 1);
    }

    #[test]
    fn placeholder_insert_is_idempotent() {
        let mut view = DashboardView::new();
        assert!(view.insert_placeholder());
        assert!(!view.insert_placeholder());
        assert_eq!(view.children(), vec![Child::Placeholder]);
        assert_eq!(view.mutation_count(), 1);
    }

    #[test]
    fn move_node_keeps_instance() {
        let mut view = DashboardView::new();
        for id in 1..=3 {
            view.append_node(&record(id));
        }
        let key = view.node(SimId(3)).unwrap().key();
        assert!(view.move_node(SimId(3), 0));
        assert_eq!(view.order(), &[SimId(3), SimId(1), SimId(2)]);
        assert_eq!(view.node(SimId(3)).unwrap().key(), key);
    }
}
