use super::surface::{DashboardView, TextField};
use crate::model::{SimId, SimulationRecord};
use std::collections::HashSet;

/// What one reconcile pass changed. All zero means the pass was a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub rebuilt: usize,
    pub moved: usize,
    pub removed: usize,
    pub placeholder_changed: bool,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Bring `view` in line with `records` using the fewest mutations.
///
/// After the pass, the node ids equal the record ids and paint order equals
/// record order. Nodes whose id survives keep their instance. A repeated id in
/// `records` is taken at its first position.
pub fn reconcile(view: &mut DashboardView, records: &[SimulationRecord]) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let mut seen = HashSet::with_capacity(records.len());
    let records: Vec<&SimulationRecord> = records.iter().filter(|r| seen.insert(r.id)).collect();

    for rec in &records {
        let Some(node) = view.node(rec.id) else {
            view.append_node(rec);
            report.created += 1;
            continue;
        };

        // Status is compared against the tag recorded at the previous render.
        let status_changed = node.status() != rec.status;

        for field in TextField::ALL {
            let value = field.render(rec);
            if view.set_text(rec.id, field, &value) {
                report.updated += 1;
            }
        }

        if status_changed {
            view.set_status(rec.id, rec.status);
            view.rebuild_actions(rec.id, rec.status);
            report.rebuilt += 1;
        }
    }

    for (index, rec) in records.iter().enumerate() {
        if view.move_node(rec.id, index) {
            report.moved += 1;
        }
    }

    let stale: Vec<SimId> = view.order().iter().copied().filter(|id| !seen.contains(id)).collect();
    for id in stale {
        if view.remove_node(id) {
            report.removed += 1;
        }
    }

    report.placeholder_changed = if records.is_empty() {
        view.insert_placeholder()
    } else {
        view.remove_placeholder()
    };

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, SimStatus};
    use crate::view::surface::{Child, EMPTY_PLACEHOLDER};
    use proptest::prelude::*;

    fn record(id: u64, status: SimStatus) -> SimulationRecord {
        SimulationRecord {
            id: SimId(id),
            mode: "single".into(),
            status,
            seed: 1000 + id,
            teams: vec!["Arsenal".into(), "Ajax".into()],
            title: "Match: Arsenal vs Ajax".into(),
            progress: "Ready to start".into(),
            scoreboard: "Waiting for kickoff...".into(),
            outcome: "No result yet".into(),
        }
    }

    fn pending(ids: &[u64]) -> Vec<SimulationRecord> {
        ids.iter().map(|id| record(*id, SimStatus::Pending)).collect()
    }

    #[test]
    fn second_identical_pass_mutates_nothing() {
        let mut view = DashboardView::new();
        let records = pending(&[3, 1, 2]);
        let first = reconcile(&mut view, &records);
        assert_eq!(first.created, 3);

        let before = view.mutation_count();
        let second = reconcile(&mut view, &records);
        assert!(second.is_noop());
        assert_eq!(view.mutation_count(), before);
    }

    #[test]
    fn surviving_ids_keep_their_node_instance() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &pending(&[1, 2]));
        let key = view.node(SimId(2)).unwrap().key();

        let mut changed = record(2, SimStatus::Running);
        changed.title = "Renamed".into();
        changed.progress = "Running 10/90".into();
        changed.scoreboard = "Arsenal 1-0 Ajax".into();
        reconcile(&mut view, &[changed, record(1, SimStatus::Pending)]);

        let node = view.node(SimId(2)).unwrap();
        assert_eq!(node.key(), key);
        assert_eq!(node.text(TextField::Title), "Renamed");
        assert_eq!(view.order(), &[SimId(2), SimId(1)]);
    }

    #[test]
    fn dropping_one_id_removes_exactly_that_node() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &pending(&[1, 2, 3]));
        let keep1 = view.node(SimId(1)).unwrap().key();
        let keep3 = view.node(SimId(3)).unwrap().key();

        let report = reconcile(&mut view, &pending(&[1, 3]));
        assert_eq!(report.removed, 1);
        assert!(view.node(SimId(2)).is_none());
        assert_eq!(view.node(SimId(1)).unwrap().key(), keep1);
        assert_eq!(view.node(SimId(3)).unwrap().key(), keep3);
        assert_eq!(view.order(), &[SimId(1), SimId(3)]);
    }

    #[test]
    fn progress_change_alone_does_not_rebuild_actions() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &[record(7, SimStatus::Running)]);

        let mut next = record(7, SimStatus::Running);
        next.progress = "Running 40/90".into();
        let report = reconcile(&mut view, &[next]);

        assert_eq!(report.updated, 1);
        assert_eq!(report.rebuilt, 0);
        assert_eq!(view.node(SimId(7)).unwrap().action_builds(), 1);
    }

    #[test]
    fn status_change_rebuilds_actions() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &[record(7, SimStatus::Pending)]);
        assert!(view.node(SimId(7)).unwrap().offers(Action::Start));

        let report = reconcile(&mut view, &[record(7, SimStatus::Running)]);
        let node = view.node(SimId(7)).unwrap();
        assert_eq!(report.rebuilt, 1);
        assert_eq!(node.action_builds(), 2);
        assert_eq!(node.status_label(), "running");
        assert!(!node.offers(Action::Start));
        assert!(!node.offers(Action::Export));

        reconcile(&mut view, &[record(7, SimStatus::Completed)]);
        let node = view.node(SimId(7)).unwrap();
        assert_eq!(node.action_builds(), 3);
        assert!(node.offers(Action::Export));
    }

    #[test]
    fn empty_sequence_leaves_a_single_placeholder() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &pending(&[1, 2]));

        let report = reconcile(&mut view, &[]);
        assert_eq!(report.removed, 2);
        assert!(report.placeholder_changed);
        assert_eq!(view.children(), vec![Child::Placeholder]);

        let again = reconcile(&mut view, &[]);
        assert!(again.is_noop());
        assert_eq!(view.children().len(), 1);
        assert!(!EMPTY_PLACEHOLDER.is_empty());
    }

    #[test]
    fn placeholder_goes_away_when_records_arrive() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &[]);
        reconcile(&mut view, &pending(&[4]));
        assert!(!view.has_placeholder());
        assert_eq!(view.children().len(), 1);
    }

    #[test]
    fn repeated_id_is_rendered_once() {
        let mut view = DashboardView::new();
        reconcile(&mut view, &pending(&[1, 2, 1]));
        assert_eq!(view.order(), &[SimId(1), SimId(2)]);
    }

    proptest! {
        #[test]
        fn render_order_matches_any_permutation(
            order in Just((0u64..8).collect::<Vec<_>>()).prop_shuffle(),
            next in Just((0u64..8).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            let mut view = DashboardView::new();
            reconcile(&mut view, &pending(&order));
            let keys: Vec<_> = order.iter().map(|id| view.node(SimId(*id)).unwrap().key()).collect();

            reconcile(&mut view, &pending(&next));
            let expected: Vec<SimId> = next.iter().map(|id| SimId(*id)).collect();
            prop_assert_eq!(view.order(), expected.as_slice());
            for (id, key) in order.iter().zip(keys) {
                prop_assert_eq!(view.node(SimId(*id)).unwrap().key(), key);
            }
            prop_assert_eq!(reconcile(&mut view, &pending(&next)).created, 0);
        }
    }
}
