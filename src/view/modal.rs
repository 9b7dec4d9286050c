use crate::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Create,
    Detail,
}

impl Overlay {
    pub const ALL: [Overlay; 2] = [Overlay::Create, Overlay::Detail];
}

/// Open/closed flag per overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModalController {
    create: bool,
    detail: bool,
}

impl ModalController {
    fn flag(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::Create => &mut self.create,
            Overlay::Detail => &mut self.detail,
        }
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Create => self.create,
            Overlay::Detail => self.detail,
        }
    }

    pub fn open(&mut self, overlay: Overlay) {
        *self.flag(overlay) = true;
    }

    /// Closing the detail overlay also drops the selection.
    pub fn close(&mut self, overlay: Overlay, store: &mut StateStore) {
        *self.flag(overlay) = false;
        if overlay == Overlay::Detail {
            store.clear_selection();
        }
    }

    /// A click on the overlay backdrop closes it; clicks on its content do nothing.
    /// Returns whether the overlay was closed.
    pub fn backdrop_click(
        &mut self,
        overlay: Overlay,
        inside_content: bool,
        store: &mut StateStore,
    ) -> bool {
        if inside_content || !self.is_open(overlay) {
            return false;
        }
        self.close(overlay, store);
        true
    }

    pub fn open_overlays(&self) -> Vec<Overlay> {
        Overlay::ALL
            .into_iter()
            .filter(|o| self.is_open(*o))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimId;

    #[test]
    fn closing_detail_clears_selection() {
        let mut store = StateStore::default();
        let mut modals = ModalController::default();
        store.select(SimId(3));
        modals.open(Overlay::Detail);
        modals.close(Overlay::Detail, &mut store);
        assert!(!modals.is_open(Overlay::Detail));
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn closing_create_keeps_selection() {
        let mut store = StateStore::default();
        let mut modals = ModalController::default();
        store.select(SimId(3));
        modals.open(Overlay::Create);
        modals.close(Overlay::Create, &mut store);
        assert_eq!(store.selection(), Some(SimId(3)));
    }

    #[test]
    fn backdrop_click_matches_explicit_close() {
        let mut store = StateStore::default();
        let mut modals = ModalController::default();
        store.select(SimId(1));
        modals.open(Overlay::Detail);

        assert!(!modals.backdrop_click(Overlay::Detail, true, &mut store));
        assert!(modals.is_open(Overlay::Detail));
        assert_eq!(store.selection(), Some(SimId(1)));

        assert!(modals.backdrop_click(Overlay::Detail, false, &mut store));
        assert!(modals.open_overlays().is_empty());
        assert_eq!(store.selection(), None);
    }
}
