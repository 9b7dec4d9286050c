mod detail;
mod modal;
mod reconcile;
mod surface;

pub use detail::{sync_selection, DetailPanel, DetailSync, DetailViewController};
#[cfg(test)]
pub use detail::SectionKind;
pub use modal::{ModalController, Overlay};
pub use reconcile::reconcile;
pub use surface::{Child, DashboardView, TextField, ViewNode, EMPTY_PLACEHOLDER};
