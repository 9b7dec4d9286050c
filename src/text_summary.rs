//! Text summary builder for CLI output.
//!
//! Formats a reconciled view as one line per simulation for `--text` mode.

use crate::view::{Child, DashboardView, TextField, EMPTY_PLACEHOLDER};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(view: &DashboardView, demo: bool) -> TextSummary {
    let mut lines = Vec::new();
    let badge = if demo { " [demo]" } else { "" };
    lines.push(format!("SoccerCloud: {} simulation(s){badge}", view.len()));

    for child in view.children() {
        match child {
            Child::Placeholder => lines.push(EMPTY_PLACEHOLDER.to_string()),
            Child::Node(node) => {
                let actions: Vec<&str> = node.actions().iter().map(|a| a.label()).collect();
                lines.push(format!(
                    "[{:<9}] {} | {}",
                    node.status_label(),
                    node.text(TextField::Identity),
                    node.text(TextField::Title),
                ));
                lines.push(format!(
                    "            {} | {} | {}",
                    node.text(TextField::Progress),
                    node.text(TextField::Scoreboard),
                    node.text(TextField::Outcome),
                ));
                lines.push(format!("            actions: {}", actions.join(", ")));
            }
        }
    }

    TextSummary { lines }
}
