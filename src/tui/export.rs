//! UI side of CSV exports: status text for a finished export and copying its path.

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

pub fn exported_message(path: &Path) -> String {
    format!("Exported CSV: {} (press 'y' to copy path)", path.display())
}

/// Keep long paths on one status line.
pub fn shorten(path: &str, max: usize) -> String {
    if path.chars().count() <= max {
        return path.to_string();
    }
    let keep: String = path.chars().take(max.saturating_sub(3)).collect();
    format!("{keep}...")
}

/// A single worker thread owns clipboard access. Each copy keeps its clipboard
/// handle alive briefly so Linux clipboard managers can read it.
fn clipboard_sender() -> &'static std_mpsc::Sender<String> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                if let Ok(mut clipboard) = arboard::Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });
        tx
    })
}

/// Queue `text` for the clipboard worker. Returns without waiting for the copy.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    clipboard_sender()
        .send(text.to_string())
        .map_err(|_| anyhow!("Clipboard manager channel closed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_short_paths() {
        assert_eq!(shorten("/tmp/sim-1-single.csv", 60), "/tmp/sim-1-single.csv");
        let long = "a".repeat(80);
        let short = shorten(&long, 60);
        assert_eq!(short.len(), 60);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn message_mentions_copy_key() {
        let msg = exported_message(Path::new("/tmp/sim-3-league4.csv"));
        assert!(msg.contains("/tmp/sim-3-league4.csv"));
        assert!(msg.contains("'y'"));
    }
}
