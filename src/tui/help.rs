use super::palette::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn bind<'a>(p: &Palette, keys: &'a str, pad: usize, what: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(keys, p.key()),
        Span::raw(" ".repeat(pad)),
        Span::styled(what, p.text()),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame, p: &Palette) {
    let lines = vec![
        Line::from("Keybinds:"),
        bind(p, "q / Ctrl-C", 2, "Quit"),
        bind(p, "↑/↓ or j/k", 2, "Move selection"),
        bind(p, "n / l / o", 3, "New single match / 4-team league / 4-team knockout"),
        bind(p, "s", 11, "Start selected (pending only)"),
        bind(p, "c", 11, "Clone selected"),
        bind(p, "d", 11, "Delete selected"),
        bind(p, "v / Enter", 3, "View details"),
        bind(p, "e", 11, "Export selected as CSV (completed only)"),
        bind(p, "y", 11, "Copy exported path to clipboard"),
        bind(p, "r", 11, "Refresh now"),
        bind(p, "t", 11, "Toggle dark/light theme"),
        bind(p, "tab", 9, "Switch tabs"),
        bind(p, "?", 11, "Show this help"),
        Line::from(""),
        Line::from("Create form:"),
        bind(p, "m", 11, "Cycle mode"),
        bind(p, "a", 11, "Toggle auto-fill (server picks teams)"),
        bind(p, "↑/↓ or j/k", 2, "Select slot"),
        bind(p, "←/→ or h/l", 2, "Change team in slot"),
        bind(p, "Enter", 7, "Create"),
        bind(p, "Esc", 9, "Cancel"),
        Line::from(""),
        Line::from("Detail view:"),
        bind(p, "↑/↓ or j/k", 2, "Scroll"),
        bind(p, "Esc / v", 5, "Close (or click outside the panel)"),
    ];
    let w = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(w, area);
}
