mod export;
mod help;
mod palette;
mod state;

use crate::cli::{build_config, Cli};
use crate::model::{Action, SimMode, UiEvent};
use crate::orchestrator::{self, UiCommand};
use crate::remote::SimulationApi;
use crate::theme::{load_theme, resolve_theme, save_theme, Theme};
use crate::view::{Child, DetailPanel, Overlay, TextField, ViewNode, EMPTY_PLACEHOLDER};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use palette::Palette;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{CreateDraft, UiState};
use std::path::PathBuf;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Lines each dashboard entry occupies.
const NODE_HEIGHT: usize = 4;

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let api = SimulationApi::new(&cfg)?;

    // An explicit --theme wins over the stored preference for this session.
    let theme = match args.theme.as_deref() {
        Some(t) => resolve_theme(Some(t)),
        None => cfg
            .prefs_path
            .as_deref()
            .map(load_theme)
            .unwrap_or_default(),
    };

    // Unbounded channels avoid backpressure between the UI thread and the controller.
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let prefs_path = cfg.prefs_path.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(theme, prefs_path, ui_rx, cmd_tx));

    let res = orchestrator::run_controller(&cfg, api, ui_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    theme: Theme,
    prefs_path: Option<PathBuf>,
    mut ui_rx: UnboundedReceiver<UiEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; the controller reaches it through snapshots.
    let mut state = UiState {
        theme,
        prefs_path,
        info: "Connecting…".into(),
        ..Default::default()
    };

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut area = Rect::default();

    let res = loop {
        let mut controller_gone = false;
        loop {
            match ui_rx.try_recv() {
                Ok(UiEvent::Snapshot(snap)) => state.apply_snapshot(*snap),
                Ok(UiEvent::Exported(path)) => {
                    state.info = export::exported_message(&path);
                    state.last_exported_path = Some(path.to_string_lossy().to_string());
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    controller_gone = true;
                    break;
                }
            }
        }
        if controller_gone {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            terminal
                .draw(|f| {
                    area = f.area();
                    draw(area, f, &state);
                })
                .ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => {
                    if handle_key(&mut state, k, &cmd_tx) {
                        break Ok(());
                    }
                }
                Ok(Event::Mouse(m)) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                    handle_click(&mut state, area, m.column, m.row, &cmd_tx);
                }
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen).ok();
    res
}

/// Returns true when the UI should exit.
fn handle_key(state: &mut UiState, k: KeyEvent, cmd_tx: &UnboundedSender<UiCommand>) -> bool {
    if k.modifiers == KeyModifiers::CONTROL && k.code == KeyCode::Char('c') {
        let _ = cmd_tx.send(UiCommand::Quit);
        return true;
    }

    if state.draft.is_some() {
        handle_draft_key(state, k.code, cmd_tx);
        return false;
    }

    if state.overlay_open(Overlay::Detail) {
        match k.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('v') => {
                let _ = cmd_tx.send(UiCommand::CloseOverlay(Overlay::Detail));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                state.detail_scroll = state.detail_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.detail_scroll = state.detail_scroll.saturating_add(1);
            }
            KeyCode::Char('q') => {
                let _ = cmd_tx.send(UiCommand::Quit);
                return true;
            }
            _ => {}
        }
        return false;
    }

    match k.code {
        KeyCode::Char('q') => {
            let _ = cmd_tx.send(UiCommand::Quit);
            return true;
        }
        KeyCode::Tab => state.tab = (state.tab + 1) % 2,
        KeyCode::Char('?') => state.tab = 1,
        KeyCode::Esc => state.tab = 0,
        KeyCode::Char('t') => toggle_theme(state),
        KeyCode::Char('y') => copy_exported_path(state),
        _ if state.tab != 0 => {}
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_cursor(1),
        KeyCode::Char('n') => open_draft(state, SimMode::Single, cmd_tx),
        KeyCode::Char('l') => open_draft(state, SimMode::League4, cmd_tx),
        KeyCode::Char('o') => open_draft(state, SimMode::Knockout4, cmd_tx),
        KeyCode::Char('s') => dispatch(state, Action::Start, cmd_tx),
        KeyCode::Char('c') => dispatch(state, Action::Clone, cmd_tx),
        KeyCode::Char('d') => dispatch(state, Action::Delete, cmd_tx),
        KeyCode::Char('e') => dispatch(state, Action::Export, cmd_tx),
        KeyCode::Char('v') | KeyCode::Enter => dispatch(state, Action::View, cmd_tx),
        KeyCode::Char('r') => {
            state.info = "Refreshing…".into();
            let _ = cmd_tx.send(UiCommand::Refresh);
        }
        _ => {}
    }
    false
}

fn handle_draft_key(state: &mut UiState, code: KeyCode, cmd_tx: &UnboundedSender<UiCommand>) {
    let team_count = state.teams().len();
    match code {
        KeyCode::Esc => {
            state.draft = None;
            let _ = cmd_tx.send(UiCommand::CloseOverlay(Overlay::Create));
        }
        KeyCode::Enter => {
            if let Some(d) = state.draft.as_ref() {
                let _ = cmd_tx.send(UiCommand::Create {
                    mode: d.mode,
                    auto_fill: d.auto_fill,
                    selections: d.selections(state.teams()),
                });
            }
        }
        _ => {
            let Some(d) = state.draft.as_mut() else {
                return;
            };
            match code {
                KeyCode::Char('m') => d.cycle_mode(team_count),
                KeyCode::Char('a') => d.toggle_auto_fill(),
                KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => d.select_prev_slot(),
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => d.select_next_slot(),
                KeyCode::Left | KeyCode::Char('h') => d.cycle_team(-1, team_count),
                KeyCode::Right | KeyCode::Char('l') => d.cycle_team(1, team_count),
                _ => {}
            }
        }
    }
}

fn open_draft(state: &mut UiState, mode: SimMode, cmd_tx: &UnboundedSender<UiCommand>) {
    state.draft = Some(CreateDraft::new(mode, state.teams().len()));
    let _ = cmd_tx.send(UiCommand::OpenOverlay(Overlay::Create));
}

/// Send `action` for the highlighted node if its action region offers it.
fn dispatch(state: &mut UiState, action: Action, cmd_tx: &UnboundedSender<UiCommand>) {
    let Some(node) = state.selected_node() else {
        state.info = "No simulation selected.".into();
        return;
    };
    let id = node.id();
    if !node.offers(action) {
        state.info = format!(
            "{} is not available for a {} simulation",
            action.label(),
            node.status_label()
        );
        return;
    }
    let cmd = match action {
        Action::View => UiCommand::View(id),
        Action::Start => UiCommand::Start(id),
        Action::Export => UiCommand::Export(id),
        Action::Clone => UiCommand::Clone(id),
        Action::Delete => UiCommand::Delete(id),
    };
    let _ = cmd_tx.send(cmd);
}

fn toggle_theme(state: &mut UiState) {
    state.theme = state.theme.toggled();
    state.info = match state.prefs_path.as_deref() {
        Some(path) => match save_theme(path, state.theme) {
            Ok(()) => format!("Theme: {}", state.theme.as_str()),
            Err(e) => format!("Theme save failed: {e:#}"),
        },
        None => format!("Theme: {}", state.theme.as_str()),
    };
}

fn copy_exported_path(state: &mut UiState) {
    state.info = match state.last_exported_path.as_deref() {
        Some(path) => match export::copy_to_clipboard(path) {
            Ok(()) => format!("✓ Copied to clipboard: {}", export::shorten(path, 60)),
            Err(e) => format!("Clipboard copy failed: {e:#}"),
        },
        None => "No exported file path to copy. Export a completed simulation first (e)".into(),
    };
}

/// Mouse press: route to the topmost open overlay as a backdrop or content click.
fn handle_click(
    state: &mut UiState,
    area: Rect,
    col: u16,
    row: u16,
    cmd_tx: &UnboundedSender<UiCommand>,
) {
    let overlay = if state.draft.is_some() {
        Overlay::Create
    } else if state.overlay_open(Overlay::Detail) {
        Overlay::Detail
    } else {
        return;
    };
    let inside_content = hit(overlay_rect(overlay, area), col, row);
    if overlay == Overlay::Create && !inside_content {
        state.draft = None;
    }
    let _ = cmd_tx.send(UiCommand::Backdrop {
        overlay,
        inside_content,
    });
}

fn overlay_rect(overlay: Overlay, area: Rect) -> Rect {
    match overlay {
        Overlay::Detail => centered_rect(80, 80, area),
        Overlay::Create => centered_rect(60, 60, area),
    }
}

fn hit(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let p = Palette::for_theme(state.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Dashboard"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title(header_title(state)))
        .style(p.text())
        .highlight_style(Style::default().fg(p.accent));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_dashboard(chunks[1], f, state, &p),
        _ => help::draw_help(chunks[1], f, &p),
    }

    let status_style = if state.info.contains("failed") {
        Style::default().fg(p.error)
    } else {
        p.text()
    };
    let status = Paragraph::new(Line::from(Span::styled(state.info.as_str(), status_style)))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    if let Some(panel) = state.snapshot.as_ref().and_then(|s| s.detail.as_ref()) {
        if state.overlay_open(Overlay::Detail) {
            draw_detail(overlay_rect(Overlay::Detail, area), f, panel, state.detail_scroll, &p);
        }
    }
    if let Some(draft) = state.draft.as_ref() {
        draw_create(overlay_rect(Overlay::Create, area), f, draft, state, &p);
    }
}

fn header_title(state: &UiState) -> String {
    let mut title = String::from("soccercloud-dashboard");
    if let Some(snap) = state.snapshot.as_ref() {
        if snap.demo {
            title.push_str(" [demo]");
        }
        if let Some(t) = snap.last_refresh.as_deref() {
            title.push_str(&format!("  last refresh {t}"));
        }
    }
    title
}

fn node_lines<'a>(node: &'a ViewNode, selected: bool, p: &Palette) -> Vec<Line<'a>> {
    let marker = if selected { "> " } else { "  " };
    let title_style = if selected {
        p.text().add_modifier(Modifier::BOLD).bg(p.selected_bg)
    } else {
        p.text().add_modifier(Modifier::BOLD)
    };
    let mut actions: Vec<Span> = vec![Span::raw("    ")];
    for a in node.actions() {
        actions.push(Span::styled(a.key().to_string(), p.key()));
        actions.push(Span::styled(format!(":{}  ", a.label()), p.muted()));
    }
    vec![
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("[{}]", node.status_label()), p.status(node.status())),
            Span::raw(" "),
            Span::styled(node.text(TextField::Title), title_style),
        ]),
        Line::from(Span::styled(
            format!("    {}", node.text(TextField::Identity)),
            p.muted(),
        )),
        Line::from(Span::styled(
            format!(
                "    {} | {} | {}",
                node.text(TextField::Progress),
                node.text(TextField::Scoreboard),
                node.text(TextField::Outcome)
            ),
            p.text(),
        )),
        Line::from(actions),
    ]
}

fn draw_dashboard(area: Rect, f: &mut ratatui::Frame, state: &UiState, p: &Palette) {
    let block = Block::default().borders(Borders::ALL).title("Simulations");
    let Some(snap) = state.snapshot.as_ref() else {
        f.render_widget(Paragraph::new("Waiting for the first refresh…").block(block), area);
        return;
    };

    // Keep the cursor entry on screen.
    let per_page = ((area.height as usize).saturating_sub(2) / NODE_HEIGHT).max(1);
    let offset = state.cursor.saturating_sub(per_page - 1);

    let mut lines: Vec<Line> = Vec::new();
    for (i, child) in snap.view.children().into_iter().enumerate().skip(offset) {
        match child {
            Child::Placeholder => lines.push(Line::from(Span::styled(EMPTY_PLACEHOLDER, p.muted()))),
            Child::Node(node) => lines.extend(node_lines(node, i == state.cursor, p)),
        }
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_detail(area: Rect, f: &mut ratatui::Frame, panel: &DetailPanel, scroll: u16, p: &Palette) {
    let mut lines = vec![
        Line::from(Span::styled(panel.identity.as_str(), p.muted())),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(panel.status.as_str(), p.status(panel.status)),
        ]),
        Line::from(format!("Progress: {}", panel.progress)),
        Line::from(format!("Scoreboard: {}", panel.scoreboard)),
        Line::from(format!("Outcome: {}", panel.outcome)),
    ];
    if !panel.teams.is_empty() {
        lines.push(Line::from(format!("Teams: {}", panel.teams.join(", "))));
    }
    for section in &panel.sections {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            section.kind.title(),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )));
        let style = if section.is_fallback { p.muted() } else { p.text() };
        for l in &section.lines {
            lines.push(Line::from(Span::styled(l.as_str(), style)));
        }
    }

    let w = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (Esc to close)", panel.title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(Clear, area);
    f.render_widget(w, area);
}

fn draw_create(
    area: Rect,
    f: &mut ratatui::Frame,
    draft: &CreateDraft,
    state: &UiState,
    p: &Palette,
) {
    let teams = state.teams();
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Mode: "),
            Span::styled(draft.mode.label(), Style::default().fg(p.accent)),
            Span::styled("  (m to cycle)", p.muted()),
        ]),
        Line::from(vec![
            Span::raw("Auto-fill: "),
            Span::styled(if draft.auto_fill { "on" } else { "off" }, Style::default().fg(p.accent)),
            Span::styled("  (a to toggle)", p.muted()),
        ]),
        Line::from(""),
    ];

    if draft.auto_fill {
        lines.push(Line::from("Teams will be picked by the server."));
    } else if teams.is_empty() {
        lines.push(Line::from(Span::styled("No teams loaded yet.", p.muted())));
    } else {
        for (slot, team_idx) in draft.slots.iter().enumerate() {
            let name = teams
                .get(*team_idx)
                .map(|t| t.display_name.as_str())
                .unwrap_or("-");
            let selected = slot == draft.selected_slot;
            let style = if selected {
                p.text().bg(p.selected_bg)
            } else {
                p.text()
            };
            lines.push(Line::from(vec![
                Span::raw(if selected { "> " } else { "  " }),
                Span::styled(format!("Team {}: {name}", slot + 1), style),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter create · Esc cancel · ←/→ change team",
        p.muted(),
    )));

    let w = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("New {}", draft.mode.label())),
    );
    f.render_widget(Clear, area);
    f.render_widget(w, area);
}
