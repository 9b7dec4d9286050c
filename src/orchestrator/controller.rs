//! Dashboard controller.
//!
//! Single writer for all dashboard state. Network work runs in spawned tasks that
//! report back as `Completion`s; the loop applies UI commands, completions and poll
//! ticks one at a time and publishes a snapshot after each change.

use super::actions::{self, ActionOutcome, Completion};
use super::dashboard::Dashboard;
use super::poll::PollLoop;
use crate::model::{DashboardConfig, SimId, SimMode, UiEvent};
use crate::remote::SimulationApi;
use crate::view::Overlay;
use anyhow::Result;
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Create {
        mode: SimMode,
        auto_fill: bool,
        selections: Vec<String>,
    },
    Start(SimId),
    Clone(SimId),
    Delete(SimId),
    View(SimId),
    Export(SimId),
    OpenOverlay(Overlay),
    CloseOverlay(Overlay),
    Backdrop {
        overlay: Overlay,
        inside_content: bool,
    },
    Refresh,
    Quit,
}

/// Launches network chains; each reports its `Completion` back to the loop.
struct Spawner {
    api: SimulationApi,
    done_tx: UnboundedSender<Completion>,
}

impl Spawner {
    fn spawn<F, Fut>(&self, chain: F)
    where
        F: FnOnce(SimulationApi) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
    {
        let fut = chain(self.api.clone());
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            // Receiver gone means the controller exited; the result is discarded.
            let _ = tx.send(fut.await);
        });
    }

    fn refresh(&self, selection: Option<SimId>) {
        self.spawn(move |api| async move {
            Completion::Refresh(actions::refresh_cycle(&api, selection).await)
        });
    }
}

fn publish(ui_tx: &UnboundedSender<UiEvent>, dash: &Dashboard) -> bool {
    ui_tx
        .send(UiEvent::Snapshot(Box::new(dash.snapshot())))
        .is_ok()
}

fn handle_command(dash: &mut Dashboard, spawner: &Spawner, cfg: &DashboardConfig, cmd: UiCommand) {
    match cmd {
        UiCommand::Create {
            mode,
            auto_fill,
            selections,
        } => {
            if let Some(payload) = dash.prepare_create(mode, auto_fill, &selections) {
                spawner.spawn(move |api| async move { actions::create(&api, payload).await });
            }
        }
        UiCommand::Start(id) => {
            spawner.spawn(move |api| async move { actions::start(&api, id).await });
        }
        UiCommand::Clone(id) => {
            spawner.spawn(move |api| async move { actions::clone_simulation(&api, id).await });
        }
        UiCommand::Delete(id) => {
            spawner.spawn(move |api| async move { actions::delete(&api, id).await });
        }
        UiCommand::View(id) => {
            spawner.spawn(move |api| async move { actions::load_detail(&api, id).await });
        }
        UiCommand::Export(id) => match dash.record(id).map(|r| r.mode.clone()) {
            Some(mode) => {
                let dir = cfg.export_dir.clone();
                dash.set_status(format!("Exporting {id}…"));
                spawner.spawn(move |api| async move { actions::export(&api, id, &mode, &dir).await });
            }
            None => dash.set_status(format!("Export failed: {id} is not listed")),
        },
        UiCommand::OpenOverlay(overlay) => dash.open_overlay(overlay),
        UiCommand::CloseOverlay(overlay) => dash.close_overlay(overlay),
        UiCommand::Backdrop {
            overlay,
            inside_content,
        } => dash.backdrop_click(overlay, inside_content),
        UiCommand::Refresh => spawner.refresh(dash.store().selection()),
        UiCommand::Quit => {}
    }
}

/// Drive the dashboard until the UI quits or drops its command sender.
pub(crate) async fn run_controller(
    cfg: &DashboardConfig,
    api: SimulationApi,
    ui_tx: UnboundedSender<UiEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let spawner = Spawner { api, done_tx };
    let mut dash = Dashboard::new();

    // Teams are loaded once; only the list (and open detail) is polled.
    spawner.spawn(|api| async move { actions::fetch_config(&api).await });
    spawner.spawn(|api| async move { actions::fetch_teams(&api).await });
    spawner.refresh(None);
    PollLoop::new(cfg.poll_interval).start(dash.store_mut(), tick_tx);
    info!(base_url = %cfg.base_url, "dashboard controller started");
    publish(&ui_tx, &dash);

    loop {
        let mut exported = None;
        let changed = tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                None | Some(UiCommand::Quit) => break,
                Some(cmd) => {
                    handle_command(&mut dash, &spawner, cfg, cmd);
                    true
                }
            },
            Some(done) = done_rx.recv() => {
                if let Completion::Action(ActionOutcome::Exported(_, Ok(path))) = &done {
                    exported = Some(path.clone());
                }
                if dash.apply(done) {
                    spawner.refresh(dash.store().selection());
                }
                true
            }
            Some(tick) = tick_rx.recv() => {
                debug!(seq = tick.seq, "poll tick");
                spawner.refresh(dash.store().selection());
                false
            }
        };

        if changed && !publish(&ui_tx, &dash) {
            break;
        }
        // Sent after the snapshot so the UI's export notice is the last word.
        if let Some(path) = exported {
            let _ = ui_tx.send(UiEvent::Exported(path));
        }
    }

    dash.store_mut().stop_polling();
    info!("dashboard controller stopped");
    Ok(())
}
