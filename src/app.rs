//! Application orchestration layer
//!
//! Wires the data store, the per-interaction pipeline and the UI together. The dataset is loaded
//! once; every action that changes the criteria recomputes a [`Snapshot`] from scratch.

use crate::config::Settings;
use crate::data::{DataStore, Dataset};
use crate::error::Result;
use crate::export::export_to_dir;
use crate::input::{spawn_input_thread, InputAction};
use crate::pipeline::{format_count, Snapshot};
use crate::render::ui::{UIRenderer, ViewState};
use crate::render::{ActionOutcome, RenderLoopState};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application orchestrator
pub struct Application {
    store: DataStore,
    settings: Settings,
    ui_renderer: Box<dyn UIRenderer>,
}

impl Application {
    pub fn new(store: DataStore, settings: Settings, ui_renderer: Box<dyn UIRenderer>) -> Self {
        Self {
            store,
            settings,
            ui_renderer,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the interactive dashboard until the user quits.
    ///
    /// The dataset is loaded before the terminal is touched so a missing or unreadable file
    /// is reported on a normal screen.
    pub async fn run(&mut self) -> Result<()> {
        self.store.load()?;
        self.ui_renderer.initialize()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_handle = spawn_input_thread(tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let result = self.drive(rx).await;

        shutdown.store(true, Ordering::SeqCst);
        if input_handle.join().is_err() {
            warn!("input thread panicked");
        }
        self.ui_renderer.cleanup()?;
        result
    }

    /// Consume actions from `rx` until `Quit` or until the sender goes away.
    pub async fn drive(&mut self, rx: UnboundedReceiver<InputAction>) -> Result<()> {
        let dataset = self.store.load()?;
        let source_name = self.store.describe();
        Self::event_loop(
            dataset,
            source_name,
            &self.settings,
            self.ui_renderer.as_mut(),
            rx,
        )
        .await
    }

    async fn event_loop(
        dataset: &Dataset,
        source_name: String,
        settings: &Settings,
        ui_renderer: &mut dyn UIRenderer,
        mut rx: UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        let (width, height) = ui_renderer.get_terminal_size()?;
        let mut view_state = ViewState::new(source_name, dataset, width, height);
        let mut loop_state = RenderLoopState::new(view_state.criteria());
        let mut snapshot = Snapshot::compute(dataset, loop_state.applied(), settings);

        if dataset.stats().skipped_dates > 0 {
            view_state.status_line.set_message(format!(
                "{} publish_time values could not be parsed",
                format_count(dataset.stats().skipped_dates)
            ));
        }
        ui_renderer.render(&view_state, &snapshot)?;

        while let Some(action) = rx.recv().await {
            let preview_len = snapshot.preview().len();
            match loop_state.process_action(action, &mut view_state, preview_len) {
                ActionOutcome::Quit => break,
                ActionOutcome::Redraw => {}
                ActionOutcome::Recompute => {
                    snapshot = Snapshot::compute(dataset, loop_state.applied(), settings);
                    debug!(
                        "criteria {:?} matched {} records",
                        loop_state.applied(),
                        snapshot.match_count()
                    );
                }
                ActionOutcome::Export => {
                    let message = match export_to_dir(
                        dataset.schema(),
                        &snapshot.view,
                        &settings.export_dir,
                    ) {
                        Ok(path) => format!(
                            "Exported {} papers to {}",
                            format_count(snapshot.match_count()),
                            path.display()
                        ),
                        Err(e) => {
                            warn!("export failed: {e}");
                            format!("Export failed: {e}")
                        }
                    };
                    view_state.status_line.set_message(message);
                }
            }
            ui_renderer.render(&view_state, &snapshot)?;
        }

        info!("dashboard closed");
        Ok(())
    }
}
