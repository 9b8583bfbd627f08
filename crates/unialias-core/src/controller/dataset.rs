//! Dataset management window: one tab per dataset with its help text.

use super::{ThemedWindow, WindowContext};
use crate::dataset::{DatasetPanel, DatasetTab};
use crate::services::DatasetCatalog;
use crate::surface::DatasetSurface;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use unialias_types::{AppEvent, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetInput {
    Load,
    ActivateTab(usize),
    Key(Key),
}

pub struct DatasetController<C: DatasetCatalog> {
    window: ThemedWindow,
    surface: Arc<dyn DatasetSurface>,
    catalog: Arc<C>,
    panel: DatasetPanel,
}

impl<C: DatasetCatalog> DatasetController<C> {
    pub fn start(ctx: WindowContext, surface: Arc<dyn DatasetSurface>, catalog: Arc<C>) -> Self {
        let window = ThemedWindow::start(ctx, surface.clone(), &[]);
        Self {
            window,
            surface,
            catalog,
            panel: DatasetPanel::default(),
        }
    }

    #[must_use]
    pub fn panel(&self) -> &DatasetPanel {
        &self.panel
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        self.window.theme()
    }

    /// Enumerate datasets and rebuild the tabs, first one active.
    ///
    /// If the datasets cannot be listed the previous panel stays up.
    pub async fn load(&mut self) {
        let ids = match self.catalog.list_dataset_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!("{e}");
                return;
            }
        };
        debug!("Found {} dataset(s)", ids.len());

        let mut tabs = Vec::with_capacity(ids.len());
        for id in ids {
            let tab = match self.catalog.read_dataset_help(&id).await {
                Ok(markdown) => DatasetTab::from_markdown(id, &markdown),
                Err(e) => {
                    warn!("Failed to read help for dataset {id}: {e}");
                    DatasetTab::unreadable(id)
                }
            };
            tabs.push(tab);
        }

        self.panel = DatasetPanel::from_tabs(tabs);
        self.surface.render_panel(&self.panel);
    }

    /// Activate tab `index`; out-of-range clicks are ignored.
    pub fn activate_tab(&mut self, index: usize) {
        if self.panel.activate(index) {
            self.surface.activate_tab(index);
        } else {
            debug!("Ignoring activation of missing tab {index}");
        }
    }

    /// Returns whether the key was consumed.
    pub fn on_key(&mut self, key: Key) -> bool {
        if key == Key::Escape {
            self.window.hide();
            true
        } else {
            false
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        let _ = self.window.absorb(event);
    }

    pub async fn handle_input(&mut self, input: DatasetInput) {
        match input {
            DatasetInput::Load => self.load().await,
            DatasetInput::ActivateTab(index) => self.activate_tab(index),
            DatasetInput::Key(key) => {
                self.on_key(key);
            }
        }
    }

    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<DatasetInput>) {
        info!("Dataset window controller started");
        self.load().await;
        loop {
            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    self.handle_input(input).await;
                }

                event = self.window.next_event() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }
        info!("Dataset window controller stopped");
    }
}
