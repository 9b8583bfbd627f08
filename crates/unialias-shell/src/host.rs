//! In-process window host.
//!
//! Windows are console objects: every state change is printed. Creating a
//! satellite window spawns its controller task; the returned input sender is
//! how the prompt talks to it.

use crate::table::AliasTable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use unialias_core::config::{Directories, JsonFileStore, JsonSettingsStore};
use unialias_core::controller::{
    DatasetController, DatasetInput, HelpController, HelpInput, SettingsController,
    SettingsInput, WindowContext,
};
use unialias_core::dataset::DatasetPanel;
use unialias_core::markdown::HelpBlock;
use unialias_core::surface::{DatasetSurface, MainSurface, SettingsSurface, ThemeSurface};
use unialias_core::view::ListView;
use unialias_core::window::{WindowBackend, WindowCreation, WindowHandle};
use unialias_core::{EventChannel, Result, Settings, WindowConfig, WindowLabel};

/// A window that prints what happens to it
pub struct ConsoleWindow {
    label: WindowLabel,
    visible: AtomicBool,
    minimized: AtomicBool,
}

impl ConsoleWindow {
    pub fn new(label: WindowLabel, visible: bool) -> Self {
        Self {
            label,
            visible: AtomicBool::new(visible),
            minimized: AtomicBool::new(false),
        }
    }
}

impl WindowHandle for ConsoleWindow {
    fn label(&self) -> WindowLabel {
        self.label
    }

    fn show(&self) -> Result<()> {
        if !self.visible.swap(true, Ordering::SeqCst) {
            println!("[{}] shown", self.label);
        }
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        if self.visible.swap(false, Ordering::SeqCst) {
            println!("[{}] hidden", self.label);
        }
        Ok(())
    }

    fn set_focus(&self) -> Result<()> {
        println!("[{}] focused", self.label);
        Ok(())
    }

    fn is_minimized(&self) -> Result<bool> {
        Ok(self.minimized.load(Ordering::SeqCst))
    }

    fn unminimize(&self) -> Result<()> {
        self.minimized.store(false, Ordering::SeqCst);
        println!("[{}] restored", self.label);
        Ok(())
    }
}

/// Renders a window's content to stdout
pub struct ConsoleSurface {
    label: WindowLabel,
}

impl ConsoleSurface {
    pub fn new(label: WindowLabel) -> Self {
        Self { label }
    }
}

impl ThemeSurface for ConsoleSurface {
    fn apply_theme(&self, theme: &str) {
        println!("[{}] theme: {theme}", self.label);
    }
}

impl MainSurface for ConsoleSurface {
    fn focus_input(&self) {
        println!("[{}] input focused", self.label);
    }

    fn clear_input(&self) {
        println!("[{}] input cleared", self.label);
    }

    fn render_list(&self, view: &ListView) {
        if view.is_empty() {
            return;
        }
        for item in &view.items {
            println!("  {}. {item}", item.index);
        }
    }

    fn move_marker(&self, _from: Option<usize>, to: usize) {
        println!("[{}] selected #{to}", self.label);
    }
}

impl SettingsSurface for ConsoleSurface {
    fn show_form(&self, form: &Settings) {
        println!(
            "[{}] hotkey: {}  theme: {}",
            self.label, form.hotkey, form.theme
        );
    }
}

impl DatasetSurface for ConsoleSurface {
    fn render_panel(&self, panel: &DatasetPanel) {
        match panel {
            DatasetPanel::Empty { notice } => println!("[{}] {notice}", self.label),
            DatasetPanel::Tabs { tabs, active } => {
                let names: Vec<_> = tabs
                    .iter()
                    .enumerate()
                    .map(|(i, tab)| {
                        if i == *active {
                            format!("*{}*", tab.id)
                        } else {
                            tab.id.clone()
                        }
                    })
                    .collect();
                println!("[{}] tabs: {}", self.label, names.join(" | "));
                if let Some(tab) = tabs.get(*active) {
                    print_help(&tab.help);
                }
            }
        }
    }

    fn activate_tab(&self, index: usize) {
        println!("[{}] tab #{index} active", self.label);
    }
}

fn print_help(blocks: &[HelpBlock]) {
    for block in blocks {
        match block {
            HelpBlock::Heading { level, .. } => {
                println!("  {} {}", "#".repeat(usize::from(*level)), block.text());
            }
            HelpBlock::ListItem { depth, number, .. } => {
                let bullet = number.map_or_else(|| "-".to_string(), |n| format!("{n}."));
                println!("  {}{bullet} {}", "  ".repeat(*depth), block.text());
            }
            HelpBlock::Rule => println!("  ---"),
            _ => {
                for line in block.text().lines() {
                    println!("  {line}");
                }
            }
        }
    }
}

/// Input senders of the live satellite controllers
#[derive(Default)]
pub struct SatelliteInputs {
    pub help: Option<mpsc::UnboundedSender<HelpInput>>,
    pub settings: Option<mpsc::UnboundedSender<SettingsInput>>,
    pub datasets: Option<mpsc::UnboundedSender<DatasetInput>>,
}

impl SatelliteInputs {
    /// Drop the sender for `label`, which ends its controller task
    pub fn remove(&mut self, label: WindowLabel) {
        match label {
            WindowLabel::Help => self.help = None,
            WindowLabel::Settings => self.settings = None,
            WindowLabel::DatasetMng => self.datasets = None,
            WindowLabel::Main => {}
        }
    }
}

pub type SharedInputs = Arc<Mutex<SatelliteInputs>>;

pub fn lock_inputs(inputs: &SharedInputs) -> std::sync::MutexGuard<'_, SatelliteInputs> {
    inputs.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Window backend that spawns a controller per created window
pub struct ConsoleBackend {
    channel: EventChannel,
    dirs: Directories,
    table: Arc<AliasTable>,
    inputs: SharedInputs,
    fail_next: AtomicBool,
}

impl ConsoleBackend {
    pub fn new(
        channel: EventChannel,
        dirs: Directories,
        table: Arc<AliasTable>,
        inputs: SharedInputs,
    ) -> Self {
        Self {
            channel,
            dirs,
            table,
            inputs,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next window creation report a failure
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn failure_pending(&self) -> bool {
        self.fail_next.load(Ordering::SeqCst)
    }

    pub fn context(
        &self,
        handle: Arc<dyn WindowHandle>,
        initial_theme: Option<String>,
    ) -> WindowContext {
        let storage = JsonFileStore::open(self.dirs.storage_file(handle.label()));
        WindowContext {
            handle,
            channel: self.channel.clone(),
            storage: Arc::new(storage),
            initial_theme,
        }
    }

    fn spawn_controller(&self, ctx: WindowContext) {
        let label = ctx.handle.label();
        let surface = Arc::new(ConsoleSurface::new(label));
        let mut inputs = lock_inputs(&self.inputs);
        match label {
            WindowLabel::Help => {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(HelpController::start(ctx, surface).run(rx));
                inputs.help = Some(tx);
            }
            WindowLabel::Settings => {
                let store = Arc::new(JsonSettingsStore::new(self.dirs.settings_file.clone()));
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(SettingsController::start(ctx, surface, store).run(rx));
                inputs.settings = Some(tx);
            }
            WindowLabel::DatasetMng => {
                let (tx, rx) = mpsc::unbounded_channel();
                let table = Arc::clone(&self.table);
                tokio::spawn(DatasetController::start(ctx, surface, table).run(rx));
                inputs.datasets = Some(tx);
            }
            WindowLabel::Main => {}
        }
    }
}

impl WindowBackend for ConsoleBackend {
    fn create(&self, config: &WindowConfig) -> Result<WindowCreation> {
        let theme = config.theme.as_deref().unwrap_or_default();
        println!(
            "[{}] creating \"{}\" {}x{} ({}) theme={theme}",
            config.label, config.title, config.width, config.height, config.url
        );

        let handle: Arc<dyn WindowHandle> = Arc::new(ConsoleWindow::new(config.label, true));
        let (tx, rx) = oneshot::channel();

        if self.fail_next.swap(false, Ordering::SeqCst) {
            let _ = tx.send(Err("simulated creation failure".to_string()));
        } else {
            self.spawn_controller(self.context(Arc::clone(&handle), config.theme.clone()));
            let _ = tx.send(Ok(()));
        }
        debug!("{} creation reported", config.label);

        Ok(WindowCreation {
            handle,
            outcome: rx,
        })
    }
}
