//! Test fixtures: in-memory collaborators that record what they were asked.

use crate::config::MemoryStore;
use crate::controller::WindowContext;
use crate::dataset::DatasetPanel;
use crate::services::{DatasetCatalog, LocalStore, MatchEngine, SettingsStore};
use crate::surface::{DatasetSurface, MainSurface, SettingsSurface, ThemeSurface};
use crate::view::ListView;
use crate::window::{WindowBackend, WindowCreation, WindowHandle};
use crate::{Error, EventChannel, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, oneshot};
use unialias_types::{Candidate, Settings, WindowConfig, WindowLabel};

/// Let spawned tasks run to completion on the current-thread runtime
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Prefix matcher over a fixed alias table
#[derive(Default)]
pub struct FakeEngine {
    entries: Vec<(String, String)>,
    delays: Mutex<HashMap<String, Duration>>,
    unavailable: AtomicBool,
    fail_reload: AtomicBool,
    queries: Mutex<Vec<(String, usize)>>,
    selected: Mutex<Vec<String>>,
    selected_notify: Notify,
    reloads: AtomicUsize,
}

impl FakeEngine {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(alias, value)| ((*alias).to_string(), (*value).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// abacus and abbey, both matching "ab"
    pub fn abacus_abbey() -> Self {
        Self::new(&[("abacus", "🔤"), ("abbey", "🔡"), ("zeta", "ζ")])
    }

    /// Make queries for `text` take `delay` to answer
    pub fn delay(&self, text: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(text.to_string(), delay);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_fail_reload(&self, fail: bool) {
        self.fail_reload.store(fail, Ordering::SeqCst);
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn selections(&self) -> Vec<String> {
        self.selected.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Wait until the first alias has been selected
    pub async fn wait_for_selection(&self) -> String {
        loop {
            if let Some(alias) = self.selected.lock().unwrap().first().cloned() {
                return alias;
            }
            self.selected_notify.notified().await;
        }
    }
}

impl MatchEngine for FakeEngine {
    async fn query_matches(&self, text: &str, max_count: usize) -> Result<Vec<Candidate>> {
        self.queries
            .lock()
            .unwrap()
            .push((text.to_string(), max_count));

        let delay = self.delays.lock().unwrap().get(text).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::EngineUnavailable("no dataset".to_string()));
        }

        Ok(self
            .entries
            .iter()
            .filter(|(alias, _)| alias.starts_with(text))
            .take(max_count)
            .map(|(alias, value)| Candidate::new(alias.clone(), text.len(), value.clone()))
            .collect())
    }

    async fn select_alias(&self, alias: &str) -> Result<()> {
        self.selected.lock().unwrap().push(alias.to_string());
        self.selected_notify.notify_one();
        Ok(())
    }

    async fn reload_dataset(&self) -> Result<()> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(Error::DatasetLoadFailed("broken.csv".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCall {
    Show,
    Hide,
    SetFocus,
    IsMinimized,
    Unminimize,
}

pub struct FakeWindow {
    label: WindowLabel,
    calls: Mutex<Vec<WindowCall>>,
    minimized: AtomicBool,
    visible: AtomicBool,
    fail_show: AtomicBool,
}

impl FakeWindow {
    pub fn new(label: WindowLabel) -> Self {
        Self {
            label,
            calls: Mutex::new(Vec::new()),
            minimized: AtomicBool::new(false),
            visible: AtomicBool::new(false),
            fail_show: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<WindowCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_minimized(&self, minimized: bool) {
        self.minimized.store(minimized, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_fail_show(&self, fail: bool) {
        self.fail_show.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: WindowCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl WindowHandle for FakeWindow {
    fn label(&self) -> WindowLabel {
        self.label
    }

    fn show(&self) -> Result<()> {
        self.record(WindowCall::Show);
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(Error::window(self.label, "show refused"));
        }
        self.visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        self.record(WindowCall::Hide);
        self.visible.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_focus(&self) -> Result<()> {
        self.record(WindowCall::SetFocus);
        Ok(())
    }

    fn is_minimized(&self) -> Result<bool> {
        self.record(WindowCall::IsMinimized);
        Ok(self.minimized.load(Ordering::SeqCst))
    }

    fn unminimize(&self) -> Result<()> {
        self.record(WindowCall::Unminimize);
        self.minimized.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Backend that creates [`FakeWindow`]s and reports their outcome at once
#[derive(Default)]
pub struct FakeBackend {
    created: Mutex<Vec<WindowConfig>>,
    windows: Mutex<Vec<Arc<FakeWindow>>>,
    refuse: AtomicBool,
    fail_outcome: AtomicBool,
    hold_outcome: Mutex<Option<oneshot::Sender<std::result::Result<(), String>>>>,
    hold: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<WindowConfig> {
        self.created.lock().unwrap().clone()
    }

    pub fn windows(&self) -> Vec<Arc<FakeWindow>> {
        self.windows.lock().unwrap().clone()
    }

    /// Reject the next `create` calls outright
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Accept `create` but report failure on the outcome channel
    pub fn set_fail_outcome(&self, fail: bool) {
        self.fail_outcome.store(fail, Ordering::SeqCst);
    }

    /// Keep the next outcome pending until [`Self::release`]
    pub fn set_hold(&self, hold: bool) {
        self.hold.store(hold, Ordering::SeqCst);
    }

    /// Drop the held outcome sender without reporting anything
    pub fn abandon(&self) {
        self.hold_outcome.lock().unwrap().take();
    }

    pub fn release(&self, outcome: std::result::Result<(), String>) {
        if let Some(tx) = self.hold_outcome.lock().unwrap().take() {
            let _ = tx.send(outcome);
        }
    }
}

impl WindowBackend for FakeBackend {
    fn create(&self, config: &WindowConfig) -> Result<WindowCreation> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(Error::window(config.label, "backend refused"));
        }
        self.created.lock().unwrap().push(config.clone());

        let window = Arc::new(FakeWindow::new(config.label));
        window.set_visible(true);
        self.windows.lock().unwrap().push(Arc::clone(&window));

        let (tx, rx) = oneshot::channel();
        if self.hold.load(Ordering::SeqCst) {
            *self.hold_outcome.lock().unwrap() = Some(tx);
        } else if self.fail_outcome.load(Ordering::SeqCst) {
            let _ = tx.send(Err("webview crashed".to_string()));
        } else {
            let _ = tx.send(Ok(()));
        }

        Ok(WindowCreation {
            handle: window,
            outcome: rx,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    ApplyTheme(String),
    FocusInput,
    ClearInput,
    RenderList(ListView),
    MoveMarker { from: Option<usize>, to: usize },
    ShowForm(Settings),
    RenderPanel(DatasetPanel),
    ActivateTab(usize),
}

/// One surface type for every window kind
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn themes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::ApplyTheme(theme) => Some(theme),
                _ => None,
            })
            .collect()
    }

    pub fn last_list(&self) -> Option<ListView> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::RenderList(view) => Some(view),
            _ => None,
        })
    }

    pub fn last_form(&self) -> Option<Settings> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::ShowForm(form) => Some(form),
            _ => None,
        })
    }

    pub fn last_panel(&self) -> Option<DatasetPanel> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::RenderPanel(panel) => Some(panel),
            _ => None,
        })
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ThemeSurface for RecordingSurface {
    fn apply_theme(&self, theme: &str) {
        self.record(SurfaceCall::ApplyTheme(theme.to_string()));
    }
}

impl MainSurface for RecordingSurface {
    fn focus_input(&self) {
        self.record(SurfaceCall::FocusInput);
    }

    fn clear_input(&self) {
        self.record(SurfaceCall::ClearInput);
    }

    fn render_list(&self, view: &ListView) {
        self.record(SurfaceCall::RenderList(view.clone()));
    }

    fn move_marker(&self, from: Option<usize>, to: usize) {
        self.record(SurfaceCall::MoveMarker { from, to });
    }
}

impl SettingsSurface for RecordingSurface {
    fn show_form(&self, form: &Settings) {
        self.record(SurfaceCall::ShowForm(form.clone()));
    }
}

impl DatasetSurface for RecordingSurface {
    fn render_panel(&self, panel: &DatasetPanel) {
        self.record(SurfaceCall::RenderPanel(panel.clone()));
    }

    fn activate_tab(&self, index: usize) {
        self.record(SurfaceCall::ActivateTab(index));
    }
}

#[derive(Default)]
pub struct FakeSettingsStore {
    stored: Mutex<Option<Settings>>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    saves: Mutex<Vec<Settings>>,
}

impl FakeSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let store = Self::new();
        *store.stored.lock().unwrap() = Some(settings);
        store
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<Settings> {
        self.saves.lock().unwrap().clone()
    }
}

impl SettingsStore for FakeSettingsStore {
    async fn load_settings(&self) -> Result<Settings> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Error::SettingsLoadFailed("settings.json: corrupt".to_string()));
        }
        Ok(self.stored.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::SettingsSaveFailed("disk full".to_string()));
        }
        self.saves.lock().unwrap().push(settings.clone());
        *self.stored.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}

/// Catalog of datasets; a `None` help text fails to read
#[derive(Default)]
pub struct FakeCatalog {
    datasets: Mutex<Vec<(String, Option<String>)>>,
    fail_list: AtomicBool,
}

impl FakeCatalog {
    pub fn new(datasets: &[(&str, Option<&str>)]) -> Self {
        Self {
            datasets: Mutex::new(
                datasets
                    .iter()
                    .map(|(id, help)| ((*id).to_string(), help.map(str::to_string)))
                    .collect(),
            ),
            fail_list: AtomicBool::new(false),
        }
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }
}

impl DatasetCatalog for FakeCatalog {
    async fn list_dataset_ids(&self) -> Result<Vec<String>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::DatasetLoadFailed("dataset dir missing".to_string()));
        }
        Ok(self
            .datasets
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn read_dataset_help(&self, id: &str) -> Result<String> {
        self.datasets
            .lock()
            .unwrap()
            .iter()
            .find(|(known, _)| known == id)
            .and_then(|(_, help)| help.clone())
            .ok_or_else(|| Error::DatasetLoadFailed(format!("{id}.md")))
    }
}

/// Local storage whose writes always fail
pub struct ReadOnlyStore;

impl LocalStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

/// A window with its own memory storage, ready for a controller
pub struct TestWindow {
    pub window: Arc<FakeWindow>,
    pub surface: Arc<RecordingSurface>,
    pub storage: Arc<MemoryStore>,
}

impl TestWindow {
    pub fn new(label: WindowLabel) -> Self {
        Self {
            window: Arc::new(FakeWindow::new(label)),
            surface: Arc::new(RecordingSurface::new()),
            storage: Arc::new(MemoryStore::new()),
        }
    }

    pub fn with_storage(label: WindowLabel, storage: MemoryStore) -> Self {
        Self {
            storage: Arc::new(storage),
            ..Self::new(label)
        }
    }

    pub fn context(&self, channel: &EventChannel) -> WindowContext {
        self.context_with_theme(channel, None)
    }

    /// Context for a window created with the opener's theme snapshot
    pub fn context_with_theme(
        &self,
        channel: &EventChannel,
        initial_theme: Option<String>,
    ) -> WindowContext {
        WindowContext {
            handle: self.window.clone(),
            channel: channel.clone(),
            storage: self.storage.clone(),
            initial_theme,
        }
    }
}
