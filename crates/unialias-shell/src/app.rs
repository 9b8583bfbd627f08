//! Wires the windows together and dispatches prompt commands.

use crate::host::{ConsoleBackend, ConsoleSurface, ConsoleWindow, SharedInputs, lock_inputs};
use crate::repl::{self, Command, HELP};
use crate::table::AliasTable;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use unialias_core::config::Directories;
use unialias_core::controller::{DatasetInput, HelpInput, MainController, MainInput, SettingsInput};
use unialias_core::window::WindowHandle;
use unialias_core::{AppEvent, EventChannel, Key, WindowLabel, WindowLauncher};

pub struct Options {
    pub dirs: Directories,
    pub max_results: usize,
}

struct Shell {
    channel: EventChannel,
    backend: Arc<ConsoleBackend>,
    launcher: Arc<WindowLauncher>,
    inputs: SharedInputs,
    main: mpsc::UnboundedSender<MainInput>,
}

pub async fn run(options: Options) -> Result<()> {
    let (shell, main_task) = Shell::start(options)?;

    println!("Type `help` for commands.");
    let mut lines = repl::spawn_reader();
    while let Some(line) = lines.recv().await {
        match repl::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => shell.dispatch(command),
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }

    drop(shell);
    main_task.await?;
    info!("Shell stopped");
    Ok(())
}

impl Shell {
    /// Build every shared piece and start the main window controller.
    ///
    /// Must be called from within a tokio runtime.
    fn start(options: Options) -> Result<(Self, JoinHandle<()>)> {
        let Options { dirs, max_results } = options;
        dirs.ensure_exists()?;
        info!("Datasets from {}", dirs.datasets.display());

        let channel = EventChannel::new();
        let table = Arc::new(AliasTable::new(dirs.datasets.clone()));
        let inputs = SharedInputs::default();
        let backend = Arc::new(ConsoleBackend::new(
            channel.clone(),
            dirs,
            Arc::clone(&table),
            Arc::clone(&inputs),
        ));
        let launcher = Arc::new(WindowLauncher::new(backend.clone()));

        // The main window exists from the start, hidden until the hotkey
        let main_window: Arc<dyn WindowHandle> =
            Arc::new(ConsoleWindow::new(WindowLabel::Main, false));
        launcher.adopt(Arc::clone(&main_window));
        let controller = MainController::start(
            backend.context(main_window, None),
            Arc::new(ConsoleSurface::new(WindowLabel::Main)),
            table,
            Arc::clone(&launcher),
        )
        .with_max_results(max_results);

        let (main_tx, main_rx) = mpsc::unbounded_channel();
        let main_task = tokio::spawn(controller.run(main_rx));

        let shell = Self {
            channel,
            backend,
            launcher,
            inputs,
            main: main_tx,
        };
        Ok((shell, main_task))
    }

    fn dispatch(&self, command: Command) {
        debug!("Command {command:?}");
        match command {
            Command::Hotkey => {
                self.channel.publish(AppEvent::ShowWindow);
            }
            Command::Type(text) => self.to_main(MainInput::Input(text)),
            Command::Key(key) => self.to_main(MainInput::Key(key)),
            Command::Click(index) => self.to_main(MainInput::Click(index)),
            Command::Theme(theme) => self.to_main(MainInput::SetTheme(theme)),
            Command::Reload => self.to_main(MainInput::Reload),
            Command::Open(name) => self.open(name),
            Command::Close(name) => self.close(&name),
            Command::SettingsHotkey(hotkey) => self.to_settings(SettingsInput::EditHotkey(hotkey)),
            Command::SettingsTheme(theme) => self.to_settings(SettingsInput::EditTheme(theme)),
            Command::SettingsSave => self.to_settings(SettingsInput::Save),
            Command::SettingsCancel => self.to_settings(SettingsInput::Cancel),
            Command::Tab(index) => self.to_datasets(DatasetInput::ActivateTab(index)),
            Command::Esc(name) => self.escape(&name),
            Command::Windows => {
                let labels: Vec<_> = self
                    .launcher
                    .open_labels()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("{}", labels.join(", "));
            }
            Command::FailNextWindow => self.backend.fail_next(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn to_main(&self, input: MainInput) {
        if self.main.send(input).is_err() {
            println!("main window is gone");
        }
    }

    /// Reopening a hidden window only brings it forward; its controller
    /// keeps whatever state it had.
    fn open(&self, name: String) {
        self.to_main(MainInput::Open(name));
    }

    fn close(&self, name: &str) {
        match name.parse::<WindowLabel>() {
            Ok(WindowLabel::Main) => println!("the main window cannot be closed"),
            Ok(label) => {
                if self.launcher.close(label).is_some() {
                    lock_inputs(&self.inputs).remove(label);
                } else {
                    println!("{label} is not open");
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    fn escape(&self, name: &str) {
        let inputs = lock_inputs(&self.inputs);
        let sent = match name.parse::<WindowLabel>() {
            Ok(WindowLabel::Main) => {
                self.to_main(MainInput::Key(Key::Escape));
                true
            }
            Ok(WindowLabel::Help) => inputs
                .help
                .as_ref()
                .is_some_and(|tx| tx.send(HelpInput::Key(Key::Escape)).is_ok()),
            Ok(WindowLabel::Settings) => inputs
                .settings
                .as_ref()
                .is_some_and(|tx| tx.send(SettingsInput::Key(Key::Escape)).is_ok()),
            Ok(WindowLabel::DatasetMng) => inputs
                .datasets
                .as_ref()
                .is_some_and(|tx| tx.send(DatasetInput::Key(Key::Escape)).is_ok()),
            Err(e) => {
                println!("{e}");
                return;
            }
        };
        if !sent {
            println!("{name} is not open");
        }
    }

    fn to_settings(&self, input: SettingsInput) {
        let inputs = lock_inputs(&self.inputs);
        if !inputs.settings.as_ref().is_some_and(|tx| tx.send(input).is_ok()) {
            println!("settings is not open");
        }
    }

    fn to_datasets(&self, input: DatasetInput) {
        let inputs = lock_inputs(&self.inputs);
        if !inputs.datasets.as_ref().is_some_and(|tx| tx.send(input).is_ok()) {
            println!("dataset_mng is not open");
        }
    }
}
