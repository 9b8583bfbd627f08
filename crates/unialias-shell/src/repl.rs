//! Prompt commands and the line reader.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::{error, warn};
use unialias_core::Key;

pub const HELP: &str = "\
commands:
  hotkey                     press the global shortcut (show main window)
  type <text>                set the main input text
  key <esc|enter|tab|down|up>
  click <n>                  click candidate n
  theme <name>               change the theme from the main window
  open <help|settings|dataset_mng>
  close <label>              close a satellite window
  reload                     reload the dataset
  settings hotkey <value>    edit the hotkey field
  settings theme <name>      edit the theme selector
  settings save | settings cancel
  tab <n>                    activate dataset tab n
  esc <label>                press Escape in a window
  windows                    list open windows
  fail-next-window           make the next window creation fail
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hotkey,
    Type(String),
    Key(Key),
    Click(usize),
    Theme(String),
    Open(String),
    Close(String),
    Reload,
    SettingsHotkey(String),
    SettingsTheme(String),
    SettingsSave,
    SettingsCancel,
    Tab(usize),
    Esc(String),
    Windows,
    FailNextWindow,
    Help,
    Quit,
}

/// Parse one prompt line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "hotkey" => Command::Hotkey,
        // The rest is kept verbatim so an empty `type` clears the input
        "type" => Command::Type(rest.to_string()),
        "key" => match Key::from_name(rest) {
            Key::Other => return Err(format!("unknown key: {rest}")),
            key => Command::Key(key),
        },
        "click" => Command::Click(index(rest)?),
        "theme" => Command::Theme(required(rest, "theme name")?),
        "open" => Command::Open(required(rest, "window label")?),
        "close" => Command::Close(required(rest, "window label")?),
        "reload" => Command::Reload,
        "settings" => parse_settings(rest)?,
        "tab" => Command::Tab(index(rest)?),
        "esc" => Command::Esc(required(rest, "window label")?),
        "windows" => Command::Windows,
        "fail-next-window" => Command::FailNextWindow,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn parse_settings(rest: &str) -> Result<Command, String> {
    let (action, value) = rest.split_once(' ').unwrap_or((rest, ""));
    let value = value.trim();
    match action {
        "hotkey" => Ok(Command::SettingsHotkey(required(value, "hotkey")?)),
        "theme" => Ok(Command::SettingsTheme(required(value, "theme name")?)),
        "save" => Ok(Command::SettingsSave),
        "cancel" => Ok(Command::SettingsCancel),
        other => Err(format!("unknown settings action: {other}")),
    }
}

fn required(value: &str, what: &str) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(value.to_string())
    }
}

fn index(value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("expected a number, got '{value}'"))
}

/// Read prompt lines on a dedicated thread until EOF or Ctrl-C.
///
/// Runs on a plain thread so a pending `readline` never blocks runtime
/// shutdown.
pub fn spawn_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                error!("Failed to start line editor: {e}");
                return;
            }
        };
        loop {
            match editor.readline("unialias> ") {
                Ok(line) => {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        warn!("Failed to record history: {e}");
                    }
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    error!("Failed to read line: {e}");
                    break;
                }
            }
        }
    });
    rx
}
