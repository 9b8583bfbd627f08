//! Help window: static content, theme sync and Escape to hide.

use super::{ThemedWindow, WindowContext};
use crate::surface::ThemeSurface;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use unialias_types::{AppEvent, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpInput {
    Key(Key),
}

pub struct HelpController {
    window: ThemedWindow,
}

impl HelpController {
    pub fn start(ctx: WindowContext, surface: Arc<dyn ThemeSurface>) -> Self {
        Self {
            window: ThemedWindow::start(ctx, surface, &[]),
        }
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        self.window.theme()
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

    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<HelpInput>) {
        info!("Help window controller started");
        loop {
            tokio::select! {
                input = inputs.recv() => {
                    let Some(HelpInput::Key(key)) = input else {
                        break;
                    };
                    self.on_key(key);
                }

                event = self.window.next_event() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }
        info!("Help window controller stopped");
    }
}
