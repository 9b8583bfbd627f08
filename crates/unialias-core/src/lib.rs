pub mod bus;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod launcher;
pub mod markdown;
pub mod selection;
pub mod services;
pub mod surface;
pub mod theme;
pub mod view;
pub mod window;

mod error;

#[cfg(test)]
mod tests;

pub use bus::{EventChannel, Subscription};
pub use error::{Error, Result};
pub use launcher::{LaunchOutcome, WindowLauncher};

pub use unialias_types::*;
