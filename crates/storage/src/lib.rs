#![warn(clippy::pedantic)]

use std::sync::{Arc, Mutex};

#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod rest;

/// Installs the console logger, mirroring every record to the log persisted in `localStorage`.
///
/// Has to be called once by the host application on start-up, before any repository is used.
///
/// # Errors
///
/// Returns an error if a logger has already been installed.
pub fn init_log() -> Result<(), log::SetLoggerError> {
    coach_web_app::log::init(Arc::new(Mutex::new(local_storage::Log)))
}

/// Access to the persisted log entries, e.g. for a log view.
#[must_use]
pub fn log_service() -> coach_web_app::Service<local_storage::Log> {
    coach_web_app::Service::new(local_storage::Log)
}
