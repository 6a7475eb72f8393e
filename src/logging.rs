// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Log file setup.
//!
//! The terminal belongs to the desktop while the application runs, so log
//! output goes to a file. The filter comes from `DESKFM_LOG` when set,
//! otherwise from the configured level.
//!
//! Logging is optional: if the file cannot be opened the application runs
//! without it.

use std::{
    fs::{self, OpenOptions},
    panic,
    path::PathBuf,
    sync::Mutex,
};

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const LOG_ENV: &str = "DESKFM_LOG";
const LOG_FILE: &str = "deskfm.log";

/// Where the log is written: the configured file, or the user's local data
/// directory.
pub(crate) fn log_path(config: &AppConfig) -> Option<PathBuf> {
    config
        .log_file
        .clone()
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("deskfm").join(LOG_FILE)))
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub(crate) fn init_logging(config: &AppConfig) {
    let Some(path) = log_path(config) else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Sends panic reports to the log instead of stderr, which would draw over
/// the desktop while the alternate screen is active.
pub(crate) fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        error!(panic = %info, "application panicked");
    }));
}
