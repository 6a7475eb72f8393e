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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::{env, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const CONFIG_NAME: &str = "deskfm";

const DEFAULT_EDITOR: &str = "code";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub start_dir: Option<PathBuf>,
    pub editor: Option<String>,
    pub double_click_ms: u64,
    pub status_timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            start_dir: None,
            editor: None,
            double_click_ms: 300,
            status_timeout_secs: 3,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    /// The external editor command, preferring the config file over `$VISUAL`
    /// and `$EDITOR`.
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| env::var("VISUAL").ok())
            .or_else(|| env::var("EDITOR").ok())
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    /// Resolves the directory the browser opens in.
    ///
    /// Relative paths are resolved against the process working directory.
    pub fn resolve_start_dir(&self) -> Result<PathBuf> {
        let dir = match &self.start_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()
                .ok()
                .or_else(dirs::home_dir)
                .ok_or_else(|| AppError::Config("no usable start directory".to_string()))?,
        };

        let dir = dir
            .canonicalize()
            .map_err(|source| AppError::io(&dir, source))?;
        if !dir.is_dir() {
            return Err(AppError::Config(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        Ok(dir)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
