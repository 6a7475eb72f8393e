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

//! External process launching.
//!
//! Opening a file hands it to another program. Both entry points block until
//! the child exits, so callers run them off the main loop.

use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use tracing::debug;

use crate::error::{AppError, Result};

pub(crate) trait Launcher: Send + Sync {
    /// Opens `path` with the desktop's default handler.
    fn open_with_default_handler(&self, path: &Path) -> Result<()>;

    /// Opens `path` in the configured editor.
    fn open_with_editor(&self, path: &Path) -> Result<()>;
}

pub(crate) struct SystemLauncher {
    editor: String,
}

impl SystemLauncher {
    pub(crate) fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_with_default_handler(&self, path: &Path) -> Result<()> {
        let mut command = default_handler_command(path);
        let status = run_detached(&mut command)?;
        if status.success() {
            Ok(())
        } else {
            Err(AppError::Launch(format!(
                "opening {} exited with {status}",
                path.display()
            )))
        }
    }

    fn open_with_editor(&self, path: &Path) -> Result<()> {
        let mut parts = self.editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AppError::Launch("no editor configured".to_string()))?;

        let mut command = Command::new(program);
        command.args(parts).arg(path);

        let status = run_detached(&mut command)?;
        // Editors killed by a signal report no exit code.
        match status.code() {
            Some(0) | None => Ok(()),
            Some(code) => Err(AppError::Launch(format!(
                "{program} exited with code {code}"
            ))),
        }
    }
}

#[cfg(target_os = "macos")]
fn default_handler_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn default_handler_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_handler_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

// The child must not share the browser's raw-mode terminal.
fn run_detached(command: &mut Command) -> Result<ExitStatus> {
    debug!(?command, "launching");
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| AppError::Launch(format!("{:?}: {e}", command.get_program())))
}
