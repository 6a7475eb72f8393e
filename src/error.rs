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

//! Error types for filesystem, launcher and configuration failures.
//!
//! Everything that crosses the controller boundary is converted into an
//! [`AppError`], which is then surfaced to the user as a transient status
//! message rather than terminating the application.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// A filesystem operation failed for a specific path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external process could not be started, or exited unsuccessfully.
    #[error("Launch failed: {0}")]
    Launch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker thread or the main loop went away.
    #[error("Channel closed: {0}")]
    Channel(String),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, AppError>;
