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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload filesystem
//! and process operations from the main loop. It provides a dedicated worker
//! loop that translates [`AppTask`] requests into [`FileSystem`] and
//! [`Launcher`] calls and broadcasts the results back to the application via
//! [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Everything else is handled
//! directly by the event handlers.
//!
//! Tasks run one at a time, in submission order. Launches are the exception:
//! a child process can live for as long as the user keeps it open, so each
//! launch waits for its exit on a thread of its own.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        mpsc::{Receiver, Sender},
    },
    thread,
};

use tracing::{debug, warn};

use crate::{
    error::{AppError, Result},
    events::{AppEvent, OperationOutcome},
    fs::{self, FileSystem},
    launcher::Launcher,
    model::{ClipboardOperation, FileEntry},
};

#[derive(Debug)]
pub(crate) enum AppTask {
    /// Lists a directory. The generation is echoed back so the main loop can
    /// discard results that a later load has superseded.
    LoadDirectory { generation: u64, path: PathBuf },

    Paste {
        entry: FileEntry,
        operation: ClipboardOperation,
        target_dir: PathBuf,
    },

    Delete(FileEntry),

    Open(PathBuf),
    OpenWithEditor(PathBuf),
}

/// Spawns a background thread to process application tasks.
///
/// The worker owns the filesystem provider and exits when every task sender
/// has been dropped.
///
/// # Arguments
///
/// * `fs` - The filesystem provider.
/// * `launcher` - The external process launcher.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    fs: Box<dyn FileSystem>,
    launcher: Arc<dyn Launcher>,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let ctx = TaskContext {
            fs: fs.as_ref(),
            launcher: &launcher,
            event_tx: &event_tx,
        };

        while let Ok(task) = task_rx.recv() {
            if let Err(e) = handle_task(task, &ctx) {
                // Only fails once the main loop has gone away.
                warn!(error = %e, "task result dropped");
                break;
            }
        }

        debug!("task worker finished");
    })
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    fs: &'a dyn FileSystem,
    launcher: &'a Arc<dyn Launcher>,
    event_tx: &'a Sender<AppEvent>,
}

impl TaskContext<'_> {
    fn send(&self, event: AppEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| AppError::Channel(e.to_string()))
    }
}

/// Orchestrates the execution of a single task.
///
/// Filesystem and launcher failures are reported back as events; the only
/// error returned here is a closed event channel.
fn handle_task(task: AppTask, ctx: &TaskContext) -> Result<()> {
    match task {
        AppTask::LoadDirectory { generation, path } => load_directory(ctx, generation, path),

        AppTask::Paste {
            entry,
            operation,
            target_dir,
        } => paste(ctx, entry, operation, target_dir),

        AppTask::Delete(entry) => delete(ctx, entry),

        AppTask::Open(path) => {
            launch(ctx, path, |launcher, path| {
                launcher.open_with_default_handler(path)
            });
            Ok(())
        }
        AppTask::OpenWithEditor(path) => {
            launch(ctx, path, |launcher, path| launcher.open_with_editor(path));
            Ok(())
        }
    }
}

fn load_directory(ctx: &TaskContext, generation: u64, path: PathBuf) -> Result<()> {
    let result = ctx.fs.list_entries(&path);
    ctx.send(AppEvent::DirectoryLoaded {
        generation,
        path,
        result,
    })
}

fn paste(
    ctx: &TaskContext,
    entry: FileEntry,
    operation: ClipboardOperation,
    target_dir: PathBuf,
) -> Result<()> {
    let destination = fs::unique_destination(ctx.fs, &target_dir, &entry.name);

    let result = match operation {
        ClipboardOperation::Copy => ctx.fs.copy(&entry.path, &destination),
        ClipboardOperation::Cut => ctx.fs.move_entry(&entry.path, &destination),
    }
    .map(|()| OperationOutcome::Pasted {
        operation,
        destination,
    });

    ctx.send(AppEvent::OperationFinished(result))
}

fn delete(ctx: &TaskContext, entry: FileEntry) -> Result<()> {
    let result = ctx
        .fs
        .delete(&entry.path)
        .map(|()| OperationOutcome::Deleted(entry.path));

    ctx.send(AppEvent::OperationFinished(result))
}

fn launch(
    ctx: &TaskContext,
    path: PathBuf,
    open: impl FnOnce(&dyn Launcher, &std::path::Path) -> Result<()> + Send + 'static,
) {
    let launcher = Arc::clone(ctx.launcher);
    let event_tx = ctx.event_tx.clone();

    thread::spawn(move || {
        let result = open(launcher.as_ref(), &path).map(|()| OperationOutcome::Launched(path));
        let _ = event_tx.send(AppEvent::OperationFinished(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{path::Path, sync::mpsc, time::Duration};

    use crate::{
        fs::testing::MemoryFileSystem,
        launcher::testing::{FakeLauncher, Launch},
        model::EntryKind,
    };

    fn sample_fs() -> MemoryFileSystem {
        MemoryFileSystem::with(&[
            ("/home", EntryKind::Directory),
            ("/home/docs", EntryKind::Directory),
            ("/home/docs/report.txt", EntryKind::File),
            ("/home/report.txt", EntryKind::File),
            ("/home/report (1).txt", EntryKind::File),
        ])
    }

    fn run(
        fs: &MemoryFileSystem,
        launcher: FakeLauncher,
        task: AppTask,
    ) -> mpsc::Receiver<AppEvent> {
        let (event_tx, event_rx) = mpsc::channel();
        let launcher: Arc<dyn Launcher> = Arc::new(launcher);
        let ctx = TaskContext {
            fs,
            launcher: &launcher,
            event_tx: &event_tx,
        };
        handle_task(task, &ctx).unwrap();
        event_rx
    }

    #[test]
    fn test_load_directory_echoes_generation() {
        let fs = sample_fs();
        let rx = run(
            &fs,
            FakeLauncher::default(),
            AppTask::LoadDirectory {
                generation: 7,
                path: PathBuf::from("/home"),
            },
        );

        match rx.try_recv().unwrap() {
            AppEvent::DirectoryLoaded {
                generation,
                path,
                result,
            } => {
                assert_eq!(generation, 7);
                assert_eq!(path, Path::new("/home"));
                let names: Vec<String> = result.unwrap().into_iter().map(|e| e.name).collect();
                assert_eq!(names, vec!["docs", "report (1).txt", "report.txt"]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_directory_reports_error() {
        let fs = sample_fs();
        let rx = run(
            &fs,
            FakeLauncher::default(),
            AppTask::LoadDirectory {
                generation: 1,
                path: PathBuf::from("/nowhere"),
            },
        );

        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::DirectoryLoaded { result: Err(AppError::Io { .. }), .. }
        ));
    }

    #[test]
    fn test_paste_copy_picks_unique_name() {
        let fs = sample_fs();
        let entry = fs.stat(Path::new("/home/docs/report.txt")).unwrap();
        let rx = run(
            &fs,
            FakeLauncher::default(),
            AppTask::Paste {
                entry,
                operation: ClipboardOperation::Copy,
                target_dir: PathBuf::from("/home"),
            },
        );

        match rx.try_recv().unwrap() {
            AppEvent::OperationFinished(Ok(OperationOutcome::Pasted { destination, .. })) => {
                assert_eq!(destination, Path::new("/home/report (2).txt"));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(fs.contains("/home/report (2).txt"));
        assert!(fs.contains("/home/docs/report.txt"));
    }

    #[test]
    fn test_paste_cut_moves_directory() {
        let fs = sample_fs();
        let entry = fs.stat(Path::new("/home/docs")).unwrap();
        fs.nodes
            .lock()
            .unwrap()
            .insert(PathBuf::from("/home/archive"), EntryKind::Directory);

        let rx = run(
            &fs,
            FakeLauncher::default(),
            AppTask::Paste {
                entry,
                operation: ClipboardOperation::Cut,
                target_dir: PathBuf::from("/home/archive"),
            },
        );

        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::OperationFinished(Ok(OperationOutcome::Pasted {
                operation: ClipboardOperation::Cut,
                ..
            }))
        ));
        assert!(fs.contains("/home/archive/docs/report.txt"));
        assert!(!fs.contains("/home/docs"));
    }

    #[test]
    fn test_delete_vanished_entry_reports_error() {
        let fs = sample_fs();
        let entry = FileEntry::file("/home", "ghost.txt");
        let rx = run(&fs, FakeLauncher::default(), AppTask::Delete(entry));

        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::OperationFinished(Err(AppError::Io { .. }))
        ));
    }

    #[test]
    fn test_launch_reports_completion() {
        let fs = sample_fs();
        let launcher = FakeLauncher::default();
        let rx = run(
            &fs,
            launcher.clone(),
            AppTask::OpenWithEditor(PathBuf::from("/home/report.txt")),
        );

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(
            event,
            AppEvent::OperationFinished(Ok(OperationOutcome::Launched(_)))
        ));
        assert_eq!(
            *launcher.launches.lock().unwrap(),
            vec![Launch::Editor(PathBuf::from("/home/report.txt"))]
        );
    }

    #[test]
    fn test_failed_launch_is_reported() {
        let fs = sample_fs();
        let launcher = FakeLauncher {
            fail: true,
            ..FakeLauncher::default()
        };
        let rx = run(&fs, launcher, AppTask::Open(PathBuf::from("/home/report.txt")));

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            AppEvent::OperationFinished(Err(AppError::Launch(_)))
        ));
    }
}
