//! Serialized access to one persisted file
//!
//! Every operation is a command sent to a single background task over an
//! unbounded channel. The task runs commands one at a time in the order they
//! were submitted, so a read submitted after a write observes that write even
//! though the write itself is not awaited.

use super::atomic::atomic_write;
use crate::error::{SyncStoreError, SyncStoreResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Commands executed by the storage worker
enum StorageCommand {
    /// Create the parent directory
    Initialize,
    /// Read the file as UTF-8 text
    Read { reply: oneshot::Sender<Option<String>> },
    /// Atomically replace the file
    Write { contents: Vec<u8> },
    /// Remove the file
    Delete { reply: oneshot::Sender<()> },
    /// Barrier: reply once all earlier commands are done
    Flush { reply: oneshot::Sender<()> },
}

/// Handle to the serial worker owning one file path
///
/// Dropping the accessor closes the channel; the worker finishes the commands
/// already queued and exits.
#[derive(Debug)]
pub struct StorageAccessor {
    path: PathBuf,
    commands: mpsc::UnboundedSender<StorageCommand>,
}

impl StorageAccessor {
    /// Spawn the worker for `path` on the current Tokio runtime
    pub fn spawn(path: PathBuf) -> SyncStoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| SyncStoreError::NoRuntime)?;
        let (commands, receiver) = mpsc::unbounded_channel();

        let worker = StorageWorker { path: path.clone() };
        runtime.spawn(worker.run(receiver));

        debug!("Spawned storage worker for {}", path.display());
        Ok(Self { path, commands })
    }

    /// Path owned by this accessor
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists (best effort, not awaited)
    pub fn initialize(&self) {
        self.submit(StorageCommand::Initialize);
    }

    /// Read the file contents
    ///
    /// Returns `None` when the file is missing, unreadable, or not UTF-8.
    pub async fn read(&self) -> Option<String> {
        let (reply, response) = oneshot::channel();
        self.submit(StorageCommand::Read { reply });
        response.await.ok().flatten()
    }

    /// Queue an atomic replace of the file contents
    ///
    /// Returns immediately; the outcome is only logged.
    pub fn write(&self, contents: impl Into<Vec<u8>>) {
        self.submit(StorageCommand::Write {
            contents: contents.into(),
        });
    }

    /// Remove the file, waiting until the worker has done so
    pub async fn delete(&self) {
        let (reply, response) = oneshot::channel();
        self.submit(StorageCommand::Delete { reply });
        let _ = response.await;
    }

    /// Wait until every previously submitted command has completed
    pub async fn flush(&self) {
        let (reply, response) = oneshot::channel();
        self.submit(StorageCommand::Flush { reply });
        let _ = response.await;
    }

    fn submit(&self, command: StorageCommand) {
        if self.commands.send(command).is_err() {
            warn!("Storage worker for {} is gone", self.path.display());
        }
    }
}

struct StorageWorker {
    path: PathBuf,
}

impl StorageWorker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<StorageCommand>) {
        while let Some(command) = receiver.recv().await {
            self.handle(command).await;
        }
        debug!("Storage worker for {} stopped", self.path.display());
    }

    async fn handle(&self, command: StorageCommand) {
        match command {
            StorageCommand::Initialize => {
                if let Err(e) = self.initialize().await {
                    warn!("{}", e);
                }
            }
            StorageCommand::Read { reply } => {
                let contents = self.read().await.unwrap_or_else(|e| {
                    warn!("{}", e);
                    None
                });
                let _ = reply.send(contents);
            }
            StorageCommand::Write { contents } => match self.write(&contents).await {
                Ok(()) => debug!("Wrote {} bytes to {}", contents.len(), self.path.display()),
                Err(e) => warn!("{}", e),
            },
            StorageCommand::Delete { reply } => {
                if let Err(e) = self.delete().await {
                    warn!("{}", e);
                }
                let _ = reply.send(());
            }
            StorageCommand::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }

    async fn initialize(&self) -> SyncStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SyncStoreError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }
        Ok(())
    }

    async fn read(&self) -> SyncStoreResult<Option<String>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(SyncStoreError::io(
                    format!("reading {}", self.path.display()),
                    e,
                ))
            }
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| SyncStoreError::InvalidUtf8(self.path.clone()))
    }

    async fn write(&self, contents: &[u8]) -> SyncStoreResult<()> {
        atomic_write(&self.path, contents)
            .await
            .map_err(|e| SyncStoreError::io(format!("writing {}", self.path.display()), e))
    }

    async fn delete(&self) -> SyncStoreResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncStoreError::io(
                format!("deleting {}", self.path.display()),
                e,
            )),
        }
    }
}
