use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::assets::decode::{PreparedFrame, load_frame_file};
use crate::assets::locator::{AssetLocator, normalize_rel_path};
use crate::foundation::core::{FrameIndex, LoadGeneration};
use crate::foundation::error::{ReelError, ReelResult};

/// Tags one frame request so its completion can be routed back to the right slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    /// Frame-set load the request belongs to.
    pub generation: LoadGeneration,
    /// Slot the result is written to.
    pub index: FrameIndex,
}

/// Result of one frame request.
pub type LoadOutcome = ReelResult<PreparedFrame>;

/// A finished frame request, delivered back to the playback controller by the host.
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub outcome: LoadOutcome,
}

/// Asset transport used by the frame store.
///
/// `request` must not block on the load itself. Each request is expected to complete exactly once,
/// in any order, through [`crate::PlaybackController::on_slot_resolved`]. Requests cannot be
/// cancelled; the store ignores completions for generations it no longer tracks.
pub trait FrameLoader {
    fn request(&mut self, ticket: LoadTicket, locator: &AssetLocator);
}

/// Loads frames from a directory, decoding on the rayon pool.
///
/// Completions are queued on an internal channel; drain them with [`FsFrameLoader::try_next`] or
/// [`FsFrameLoader::next_timeout`] and feed them to the controller.
#[derive(Debug)]
pub struct FsFrameLoader {
    root: PathBuf,
    tx: mpsc::Sender<LoadCompletion>,
    rx: mpsc::Receiver<LoadCompletion>,
    requested: u64,
}

impl FsFrameLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx,
            requested: 0,
        }
    }

    /// Return root directory used when resolving locators.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of requests issued so far.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn try_next(&self) -> Option<LoadCompletion> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next completion.
    pub fn next_timeout(&self, timeout: Duration) -> ReelResult<LoadCompletion> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => {
                ReelError::asset(format!("no frame completed within {timeout:?}"))
            }
            mpsc::RecvTimeoutError::Disconnected => {
                ReelError::asset("frame loader channel disconnected")
            }
        })
    }

    fn resolve(&self, locator: &AssetLocator) -> ReelResult<PathBuf> {
        let norm = normalize_rel_path(locator.as_str())?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl FrameLoader for FsFrameLoader {
    fn request(&mut self, ticket: LoadTicket, locator: &AssetLocator) {
        self.requested = self.requested.saturating_add(1);
        let tx = self.tx.clone();
        match self.resolve(locator) {
            Ok(path) => rayon::spawn(move || {
                let outcome = load_frame_file(&path);
                // The receiver lives as long as the loader; a send error means nobody is listening.
                let _ = tx.send(LoadCompletion { ticket, outcome });
            }),
            Err(e) => {
                let _ = tx.send(LoadCompletion {
                    ticket,
                    outcome: Err(e),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
