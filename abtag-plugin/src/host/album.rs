//! Album pending-request accounting
//!
//! Track processors record outstanding lookups against the album they belong
//! to. The host finalizes the album once nothing is outstanding.

use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Host album capability used by track processors
pub trait AlbumHandle: Send + Sync {
    /// Record one outstanding request
    fn begin_request(&self);

    /// Release one outstanding request and run the host's finalize check
    fn end_request(&self);
}

#[derive(Debug, Default)]
struct LoadState {
    pending: usize,
    loaded: bool,
}

impl LoadState {
    /// Flip to loaded when nothing is outstanding; true only on the first flip
    fn try_finalize(&mut self) -> bool {
        if self.loaded || self.pending > 0 {
            return false;
        }
        self.loaded = true;
        true
    }
}

/// In-memory album with a pending-request counter
///
/// The album counts as loaded the first time its counter drops to zero
/// through [`AlbumHandle::end_request`] or [`Album::finalize_loading`].
/// The counter and the loaded flag change under the same lock, so a request
/// begun concurrently with the finalize check is never left outstanding on a
/// loaded album.
pub struct Album {
    id: String,
    state: watch::Sender<LoadState>,
}

impl Album {
    pub fn new(id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LoadState::default());
        Self {
            id: id.into(),
            state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pending_requests(&self) -> usize {
        self.state.borrow().pending
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    /// Mark the album loaded if no requests are outstanding
    pub fn finalize_loading(&self) {
        if self.state.send_if_modified(LoadState::try_finalize) {
            info!(album = %self.id, "Album finished loading");
        }
    }

    /// Wait until the album has been finalized
    pub async fn wait_loaded(&self) {
        let mut rx = self.state.subscribe();
        // Sender is owned by self, so the channel cannot close while we wait
        let _ = rx.wait_for(|state| state.loaded).await;
    }
}

impl AlbumHandle for Album {
    fn begin_request(&self) {
        let mut pending = 0;
        self.state.send_if_modified(|state| {
            state.pending += 1;
            pending = state.pending;
            false
        });
        debug!(album = %self.id, pending, "Album request added");
    }

    fn end_request(&self) {
        let mut released = None;
        let newly_loaded = self.state.send_if_modified(|state| {
            released = state.pending.checked_sub(1);
            if let Some(n) = released {
                state.pending = n;
            }
            state.try_finalize()
        });

        match released {
            Some(pending) => debug!(album = %self.id, pending, "Album request removed"),
            None => warn!(album = %self.id, "end_request called with no pending requests"),
        }
        if newly_loaded {
            info!(album = %self.id, "Album finished loading");
        }
    }
}
