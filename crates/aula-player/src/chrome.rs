#![forbid(unsafe_code)]

//! Host chrome seam: fullscreen requests and global style resources.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::debug;

/// Host-side chrome the player drives but does not own.
///
/// Fullscreen requests are fire-and-forget: the actual fullscreen flag is
/// mirrored from host observations, never assumed from the request (the
/// host can exit fullscreen on its own, e.g. via Escape).
pub trait PlayerChrome: Send + Sync + 'static {
    /// Ask the host to enter fullscreen on the player container.
    fn request_fullscreen(&self);

    /// Ask the host to leave fullscreen.
    fn exit_fullscreen(&self);

    /// Install the player's global style resources (cursor, track visuals).
    /// Must be idempotent on the host side; the guard additionally keys it.
    fn inject_styles(&self);

    /// Remove the player's global style resources.
    fn remove_styles(&self);
}

/// Scoped acquisition of the chrome's global style resources.
///
/// Acquires on creation, releases on [`StyleGuard::release`] or drop.
/// Release is idempotent, so repeated mounts and explicit teardown paths
/// never double-inject or double-remove.
pub struct StyleGuard {
    chrome: Arc<dyn PlayerChrome>,
    released: AtomicBool,
}

impl StyleGuard {
    #[must_use]
    pub fn acquire(chrome: Arc<dyn PlayerChrome>) -> Self {
        chrome.inject_styles();
        debug!("player styles injected");
        Self {
            chrome,
            released: AtomicBool::new(false),
        }
    }

    /// Release the styles. Safe to call more than once.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.chrome.remove_styles();
            debug!("player styles removed");
        }
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        self.release();
    }
}
