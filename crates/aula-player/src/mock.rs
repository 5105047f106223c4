#![forbid(unsafe_code)]

//! Test helper: a chrome fake that records every call.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::chrome::PlayerChrome;

/// Records chrome calls so tests can assert on fullscreen requests and
/// style lifecycle pairing.
pub struct RecordingChrome {
    fullscreen_requests: AtomicUsize,
    exit_requests: AtomicUsize,
    inject_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    styles_present: AtomicBool,
}

impl RecordingChrome {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fullscreen_requests: AtomicUsize::new(0),
            exit_requests: AtomicUsize::new(0),
            inject_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            styles_present: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn fullscreen_requests(&self) -> usize {
        self.fullscreen_requests.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn exit_requests(&self) -> usize {
        self.exit_requests.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn inject_calls(&self) -> usize {
        self.inject_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn styles_present(&self) -> bool {
        self.styles_present.load(Ordering::Relaxed)
    }
}

impl Default for RecordingChrome {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerChrome for RecordingChrome {
    fn request_fullscreen(&self) {
        self.fullscreen_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn exit_fullscreen(&self) {
        self.exit_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn inject_styles(&self) {
        self.inject_calls.fetch_add(1, Ordering::Relaxed);
        self.styles_present.store(true, Ordering::Relaxed);
    }

    fn remove_styles(&self) {
        self.remove_calls.fetch_add(1, Ordering::Relaxed);
        self.styles_present.store(false, Ordering::Relaxed);
    }
}
