#![forbid(unsafe_code)]

//! Hand-written fakes for the two seams, used by tests across the
//! workspace. The surface fake records every command and lets tests emit
//! events as the host would.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use aula_events::{EngineEvent, SurfaceEvent};
use parking_lot::Mutex;
use portable_atomic::{AtomicF32, AtomicF64};
use tokio::sync::broadcast;
use url::Url;

use crate::{
    engine::{AdaptiveEngine, EngineFactory, EngineOptions},
    error::MediaError,
    surface::MediaSurface,
};

// -- MockSurface --------------------------------------------------------------

/// Interior-mutable fake media surface.
///
/// Commands are recorded; `play()`/`pause()` emit the matching surface
/// events like a real element would. Everything else is emitted manually
/// through [`MockSurface::emit`].
pub struct MockSurface {
    source: Mutex<Option<Url>>,
    clear_calls: AtomicUsize,
    position: AtomicF64,
    duration: AtomicF64,
    buffered_end: AtomicF64,
    volume: AtomicF32,
    rate: AtomicF32,
    playing: AtomicBool,
    native_hls: AtomicBool,
    veto_autoplay: AtomicBool,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    events_tx: broadcast::Sender<SurfaceEvent>,
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            source: Mutex::new(None),
            clear_calls: AtomicUsize::new(0),
            position: AtomicF64::new(0.0),
            duration: AtomicF64::new(f64::NAN),
            buffered_end: AtomicF64::new(0.0),
            volume: AtomicF32::new(1.0),
            rate: AtomicF32::new(1.0),
            playing: AtomicBool::new(false),
            native_hls: AtomicBool::new(false),
            veto_autoplay: AtomicBool::new(false),
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            events_tx,
        }
    }

    /// Builder: native manifest support.
    #[must_use]
    pub fn with_native_hls(self, supported: bool) -> Self {
        self.native_hls.store(supported, Ordering::Relaxed);
        self
    }

    /// Emit a surface event to all subscribers.
    pub fn emit(&self, event: SurfaceEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Simulate metadata resolution: set the duration and emit the event.
    pub fn resolve_metadata(&self, duration: f64) {
        self.duration.store(duration, Ordering::Relaxed);
        self.emit(SurfaceEvent::MetadataLoaded { duration });
    }

    /// Make subsequent `play()` calls fail as autoplay-blocked.
    pub fn set_veto_autoplay(&self, veto: bool) {
        self.veto_autoplay.store(veto, Ordering::Relaxed);
    }

    #[must_use]
    pub fn current_source(&self) -> Option<Url> {
        self.source.lock().clone()
    }

    #[must_use]
    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSurface for MockSurface {
    fn set_source(&self, url: &Url) {
        *self.source.lock() = Some(url.clone());
        self.position.store(0.0, Ordering::Relaxed);
    }

    fn clear_source(&self) {
        *self.source.lock() = None;
        self.clear_calls.fetch_add(1, Ordering::Relaxed);
        self.playing.store(false, Ordering::Relaxed);
    }

    fn position(&self) -> f64 {
        self.position.load(Ordering::Relaxed)
    }

    fn seek(&self, seconds: f64) {
        self.position.store(seconds, Ordering::Relaxed);
    }

    fn duration(&self) -> f64 {
        self.duration.load(Ordering::Relaxed)
    }

    fn buffered_end(&self) -> f64 {
        self.buffered_end.load(Ordering::Relaxed)
    }

    fn volume(&self) -> f32 {
        self.volume.load(Ordering::Relaxed)
    }

    fn set_volume(&self, volume: f32) {
        self.volume.store(volume, Ordering::Relaxed);
    }

    fn rate(&self) -> f32 {
        self.rate.load(Ordering::Relaxed)
    }

    fn set_rate(&self, rate: f32) {
        self.rate.store(rate, Ordering::Relaxed);
    }

    fn play(&self) -> Result<(), MediaError> {
        self.play_calls.fetch_add(1, Ordering::Relaxed);
        if self.veto_autoplay.load(Ordering::Relaxed) {
            return Err(MediaError::AutoplayBlocked(
                "host rejected the play request".to_owned(),
            ));
        }
        self.playing.store(true, Ordering::Relaxed);
        self.emit(SurfaceEvent::Play);
        Ok(())
    }

    fn pause(&self) {
        self.pause_calls.fetch_add(1, Ordering::Relaxed);
        self.playing.store(false, Ordering::Relaxed);
        self.emit(SurfaceEvent::Pause);
    }

    fn supports_native_hls(&self) -> bool {
        self.native_hls.load(Ordering::Relaxed)
    }

    fn events(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events_tx.subscribe()
    }
}

// -- MockEngine ---------------------------------------------------------------

/// Fake adaptive engine recording its lifecycle calls.
pub struct MockEngine {
    attached: AtomicBool,
    destroyed: AtomicBool,
    destroy_calls: AtomicUsize,
    manifest: Mutex<Option<Url>>,
    manifest_on_load: AtomicBool,
    options: EngineOptions,
    events_tx: broadcast::Sender<EngineEvent>,
}

impl MockEngine {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            attached: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            destroy_calls: AtomicUsize::new(0),
            manifest: Mutex::new(None),
            manifest_on_load: AtomicBool::new(false),
            options,
            events_tx,
        }
    }

    /// Make `load()` announce a parsed manifest synchronously, like an
    /// engine that resolves a cached manifest without yielding.
    pub fn set_manifest_on_load(&self, enabled: bool) {
        self.manifest_on_load.store(enabled, Ordering::Relaxed);
    }

    /// Emit an engine event to all subscribers.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.events_tx.send(event);
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn loaded_manifest(&self) -> Option<Url> {
        self.manifest.lock().clone()
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

impl AdaptiveEngine for Arc<MockEngine> {
    fn attach(&self, _surface: Arc<dyn MediaSurface>) {
        self.attached.store(true, Ordering::Relaxed);
    }

    fn load(&self, manifest: &Url) {
        *self.manifest.lock() = Some(manifest.clone());
        if self.manifest_on_load.load(Ordering::Relaxed) {
            self.emit(EngineEvent::ManifestParsed { variant_count: 1 });
        }
    }

    fn destroy(&self) {
        self.destroy_calls.fetch_add(1, Ordering::Relaxed);
        self.destroyed.store(true, Ordering::Relaxed);
        self.attached.store(false, Ordering::Relaxed);
    }

    fn events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events_tx.subscribe()
    }
}

// -- MockEngineFactory --------------------------------------------------------

/// Fake factory retaining handles to every engine it creates, so tests can
/// inspect lifecycles after the binding gave up ownership.
pub struct MockEngineFactory {
    supported: AtomicBool,
    manifest_on_load: AtomicBool,
    created: Mutex<Vec<Arc<MockEngine>>>,
}

impl MockEngineFactory {
    #[must_use]
    pub fn supported() -> Self {
        Self {
            supported: AtomicBool::new(true),
            manifest_on_load: AtomicBool::new(false),
            created: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: AtomicBool::new(false),
            manifest_on_load: AtomicBool::new(false),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Builder: every created engine announces its manifest synchronously
    /// from within `load()`.
    #[must_use]
    pub fn with_manifest_on_load(self) -> Self {
        self.manifest_on_load.store(true, Ordering::Relaxed);
        self
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }

    /// Handle to the n-th created engine.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `index + 1` engines were created.
    #[must_use]
    pub fn engine(&self, index: usize) -> Arc<MockEngine> {
        Arc::clone(&self.created.lock()[index])
    }
}

impl EngineFactory for MockEngineFactory {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Relaxed)
    }

    fn create(&self, options: &EngineOptions) -> Box<dyn AdaptiveEngine> {
        let engine = Arc::new(MockEngine::new(options.clone()));
        if self.manifest_on_load.load(Ordering::Relaxed) {
            engine.set_manifest_on_load(true);
        }
        self.created.lock().push(Arc::clone(&engine));
        Box::new(engine)
    }
}
