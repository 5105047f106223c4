#![forbid(unsafe_code)]

//! Engine binding: owns the lifecycle of the adaptive engine instance and
//! the surface's source assignment.

use std::sync::Arc;

use aula_events::EngineEvent;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    engine::{AdaptiveEngine, EngineFactory, EngineOptions},
    error::{MediaError, MediaResult},
    source::SourceKind,
    surface::MediaSurface,
};

/// How a bound source is delivered, resolved once per bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindMode {
    /// Progressive file assigned to the surface directly.
    Progressive,
    /// Adaptive manifest driven by an engine instance.
    EngineBacked,
    /// Adaptive manifest handed to the surface's native manifest support.
    NativeBacked,
}

/// Binds a classified source to a media surface.
///
/// Invariant: at most one live engine instance. `bind` destroys any
/// previous instance synchronously before creating the next; `unbind` is
/// idempotent.
pub struct EngineBinding {
    factory: Arc<dyn EngineFactory>,
    options: EngineOptions,
    engine: Mutex<Option<Box<dyn AdaptiveEngine>>>,
    // Receiver opened before `load`, handed to the first subscriber.
    pending_events: Mutex<Option<broadcast::Receiver<EngineEvent>>>,
    mode: Mutex<Option<BindMode>>,
}

impl EngineBinding {
    #[must_use]
    pub fn new(factory: Arc<dyn EngineFactory>, options: EngineOptions) -> Self {
        Self {
            factory,
            options,
            engine: Mutex::new(None),
            pending_events: Mutex::new(None),
            mode: Mutex::new(None),
        }
    }

    /// Bind a source to the surface, resolving the delivery mode.
    ///
    /// - Progressive sources are assigned directly.
    /// - Adaptive sources go through the engine when the runtime supports
    ///   it, fall back to native manifest playback when the surface offers
    ///   it, and fail with [`MediaError::UnsupportedFormat`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnsupportedFormat`] when the source can be
    /// played neither through the engine nor natively. The binding is left
    /// unbound in that case.
    pub fn bind(
        &self,
        source: &SourceKind,
        surface: &Arc<dyn MediaSurface>,
    ) -> MediaResult<BindMode> {
        // Never two live instances: tear the previous one down first.
        self.destroy_engine();

        let mode = match source {
            SourceKind::Progressive(url) => {
                surface.set_source(url);
                BindMode::Progressive
            }
            SourceKind::Adaptive(url) => {
                if self.factory.is_supported() {
                    let engine = self.factory.create(&self.options);
                    engine.attach(Arc::clone(surface));
                    // Subscribe before `load`: the engine may publish its
                    // first events synchronously, and the channel drops
                    // anything sent with no receiver open.
                    *self.pending_events.lock() = Some(engine.events());
                    engine.load(url);
                    *self.engine.lock() = Some(engine);
                    BindMode::EngineBacked
                } else if surface.supports_native_hls() {
                    surface.set_source(url);
                    BindMode::NativeBacked
                } else {
                    *self.mode.lock() = None;
                    return Err(MediaError::UnsupportedFormat(format!(
                        "no adaptive engine and no native manifest support for {url}"
                    )));
                }
            }
        };

        *self.mode.lock() = Some(mode);
        debug!(?mode, url = %source.url(), "source bound");
        Ok(mode)
    }

    /// Destroy the engine instance and detach the surface.
    ///
    /// Idempotent: calling twice is a no-op.
    pub fn unbind(&self, surface: &dyn MediaSurface) {
        let was_bound = self.mode.lock().take().is_some();
        self.destroy_engine();
        if was_bound {
            surface.clear_source();
            debug!("source unbound");
        }
    }

    /// Whether a source is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.mode.lock().is_some()
    }

    /// The delivery mode of the current bind, if any.
    #[must_use]
    pub fn mode(&self) -> Option<BindMode> {
        *self.mode.lock()
    }

    /// Subscribe to engine events. `None` unless the bind is engine-backed.
    ///
    /// The first call per bind returns the receiver opened before the
    /// manifest was loaded, so nothing the engine published during `bind`
    /// is missed. Later calls subscribe fresh.
    #[must_use]
    pub fn engine_events(&self) -> Option<broadcast::Receiver<EngineEvent>> {
        if let Some(rx) = self.pending_events.lock().take() {
            return Some(rx);
        }
        self.engine.lock().as_ref().map(|engine| engine.events())
    }

    fn destroy_engine(&self) {
        *self.pending_events.lock() = None;
        if let Some(engine) = self.engine.lock().take() {
            engine.destroy();
            debug!("engine instance destroyed");
        }
    }
}
