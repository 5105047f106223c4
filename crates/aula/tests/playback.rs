#![forbid(unsafe_code)]

//! End-to-end playback scenarios against the mock surface, engine, and
//! chrome.

use std::{sync::Arc, time::Duration};

use aula::prelude::*;
use aula_media::mock::{MockEngineFactory, MockSurface};
use aula_player::{mock::RecordingChrome, FatalErrorCallback};
use parking_lot::Mutex;

const ADAPTIVE_SRC: &str = "https://cdn.example.com/stream/master.m3u8";
const PROGRESSIVE_SRC: &str = "https://cdn.example.com/clip.mp4";

struct Harness {
    surface: Arc<MockSurface>,
    factory: Arc<MockEngineFactory>,
    chrome: Arc<RecordingChrome>,
    player: Player,
    errors: Arc<Mutex<Vec<String>>>,
}

async fn mount(src: &str, factory: MockEngineFactory, surface: MockSurface) -> Harness {
    let surface = Arc::new(surface);
    let factory = Arc::new(factory);
    let chrome = Arc::new(RecordingChrome::new());
    let errors = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&errors);
    let on_error: FatalErrorCallback = Arc::new(move |message| sink.lock().push(message));

    let config = PlayerConfig::new(src).with_on_error(on_error);
    let player = Player::new(
        config,
        surface.clone() as Arc<dyn MediaSurface>,
        factory.clone() as Arc<dyn EngineFactory>,
        chrome.clone() as Arc<dyn PlayerChrome>,
    )
    .await
    .unwrap();

    Harness {
        surface,
        factory,
        chrome,
        player,
        errors,
    }
}

/// Let the event pump drain pending broadcasts.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

impl Harness {
    /// Interact, then drive the bound adaptive source to `Playing`.
    async fn play_adaptive(&self) {
        self.factory
            .engine(self.factory.created_count() - 1)
            .emit(EngineEvent::ManifestParsed { variant_count: 3 });
        settle().await;
        self.player.toggle_play().unwrap();
        settle().await;
    }
}

// -- Binding --------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn progressive_source_binds_directly() {
    let h = mount(PROGRESSIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;

    assert_eq!(h.player.bind_mode(), Some(BindMode::Progressive));
    assert_eq!(h.factory.created_count(), 0);
    assert!(h.surface.current_source().is_some());
    assert_eq!(h.player.state().status, PlaybackStatus::Loading);

    h.surface.resolve_metadata(120.0);
    settle().await;
    let state = h.player.state();
    assert_eq!(state.status, PlaybackStatus::Ready);
    assert!((state.duration - 120.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn adaptive_source_reaches_playing_through_the_engine() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;

    assert_eq!(h.player.bind_mode(), Some(BindMode::EngineBacked));
    let engine = h.factory.engine(0);
    assert!(engine.is_attached());
    assert!(engine.loaded_manifest().is_some());

    h.play_adaptive().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn adaptive_falls_back_to_native_manifest_support() {
    let h = mount(
        ADAPTIVE_SRC,
        MockEngineFactory::unsupported(),
        MockSurface::new().with_native_hls(true),
    )
    .await;

    assert_eq!(h.player.bind_mode(), Some(BindMode::NativeBacked));
    assert_eq!(h.factory.created_count(), 0);
    assert!(h.surface.current_source().is_some());
}

#[tokio::test(start_paused = true)]
async fn unplayable_adaptive_source_enters_error_state() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::unsupported(), MockSurface::new()).await;

    let state = h.player.state();
    assert_eq!(state.status, PlaybackStatus::Error);
    assert_eq!(
        state.fault.as_ref().map(|fault| fault.kind),
        Some(PlaybackFaultKind::UnsupportedFormat)
    );
    assert_eq!(h.player.bind_mode(), None);
    assert_eq!(h.errors.lock().len(), 1);

    assert!(matches!(h.player.toggle_play(), Err(PlayerError::Faulted)));
}

#[tokio::test(start_paused = true)]
async fn invalid_source_string_fails_construction() {
    let result = Player::new(
        PlayerConfig::new("not a url"),
        Arc::new(MockSurface::new()) as Arc<dyn MediaSurface>,
        Arc::new(MockEngineFactory::supported()) as Arc<dyn EngineFactory>,
        Arc::new(RecordingChrome::new()) as Arc<dyn PlayerChrome>,
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn manifest_parsed_during_load_still_reaches_ready() {
    // The engine resolves its manifest synchronously inside load(); the
    // announcement must not be lost to a pump that subscribes afterwards.
    let h = mount(
        ADAPTIVE_SRC,
        MockEngineFactory::supported().with_manifest_on_load(),
        MockSurface::new(),
    )
    .await;

    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Ready);
}

// -- Failure --------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn fatal_engine_error_while_loading_is_terminal() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;

    h.factory.engine(0).emit(EngineEvent::FatalError {
        message: "manifest fetch failed".to_owned(),
    });
    settle().await;

    let state = h.player.state();
    assert_eq!(state.status, PlaybackStatus::Error);
    assert_eq!(
        state.fault.as_ref().map(|fault| fault.kind),
        Some(PlaybackFaultKind::Network)
    );
    assert_eq!(h.errors.lock().len(), 1);

    // The failed generation leaves no live engine behind.
    assert!(h.factory.engine(0).is_destroyed());
    assert_eq!(h.player.bind_mode(), None);
}

#[tokio::test(start_paused = true)]
async fn fragment_retries_do_not_interrupt_playback() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;

    h.factory.engine(0).emit(EngineEvent::FragmentRetry {
        attempt: 1,
        message: "segment 7 timed out".to_owned(),
    });
    settle().await;

    assert_eq!(h.player.state().status, PlaybackStatus::Playing);
    assert!(h.errors.lock().is_empty());
}

// -- Source swapping ------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn source_swap_destroys_the_previous_engine_first() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;

    h.player
        .set_source("https://cdn.example.com/other/master.m3u8")
        .unwrap();
    settle().await;

    assert_eq!(h.factory.created_count(), 2);
    assert!(h.factory.engine(0).is_destroyed());
    assert!(!h.factory.engine(1).is_destroyed());
    assert_eq!(h.player.state().status, PlaybackStatus::Loading);
}

#[tokio::test(start_paused = true)]
async fn source_swap_preserves_volume_rate_and_interaction() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;
    h.player.set_volume(0.4).unwrap();
    h.player.set_rate(1.5).unwrap();

    h.player.set_source(PROGRESSIVE_SRC).unwrap();
    settle().await;

    let state = h.player.state();
    assert!((state.volume - 0.4).abs() < f32::EPSILON);
    assert!((state.rate - 1.5).abs() < f32::EPSILON);
    assert!(state.has_user_interacted);
    assert!(state.duration.is_nan());
    assert!(state.fault.is_none());
}

#[tokio::test(start_paused = true)]
async fn source_swap_recovers_from_the_error_state() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.factory.engine(0).emit(EngineEvent::FatalError {
        message: "gone".to_owned(),
    });
    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Error);

    h.player.set_source(PROGRESSIVE_SRC).unwrap();
    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Loading);
    assert!(h.player.toggle_play().is_ok());
}

#[tokio::test(start_paused = true)]
async fn rejected_source_swap_leaves_playback_untouched() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;

    assert!(h.player.set_source("not a url").is_err());

    assert_eq!(h.player.state().status, PlaybackStatus::Playing);
    assert_eq!(h.player.bind_mode(), Some(BindMode::EngineBacked));
    assert!(!h.factory.engine(0).is_destroyed());

    // The original pump is still live and keeps applying events.
    h.surface.emit(SurfaceEvent::Waiting);
    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Buffering);
}

#[tokio::test(start_paused = true)]
async fn each_bind_generation_reports_its_own_fatal_error() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.factory.engine(0).emit(EngineEvent::FatalError {
        message: "first".to_owned(),
    });
    settle().await;

    h.player.set_source(ADAPTIVE_SRC).unwrap();
    settle().await;
    h.factory.engine(1).emit(EngineEvent::FatalError {
        message: "second".to_owned(),
    });
    settle().await;

    assert_eq!(*h.errors.lock(), ["first", "second"]);
}

// -- Autoplay -------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn autoplay_kicks_in_after_prior_interaction() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;
    assert_eq!(h.surface.play_calls(), 1);

    h.player.set_source(ADAPTIVE_SRC).unwrap();
    settle().await;
    h.factory
        .engine(1)
        .emit(EngineEvent::ManifestParsed { variant_count: 3 });
    settle().await;

    assert_eq!(h.surface.play_calls(), 2);
    assert_eq!(h.player.state().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn autoplay_never_fires_without_interaction() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.factory
        .engine(0)
        .emit(EngineEvent::ManifestParsed { variant_count: 3 });
    settle().await;

    assert_eq!(h.surface.play_calls(), 0);
    assert_eq!(h.player.state().status, PlaybackStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn autoplay_veto_leaves_the_player_ready() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;

    h.surface.set_veto_autoplay(true);
    h.player.set_source(ADAPTIVE_SRC).unwrap();
    settle().await;
    h.factory
        .engine(1)
        .emit(EngineEvent::ManifestParsed { variant_count: 3 });
    settle().await;

    assert_eq!(h.player.state().status, PlaybackStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn pipeline_tap_sees_raw_events_from_both_sources() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    let mut raw = h.player.pipeline_events();

    h.factory
        .engine(0)
        .emit(EngineEvent::ManifestParsed { variant_count: 3 });
    settle().await;
    h.surface.emit(SurfaceEvent::Waiting);
    settle().await;

    assert!(matches!(
        raw.try_recv(),
        Ok(Event::Engine(EngineEvent::ManifestParsed { .. }))
    ));
    assert!(matches!(
        raw.try_recv(),
        Ok(Event::Surface(SurfaceEvent::Waiting))
    ));
}

// -- Keyboard -------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn keyboard_is_inert_until_the_first_interaction() {
    let h = mount(PROGRESSIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.surface.resolve_metadata(100.0);
    settle().await;

    assert!(!h.player.handle_key(" ").unwrap());
    assert_eq!(h.surface.play_calls(), 0);

    h.player.toggle_play().unwrap();
    settle().await;
    assert!(h.player.handle_key("ArrowRight").unwrap());
    assert!((h.player.state().position - 5.0).abs() < f64::EPSILON);
}

// -- Teardown -------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn unmount_while_buffering_tears_everything_down_once() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    h.play_adaptive().await;
    h.surface.emit(SurfaceEvent::Waiting);
    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Buffering);

    h.player.shutdown();
    h.player.shutdown();

    assert!(h.factory.engine(0).is_destroyed());
    assert_eq!(h.surface.clear_calls(), 1);
    assert_eq!(h.chrome.remove_calls(), 1);
    assert!(!h.chrome.styles_present());

    // The cancelled pump must not apply late events.
    h.surface.emit(SurfaceEvent::Ended);
    settle().await;
    assert_eq!(h.player.state().status, PlaybackStatus::Buffering);
}

#[tokio::test(start_paused = true)]
async fn drop_runs_the_same_teardown() {
    let h = mount(ADAPTIVE_SRC, MockEngineFactory::supported(), MockSurface::new()).await;
    let Harness {
        surface,
        factory,
        chrome,
        player,
        ..
    } = h;

    drop(player);
    assert!(factory.engine(0).is_destroyed());
    assert_eq!(surface.clear_calls(), 1);
    assert_eq!(chrome.remove_calls(), 1);
}
