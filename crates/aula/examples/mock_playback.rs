#![forbid(unsafe_code)]

//! Drives a full playback session against the mock surface and engine:
//! bind, manifest, play, a fragment retry, a stall, and teardown.
//!
//! Run with `RUST_LOG=debug cargo run --example mock_playback`.

use std::{sync::Arc, time::Duration};

use aula::prelude::*;
use aula_media::mock::{MockEngineFactory, MockSurface};
use aula_player::mock::RecordingChrome;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), PlayerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let surface = Arc::new(MockSurface::new());
    let factory = Arc::new(MockEngineFactory::supported());
    let chrome = Arc::new(RecordingChrome::new());

    let config = PlayerConfig::new("https://cdn.example.com/stream/master.m3u8");
    let player = Player::new(
        config,
        surface.clone() as Arc<dyn MediaSurface>,
        factory.clone() as Arc<dyn EngineFactory>,
        chrome as Arc<dyn PlayerChrome>,
    )
    .await?;

    println!("bound: {:?}", player.bind_mode());

    let engine = factory.engine(0);
    engine.emit(EngineEvent::ManifestParsed { variant_count: 3 });
    surface.resolve_metadata(636.0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!("status: {:?}", player.state().status);

    player.toggle_play()?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!("status: {:?}", player.state().status);

    engine.emit(EngineEvent::FragmentRetry {
        attempt: 1,
        message: "segment 12 timed out".to_owned(),
    });
    surface.emit(SurfaceEvent::Waiting);
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!("status: {:?}", player.state().status);

    surface.emit(SurfaceEvent::Playing);
    surface.emit(SurfaceEvent::TimeUpdate {
        position: 12.5,
        buffered_end: 48.0,
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let state = player.state();
    println!(
        "status: {:?}, position {:.1}s of {:.1}s, {:.0}% buffered",
        state.status,
        state.position,
        state.duration,
        state.buffered * 100.0
    );

    player.shutdown();
    println!("engine destroyed: {}", engine.is_destroyed());
    Ok(())
}
