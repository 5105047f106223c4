#![forbid(unsafe_code)]

use tokio::sync::broadcast;

use crate::Event;

/// Capacity sized for bursts of `TimeUpdate` ticks between receiver polls.
const DEFAULT_CAPACITY: usize = 64;

/// Diagnostics tap over the raw playback pipeline.
///
/// The surface and the engine each feed their own sub-enum in; subscribers
/// see the two streams merged, in publish order. Publishing is synchronous
/// and lossy: with nobody subscribed the event vanishes, and a subscriber
/// that falls a full channel behind gets `RecvError::Lagged` rather than
/// ever stalling playback.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish a surface or engine event; sub-enum values convert directly,
    /// e.g. `bus.publish(SurfaceEvent::Ended)`.
    pub fn publish<E: Into<Event>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    /// A receiver over the merged stream, starting at the next event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineEvent, SurfaceEvent};

    #[tokio::test]
    async fn surface_and_engine_streams_merge_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(EngineEvent::ManifestParsed { variant_count: 4 });
        bus.publish(SurfaceEvent::MetadataLoaded { duration: 42.0 });

        assert!(matches!(
            rx.recv().await,
            Ok(Event::Engine(EngineEvent::ManifestParsed { variant_count: 4 }))
        ));
        assert!(matches!(
            rx.recv().await,
            Ok(Event::Surface(SurfaceEvent::MetadataLoaded { duration })) if duration == 42.0
        ));
    }

    #[tokio::test]
    async fn late_subscriber_starts_at_the_next_event() {
        let bus = EventBus::default();
        bus.publish(SurfaceEvent::LoadStart);

        let mut rx = bus.subscribe();
        bus.publish(SurfaceEvent::Ended);

        assert!(matches!(
            rx.recv().await,
            Ok(Event::Surface(SurfaceEvent::Ended))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn time_update_flood_lags_a_slow_subscriber_without_blocking() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();

        for tick in 0..32 {
            bus.publish(SurfaceEvent::TimeUpdate {
                position: f64::from(tick),
                buffered_end: f64::from(tick) + 10.0,
            });
        }
        bus.publish(SurfaceEvent::Ended);

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));

        // After the lag notice the receiver resumes at the retained tail
        // and still observes the terminal event.
        let mut saw_ended = false;
        while let Ok(event) = rx.try_recv() {
            saw_ended |= matches!(event, Event::Surface(SurfaceEvent::Ended));
        }
        assert!(saw_ended);
    }

    #[tokio::test]
    async fn clones_feed_the_same_merged_stream() {
        let bus = EventBus::default();
        let surface_side = bus.clone();
        let engine_side = bus.clone();
        let mut rx = bus.subscribe();

        surface_side.publish(SurfaceEvent::Play);
        engine_side.publish(EngineEvent::Detached);

        assert!(matches!(
            rx.recv().await,
            Ok(Event::Surface(SurfaceEvent::Play))
        ));
        assert!(matches!(rx.recv().await, Ok(Event::Engine(EngineEvent::Detached))));
    }
}
