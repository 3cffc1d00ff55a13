use crate::error::MediaError;
use crate::playback::{SlotId, VideoSurface};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct SlotView {
    source: Option<String>,
    muted: bool,
    opacity: f32,
    playing: bool,
}

impl Default for SlotView {
    fn default() -> Self {
        Self {
            source: None,
            muted: true,
            opacity: 0.0,
            playing: false,
        }
    }
}

/// Headless surface that logs what a real video layer would show.
///
/// Loads take `load_latency` and fail with probability `failure_rate`.
pub struct SimulatedSurface {
    load_latency: Duration,
    failure_rate: f64,
    slots: Mutex<HashMap<SlotId, SlotView>>,
    rng: Mutex<StdRng>,
}

impl SimulatedSurface {
    pub fn new(load_latency: Duration, failure_rate: f64) -> Self {
        Self::with_rng(load_latency, failure_rate, StdRng::from_entropy())
    }

    pub fn seeded(load_latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self::with_rng(load_latency, failure_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(load_latency: Duration, failure_rate: f64, rng: StdRng) -> Self {
        let failure_rate = if failure_rate.is_finite() {
            failure_rate.clamp(0.0, 1.0)
        } else {
            warn!(
                target: "dreamreel::video",
                "Ignoring non-finite failure rate {}", failure_rate
            );
            0.0
        };
        Self {
            load_latency,
            failure_rate,
            slots: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Source currently assigned to a slot
    pub fn source_of(&self, slot: SlotId) -> Option<String> {
        self.slots.lock().get(&slot).and_then(|s| s.source.clone())
    }

    pub fn is_playing(&self, slot: SlotId) -> bool {
        self.slots.lock().get(&slot).map(|s| s.playing).unwrap_or(false)
    }

    pub fn opacity_of(&self, slot: SlotId) -> f32 {
        self.slots.lock().get(&slot).map(|s| s.opacity).unwrap_or(0.0)
    }
}

#[async_trait]
impl VideoSurface for SimulatedSurface {
    fn set_source(&self, slot: SlotId, url: &str) {
        debug!(target: "dreamreel::video", "Slot {} source -> {}", slot, url);
        let mut slots = self.slots.lock();
        let view = slots.entry(slot).or_default();
        view.source = Some(url.to_string());
        view.playing = false;
    }

    fn set_muted(&self, slot: SlotId, muted: bool) {
        self.slots.lock().entry(slot).or_default().muted = muted;
    }

    fn set_opacity(&self, slot: SlotId, opacity: f32) {
        debug!(target: "dreamreel::video", "Slot {} opacity -> {:.1}", slot, opacity);
        self.slots.lock().entry(slot).or_default().opacity = opacity;
    }

    fn pause(&self, slot: SlotId) {
        self.slots.lock().entry(slot).or_default().playing = false;
    }

    async fn load(&self, slot: SlotId) -> Result<(), MediaError> {
        let source = self.source_of(slot).ok_or_else(|| MediaError::NoSource {
            slot: slot.to_string(),
        })?;

        if !self.load_latency.is_zero() {
            tokio::time::sleep(self.load_latency).await;
        }

        let failed = self.failure_rate > 0.0 && self.rng.lock().gen_bool(self.failure_rate);
        if failed {
            warn!(target: "dreamreel::video", "Simulated load failure for {}", source);
            return Err(MediaError::LoadFailed {
                source_url: source,
                details: "simulated network error".to_string(),
            });
        }

        debug!(target: "dreamreel::video", "Loaded {} into slot {}", source, slot);
        Ok(())
    }

    async fn play(&self, slot: SlotId) -> Result<(), MediaError> {
        let mut slots = self.slots.lock();
        let view = slots.entry(slot).or_default();
        view.playing = true;
        info!(
            target: "dreamreel::video",
            "Now playing {} (slot {}, {})",
            view.source.as_deref().unwrap_or("<none>"),
            slot,
            if view.muted { "muted" } else { "sound on" }
        );
        Ok(())
    }

    async fn resume_audio(&self) -> Result<bool, MediaError> {
        debug!(target: "dreamreel::video", "Audio output resumed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_without_source_fails() {
        let surface = SimulatedSurface::seeded(Duration::ZERO, 0.0, 1);
        assert_eq!(
            surface.load(SlotId::A).await,
            Err(MediaError::NoSource {
                slot: "A".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_load_and_play() {
        let surface = SimulatedSurface::seeded(Duration::ZERO, 0.0, 1);
        surface.set_source(SlotId::B, "https://example.com/v/0001.mp4");
        surface.set_opacity(SlotId::B, 1.0);

        surface.load(SlotId::B).await.unwrap();
        surface.play(SlotId::B).await.unwrap();

        assert!(surface.is_playing(SlotId::B));
        assert_eq!(surface.opacity_of(SlotId::B), 1.0);

        surface.pause(SlotId::B);
        assert!(!surface.is_playing(SlotId::B));
    }

    #[tokio::test]
    async fn test_certain_failure_rate() {
        let surface = SimulatedSurface::seeded(Duration::ZERO, 1.0, 7);
        surface.set_source(SlotId::A, "https://example.com/v/0002.mp4");

        let err = surface.load(SlotId::A).await.unwrap_err();
        assert!(matches!(err, MediaError::LoadFailed { ref source_url, .. } if source_url.ends_with("0002.mp4")));
    }

    #[tokio::test]
    async fn test_non_finite_failure_rate_never_fails() {
        for rate in [f64::NAN, f64::INFINITY] {
            let surface = SimulatedSurface::seeded(Duration::ZERO, rate, 3);
            surface.set_source(SlotId::A, "https://example.com/v/0004.mp4");
            assert!(surface.load(SlotId::A).await.is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_latency() {
        let surface = SimulatedSurface::seeded(Duration::from_millis(250), 0.0, 1);
        surface.set_source(SlotId::A, "https://example.com/v/0003.mp4");

        let started = tokio::time::Instant::now();
        surface.load(SlotId::A).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(250));
    }
}
