use super::slot::SlotId;
use super::surface::VideoSurface;
use crate::error::MediaError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Surface call recorded by [`MockVideoSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetSource(SlotId, String),
    SetMuted(SlotId, bool),
    SetOpacity(SlotId, f32),
    Pause(SlotId),
    Load(SlotId),
    Play(SlotId),
    ResumeAudio,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SurfaceCall>,
    sources: HashMap<SlotId, String>,
    load_results: VecDeque<Result<(), MediaError>>,
    play_results: VecDeque<Result<(), MediaError>>,
    load_delay: Duration,
}

/// Scriptable surface for testing without a rendering layer.
///
/// Loads and plays succeed unless a failure was queued.
#[derive(Debug, Default)]
pub struct MockVideoSurface {
    state: Mutex<MockState>,
}

impl MockVideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load by `delay` (tokio time)
    pub fn with_load_delay(delay: Duration) -> Self {
        let surface = Self::default();
        surface.state.lock().load_delay = delay;
        surface
    }

    pub fn fail_next_load(&self, details: &str) {
        let mut state = self.state.lock();
        let result = Err(MediaError::LoadFailed {
            source_url: "queued".to_string(),
            details: details.to_string(),
        });
        state.load_results.push_back(result);
    }

    pub fn fail_next_play(&self, details: &str) {
        self.state
            .lock()
            .play_results
            .push_back(Err(MediaError::PlayRejected {
                details: details.to_string(),
            }));
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.lock().calls.clone()
    }

    pub fn source_of(&self, slot: SlotId) -> Option<String> {
        self.state.lock().sources.get(&slot).cloned()
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: SurfaceCall) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl VideoSurface for MockVideoSurface {
    fn set_source(&self, slot: SlotId, url: &str) {
        let mut state = self.state.lock();
        state.sources.insert(slot, url.to_string());
        state.calls.push(SurfaceCall::SetSource(slot, url.to_string()));
    }

    fn set_muted(&self, slot: SlotId, muted: bool) {
        self.record(SurfaceCall::SetMuted(slot, muted));
    }

    fn set_opacity(&self, slot: SlotId, opacity: f32) {
        self.record(SurfaceCall::SetOpacity(slot, opacity));
    }

    fn pause(&self, slot: SlotId) {
        self.record(SurfaceCall::Pause(slot));
    }

    async fn load(&self, slot: SlotId) -> Result<(), MediaError> {
        let (delay, result) = {
            let mut state = self.state.lock();
            state.calls.push(SurfaceCall::Load(slot));
            (state.load_delay, state.load_results.pop_front())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.unwrap_or(Ok(()))
    }

    async fn play(&self, slot: SlotId) -> Result<(), MediaError> {
        let result = {
            let mut state = self.state.lock();
            state.calls.push(SurfaceCall::Play(slot));
            state.play_results.pop_front()
        };
        result.unwrap_or(Ok(()))
    }

    async fn resume_audio(&self) -> Result<bool, MediaError> {
        self.record(SurfaceCall::ResumeAudio);
        Ok(true)
    }
}
