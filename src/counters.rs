use serde::Serialize;

/// Per-session interaction counts consulted by the overlay presenter.
///
/// Lives for one session only; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub sound_toggle_count: u32,
    pub loading_toggle_count: u32,
    pub has_shown_initial_instructions: bool,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sound_toggle(&mut self) -> u32 {
        self.sound_toggle_count = self.sound_toggle_count.saturating_add(1);
        self.sound_toggle_count
    }

    /// Only user-triggered advances count
    pub fn record_loading_toggle(&mut self) -> u32 {
        self.loading_toggle_count = self.loading_toggle_count.saturating_add(1);
        self.loading_toggle_count
    }

    /// Returns true the first time it is called
    pub fn mark_initial_instructions_shown(&mut self) -> bool {
        !std::mem::replace(&mut self.has_shown_initial_instructions, true)
    }

    pub fn sound_notice_allowed(&self, cap: u32) -> bool {
        self.sound_toggle_count <= cap
    }

    pub fn loading_notice_allowed(&self, cap: u32) -> bool {
        self.loading_toggle_count <= cap
    }
}
