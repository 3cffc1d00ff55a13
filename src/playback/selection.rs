use crate::playlist::{FailureLedger, Playlist};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Picks the next playlist index.
///
/// The first pick of a session honours the playlist's start hint; every
/// other pick is uniform over the sources that have not been marked failed.
#[derive(Debug)]
pub struct SourceSelector {
    rng: StdRng,
    hint_consumed: bool,
    ledger: FailureLedger,
}

impl SourceSelector {
    pub fn new(max_failures_per_source: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), max_failures_per_source)
    }

    /// Deterministic selector for tests and replays
    pub fn seeded(seed: u64, max_failures_per_source: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max_failures_per_source)
    }

    fn with_rng(rng: StdRng, max_failures_per_source: u32) -> Self {
        Self {
            rng,
            hint_consumed: false,
            ledger: FailureLedger::new(max_failures_per_source),
        }
    }

    pub fn pick(&mut self, playlist: &Playlist) -> Option<usize> {
        if playlist.is_empty() {
            return None;
        }

        if !self.hint_consumed {
            self.hint_consumed = true;
            if let Some(hint) = playlist.start_index() {
                if (1..=playlist.len()).contains(&hint) {
                    debug!(target: "dreamreel::video", "Starting with newest video {}", hint);
                    return Some(hint - 1);
                }
                debug!(
                    target: "dreamreel::video",
                    "Ignoring out-of-range start hint {} for {} sources", hint, playlist.len()
                );
            }
        }

        let candidates: Vec<usize> = (0..playlist.len())
            .filter(|&i| {
                playlist
                    .get(i)
                    .map_or(false, |source| !self.ledger.is_failed(source))
            })
            .collect();

        if candidates.is_empty() {
            // Everything failed at some point; fall back to the full list.
            return Some(self.rng.gen_range(0..playlist.len()));
        }
        Some(candidates[self.rng.gen_range(0..candidates.len())])
    }

    pub fn record_failure(&mut self, source: &str) -> bool {
        self.ledger.record_failure(source)
    }

    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    pub fn hint_consumed(&self) -> bool {
        self.hint_consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(n: usize, start: Option<usize>) -> Playlist {
        Playlist::new(
            (1..=n)
                .map(|i| format!("https://cdn.example.com/{:04}.mp4", i))
                .collect(),
            start,
        )
    }

    #[test]
    fn test_empty_playlist_has_no_pick() {
        let mut selector = SourceSelector::seeded(1, 3);
        assert_eq!(selector.pick(&playlist(0, None)), None);
    }

    #[test]
    fn test_out_of_range_hint_falls_back_to_random() {
        let mut selector = SourceSelector::seeded(1, 3);
        let list = playlist(4, Some(9));
        let index = selector.pick(&list).unwrap();
        assert!(index < 4);
        assert!(selector.hint_consumed());
    }

    #[test]
    fn test_failed_sources_are_skipped() {
        let mut selector = SourceSelector::seeded(7, 1);
        let list = playlist(3, None);
        selector.record_failure(list.get(0).unwrap());
        selector.record_failure(list.get(2).unwrap());

        for _ in 0..50 {
            assert_eq!(selector.pick(&list), Some(1));
        }
    }

    #[test]
    fn test_all_failed_still_picks() {
        let mut selector = SourceSelector::seeded(7, 1);
        let list = playlist(2, None);
        selector.record_failure(list.get(0).unwrap());
        selector.record_failure(list.get(1).unwrap());

        assert!(selector.pick(&list).is_some());
    }
}
