use std::time::Duration;

use tracing::info;

/// Default period between animation ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The timer should be started.
    Started,
    /// A timer is already running; nothing changes.
    AlreadyPlaying,
    /// The selection is already on the last day (or there are no days).
    /// Playback stays paused and the index does not move.
    AtEnd,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Paused,
    AtEnd,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Move the selection to this day index.
    Advanced(usize),
    /// The next index would pass the last day. The timer should be stopped.
    Finished,
    /// Not playing; a stray tick from a timer that was already cancelled.
    Idle,
}

/// Two-state animation driver over a day index.
///
/// Invariants:
/// - at most one timer is logically active (`Playing` means exactly one);
/// - a tick never moves the index past `last`;
/// - pausing never changes the index.
///
/// The driver owns no timer. Callers start one on [`PlayOutcome::Started`]
/// and stop it on pause or [`TickOutcome::Finished`].
#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    period: Duration,
    ticks: u64,
}

impl Playback {
    pub fn new(period: Duration) -> Self {
        Self {
            state: PlaybackState::Paused,
            period,
            ticks: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks handled since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// `last` is the last valid day index, `None` when there are no days.
    pub fn play(&mut self, index: usize, last: Option<usize>) -> PlayOutcome {
        if self.is_playing() {
            return PlayOutcome::AlreadyPlaying;
        }
        match last {
            Some(last) if index < last => {
                self.state = PlaybackState::Playing;
                self.ticks = 0;
                info!(index, last, period_ms = self.period.as_millis() as u64, "playback started");
                PlayOutcome::Started
            }
            _ => {
                info!(index, ?last, "playback not started: already at the last day");
                PlayOutcome::AtEnd
            }
        }
    }

    /// Returns `true` if playback was running.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.state = PlaybackState::Paused;
        info!(ticks = self.ticks, "playback paused");
        true
    }

    pub fn toggle(&mut self, index: usize, last: Option<usize>) -> ToggleOutcome {
        if self.pause() {
            return ToggleOutcome::Paused;
        }
        match self.play(index, last) {
            PlayOutcome::AtEnd => ToggleOutcome::AtEnd,
            PlayOutcome::Started | PlayOutcome::AlreadyPlaying => ToggleOutcome::Started,
        }
    }

    pub fn tick(&mut self, index: usize, last: Option<usize>) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Idle;
        }
        let next = index.saturating_add(1);
        match last {
            Some(last) if next <= last => {
                self.ticks += 1;
                TickOutcome::Advanced(next)
            }
            _ => {
                self.state = PlaybackState::Paused;
                info!(index, ticks = self.ticks, "playback finished");
                TickOutcome::Finished
            }
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}
