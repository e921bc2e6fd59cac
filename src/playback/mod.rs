//! Playback controller
//!
//! Owns the operation log and everything derived from it, and reconciles the
//! two ways of looking at a log:
//!
//! - **Animated replay** ([`PlaybackController::execute_all`]): records the
//!   trace once, then shows one step per [`tick`] whose deadline has passed,
//!   holding each step for its `duration_ms`.
//! - **Seeking** ([`PlaybackController::seek`]): folds a prefix of the log
//!   with no delays into a separate view, leaving the replay snapshot alone.
//!
//! Both go through [`trace::apply_all`], so a seek to operation `i` shows the
//! same snapshot the replay shows once operation `i` has finished.
//!
//! # States
//!
//! ```text
//! Idle ─execute_all→ ResettingSnapshot ─tick→ Running(step) ─tick→ … ─→ Idle
//! Idle ─seek→ SeekedAt(index)
//! ```
//!
//! Nothing here spawns threads or sleeps.  The owner calls [`tick`] from its
//! event loop and the controller compares deadlines against its [`Clock`].
//!
//! [`tick`]: PlaybackController::tick

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::config::{TimingConfig, VisualizerConfig};
use crate::engine::{Snapshot, Step, StructureKind};
use crate::operation::{
    OperationDraft, OperationField, OperationId, OperationLog, OperationPatch,
};
use crate::stats::{self, Stats};
use crate::trace::{self, Trace};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    /// Replay requested; the snapshot is empty and no step has been shown yet
    ResettingSnapshot,
    Running { step_index: usize },
    SeekedAt { index: usize },
}

/// A line of the visible replay history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Step {
        operation_id: OperationId,
        description: String,
    },
    Error {
        operation_id: OperationId,
        message: String,
    },
}

/// Result of folding a prefix of the log
#[derive(Debug, Clone, PartialEq)]
pub struct StepState {
    pub operation_index: usize,
    pub snapshot: Snapshot,
    pub stats: Stats,
    /// Last step emitted by the prefix, if any operation produced one
    pub last_step: Option<Step>,
}

/// In-flight animated replay
#[derive(Debug)]
struct Replay {
    /// Next step to show
    cursor: usize,
    /// When the step at `cursor` may be shown
    deadline: Duration,
    cancel_requested: bool,
}

pub struct PlaybackController<C: Clock> {
    kind: StructureKind,
    log: OperationLog,
    config: VisualizerConfig,
    timing: TimingConfig,
    clock: C,
    state: PlaybackState,

    // Animated replay
    trace: Trace,
    replay: Option<Replay>,
    shown_step: Option<usize>,
    snapshot: Snapshot,
    stats: Stats,
    history: Vec<HistoryEntry>,

    // Seeking and auto-play
    seek_view: Option<StepState>,
    selected: Option<usize>,
    next_auto_play: Option<Duration>,
}

impl<C: Clock> PlaybackController<C> {
    pub fn new(kind: StructureKind, config: VisualizerConfig, clock: C) -> Self {
        let timing = config.timing.clone().with_speed(config.playback.speed);
        let snapshot = Snapshot::empty(kind);
        PlaybackController {
            kind,
            log: OperationLog::new(),
            config,
            timing,
            clock,
            state: PlaybackState::Idle,
            trace: Trace::default(),
            replay: None,
            shown_step: None,
            stats: stats::derive(&snapshot),
            snapshot,
            history: Vec::new(),
            seek_view: None,
            selected: None,
            next_auto_play: None,
        }
    }

    /// Build a controller around an existing log
    pub fn with_log(kind: StructureKind, log: OperationLog, config: VisualizerConfig, clock: C) -> Self {
        let mut controller = Self::new(kind, config, clock);
        controller.log = log;
        controller
    }

    // ========== Accessors ==========

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Trace of the most recent animated replay
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_running(&self) -> bool {
        self.replay.is_some()
    }

    pub fn is_auto_playing(&self) -> bool {
        self.next_auto_play.is_some()
    }

    /// Operation index selected by seeking or auto-play
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Snapshot to display: the seek view while seeked, else the replay snapshot
    pub fn snapshot(&self) -> &Snapshot {
        match (&self.state, &self.seek_view) {
            (PlaybackState::SeekedAt { .. }, Some(view)) => &view.snapshot,
            _ => &self.snapshot,
        }
    }

    pub fn stats(&self) -> &Stats {
        match (&self.state, &self.seek_view) {
            (PlaybackState::SeekedAt { .. }, Some(view)) => &view.stats,
            _ => &self.stats,
        }
    }

    /// Step currently on screen
    pub fn current_step(&self) -> Option<&Step> {
        match (&self.state, &self.seek_view) {
            (PlaybackState::SeekedAt { .. }, Some(view)) => view.last_step.as_ref(),
            _ => self.shown_step.and_then(|index| self.trace.step(index)),
        }
    }

    /// Log index of the operation currently on screen
    pub fn current_operation(&self) -> Option<usize> {
        match self.state {
            PlaybackState::SeekedAt { index } => Some(index),
            _ => self
                .shown_step
                .and_then(|step| self.trace.span_of_step(step))
                .map(|span| span.index),
        }
    }

    /// `(position, total)` for a status line: steps while replaying,
    /// operations while seeking
    pub fn progress(&self) -> (usize, usize) {
        match self.state {
            PlaybackState::SeekedAt { index } => (index + 1, self.log.len()),
            PlaybackState::Running { step_index } => (step_index + 1, self.trace.len()),
            PlaybackState::ResettingSnapshot => (0, self.trace.len()),
            PlaybackState::Idle => (self.shown_step.map_or(0, |i| i + 1), self.trace.len()),
        }
    }

    // ========== Log editing ==========

    pub fn append(&mut self, draft: OperationDraft) -> OperationId {
        let id = self.log.append(draft);
        self.refresh_seek();
        id
    }

    pub fn update(&mut self, id: OperationId, patch: OperationPatch) -> bool {
        let updated = self.log.update(id, patch);
        if updated {
            self.refresh_seek();
        }
        updated
    }

    pub fn update_field(&mut self, id: OperationId, field: OperationField, value: &str) -> bool {
        let updated = self.log.update_field(id, field, value);
        if updated {
            self.refresh_seek();
        }
        updated
    }

    pub fn remove(&mut self, id: OperationId) -> bool {
        let removed = self.log.remove(id).is_some();
        if removed {
            self.refresh_seek();
        }
        removed
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let moved = self.log.reorder(from, to);
        if moved {
            self.refresh_seek();
        }
        moved
    }

    /// Empty the log and reset the snapshot and stats together
    pub fn clear(&mut self) {
        self.log.clear();
        self.reset();
    }

    /// Keep the seek view consistent with an edited log
    fn refresh_seek(&mut self) {
        if self.log.is_empty() {
            if self.replay.is_none() {
                self.reset();
            }
            return;
        }
        if let PlaybackState::SeekedAt { index } = self.state {
            self.seek_to(index.min(self.log.len() - 1));
        }
    }

    // ========== Animated replay ==========

    /// Start an animated replay of the whole log.
    ///
    /// Returns false if a replay is already in flight.
    pub fn execute_all(&mut self) -> bool {
        if self.replay.is_some() {
            debug!("replay already running");
            return false;
        }
        self.stop_auto_play();
        self.state = PlaybackState::ResettingSnapshot;
        self.snapshot = Snapshot::empty(self.kind);
        self.stats = stats::derive(&self.snapshot);
        self.history.clear();
        self.seek_view = None;
        self.shown_step = None;

        self.trace = trace::record(self.kind, self.log.operations(), &self.timing);
        info!(
            operations = self.log.len(),
            steps = self.trace.len(),
            duration_ms = self.trace.total_duration_ms(),
            "replay started"
        );
        self.replay = Some(Replay {
            cursor: 0,
            deadline: self.clock.now(),
            cancel_requested: false,
        });
        true
    }

    /// Ask the running replay to stop once the current step's delay is over
    pub fn cancel(&mut self) {
        if let Some(replay) = self.replay.as_mut() {
            replay.cancel_requested = true;
        }
    }

    /// Drop any replay and auto-play immediately and return to an empty
    /// snapshot.  The log is kept.
    pub fn reset(&mut self) {
        if self.replay.take().is_some() {
            info!("replay reset");
        }
        self.stop_auto_play();
        self.state = PlaybackState::Idle;
        self.snapshot = Snapshot::empty(self.kind);
        self.stats = stats::derive(&self.snapshot);
        self.trace = Trace::default();
        self.history.clear();
        self.seek_view = None;
        self.selected = None;
        self.shown_step = None;
    }

    /// Advance replay and auto-play to the clock's current time.
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let replayed = self.tick_replay(now);
        let auto_played = self.tick_auto_play(now);
        replayed || auto_played
    }

    fn tick_replay(&mut self, now: Duration) -> bool {
        let mut changed = false;
        let mut finished = false;

        while let Some(replay) = self.replay.as_mut() {
            if now < replay.deadline {
                break;
            }
            // Step boundary: the previous step has had its full delay
            if replay.cancel_requested {
                info!(at_step = replay.cursor, "replay cancelled");
                self.replay = None;
                if !matches!(self.state, PlaybackState::SeekedAt { .. }) {
                    self.state = PlaybackState::Idle;
                }
                return true;
            }

            for failure in self.trace.failures_at(replay.cursor) {
                self.history.push(HistoryEntry::Error {
                    operation_id: failure.operation_id,
                    message: failure.message.clone(),
                });
                changed = true;
            }

            let Some(step) = self.trace.steps.get(replay.cursor) else {
                finished = true;
                break;
            };
            if let Some(frame) = self.trace.frames.get(replay.cursor) {
                self.snapshot = frame.clone();
                self.stats = stats::derive(&self.snapshot);
            }
            if let Some(span) = self.trace.span_of_step(replay.cursor) {
                self.history.push(HistoryEntry::Step {
                    operation_id: span.operation_id,
                    description: step.description.clone(),
                });
                self.selected = Some(span.index);
            }
            self.shown_step = Some(replay.cursor);
            self.state = PlaybackState::Running {
                step_index: replay.cursor,
            };
            // Deadlines chain from the previous one so a late tick catches up
            replay.deadline += Duration::from_millis(step.duration_ms);
            replay.cursor += 1;
            changed = true;
        }

        if finished {
            self.replay = None;
            self.state = PlaybackState::Idle;
            if !self.log.is_empty() {
                self.selected = Some(self.log.len() - 1);
            }
            info!(steps = self.trace.len(), "replay finished");
            changed = true;
        }
        changed
    }

    // ========== Seeking ==========

    /// Fold the first `index + 1` operations with no delays.
    ///
    /// Returns `None` if `index` is past the end of the log.
    pub fn get_step_state(&self, index: usize) -> Option<StepState> {
        let prefix = self.log.operations().get(..=index)?;
        let (snapshot, trace) = trace::apply_all(prefix, Snapshot::empty(self.kind), &self.timing);
        Some(StepState {
            operation_index: index,
            stats: stats::derive(&snapshot),
            snapshot,
            last_step: trace.steps.last().cloned(),
        })
    }

    /// Show the state after operation `index`, stopping auto-play and any
    /// running replay
    pub fn seek(&mut self, index: usize) -> bool {
        self.stop_auto_play();
        self.cancel();
        self.seek_to(index)
    }

    fn seek_to(&mut self, index: usize) -> bool {
        let Some(view) = self.get_step_state(index) else {
            return false;
        };
        debug!(index, "seek");
        self.seek_view = Some(view);
        self.selected = Some(index);
        self.state = PlaybackState::SeekedAt { index };
        true
    }

    pub fn step_forward(&mut self) -> bool {
        let last = match self.log.len().checked_sub(1) {
            Some(last) => last,
            None => return false,
        };
        let next = self.selected.map_or(0, |index| (index + 1).min(last));
        self.seek(next)
    }

    pub fn step_backward(&mut self) -> bool {
        let previous = self.selected.map_or(0, |index| index.saturating_sub(1));
        self.seek(previous)
    }

    pub fn seek_start(&mut self) -> bool {
        self.seek(0)
    }

    pub fn seek_end(&mut self) -> bool {
        match self.log.len().checked_sub(1) {
            Some(last) => self.seek(last),
            None => false,
        }
    }

    // ========== Auto-play ==========

    /// Seek forward one operation per configured interval until the end.
    ///
    /// Starts from the first operation when nothing is selected or the
    /// selection is already at the end.
    pub fn start_auto_play(&mut self) -> bool {
        if self.log.is_empty() {
            return false;
        }
        self.cancel();
        let at_end = self
            .selected
            .map_or(true, |index| index + 1 >= self.log.len());
        let start = if at_end { 0 } else { self.selected.unwrap_or(0) };
        self.seek_to(start);
        self.next_auto_play = Some(self.clock.now() + self.config.playback.auto_play_interval());
        info!(from = start, "auto-play started");
        true
    }

    pub fn stop_auto_play(&mut self) {
        if self.next_auto_play.take().is_some() {
            info!("auto-play stopped");
        }
    }

    pub fn toggle_auto_play(&mut self) -> bool {
        if self.is_auto_playing() {
            self.stop_auto_play();
            false
        } else {
            self.start_auto_play()
        }
    }

    fn tick_auto_play(&mut self, now: Duration) -> bool {
        let interval = self.config.playback.auto_play_interval();
        let mut changed = false;
        while let Some(deadline) = self.next_auto_play {
            if now < deadline {
                break;
            }
            let next = self.selected.map_or(0, |index| index + 1);
            if next >= self.log.len() {
                self.stop_auto_play();
                break;
            }
            changed |= self.seek_to(next);
            self.next_auto_play = Some(deadline + interval);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(drafts: Vec<OperationDraft>) -> PlaybackController<ManualClock> {
        let mut controller = PlaybackController::new(
            StructureKind::Stack,
            VisualizerConfig::default(),
            ManualClock::new(),
        );
        for draft in drafts {
            controller.append(draft);
        }
        controller
    }

    fn push(value: &str) -> OperationDraft {
        OperationDraft::new("push").value(value)
    }

    #[test]
    fn test_replay_waits_for_step_durations() {
        let mut c = controller(vec![push("1")]);
        assert!(c.execute_all());
        assert_eq!(c.state(), PlaybackState::ResettingSnapshot);

        // Step 0 (info, 400ms) shows immediately
        assert!(c.tick());
        assert_eq!(c.state(), PlaybackState::Running { step_index: 0 });
        assert!(!c.tick());

        c.clock_mut().advance_ms(399);
        assert!(!c.tick());
        c.clock_mut().advance_ms(1);
        assert!(c.tick());
        assert_eq!(c.state(), PlaybackState::Running { step_index: 1 });

        // Mutate step holds for 800ms, then the replay ends
        c.clock_mut().advance_ms(800);
        assert!(c.tick());
        assert_eq!(c.state(), PlaybackState::Idle);
        assert!(!c.is_running());
        assert_eq!(c.history().len(), 2);
    }

    #[test]
    fn test_second_replay_request_is_ignored() {
        let mut c = controller(vec![push("1")]);
        assert!(c.execute_all());
        c.tick();
        assert!(!c.execute_all());
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_cancel_waits_for_step_boundary() {
        let mut c = controller(vec![push("1"), push("2")]);
        c.execute_all();
        c.tick();
        c.cancel();
        c.clock_mut().advance_ms(100);
        assert!(!c.tick());
        assert!(c.is_running());

        c.clock_mut().advance_ms(300);
        assert!(c.tick());
        assert!(!c.is_running());
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.log().len(), 2);
    }

    #[test]
    fn test_seek_does_not_touch_replay_snapshot() {
        let mut c = controller(vec![push("1"), push("2"), push("3")]);
        c.execute_all();
        c.tick();
        assert!(c.seek(1));
        assert_eq!(c.state(), PlaybackState::SeekedAt { index: 1 });
        assert_eq!(c.snapshot().values().map(<[String]>::len), Some(2));
        assert_eq!(c.snapshot.values().map(<[String]>::len), Some(0));

        // The pending step finishes, then the cancelled replay stops
        c.clock_mut().advance_ms(400);
        c.tick();
        assert!(!c.is_running());
        assert_eq!(c.state(), PlaybackState::SeekedAt { index: 1 });
    }

    #[test]
    fn test_auto_play_advances_then_stops() {
        let mut c = controller(vec![push("1"), push("2"), push("3")]);
        assert!(c.start_auto_play());
        assert_eq!(c.selected(), Some(0));

        c.clock_mut().advance_ms(1500);
        assert!(c.tick());
        assert_eq!(c.selected(), Some(1));

        c.clock_mut().advance_ms(3000);
        c.tick();
        assert_eq!(c.selected(), Some(2));
        assert!(!c.is_auto_playing());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut c = controller(vec![push("1"), push("2")]);
        c.seek(1);
        c.clear();
        assert!(c.log().is_empty());
        assert!(c.snapshot().is_empty());
        assert!(c.stats().is_empty());
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn test_edit_refreshes_seek_view() {
        let mut c = controller(vec![push("1"), push("2")]);
        let first = c.log().operations()[0].id;
        c.seek(1);
        assert!(c.update_field(first, OperationField::Value, "9"));
        assert_eq!(
            c.snapshot().values(),
            Some(&["9".to_string(), "2".to_string()][..])
        );
    }

    #[test]
    fn test_get_step_state_past_end() {
        let c = controller(vec![push("1")]);
        assert!(c.get_step_state(0).is_some());
        assert!(c.get_step_state(1).is_none());
    }
}
