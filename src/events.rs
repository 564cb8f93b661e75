use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use crate::algorithms::Algorithm;
use crate::controller::SearchResult;
use crate::grid::{GridEnvironment, Position};

/// One expansion, as seen by whoever is watching the search.
///
/// The sets are borrowed from the running search and are only valid for the
/// duration of the callback; use [`StepEvent::snapshot`] to keep them.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent<'a> {
    pub algorithm: Algorithm,
    /// 1-based count of expansions so far, across IDDFS passes.
    pub expansion: usize,
    pub cell: Position,
    pub frontier: &'a FxHashSet<Position>,
    pub explored: &'a FxHashSet<Position>,
    pub spawned_obstacle: Option<Position>,
    /// Bound of the running pass, for DLS and IDDFS.
    pub depth_limit: Option<usize>,
    pub grid: &'a GridEnvironment,
}

impl StepEvent<'_> {
    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            algorithm: self.algorithm,
            expansion: self.expansion,
            cell: self.cell,
            frontier: self.frontier.clone(),
            explored: self.explored.clone(),
            spawned_obstacle: self.spawned_obstacle,
            depth_limit: self.depth_limit,
        }
    }
}

/// Owned copy of a [`StepEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSnapshot {
    pub algorithm: Algorithm,
    pub expansion: usize,
    pub cell: Position,
    pub frontier: FxHashSet<Position>,
    pub explored: FxHashSet<Position>,
    pub spawned_obstacle: Option<Position>,
    pub depth_limit: Option<usize>,
}

/// Receives the step stream of a running search.
///
/// Every call happens between two expansions, which makes it the point where
/// a caller can redraw, throttle, or request cancellation. Implementations
/// must return promptly.
pub trait StepSink {
    fn on_step(&mut self, event: &StepEvent<'_>);

    /// An IDDFS pass with a new bound begins; earlier frontier and explored
    /// state no longer applies.
    fn on_pass_start(&mut self, _depth_limit: usize) {}

    fn on_finish(&mut self, _result: &SearchResult) {}
}

impl<F> StepSink for F
where
    F: FnMut(&StepEvent<'_>),
{
    fn on_step(&mut self, event: &StepEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StepSink for NullSink {
    fn on_step(&mut self, _event: &StepEvent<'_>) {}
}

/// Forwards snapshots over a bounded channel without ever blocking.
///
/// When the channel is full, or the receiver is gone, the snapshot is
/// dropped and counted.
#[derive(Debug)]
pub struct ChannelSink {
    sender: SyncSender<StepSnapshot>,
    dropped: usize,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<StepSnapshot>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (ChannelSink { sender, dropped: 0 }, receiver)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl StepSink for ChannelSink {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        match self.sender.try_send(event.snapshot()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => self.dropped += 1,
        }
    }
}
