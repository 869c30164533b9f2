//! Gap-tolerant event detection
//!
//! ## Algorithm
//!
//! The detector walks the time axis once. At each index it takes the
//! maximum power over all channels; the index is *active* when that maximum
//! is strictly above the threshold. Runs of active indices are grouped by
//! a two-state machine with one gap counter:
//!
//! ```text
//!            active / open event
//!   ┌──────┐ ───────────────────→ ┌─────────────┐  active / append, gap = 0
//!   │ Idle │                      │ InEvent{gap}│ ←──────────────┐
//!   └──────┘ ←─────────────────── └─────────────┘ ───────────────┘
//!            inactive, gap > tol         │  inactive / gap += 1
//!                                        └──────────→ (stays while gap ≤ tol)
//! ```
//!
//! Inactive indices inside a gap are never part of the event. Once the gap
//! exceeds the tolerance the event is closed for good; later activity opens
//! a new one.

use log::debug;
use ndarray::Axis;

use crate::{
    config::AnalysisConfig,
    events::Event,
    spectrogram::{PowerMatrix, PowerStats},
};

/// State of the run-length scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No event open
    Idle,
    /// An event is open; `gap` inactive samples seen since its last index
    InEvent {
        /// Consecutive inactive samples
        gap: usize,
    },
}

/// What one step of the scan did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed the event list
    None,
    /// A new event was opened
    Opened,
    /// The index was appended to the open event
    Extended,
    /// The open event was closed
    Closed,
}

/// Explicit finite-state machine grouping active indices into events
#[derive(Debug, Clone)]
pub struct RunTracker {
    proximity_tolerance: usize,
    state: ScanState,
    events: Vec<Event>,
}

impl RunTracker {
    /// Start idle with no events
    pub fn new(proximity_tolerance: usize) -> Self {
        Self {
            proximity_tolerance,
            state: ScanState::Idle,
            events: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Feed the next time index
    ///
    /// Indices must be fed in increasing order.
    pub fn step(&mut self, index: usize, active: bool) -> Transition {
        match (self.state, active) {
            (ScanState::Idle, true) => {
                self.events.push(Event::open(index));
                self.state = ScanState::InEvent { gap: 0 };
                Transition::Opened
            }
            (ScanState::Idle, false) => Transition::None,
            (ScanState::InEvent { .. }, true) => {
                if let Some(event) = self.events.last_mut() {
                    event.push(index);
                }
                self.state = ScanState::InEvent { gap: 0 };
                Transition::Extended
            }
            (ScanState::InEvent { gap }, false) => {
                let gap = gap + 1;
                if gap > self.proximity_tolerance {
                    self.state = ScanState::Idle;
                    Transition::Closed
                } else {
                    self.state = ScanState::InEvent { gap };
                    Transition::None
                }
            }
        }
    }

    /// Events found so far, in detection order
    pub fn finish(self) -> Vec<Event> {
        self.events
    }
}

/// Threshold detector for one spacecraft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDetector {
    /// Power an index must exceed to be active
    pub threshold: f64,
    /// Inactive samples tolerated inside one event
    pub proximity_tolerance: usize,
}

impl EventDetector {
    /// Detector with an absolute threshold
    pub fn new(threshold: f64, proximity_tolerance: usize) -> Self {
        Self { threshold, proximity_tolerance }
    }

    /// Detector whose threshold is a fraction of the global max power
    pub fn from_config(config: &AnalysisConfig, stats: PowerStats) -> Self {
        Self::new(
            config.significance_fraction * stats.max,
            config.proximity_tolerance,
        )
    }

    /// True if the strongest channel exceeds the threshold
    pub fn is_active(&self, column_max: f64) -> bool {
        column_max > self.threshold
    }

    /// Scan a power matrix left to right
    ///
    /// Returned events are in time order, never empty, and their indices
    /// strictly increase.
    pub fn detect(&self, power: &PowerMatrix) -> Vec<Event> {
        let mut tracker = RunTracker::new(self.proximity_tolerance);

        for (index, column) in power.axis_iter(Axis(1)).enumerate() {
            let column_max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            tracker.step(index, self.is_active(column_max));
        }

        let events = tracker.finish();
        debug!(
            "detected {} events over {} samples (threshold {:.3e})",
            events.len(),
            power.ncols(),
            self.threshold
        );
        events
    }
}
