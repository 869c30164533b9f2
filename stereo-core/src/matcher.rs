//! Cross-spacecraft event matching
//!
//! ## Overview
//!
//! A burst seen by both spacecraft arrives at each at a different time, but
//! never further apart than the light-travel time between them. The matcher
//! pairs events whose midpoints fall within that distance and whose
//! durations agree within a tolerance.
//!
//! ## Algorithm
//!
//! ```text
//! for each A event (len ≥ worthwhile):
//!     for each B event (len ≥ worthwhile), in detection order:
//!         |mid_B − mid_A| > distance?
//!             start_B > start_A  → stop scanning B (later ones are further)
//!             otherwise          → next B
//!         |dur_B − dur_A| < tolerance?
//!             → slice both from their first index, record, stop scanning B
//! ```
//!
//! ## Preconditions
//!
//! Both event lists must be in time order, as the detector produces them.
//! The early stop relies on it.
//!
//! B events are not consumed: two A events may match the same B event.

use log::{debug, trace};

use crate::{
    config::AnalysisConfig,
    events::{Event, EventSlice, MatchedEventPair},
    spectrogram::Spectrogram,
};

/// Matching tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventMatcher {
    /// Maximum midpoint separation (seconds)
    pub stereo_distance_s: f64,
    /// Maximum duration difference, exclusive (seconds)
    pub length_tolerance_s: f64,
    /// Minimum index count on either side
    pub worthwhile_length: usize,
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl EventMatcher {
    /// Take the matching tolerances out of a run configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            stereo_distance_s: config.stereo_distance_s,
            length_tolerance_s: config.length_tolerance_s,
            worthwhile_length: config.worthwhile_length,
        }
    }

    /// True if the event is long enough to bother matching
    pub fn is_worthwhile(&self, event: &Event) -> bool {
        event.len() >= self.worthwhile_length
    }

    /// Pair events of spacecraft A with events of spacecraft B
    ///
    /// Produces at most one pair per A event, in A detection order.
    pub fn match_events(
        &self,
        events_a: &[Event],
        a: &Spectrogram,
        events_b: &[Event],
        b: &Spectrogram,
    ) -> Vec<MatchedEventPair> {
        let mut matches = Vec::new();

        for (ia, event_a) in events_a.iter().enumerate() {
            if !self.is_worthwhile(event_a) {
                continue;
            }

            let start_a = event_a.start_time(&a.time);
            let duration_a = event_a.duration(&a.time);
            let mid_a = event_a.midpoint(&a.time);

            for (ib, event_b) in events_b.iter().enumerate() {
                if !self.is_worthwhile(event_b) {
                    continue;
                }

                let start_b = event_b.start_time(&b.time);
                let mid_b = event_b.midpoint(&b.time);

                if (mid_b - mid_a).abs() > self.stereo_distance_s {
                    if start_b > start_a {
                        break;
                    }
                    continue;
                }

                let duration_b = event_b.duration(&b.time);
                if (duration_b - duration_a).abs() < self.length_tolerance_s {
                    let pair = combine(ia, event_a, a, ib, event_b, b);
                    trace!(
                        "A event {} (t={:.1}) matched B event {} (t={:.1}), {} samples",
                        ia,
                        start_a,
                        ib,
                        start_b,
                        pair.len()
                    );
                    matches.push(pair);
                    break;
                }
            }
        }

        debug!(
            "matched {} of {} A events against {} B events",
            matches.len(),
            events_a.len(),
            events_b.len()
        );
        matches
    }
}

/// Cut equal-length slices for a matched pair
///
/// The length is the longer of the two raw index spans, shortened if either
/// slice would run past the end of its matrix.
fn combine(
    ia: usize,
    event_a: &Event,
    a: &Spectrogram,
    ib: usize,
    event_b: &Event,
    b: &Spectrogram,
) -> MatchedEventPair {
    let (start_a, start_b) = (event_a.first(), event_b.first());
    let len = event_a
        .span()
        .max(event_b.span())
        .min(a.samples() - start_a)
        .min(b.samples() - start_b);

    MatchedEventPair {
        event_a: ia,
        event_b: ib,
        a: EventSlice::cut(&a.power, &a.time, start_a, len),
        b: EventSlice::cut(&b.power, &b.time, start_b, len),
    }
}
