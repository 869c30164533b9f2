//! Event Types for Radio Burst Detection
//!
//! ## Overview
//!
//! An [`Event`] is a gap-tolerant run of time indices during which the
//! strongest channel of a spectrogram stays above the significance
//! threshold. Events are produced by the detector, consumed by the matcher
//! and then dropped; only [`MatchedEventPair`]s survive to the renderer.
//!
//! ## Lifecycle
//!
//! ```text
//! Detector ──→ Vec<Event> (A) ──┐
//!                               ├─→ Matcher ──→ Vec<MatchedEventPair> ──→ Renderer
//! Detector ──→ Vec<Event> (B) ──┘
//! ```
//!
//! ## Invariants
//!
//! - An event is never empty: it can only be opened with a first index.
//! - Indices are strictly increasing: [`Event::push`] rejects anything not
//!   after the current last index.
//! - Both slices of a matched pair have the same number of time samples.
//!
//! Timing attributes (start, end, duration, midpoint) are derived on demand
//! from the time vector of the spacecraft that produced the event.

use ndarray::{s, Array1, Array2};

use crate::spectrogram::{PowerMatrix, TimeVector};

/// Gap-tolerant run of active time indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    indices: Vec<usize>,
}

impl Event {
    /// Open an event at its first active index
    pub fn open(index: usize) -> Self {
        Self { indices: vec![index] }
    }

    /// Append a later index
    ///
    /// Returns `false` and leaves the event unchanged if `index` is not
    /// strictly after the current last index.
    pub fn push(&mut self, index: usize) -> bool {
        if index <= self.last() {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Active time indices in order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// First index of the event
    pub fn first(&self) -> usize {
        self.indices[0]
    }

    /// Last index of the event
    pub fn last(&self) -> usize {
        self.indices[self.indices.len() - 1]
    }

    /// Number of active indices (gaps excluded)
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Never true for an event built with `open`
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw index span, `last - first`
    pub fn span(&self) -> usize {
        self.last() - self.first()
    }

    /// Time of the first index
    pub fn start_time(&self, time: &TimeVector) -> f64 {
        time[self.first()]
    }

    /// Time of the last index
    pub fn end_time(&self, time: &TimeVector) -> f64 {
        time[self.last()]
    }

    /// End time minus start time
    pub fn duration(&self, time: &TimeVector) -> f64 {
        self.end_time(time) - self.start_time(time)
    }

    /// Mean of start and end time
    pub fn midpoint(&self, time: &TimeVector) -> f64 {
        0.5 * (self.start_time(time) + self.end_time(time))
    }
}

/// Power and time columns cut out of one spectrogram
#[derive(Debug, Clone, PartialEq)]
pub struct EventSlice {
    /// `channels × len` power columns
    pub power: PowerMatrix,
    /// `len` time stamps
    pub time: TimeVector,
}

impl EventSlice {
    /// Copy `len` columns starting at `start`
    ///
    /// The caller guarantees `start + len` does not exceed the matrix width.
    pub fn cut(power: &PowerMatrix, time: &TimeVector, start: usize, len: usize) -> Self {
        let end = start + len;
        Self {
            power: power.slice(s![.., start..end]).to_owned(),
            time: time.slice(s![start..end]).to_owned(),
        }
    }

    /// Number of time samples in the slice
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True if the slice holds no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Events from both spacecraft judged to be the same burst
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEventPair {
    /// Position of the A event in its detection list
    pub event_a: usize,
    /// Position of the B event in its detection list
    pub event_b: usize,
    /// Slice of spacecraft A
    pub a: EventSlice,
    /// Slice of spacecraft B
    pub b: EventSlice,
}

impl MatchedEventPair {
    /// Number of time samples in each slice
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// True if the slices hold no samples
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Split into `(power A, time A, power B, time B)`
    pub fn into_tuple(self) -> (Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>) {
        (self.a.power, self.a.time, self.b.power, self.b.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn event_indices_strictly_increase() {
        let mut event = Event::open(3);
        assert!(event.push(4));
        assert!(event.push(9));
        assert!(!event.push(9));
        assert!(!event.push(2));

        assert_eq!(event.indices(), &[3, 4, 9]);
        assert_eq!(event.len(), 3);
        assert_eq!(event.span(), 6);
        assert!(!event.is_empty());
    }

    #[test]
    fn timing_attributes() {
        let time = Array1::from_iter((0..10).map(|i| 100.0 + 10.0 * i as f64));
        let mut event = Event::open(2);
        event.push(6);

        assert_eq!(event.start_time(&time), 120.0);
        assert_eq!(event.end_time(&time), 160.0);
        assert_eq!(event.duration(&time), 40.0);
        assert_eq!(event.midpoint(&time), 140.0);
    }

    #[test]
    fn slice_cut() {
        let power = array![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let time = array![0.0, 1.0, 2.0, 3.0];

        let slice = EventSlice::cut(&power, &time, 1, 2);
        assert_eq!(slice.power, array![[2.0, 3.0], [6.0, 7.0]]);
        assert_eq!(slice.time, array![1.0, 2.0]);
        assert_eq!(slice.len(), 2);
    }

    #[test]
    fn matched_pair_as_tuple() {
        let power = array![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let time = array![0.0, 1.0, 2.0, 3.0];
        let pair = MatchedEventPair {
            event_a: 0,
            event_b: 2,
            a: EventSlice::cut(&power, &time, 0, 2),
            b: EventSlice::cut(&power, &time, 2, 2),
        };
        assert_eq!(pair.len(), 2);

        let (power_a, time_a, power_b, time_b) = pair.into_tuple();
        assert_eq!(power_a, array![[1.0, 2.0], [5.0, 6.0]]);
        assert_eq!(time_a, array![0.0, 1.0]);
        assert_eq!(power_b, array![[3.0, 4.0], [7.0, 8.0]]);
        assert_eq!(time_b, array![2.0, 3.0]);
    }
}
