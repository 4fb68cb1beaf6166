//! Event summaries and the event-source interface.

use crate::{ThreeVector, TrackRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-event header information.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventSummary {
    /// Run number.
    pub run_id: u32,
    /// Event number within the run.
    pub event_id: u32,
    /// Fired-trigger bitmask.
    pub trigger_word: u32,
    /// Reconstructed primary vertex (cm).
    pub primary_vertex: ThreeVector,
    /// Vertex z from the VPD timing difference (cm).
    pub vz_vpd: f32,
    /// Magnetic field (kGauss).
    pub b_field: f32,
}

/// Read access to the event currently being processed.
///
/// Indices run over `0..track_count()` and are only valid while the
/// current event is.
pub trait EventSource {
    /// The current event header, if any event is loaded.
    fn current_event(&self) -> Option<&EventSummary>;

    /// Number of track slots in the current event.
    fn track_count(&self) -> usize;

    /// The track at `index`, or `None` for an empty slot or out-of-range index.
    fn track(&self, index: usize) -> Option<&TrackRecord>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    #[inline]
    fn current_event(&self) -> Option<&EventSummary> {
        (**self).current_event()
    }

    #[inline]
    fn track_count(&self) -> usize {
        (**self).track_count()
    }

    #[inline]
    fn track(&self, index: usize) -> Option<&TrackRecord> {
        (**self).track(index)
    }
}

/// An owned, fully decoded event: header plus its track array.
///
/// Empty track slots (`None`) are kept so indices match the producer's.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PicoEvent {
    /// Event header.
    pub event: EventSummary,
    /// Track array.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tracks: Vec<Option<TrackRecord>>,
}

impl PicoEvent {
    /// Creates an event from a header and fully populated track list.
    #[must_use]
    pub fn new(event: EventSummary, tracks: Vec<TrackRecord>) -> Self {
        Self {
            event,
            tracks: tracks.into_iter().map(Some).collect(),
        }
    }
}

impl EventSource for PicoEvent {
    #[inline]
    fn current_event(&self) -> Option<&EventSummary> {
        Some(&self.event)
    }

    #[inline]
    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    fn track(&self, index: usize) -> Option<&TrackRecord> {
        self.tracks.get(index).and_then(Option::as_ref)
    }
}
