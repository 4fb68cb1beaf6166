//! Per-event output aggregate.

use crate::{EventSummary, KaonPion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One output row per input event: the event header, the PID-tagged track
/// multiplicities and the candidates that passed the analysis cuts.
///
/// Rejected events keep zero counts and no candidates but still carry
/// their header.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct D0Event {
    /// Copy of the event header.
    pub event: EventSummary,
    /// Number of kaon-tagged tracks.
    pub n_kaons: usize,
    /// Number of pion-tagged tracks.
    pub n_pions: usize,
    /// Candidates passing the analysis cuts, in enumeration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kaon_pions: Vec<KaonPion>,
}

impl D0Event {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the event header in.
    pub fn add_pico_event(&mut self, event: &EventSummary) {
        self.event = *event;
    }

    /// Sets the number of kaon-tagged tracks.
    pub fn set_n_kaons(&mut self, n: usize) {
        self.n_kaons = n;
    }

    /// Sets the number of pion-tagged tracks.
    pub fn set_n_pions(&mut self, n: usize) {
        self.n_pions = n;
    }

    /// Appends an accepted candidate.
    pub fn add_kaon_pion(&mut self, kp: KaonPion) {
        self.kaon_pions.push(kp);
    }

    /// Number of stored candidates.
    #[must_use]
    pub fn n_kaon_pion(&self) -> usize {
        self.kaon_pions.len()
    }

    /// Resets the aggregate for the next event, keeping the candidate allocation.
    pub fn clear(&mut self) {
        self.event = EventSummary::default();
        self.n_kaons = 0;
        self.n_pions = 0;
        self.kaon_pions.clear();
    }
}
