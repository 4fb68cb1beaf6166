//! Track records as delivered by the event decoder.

use crate::ThreeVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single fitted track from the pico event record.
///
/// Immutable once decoded; its index within the event's track array is
/// stable for the lifetime of the event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackRecord {
    /// Track id assigned by the producer.
    pub id: u32,
    /// Hits on every PXL and IST layer.
    pub is_hft: bool,
    /// Number of hits used in the track fit.
    pub n_hits_fit: u16,
    /// Signed deviation from the pion dE/dx expectation, in sigma.
    pub n_sigma_pion: f32,
    /// Signed deviation from the kaon dE/dx expectation, in sigma.
    pub n_sigma_kaon: f32,
    /// Charge sign (+1 / -1).
    pub charge: i8,
    /// Global momentum at the point of closest approach to the primary vertex (GeV/c).
    pub g_mom: ThreeVector,
    /// Point of closest approach to the primary vertex (cm).
    pub origin: ThreeVector,
}

impl TrackRecord {
    /// Global transverse momentum.
    #[inline]
    #[must_use]
    pub fn g_pt(&self) -> f32 {
        self.g_mom.perp()
    }

    /// Global total momentum.
    #[inline]
    #[must_use]
    pub fn g_p(&self) -> f32 {
        self.g_mom.mag()
    }
}
