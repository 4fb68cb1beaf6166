//! K pi pair candidates and the kinematic-fit interface.

use crate::{ThreeVector, TrackRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quantities derived by the vertex fit of a kaon and a pion track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateDerived {
    /// Invariant mass under the K pi hypothesis (GeV/c^2).
    pub mass: f32,
    /// Pair transverse momentum (GeV/c).
    pub pt: f32,
    /// Pair pseudorapidity.
    pub eta: f32,
    /// Pair azimuth.
    pub phi: f32,
    /// Angle between the pair momentum and the PV -> decay vertex line (rad).
    pub pointing_angle: f32,
    /// Distance from the primary vertex to the decay vertex (cm).
    pub decay_length: f32,
    /// Distance of closest approach between the daughters (cm).
    pub dca_daughters: f32,
    /// Kaon DCA to the primary vertex (cm).
    pub kaon_dca: f32,
    /// Pion DCA to the primary vertex (cm).
    pub pion_dca: f32,
}

/// A built K pi candidate. Never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KaonPion {
    /// Index of the kaon-tagged track in the event's track array.
    pub kaon_idx: usize,
    /// Index of the pion-tagged track in the event's track array.
    pub pion_idx: usize,
    /// Fit output.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub derived: CandidateDerived,
}

impl KaonPion {
    /// Creates a candidate from its daughter indices and fit output.
    #[inline]
    #[must_use]
    pub fn new(kaon_idx: usize, pion_idx: usize, derived: CandidateDerived) -> Self {
        Self {
            kaon_idx,
            pion_idx,
            derived,
        }
    }

    /// Invariant mass.
    #[inline]
    #[must_use]
    pub fn m(&self) -> f32 {
        self.derived.mass
    }

    /// Pointing angle (rad).
    #[inline]
    #[must_use]
    pub fn pointing_angle(&self) -> f32 {
        self.derived.pointing_angle
    }

    /// Cosine of the pointing angle.
    #[inline]
    #[must_use]
    pub fn cos_pointing_angle(&self) -> f32 {
        self.derived.pointing_angle.cos()
    }

    /// Decay length (cm).
    #[inline]
    #[must_use]
    pub fn decay_length(&self) -> f32 {
        self.derived.decay_length
    }

    /// Daughter-daughter DCA (cm).
    #[inline]
    #[must_use]
    pub fn dca_daughters(&self) -> f32 {
        self.derived.dca_daughters
    }

    /// Kaon DCA to the primary vertex (cm).
    #[inline]
    #[must_use]
    pub fn kaon_dca(&self) -> f32 {
        self.derived.kaon_dca
    }

    /// Pion DCA to the primary vertex (cm).
    #[inline]
    #[must_use]
    pub fn pion_dca(&self) -> f32 {
        self.derived.pion_dca
    }
}

/// Turns two daughter track states into a candidate's derived quantities.
///
/// Implementations must be deterministic and free of side effects visible
/// to the caller; the reconstruction may call them from several threads.
pub trait KinematicFit {
    /// Fits the kaon/pion pair against the event's primary vertex.
    fn fit(
        &self,
        kaon: &TrackRecord,
        pion: &TrackRecord,
        kaon_idx: usize,
        pion_idx: usize,
        primary_vertex: &ThreeVector,
        b_field: f32,
    ) -> CandidateDerived;
}

impl<F> KinematicFit for F
where
    F: Fn(&TrackRecord, &TrackRecord, usize, usize, &ThreeVector, f32) -> CandidateDerived,
{
    #[inline]
    fn fit(
        &self,
        kaon: &TrackRecord,
        pion: &TrackRecord,
        kaon_idx: usize,
        pion_idx: usize,
        primary_vertex: &ThreeVector,
        b_field: f32,
    ) -> CandidateDerived {
        self(kaon, pion, kaon_idx, pion_idx, primary_vertex, b_field)
    }
}
