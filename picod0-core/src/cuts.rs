//! Cut tables for event, track and pair selection.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Analysis cuts.
///
/// All limits are applied as strict inequalities except the fit-hit
/// minimum, which is inclusive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct D0Cuts {
    /// Required trigger mask; an event passes if any bit overlaps.
    pub trigger_word: u32,
    /// Maximum |primary vertex z| (cm).
    pub vz: f32,
    /// Maximum |vz - vz_vpd| (cm).
    pub vz_vpd_vz: f32,

    /// Require full HFT hit coverage.
    pub require_hft: bool,
    /// Minimum number of fit hits (inclusive).
    pub n_hits_fit: u16,
    /// Maximum |nSigma(pion)|.
    pub n_sigma_pion: f32,
    /// Maximum |nSigma(kaon)|.
    pub n_sigma_kaon: f32,

    /// Lower edge of the open K pi mass window (GeV/c^2).
    pub min_mass: f32,
    /// Upper edge of the open K pi mass window (GeV/c^2).
    pub max_mass: f32,
    /// Minimum cos(pointing angle).
    pub cos_theta: f32,
    /// Minimum decay length (cm).
    pub decay_length: f32,
    /// Maximum distance of closest approach between the daughters (cm).
    pub dca_daughters: f32,

    /// Tighter cuts for the diagnostic mass spectrum.
    pub qa: QaCuts,
}

/// Diagnostic (QA) cuts. These only decide whether a pair's mass is filled
/// into the QA mass spectrum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QaCuts {
    /// Minimum daughter global pT (GeV/c, inclusive).
    pub pt: f32,
    /// Minimum daughter fit hits (inclusive).
    pub n_hits_fit: u16,
    /// Maximum kaon |nSigma(kaon)|.
    pub n_sigma_kaon: f32,
    /// Minimum cos(pointing angle).
    pub cos_theta: f32,
    /// Minimum pion DCA to the primary vertex (cm).
    pub pion_dca: f32,
    /// Minimum kaon DCA to the primary vertex (cm).
    pub kaon_dca: f32,
    /// Maximum distance of closest approach between the daughters (cm).
    pub dca_daughters: f32,
}

impl Default for D0Cuts {
    fn default() -> Self {
        Self {
            trigger_word: 0x1F,
            vz: 6.0,
            vz_vpd_vz: 3.0,
            require_hft: true,
            n_hits_fit: 20,
            n_sigma_pion: 3.0,
            n_sigma_kaon: 2.0,
            min_mass: 1.6,
            max_mass: 2.1,
            cos_theta: 0.995,
            decay_length: 0.0030,
            dca_daughters: 0.0080,
            qa: QaCuts::default(),
        }
    }
}

impl Default for QaCuts {
    fn default() -> Self {
        Self {
            pt: 1.2,
            n_hits_fit: 20,
            n_sigma_kaon: 2.0,
            cos_theta: 0.995,
            pion_dca: 0.0080,
            kaon_dca: 0.0080,
            dca_daughters: 0.0065,
        }
    }
}

impl D0Cuts {
    /// Creates the default analysis cuts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the required trigger mask.
    #[must_use]
    pub fn with_trigger_word(mut self, mask: u32) -> Self {
        self.trigger_word = mask;
        self
    }

    /// Sets the vertex limits (|vz| and |vz - vz_vpd|).
    #[must_use]
    pub fn with_vertex_limits(mut self, vz: f32, vz_vpd_vz: f32) -> Self {
        self.vz = vz;
        self.vz_vpd_vz = vz_vpd_vz;
        self
    }

    /// Sets the track quality requirements.
    #[must_use]
    pub fn with_track_quality(mut self, require_hft: bool, n_hits_fit: u16) -> Self {
        self.require_hft = require_hft;
        self.n_hits_fit = n_hits_fit;
        self
    }

    /// Sets the PID bounds.
    #[must_use]
    pub fn with_n_sigma(mut self, pion: f32, kaon: f32) -> Self {
        self.n_sigma_pion = pion;
        self.n_sigma_kaon = kaon;
        self
    }

    /// Sets the open invariant-mass window.
    #[must_use]
    pub fn with_mass_window(mut self, min_mass: f32, max_mass: f32) -> Self {
        self.min_mass = min_mass;
        self.max_mass = max_mass;
        self
    }

    /// Sets the topological cuts.
    #[must_use]
    pub fn with_topology(mut self, cos_theta: f32, decay_length: f32, dca_daughters: f32) -> Self {
        self.cos_theta = cos_theta;
        self.decay_length = decay_length;
        self.dca_daughters = dca_daughters;
        self
    }

    /// Replaces the QA cuts.
    #[must_use]
    pub fn with_qa(mut self, qa: QaCuts) -> Self {
        self.qa = qa;
        self
    }

    /// Checks the table for inverted or negative limits.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("vz", self.vz),
            ("vz_vpd_vz", self.vz_vpd_vz),
            ("n_sigma_pion", self.n_sigma_pion),
            ("n_sigma_kaon", self.n_sigma_kaon),
            ("decay_length", self.decay_length),
            ("dca_daughters", self.dca_daughters),
            ("qa.pt", self.qa.pt),
            ("qa.n_sigma_kaon", self.qa.n_sigma_kaon),
            ("qa.pion_dca", self.qa.pion_dca),
            ("qa.kaon_dca", self.qa.kaon_dca),
            ("qa.dca_daughters", self.qa.dca_daughters),
        ];
        for (key, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(Error::Config(format!("{key} must be >= 0, got {value}")));
            }
        }

        if self.min_mass.is_nan() || self.max_mass.is_nan() || self.min_mass >= self.max_mass {
            return Err(Error::Config(format!(
                "mass window is empty: ({}, {})",
                self.min_mass, self.max_mass
            )));
        }

        for (key, value) in [("cos_theta", self.cos_theta), ("qa.cos_theta", self.qa.cos_theta)] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{key} must lie in [-1, 1], got {value}"
                )));
            }
        }

        if self.trigger_word == 0 {
            return Err(Error::Config(
                "trigger_word is 0, no event can pass".to_string(),
            ));
        }

        Ok(())
    }
}
