//! QA histograms for D0 reconstruction.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use crate::{Error, Result};
use log::info;
use picod0_core::{D0Event, DiagnosticsSink, EventSummary, KaonPion};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Fixed-width 1-D histogram with under- and overflow counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Histogram name.
    pub name: String,
    /// Lower edge of the first bin.
    pub lo: f64,
    /// Upper edge of the last bin.
    pub hi: f64,
    /// Bin contents.
    pub counts: Vec<u64>,
    /// Entries below `lo` (and NaN entries).
    pub underflow: u64,
    /// Entries at or above `hi`.
    pub overflow: u64,
}

impl Histogram1D {
    /// Creates an empty histogram with `n_bins` bins over `[lo, hi)`.
    #[must_use]
    pub fn new(name: &str, n_bins: usize, lo: f64, hi: f64) -> Self {
        Self {
            name: name.to_string(),
            lo,
            hi,
            counts: vec![0; n_bins],
            underflow: 0,
            overflow: 0,
        }
    }

    /// Bin width.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        (self.hi - self.lo) / self.counts.len() as f64
    }

    /// Adds one entry.
    pub fn fill(&mut self, value: f64) {
        if value.is_nan() || value < self.lo {
            self.underflow += 1;
        } else if value >= self.hi || self.counts.is_empty() {
            self.overflow += 1;
        } else {
            let bin = ((value - self.lo) / self.bin_width()) as usize;
            let last = self.counts.len() - 1;
            self.counts[bin.min(last)] += 1;
        }
    }

    /// Entries inside the histogram range.
    #[must_use]
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// All entries including under- and overflow.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.in_range() + self.underflow + self.overflow
    }
}

/// Diagnostics sink filling the standard D0 QA histograms.
///
/// Pair histograms see every unlike-sign pair routed to the sink; the QA
/// mass spectrum only those flagged by the QA cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct D0Hists {
    /// Accepted events.
    pub n_events: u64,
    /// Primary vertex z of accepted events.
    pub vz: Histogram1D,
    /// Tracks passing the quality gate per accepted event.
    pub n_hft_tracks: Histogram1D,
    /// Kaon-tagged tracks per accepted event.
    pub n_kaons: Histogram1D,
    /// Pion-tagged tracks per accepted event.
    pub n_pions: Histogram1D,
    /// Stored candidates per accepted event.
    pub n_candidates: Histogram1D,
    /// Invariant mass of every unlike-sign pair.
    pub pair_mass: Histogram1D,
    /// Invariant mass of unlike-sign pairs passing the QA cuts.
    pub qa_mass: Histogram1D,
    /// Pair transverse momentum.
    pub pair_pt: Histogram1D,
    /// Cosine of the pointing angle.
    pub cos_pointing_angle: Histogram1D,
    /// Decay length (cm).
    pub decay_length: Histogram1D,
    /// Daughter-daughter DCA (cm).
    pub dca_daughters: Histogram1D,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for D0Hists {
    fn default() -> Self {
        Self {
            n_events: 0,
            vz: Histogram1D::new("vz", 200, -10.0, 10.0),
            n_hft_tracks: Histogram1D::new("n_hft_tracks", 200, 0.0, 2000.0),
            n_kaons: Histogram1D::new("n_kaons", 100, 0.0, 500.0),
            n_pions: Histogram1D::new("n_pions", 100, 0.0, 1000.0),
            n_candidates: Histogram1D::new("n_candidates", 100, 0.0, 100.0),
            pair_mass: Histogram1D::new("pair_mass", 500, 0.0, 2.5),
            qa_mass: Histogram1D::new("qa_mass", 500, 0.0, 2.5),
            pair_pt: Histogram1D::new("pair_pt", 200, 0.0, 10.0),
            cos_pointing_angle: Histogram1D::new("cos_pointing_angle", 200, 0.99, 1.0),
            decay_length: Histogram1D::new("decay_length", 200, 0.0, 0.1),
            dca_daughters: Histogram1D::new("dca_daughters", 200, 0.0, 0.02),
            path: None,
        }
    }
}

impl D0Hists {
    /// Creates in-memory histograms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates histograms written as JSON to `path` on close.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Loads histograms previously written by [`D0Hists::write_json`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(Error::from)
    }

    /// Writes the histograms as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialisation or the write fails.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl DiagnosticsSink for D0Hists {
    fn add_kaon_pion(&mut self, kp: &KaonPion, fill_mass: bool) {
        let mass = f64::from(kp.m());
        self.pair_mass.fill(mass);
        if fill_mass {
            self.qa_mass.fill(mass);
        }
        self.pair_pt.fill(f64::from(kp.derived.pt));
        self.cos_pointing_angle
            .fill(f64::from(kp.cos_pointing_angle()));
        self.decay_length.fill(f64::from(kp.decay_length()));
        self.dca_daughters.fill(f64::from(kp.dca_daughters()));
    }

    fn add_event(&mut self, event: &EventSummary, d0: &D0Event, n_hft_tracks: usize) {
        self.n_events += 1;
        self.vz.fill(f64::from(event.primary_vertex.z));
        self.n_hft_tracks.fill(n_hft_tracks as f64);
        self.n_kaons.fill(d0.n_kaons as f64);
        self.n_pions.fill(d0.n_pions as f64);
        self.n_candidates.fill(d0.n_kaon_pion() as f64);
    }

    fn close(&mut self) -> picod0_core::Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let file = File::create(&path).map_err(Error::from)?;
        self.write_json(BufWriter::new(file))?;
        info!(
            "wrote QA histograms for {} events to {}",
            self.n_events,
            path.display()
        );
        Ok(())
    }
}
