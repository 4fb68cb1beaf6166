//! Output interfaces: the per-event record sink and the diagnostics sink.

use crate::{D0Event, EventSummary, KaonPion, Result};

/// Receives one flushed aggregate per input event.
///
/// Every event produces exactly one `begin_event` .. `end_event` bracket,
/// with `set_counts` and zero or more `add_candidate` calls in between.
pub trait RecordSink {
    /// Starts a new output row for `event`.
    fn begin_event(&mut self, event: &EventSummary);

    /// Records the kaon/pion multiplicities of the current row.
    fn set_counts(&mut self, n_kaons: usize, n_pions: usize);

    /// Appends a candidate to the current row.
    fn add_candidate(&mut self, kp: &KaonPion);

    /// Completes the current row.
    ///
    /// # Errors
    /// Returns [`crate::Error::Sink`] if the row cannot be written.
    fn end_event(&mut self) -> Result<()>;

    /// Flushes and closes the sink. Called once at shutdown.
    ///
    /// # Errors
    /// Returns [`crate::Error::Sink`] if buffered rows cannot be written.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives unlike-sign pairs and accepted-event summaries for QA plots.
pub trait DiagnosticsSink {
    /// Adds an unlike-sign pair; `fill_mass` selects the QA mass spectrum.
    fn add_kaon_pion(&mut self, kp: &KaonPion, fill_mass: bool);

    /// Adds the summary of an event that passed the event cuts.
    fn add_event(&mut self, event: &EventSummary, d0: &D0Event, n_hft_tracks: usize);

    /// Writes out and closes the diagnostics. Called once at shutdown.
    ///
    /// # Errors
    /// Returns [`crate::Error::Sink`] if the diagnostics cannot be written.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards all diagnostics.
impl DiagnosticsSink for () {
    fn add_kaon_pion(&mut self, _kp: &KaonPion, _fill_mass: bool) {}

    fn add_event(&mut self, _event: &EventSummary, _d0: &D0Event, _n_hft_tracks: usize) {}
}

/// Keeps every row in memory.
#[derive(Debug, Default)]
pub struct VecRecordSink {
    rows: Vec<D0Event>,
    current: Option<D0Event>,
    closed: bool,
}

impl VecRecordSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed rows, in input order.
    #[must_use]
    pub fn rows(&self) -> &[D0Event] {
        &self.rows
    }

    /// Consumes the sink, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<D0Event> {
        self.rows
    }

    /// Whether `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RecordSink for VecRecordSink {
    fn begin_event(&mut self, event: &EventSummary) {
        let mut row = D0Event::new();
        row.add_pico_event(event);
        self.current = Some(row);
    }

    fn set_counts(&mut self, n_kaons: usize, n_pions: usize) {
        if let Some(row) = self.current.as_mut() {
            row.set_n_kaons(n_kaons);
            row.set_n_pions(n_pions);
        }
    }

    fn add_candidate(&mut self, kp: &KaonPion) {
        if let Some(row) = self.current.as_mut() {
            row.add_kaon_pion(*kp);
        }
    }

    fn end_event(&mut self) -> Result<()> {
        if let Some(row) = self.current.take() {
            self.rows.push(row);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
