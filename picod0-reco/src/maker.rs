//! Host-facing lifecycle around the per-event reconstruction.

use crate::processor::{D0Reconstruction, D0State};
use log::{debug, info, warn};
use picod0_core::{
    DiagnosticsSink, EventSource, KinematicFit, RecordSink, Result, SkipReason,
};

/// Outcome of one processing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakeStatus {
    /// The event was processed and its row written.
    Ok,
    /// Nothing was processed; no sink or aggregate state changed.
    Skipped(SkipReason),
}

/// Lifecycle hooks driven by the host's event loop.
pub trait Maker {
    /// Resets per-run state. Safe to call more than once, including after
    /// `finish` to start a new run on the same sinks.
    ///
    /// # Errors
    /// Implementations may fail to allocate their outputs.
    fn init(&mut self) -> Result<()>;

    /// Processes the source's current event.
    ///
    /// # Errors
    /// Returns a sink error if the event's row cannot be written.
    fn make(&mut self, source: Option<&dyn EventSource>) -> Result<MakeStatus>;

    /// Resets the per-event aggregate.
    fn clear(&mut self);

    /// Flushes and closes the outputs. Only the first call has an effect.
    ///
    /// # Errors
    /// Returns the first sink error met while closing.
    fn finish(&mut self) -> Result<()>;
}

/// Running totals since the last `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MakerStats {
    /// Events processed, accepted or not.
    pub events_seen: usize,
    /// Events that passed the event cuts.
    pub events_accepted: usize,
    /// Candidates written to the record sink.
    pub candidates_written: usize,
    /// Cycles skipped for a missing source or event.
    pub skipped: usize,
}

/// Builds K pi candidates for every event and writes one record per event.
pub struct D0EventMaker<F, R, H> {
    reco: D0Reconstruction<F>,
    records: R,
    hists: H,
    state: D0State,
    stats: MakerStats,
    finished: bool,
}

impl<F, R, H> D0EventMaker<F, R, H>
where
    F: KinematicFit,
    R: RecordSink,
    H: DiagnosticsSink,
{
    /// Creates a maker writing records to `records` and QA to `hists`.
    pub fn new(reco: D0Reconstruction<F>, records: R, hists: H) -> Self {
        Self {
            reco,
            records,
            hists,
            state: D0State::new(),
            stats: MakerStats::default(),
            finished: false,
        }
    }

    /// The reconstruction in use.
    pub fn reconstruction(&self) -> &D0Reconstruction<F> {
        &self.reco
    }

    /// Per-event working state.
    pub fn state(&self) -> &D0State {
        &self.state
    }

    /// Totals since the last `init`.
    pub fn stats(&self) -> MakerStats {
        self.stats
    }

    /// The record sink.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// The diagnostics sink.
    pub fn hists(&self) -> &H {
        &self.hists
    }

    /// Consumes the maker, returning both sinks.
    pub fn into_sinks(self) -> (R, H) {
        (self.records, self.hists)
    }

    /// Processes a batch of owned events in parallel and writes their rows
    /// in input order. Returns the number of events processed.
    ///
    /// # Errors
    /// Stops at the first sink error.
    pub fn make_batch<S>(&mut self, sources: &[S]) -> Result<usize>
    where
        S: EventSource + Sync,
        F: Sync,
    {
        let mut processed = 0;
        for outcome in self.reco.process_batch(sources) {
            match outcome {
                Ok(state) => {
                    self.state = state;
                    self.route()?;
                    processed += 1;
                }
                Err(reason) => self.skip(reason),
            }
        }
        Ok(processed)
    }

    fn skip(&mut self, reason: SkipReason) {
        warn!("{reason}, skipping cycle");
        self.stats.skipped += 1;
    }

    /// Sends the processed event to the diagnostics and record sinks, then
    /// clears the state. The record row is written whatever the gate said.
    fn route(&mut self) -> Result<()> {
        let d0 = self.state.d0_event();
        self.stats.events_seen += 1;

        if self.state.is_accepted() {
            for qa in self.state.qa_pairs() {
                self.hists.add_kaon_pion(&qa.kaon_pion, qa.fill_mass);
            }
            self.hists
                .add_event(&d0.event, d0, self.state.n_hft_tracks());
            self.stats.events_accepted += 1;
        }

        self.records.begin_event(&d0.event);
        self.records.set_counts(d0.n_kaons, d0.n_pions);
        for kp in &d0.kaon_pions {
            self.records.add_candidate(kp);
        }
        let written = self.records.end_event();
        if written.is_ok() {
            self.stats.candidates_written += d0.n_kaon_pion();
        }

        self.state.mark_flushed();
        self.state.clear();
        written
    }
}

impl<F, R, H> Maker for D0EventMaker<F, R, H>
where
    F: KinematicFit,
    R: RecordSink,
    H: DiagnosticsSink,
{
    fn init(&mut self) -> Result<()> {
        self.reco.cuts().validate()?;
        self.state.clear();
        self.stats = MakerStats::default();
        self.finished = false;
        debug!("D0 maker initialised with {:?}", self.reco.cuts());
        Ok(())
    }

    fn make(&mut self, source: Option<&dyn EventSource>) -> Result<MakeStatus> {
        let Some(source) = source else {
            self.skip(SkipReason::MissingSource);
            return Ok(MakeStatus::Skipped(SkipReason::MissingSource));
        };
        if source.current_event().is_none() {
            self.skip(SkipReason::MissingEvent);
            return Ok(MakeStatus::Skipped(SkipReason::MissingEvent));
        }
        if self.finished {
            warn!("make() called after finish()");
        }

        if let Err(reason) = self.reco.process(source, &mut self.state) {
            self.skip(reason);
            return Ok(MakeStatus::Skipped(reason));
        }
        self.route()?;
        Ok(MakeStatus::Ok)
    }

    fn clear(&mut self) {
        self.state.clear();
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            debug!("finish() already called, ignoring");
            return Ok(());
        }
        self.finished = true;

        let records = self.records.close();
        let hists = self.hists.close();
        info!(
            "D0 maker finished: {} events, {} accepted, {} candidates, {} skipped",
            self.stats.events_seen,
            self.stats.events_accepted,
            self.stats.candidates_written,
            self.stats.skipped
        );
        records.and(hists)
    }
}
