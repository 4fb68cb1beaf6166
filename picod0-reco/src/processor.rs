//! Per-event reconstruction: gate, classify, pair, select.

use crate::pairing::build_pairs;
use crate::selection::{
    is_good_event, is_good_pair, is_good_qa_pair, is_good_track, is_kaon, is_pion, is_unlike_sign,
};
use log::{debug, trace};
use picod0_core::{D0Cuts, D0Event, EventSource, KaonPion, KinematicFit, SkipReason};
use rayon::prelude::*;

/// Where an event is in its processing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStage {
    /// Nothing evaluated yet.
    #[default]
    Start,
    /// Event gate evaluated, header copied.
    GateEvaluated,
    /// Event gate failed; the aggregate holds only the header.
    Rejected,
    /// Kaon and pion role sets built.
    TracksClassified,
    /// All pairs fitted and selected.
    PairsEvaluated,
    /// Aggregate written to the record sink.
    Flushed,
}

/// Which candidates are offered to the diagnostics sink.
///
/// In both scopes only unlike-sign pairs are routed, and the QA mass flag
/// is always computed by the full [`is_good_qa_pair`] predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsScope {
    /// Pairs that passed the analysis selection.
    #[default]
    SelectedPairs,
    /// Every fitted pair, regardless of the analysis selection.
    AllPairs,
}

/// An unlike-sign pair queued for the diagnostics sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QaPair {
    /// The candidate.
    pub kaon_pion: KaonPion,
    /// Whether the pair passed the QA cuts.
    pub fill_mass: bool,
}

/// Working state for one event. Reused across events; cleared at the
/// start of every cycle so nothing leaks between events.
#[derive(Debug, Clone, Default)]
pub struct D0State {
    d0_event: D0Event,
    kaons: Vec<usize>,
    pions: Vec<usize>,
    qa_pairs: Vec<QaPair>,
    n_hft_tracks: usize,
    accepted: bool,
    stage: EventStage,
}

impl D0State {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-event aggregate.
    #[must_use]
    pub fn d0_event(&self) -> &D0Event {
        &self.d0_event
    }

    /// Indices of kaon-tagged tracks, in track order.
    #[must_use]
    pub fn kaons(&self) -> &[usize] {
        &self.kaons
    }

    /// Indices of pion-tagged tracks, in track order.
    #[must_use]
    pub fn pions(&self) -> &[usize] {
        &self.pions
    }

    /// Unlike-sign pairs for the diagnostics sink.
    #[must_use]
    pub fn qa_pairs(&self) -> &[QaPair] {
        &self.qa_pairs
    }

    /// Number of tracks passing the quality gate.
    #[must_use]
    pub fn n_hft_tracks(&self) -> usize {
        self.n_hft_tracks
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> EventStage {
        self.stage
    }

    /// Whether the event passed the event gate.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Marks the aggregate as written.
    pub fn mark_flushed(&mut self) {
        self.stage = EventStage::Flushed;
    }

    /// Resets everything for the next event.
    pub fn clear(&mut self) {
        self.d0_event.clear();
        self.kaons.clear();
        self.pions.clear();
        self.qa_pairs.clear();
        self.n_hft_tracks = 0;
        self.accepted = false;
        self.stage = EventStage::Start;
    }
}

/// Reconstructs D0 -> K pi candidates event by event.
#[derive(Debug, Clone)]
pub struct D0Reconstruction<F> {
    cuts: D0Cuts,
    fit: F,
    diagnostics_scope: DiagnosticsScope,
}

impl<F: KinematicFit> D0Reconstruction<F> {
    /// Creates a reconstruction with the given cuts and kinematic fit.
    pub fn new(cuts: D0Cuts, fit: F) -> Self {
        Self {
            cuts,
            fit,
            diagnostics_scope: DiagnosticsScope::default(),
        }
    }

    /// Sets which pairs are offered to the diagnostics sink.
    #[must_use]
    pub fn with_diagnostics_scope(mut self, scope: DiagnosticsScope) -> Self {
        self.diagnostics_scope = scope;
        self
    }

    /// The cut table in use.
    pub fn cuts(&self) -> &D0Cuts {
        &self.cuts
    }

    /// The kinematic fit in use.
    pub fn fit(&self) -> &F {
        &self.fit
    }

    /// Runs one event through gate, classification, pairing and selection.
    ///
    /// `state` is cleared first. On return it holds the aggregate ready to
    /// flush: header only for a rejected event, counts and accepted
    /// candidates otherwise.
    ///
    /// # Errors
    /// Returns [`SkipReason::MissingEvent`] if the source holds no event;
    /// `state` is left cleared.
    pub fn process<S>(&self, source: &S, state: &mut D0State) -> Result<(), SkipReason>
    where
        S: EventSource + ?Sized,
    {
        state.clear();
        let event = source.current_event().ok_or(SkipReason::MissingEvent)?;
        state.d0_event.add_pico_event(event);

        let good_event = is_good_event(event, &self.cuts);
        state.stage = EventStage::GateEvaluated;
        if !good_event {
            debug!(
                "run {} event {}: rejected by event cuts",
                event.run_id, event.event_id
            );
            state.stage = EventStage::Rejected;
            return Ok(());
        }
        state.accepted = true;

        for idx in 0..source.track_count() {
            let Some(trk) = source.track(idx) else {
                continue;
            };
            if !is_good_track(trk, &self.cuts) {
                continue;
            }
            state.n_hft_tracks += 1;

            if is_pion(trk, &self.cuts) {
                state.pions.push(idx);
            }
            if is_kaon(trk, &self.cuts) {
                state.kaons.push(idx);
            }
        }
        state.d0_event.set_n_kaons(state.kaons.len());
        state.d0_event.set_n_pions(state.pions.len());
        state.stage = EventStage::TracksClassified;

        let pairs = build_pairs(
            source,
            &state.kaons,
            &state.pions,
            event.primary_vertex,
            event.b_field,
            &self.fit,
        );
        for pair in pairs {
            let kp = pair.kaon_pion;
            let selected = is_good_pair(&kp, &self.cuts);
            if selected {
                state.d0_event.add_kaon_pion(kp);
            }

            let offered = selected || self.diagnostics_scope == DiagnosticsScope::AllPairs;
            if offered && is_unlike_sign(pair.kaon, pair.pion) {
                let fill_mass = is_good_qa_pair(&kp, pair.kaon, pair.pion, &self.cuts);
                state.qa_pairs.push(QaPair {
                    kaon_pion: kp,
                    fill_mass,
                });
            }
        }
        state.stage = EventStage::PairsEvaluated;

        trace!(
            "run {} event {}: {} quality tracks, {} K, {} pi, {} candidates",
            event.run_id,
            event.event_id,
            state.n_hft_tracks,
            state.kaons.len(),
            state.pions.len(),
            state.d0_event.n_kaon_pion()
        );
        Ok(())
    }

    /// Processes independent events in parallel.
    ///
    /// Results come back in input order, so routing them sequentially
    /// gives the same output as processing one at a time.
    pub fn process_batch<S>(&self, sources: &[S]) -> Vec<Result<D0State, SkipReason>>
    where
        S: EventSource + Sync,
        F: Sync,
    {
        sources
            .par_iter()
            .map(|source| {
                let mut state = D0State::new();
                self.process(source, &mut state).map(|()| state)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picod0_core::{CandidateDerived, EventSummary, PicoEvent, ThreeVector, TrackRecord};

    fn flat_fit(
        _: &TrackRecord,
        _: &TrackRecord,
        _: usize,
        _: usize,
        _: &ThreeVector,
        _: f32,
    ) -> CandidateDerived {
        CandidateDerived::default()
    }

    fn event(vz: f32) -> EventSummary {
        EventSummary {
            trigger_word: 1,
            primary_vertex: ThreeVector::new(0.0, 0.0, vz),
            vz_vpd: vz,
            ..EventSummary::default()
        }
    }

    fn pid_track(n_sigma_pion: f32, n_sigma_kaon: f32) -> TrackRecord {
        TrackRecord {
            is_hft: true,
            n_hits_fit: 30,
            n_sigma_pion,
            n_sigma_kaon,
            charge: 1,
            ..TrackRecord::default()
        }
    }

    #[test]
    fn test_rejected_event_keeps_header_only() {
        let reco = D0Reconstruction::new(D0Cuts::default(), flat_fit);
        let source = PicoEvent::new(event(8.0), vec![pid_track(0.1, 0.1)]);
        let mut state = D0State::new();

        reco.process(&source, &mut state).unwrap();
        assert_eq!(state.stage(), EventStage::Rejected);
        assert!(!state.is_accepted());
        assert_eq!(state.d0_event().event, source.event);
        assert!(state.kaons().is_empty());
        assert_eq!(state.n_hft_tracks(), 0);
    }

    #[test]
    fn test_track_can_take_both_roles() {
        let reco = D0Reconstruction::new(D0Cuts::default(), flat_fit);
        let source = PicoEvent::new(
            event(1.0),
            vec![pid_track(0.1, 0.1), pid_track(0.2, 9.0), pid_track(9.0, 9.0)],
        );
        let mut state = D0State::new();

        reco.process(&source, &mut state).unwrap();
        assert_eq!(state.stage(), EventStage::PairsEvaluated);
        assert_eq!(state.kaons(), &[0]);
        assert_eq!(state.pions(), &[0, 1]);
        assert_eq!(state.n_hft_tracks(), 3);
        assert_eq!(state.d0_event().n_kaons, 1);
        assert_eq!(state.d0_event().n_pions, 2);
        // flat fit has zero mass, so nothing is stored
        assert_eq!(state.d0_event().n_kaon_pion(), 0);
        // like-sign pair never reaches the diagnostics
        assert!(state.qa_pairs().is_empty());
    }

    #[test]
    fn test_clear_resets_stage() {
        let reco = D0Reconstruction::new(D0Cuts::default(), flat_fit);
        let source = PicoEvent::new(event(1.0), vec![pid_track(0.1, 0.1)]);
        let mut state = D0State::new();

        reco.process(&source, &mut state).unwrap();
        state.mark_flushed();
        assert_eq!(state.stage(), EventStage::Flushed);
        state.clear();
        assert_eq!(state.stage(), EventStage::Start);
        assert!(!state.is_accepted());
        assert_eq!(state.d0_event(), &D0Event::default());
    }
}
