//! Event, track and pair selection predicates.
//!
//! Every predicate is written as "passes iff each quantity compares
//! favourably with its limit", so a NaN anywhere in the inputs rejects.

use picod0_core::{D0Cuts, EventSummary, KaonPion, TrackRecord};

/// Event gate: trigger, vertex position and vertex consistency.
#[must_use]
pub fn is_good_event(event: &EventSummary, cuts: &D0Cuts) -> bool {
    let vz = event.primary_vertex.z;
    (event.trigger_word & cuts.trigger_word) != 0
        && vz.abs() < cuts.vz
        && (vz - event.vz_vpd).abs() < cuts.vz_vpd_vz
}

/// Track quality gate. Must pass before either PID predicate is consulted.
#[must_use]
pub fn is_good_track(trk: &TrackRecord, cuts: &D0Cuts) -> bool {
    (!cuts.require_hft || trk.is_hft) && trk.n_hits_fit >= cuts.n_hits_fit
}

/// Pion PID band.
#[must_use]
pub fn is_pion(trk: &TrackRecord, cuts: &D0Cuts) -> bool {
    trk.n_sigma_pion.abs() < cuts.n_sigma_pion
}

/// Kaon PID band.
#[must_use]
pub fn is_kaon(trk: &TrackRecord, cuts: &D0Cuts) -> bool {
    trk.n_sigma_kaon.abs() < cuts.n_sigma_kaon
}

/// Analysis selection. Only pairs passing this are written out.
#[must_use]
pub fn is_good_pair(kp: &KaonPion, cuts: &D0Cuts) -> bool {
    kp.m() > cuts.min_mass
        && kp.m() < cuts.max_mass
        && kp.cos_pointing_angle() > cuts.cos_theta
        && kp.decay_length() > cuts.decay_length
        && kp.dca_daughters() < cuts.dca_daughters
}

/// Diagnostic selection for the QA mass spectrum.
///
/// Independent of [`is_good_pair`]; it never decides what is written out.
#[must_use]
pub fn is_good_qa_pair(kp: &KaonPion, kaon: &TrackRecord, pion: &TrackRecord, cuts: &D0Cuts) -> bool {
    let qa = &cuts.qa;
    pion.g_pt() >= qa.pt
        && kaon.g_pt() >= qa.pt
        && pion.n_hits_fit >= qa.n_hits_fit
        && kaon.n_hits_fit >= qa.n_hits_fit
        && kaon.n_sigma_kaon.abs() < qa.n_sigma_kaon
        && kp.cos_pointing_angle() > qa.cos_theta
        && kp.pion_dca() > qa.pion_dca
        && kp.kaon_dca() > qa.kaon_dca
        && kp.dca_daughters() < qa.dca_daughters
}

/// Opposite-charge daughters. Only these reach the diagnostics.
#[inline]
#[must_use]
pub fn is_unlike_sign(kaon: &TrackRecord, pion: &TrackRecord) -> bool {
    i16::from(kaon.charge) * i16::from(pion.charge) < 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use picod0_core::{CandidateDerived, ThreeVector};

    fn good_event() -> EventSummary {
        EventSummary {
            trigger_word: 0x4,
            primary_vertex: ThreeVector::new(0.1, -0.2, 2.0),
            vz_vpd: 1.0,
            b_field: -4.98,
            ..EventSummary::default()
        }
    }

    fn good_track() -> TrackRecord {
        TrackRecord {
            is_hft: true,
            n_hits_fit: 25,
            n_sigma_pion: 0.5,
            n_sigma_kaon: -0.5,
            charge: 1,
            g_mom: ThreeVector::new(1.5, 0.0, 0.3),
            ..TrackRecord::default()
        }
    }

    fn good_pair() -> KaonPion {
        KaonPion::new(
            0,
            1,
            CandidateDerived {
                mass: 1.86,
                pointing_angle: 0.01,
                decay_length: 0.02,
                dca_daughters: 0.002,
                kaon_dca: 0.01,
                pion_dca: 0.01,
                ..CandidateDerived::default()
            },
        )
    }

    #[test]
    fn test_event_gate_each_condition() {
        let cuts = D0Cuts::default();
        assert!(is_good_event(&good_event(), &cuts));

        let mut ev = good_event();
        ev.trigger_word = 0x20;
        assert!(!is_good_event(&ev, &cuts));

        let mut ev = good_event();
        ev.primary_vertex.z = -6.5;
        ev.vz_vpd = -6.0;
        assert!(!is_good_event(&ev, &cuts));

        let mut ev = good_event();
        ev.vz_vpd = 5.5;
        assert!(!is_good_event(&ev, &cuts));
    }

    #[test]
    fn test_event_gate_boundaries_are_strict() {
        let cuts = D0Cuts::default();
        let mut ev = good_event();
        ev.primary_vertex.z = 6.0;
        ev.vz_vpd = 6.0;
        assert!(!is_good_event(&ev, &cuts));

        let mut ev = good_event();
        ev.primary_vertex.z = 1.0;
        ev.vz_vpd = 4.0;
        assert!(!is_good_event(&ev, &cuts));
    }

    #[test]
    fn test_track_quality() {
        let cuts = D0Cuts::default();
        let mut trk = good_track();
        trk.n_hits_fit = cuts.n_hits_fit;
        assert!(is_good_track(&trk, &cuts));

        trk.n_hits_fit = cuts.n_hits_fit - 1;
        assert!(!is_good_track(&trk, &cuts));

        let mut trk = good_track();
        trk.is_hft = false;
        assert!(!is_good_track(&trk, &cuts));

        let relaxed = D0Cuts::default().with_track_quality(false, 20);
        assert!(is_good_track(&trk, &relaxed));
    }

    #[test]
    fn test_track_quality_ignores_pid() {
        let cuts = D0Cuts::default();
        let mut trk = good_track();
        trk.n_sigma_pion = 50.0;
        trk.n_sigma_kaon = f32::NAN;
        assert!(is_good_track(&trk, &cuts));
        trk.n_hits_fit = 3;
        assert!(!is_good_track(&trk, &cuts));
    }

    #[test]
    fn test_pid_bands() {
        let cuts = D0Cuts::default();
        let mut trk = good_track();
        assert!(is_pion(&trk, &cuts));
        assert!(is_kaon(&trk, &cuts));

        trk.n_sigma_pion = -3.0;
        trk.n_sigma_kaon = 2.0;
        assert!(!is_pion(&trk, &cuts));
        assert!(!is_kaon(&trk, &cuts));

        trk.n_sigma_pion = -2.99;
        trk.n_sigma_kaon = -1.99;
        assert!(is_pion(&trk, &cuts));
        assert!(is_kaon(&trk, &cuts));
    }

    #[test]
    fn test_pair_mass_window_is_open() {
        let cuts = D0Cuts::default();
        assert!(is_good_pair(&good_pair(), &cuts));

        let mut kp = good_pair();
        kp.derived.mass = cuts.min_mass;
        assert!(!is_good_pair(&kp, &cuts));

        kp.derived.mass = cuts.max_mass;
        assert!(!is_good_pair(&kp, &cuts));

        kp.derived.mass = 1.5;
        assert!(!is_good_pair(&kp, &cuts));
    }

    #[test]
    fn test_pair_topology() {
        let cuts = D0Cuts::default();

        let mut kp = good_pair();
        kp.derived.pointing_angle = 0.2;
        assert!(!is_good_pair(&kp, &cuts));

        let mut kp = good_pair();
        kp.derived.decay_length = cuts.decay_length;
        assert!(!is_good_pair(&kp, &cuts));

        let mut kp = good_pair();
        kp.derived.dca_daughters = cuts.dca_daughters;
        assert!(!is_good_pair(&kp, &cuts));
    }

    #[test]
    fn test_pair_cos_theta_boundary() {
        // cos(0) == 1.0 exactly; a threshold of 1.0 must reject it.
        let cuts = D0Cuts::default().with_topology(1.0, 0.003, 0.008);
        let mut kp = good_pair();
        kp.derived.pointing_angle = 0.0;
        assert!(!is_good_pair(&kp, &cuts));
    }

    #[test]
    fn test_qa_pair() {
        let cuts = D0Cuts::default();
        let kaon = good_track();
        let pion = good_track();
        let kp = good_pair();
        assert!(is_good_qa_pair(&kp, &kaon, &pion, &cuts));

        let mut soft = good_track();
        soft.g_mom = ThreeVector::new(0.5, 0.0, 0.0);
        assert!(!is_good_qa_pair(&kp, &kaon, &soft, &cuts));
        assert!(!is_good_qa_pair(&kp, &soft, &pion, &cuts));

        let mut prompt = good_pair();
        prompt.derived.kaon_dca = 0.001;
        assert!(!is_good_qa_pair(&prompt, &kaon, &pion, &cuts));

        let mut wide = good_pair();
        wide.derived.dca_daughters = 0.007;
        assert!(is_good_pair(&wide, &cuts));
        assert!(!is_good_qa_pair(&wide, &kaon, &pion, &cuts));
    }

    #[test]
    fn test_qa_pair_independent_of_analysis_gate() {
        let cuts = D0Cuts::default();
        let mut kp = good_pair();
        kp.derived.mass = 3.0;
        assert!(!is_good_pair(&kp, &cuts));
        assert!(is_good_qa_pair(&kp, &good_track(), &good_track(), &cuts));
    }

    #[test]
    fn test_qa_pair_each_condition() {
        let cuts = D0Cuts::default();
        let kp = good_pair();
        assert!(is_good_qa_pair(&kp, &good_track(), &good_track(), &cuts));

        let mut pion = good_track();
        pion.n_hits_fit = cuts.qa.n_hits_fit - 1;
        assert!(!is_good_qa_pair(&kp, &good_track(), &pion, &cuts));

        let mut kaon = good_track();
        kaon.n_hits_fit = cuts.qa.n_hits_fit - 1;
        assert!(!is_good_qa_pair(&kp, &kaon, &good_track(), &cuts));

        let mut kaon = good_track();
        kaon.n_sigma_kaon = -2.5;
        assert!(!is_good_qa_pair(&kp, &kaon, &good_track(), &cuts));

        // only the kaon's kaon band is checked
        let mut pion = good_track();
        pion.n_sigma_kaon = 9.0;
        assert!(is_good_qa_pair(&kp, &good_track(), &pion, &cuts));

        let mut wide = good_pair();
        wide.derived.pointing_angle = 0.2;
        assert!(!is_good_qa_pair(&wide, &good_track(), &good_track(), &cuts));

        let mut prompt = good_pair();
        prompt.derived.pion_dca = 0.001;
        assert!(!is_good_qa_pair(&prompt, &good_track(), &good_track(), &cuts));
    }

    #[test]
    fn test_qa_pair_boundaries() {
        let cuts = D0Cuts::default();
        let kp = good_pair();

        // pT and fit hits are inclusive
        let mut edge = good_track();
        edge.g_mom = ThreeVector::new(cuts.qa.pt, 0.0, 0.0);
        edge.n_hits_fit = cuts.qa.n_hits_fit;
        assert!(is_good_qa_pair(&kp, &edge, &edge, &cuts));

        let mut kaon = good_track();
        kaon.n_sigma_kaon = cuts.qa.n_sigma_kaon;
        assert!(!is_good_qa_pair(&kp, &kaon, &good_track(), &cuts));

        let mut at = good_pair();
        at.derived.kaon_dca = cuts.qa.kaon_dca;
        assert!(!is_good_qa_pair(&at, &good_track(), &good_track(), &cuts));

        let mut at = good_pair();
        at.derived.pion_dca = cuts.qa.pion_dca;
        assert!(!is_good_qa_pair(&at, &good_track(), &good_track(), &cuts));

        let mut at = good_pair();
        at.derived.dca_daughters = cuts.qa.dca_daughters;
        assert!(!is_good_qa_pair(&at, &good_track(), &good_track(), &cuts));

        // cos(0) == 1.0 exactly
        let mut tight = D0Cuts::default();
        tight.qa.cos_theta = 1.0;
        let mut straight = good_pair();
        straight.derived.pointing_angle = 0.0;
        assert!(!is_good_qa_pair(&straight, &good_track(), &good_track(), &tight));
        assert!(is_good_qa_pair(&straight, &good_track(), &good_track(), &cuts));
    }

    #[test]
    fn test_nan_rejects_everywhere() {
        let cuts = D0Cuts::default();

        let mut ev = good_event();
        ev.primary_vertex.z = f32::NAN;
        assert!(!is_good_event(&ev, &cuts));

        let mut trk = good_track();
        trk.n_sigma_pion = f32::NAN;
        trk.n_sigma_kaon = f32::NAN;
        assert!(!is_pion(&trk, &cuts));
        assert!(!is_kaon(&trk, &cuts));

        for field in 0..4 {
            let mut kp = good_pair();
            match field {
                0 => kp.derived.mass = f32::NAN,
                1 => kp.derived.pointing_angle = f32::NAN,
                2 => kp.derived.decay_length = f32::NAN,
                _ => kp.derived.dca_daughters = f32::NAN,
            }
            assert!(!is_good_pair(&kp, &cuts), "NaN in field {field} passed");
        }

        let mut kp = good_pair();
        kp.derived.pion_dca = f32::NAN;
        assert!(!is_good_qa_pair(&kp, &good_track(), &good_track(), &cuts));

        let mut kaon = good_track();
        kaon.g_mom.x = f32::NAN;
        assert!(!is_good_qa_pair(&good_pair(), &kaon, &good_track(), &cuts));
    }

    #[test]
    fn test_unlike_sign() {
        let mut kaon = good_track();
        let mut pion = good_track();
        kaon.charge = -1;
        pion.charge = 1;
        assert!(is_unlike_sign(&kaon, &pion));
        pion.charge = -1;
        assert!(!is_unlike_sign(&kaon, &pion));
        kaon.charge = 0;
        assert!(!is_unlike_sign(&kaon, &pion));
    }
}
