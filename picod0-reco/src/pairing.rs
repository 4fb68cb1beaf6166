//! K pi pair enumeration.

use picod0_core::{EventSource, KaonPion, KinematicFit, ThreeVector, TrackRecord};

/// Enumerates every `(kaon, pion)` index pair in kaon-major order,
/// skipping pairs where both roles are the same track.
///
/// For role sets of sizes `m` and `n` sharing `k` indices this yields
/// `m * n - k` pairs.
pub fn kaon_pion_pairs<'a>(
    kaons: &'a [usize],
    pions: &'a [usize],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    kaons.iter().flat_map(move |&ik| {
        pions
            .iter()
            .filter(move |&&ip| ip != ik)
            .map(move |&ip| (ik, ip))
    })
}

/// A fitted candidate together with its daughter tracks.
#[derive(Debug, Clone, Copy)]
pub struct BuiltPair<'s> {
    /// Kaon daughter.
    pub kaon: &'s TrackRecord,
    /// Pion daughter.
    pub pion: &'s TrackRecord,
    /// Fitted candidate.
    pub kaon_pion: KaonPion,
}

/// Runs the kinematic fit on every enumerated pair.
///
/// No cut is applied here; selection happens on the fitted candidates.
/// Indices whose track slot is empty are skipped.
pub fn build_pairs<'s, S, F>(
    source: &'s S,
    kaons: &'s [usize],
    pions: &'s [usize],
    primary_vertex: ThreeVector,
    b_field: f32,
    fit: &'s F,
) -> impl Iterator<Item = BuiltPair<'s>> + 's
where
    S: EventSource + ?Sized,
    F: KinematicFit + ?Sized,
{
    kaon_pion_pairs(kaons, pions).filter_map(move |(ik, ip)| {
        let kaon = source.track(ik)?;
        let pion = source.track(ip)?;
        let derived = fit.fit(kaon, pion, ik, ip, &primary_vertex, b_field);
        Some(BuiltPair {
            kaon,
            pion,
            kaon_pion: KaonPion::new(ik, ip, derived),
        })
    })
}
