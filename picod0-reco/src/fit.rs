//! Straight-line kinematic fit.
#![allow(
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::many_single_char_names
)]

use picod0_core::{CandidateDerived, KinematicFit, ThreeVector, TrackRecord};

/// Charged kaon mass (GeV/c^2).
pub const KAON_MASS: f64 = 0.493_677;
/// Charged pion mass (GeV/c^2).
pub const PION_MASS: f64 = 0.139_570_39;

type V3 = [f64; 3];

#[inline]
fn v3(v: &ThreeVector) -> V3 {
    [f64::from(v.x), f64::from(v.y), f64::from(v.z)]
}

#[inline]
fn add(a: V3, b: V3) -> V3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
fn sub(a: V3, b: V3) -> V3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn scale(a: V3, s: f64) -> V3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
fn dot(a: V3, b: V3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: V3, b: V3) -> V3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn norm(a: V3) -> f64 {
    dot(a, a).sqrt()
}

/// Distance from `point` to the line through `origin` along `dir`.
fn point_line_distance(point: V3, origin: V3, dir: V3) -> f64 {
    let d = sub(point, origin);
    let p = norm(dir);
    if p > 0.0 {
        norm(cross(d, dir)) / p
    } else {
        norm(d)
    }
}

/// Vertex fit approximating both daughters as straight lines.
///
/// Each daughter runs through its DCA point (`origin`) along its global
/// momentum. The decay vertex is the midpoint of the shortest segment
/// joining the two lines. Curvature in the magnetic field is neglected,
/// which is adequate over the sub-millimetre D0 decay lengths; the field
/// value is accepted but unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineFit;

impl StraightLineFit {
    /// Creates the fit.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl KinematicFit for StraightLineFit {
    fn fit(
        &self,
        kaon: &TrackRecord,
        pion: &TrackRecord,
        _kaon_idx: usize,
        _pion_idx: usize,
        primary_vertex: &ThreeVector,
        _b_field: f32,
    ) -> CandidateDerived {
        let (ok, pk) = (v3(&kaon.origin), v3(&kaon.g_mom));
        let (op, pp) = (v3(&pion.origin), v3(&pion.g_mom));
        let pv = v3(primary_vertex);

        // closest approach of ok + s*pk and op + t*pp
        let w0 = sub(ok, op);
        let a = dot(pk, pk);
        let b = dot(pk, pp);
        let c = dot(pp, pp);
        let d = dot(pk, w0);
        let e = dot(pp, w0);
        let denom = a * c - b * b;
        let (s, t) = if denom > 1e-12 * a * c {
            ((b * e - c * d) / denom, (a * e - b * d) / denom)
        } else if c > 0.0 {
            (0.0, e / c)
        } else {
            (0.0, 0.0)
        };
        let at_kaon = add(ok, scale(pk, s));
        let at_pion = add(op, scale(pp, t));
        let dca_daughters = norm(sub(at_kaon, at_pion));
        let decay_vertex = scale(add(at_kaon, at_pion), 0.5);

        let mom = add(pk, pp);
        let e_kaon = (a + KAON_MASS * KAON_MASS).sqrt();
        let e_pion = (c + PION_MASS * PION_MASS).sqrt();
        let e_sum = e_kaon + e_pion;
        let mass = (e_sum * e_sum - dot(mom, mom)).max(0.0).sqrt();

        let flight = sub(decay_vertex, pv);
        let decay_length = norm(flight);
        let p_mag = norm(mom);
        let pointing_angle = if decay_length > 0.0 && p_mag > 0.0 {
            (dot(flight, mom) / (decay_length * p_mag))
                .clamp(-1.0, 1.0)
                .acos()
        } else {
            std::f64::consts::PI
        };

        let mom_f = ThreeVector::new(mom[0] as f32, mom[1] as f32, mom[2] as f32);

        CandidateDerived {
            mass: mass as f32,
            pt: mom_f.perp(),
            eta: mom_f.pseudo_rapidity(),
            phi: mom_f.phi(),
            pointing_angle: pointing_angle as f32,
            decay_length: decay_length as f32,
            dca_daughters: dca_daughters as f32,
            kaon_dca: point_line_distance(pv, ok, pk) as f32,
            pion_dca: point_line_distance(pv, op, pp) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn track(origin: ThreeVector, g_mom: ThreeVector) -> TrackRecord {
        TrackRecord {
            origin,
            g_mom,
            ..TrackRecord::default()
        }
    }

    #[test]
    fn test_common_vertex() {
        let vertex = ThreeVector::new(0.02, 0.0, 0.0);
        let kaon = track(vertex, ThreeVector::new(1.0, 0.3, 0.0));
        let pion = track(vertex, ThreeVector::new(1.0, -0.3, 0.0));
        let out = StraightLineFit.fit(&kaon, &pion, 0, 1, &ThreeVector::default(), -4.98);

        let e_k = (1.09 + KAON_MASS * KAON_MASS).sqrt();
        let e_pi = (1.09 + PION_MASS * PION_MASS).sqrt();
        let mass = ((e_k + e_pi).powi(2) - 4.0).sqrt();

        assert_relative_eq!(f64::from(out.mass), mass, epsilon = 1e-5);
        assert_relative_eq!(out.decay_length, 0.02, epsilon = 1e-6);
        assert_relative_eq!(out.dca_daughters, 0.0, epsilon = 1e-6);
        assert_relative_eq!(out.pointing_angle, 0.0, epsilon = 1e-3);
        assert_relative_eq!(out.pt, 2.0, epsilon = 1e-6);
        assert_relative_eq!(out.eta, 0.0, epsilon = 1e-6);
        assert_relative_eq!(out.phi, 0.0, epsilon = 1e-6);
        assert_relative_eq!(out.kaon_dca, 0.006 / 1.09_f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(out.pion_dca, out.kaon_dca, epsilon = 1e-6);
    }

    #[test]
    fn test_origin_along_line_is_irrelevant() {
        let vertex = ThreeVector::new(0.0, 0.015, 0.01);
        let pk = ThreeVector::new(0.2, 1.1, 0.4);
        let pp = ThreeVector::new(-0.3, 0.9, 0.1);
        let near = StraightLineFit.fit(
            &track(vertex, pk),
            &track(vertex, pp),
            0,
            1,
            &ThreeVector::default(),
            0.0,
        );
        let far = StraightLineFit.fit(
            &track(vertex - pk * 0.01, pk),
            &track(vertex + pp * 0.02, pp),
            0,
            1,
            &ThreeVector::default(),
            0.0,
        );
        assert_relative_eq!(near.decay_length, far.decay_length, epsilon = 1e-5);
        assert_relative_eq!(near.pointing_angle, far.pointing_angle, epsilon = 1e-3);
        assert_relative_eq!(far.dca_daughters, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_skew_lines_dca() {
        // kaon along x at z = +0.005, pion along y at z = -0.005
        let kaon = track(ThreeVector::new(0.0, 0.0, 0.005), ThreeVector::new(1.0, 0.0, 0.0));
        let pion = track(ThreeVector::new(0.0, 0.0, -0.005), ThreeVector::new(0.0, 1.0, 0.0));
        let out = StraightLineFit.fit(&kaon, &pion, 0, 1, &ThreeVector::default(), 0.0);
        assert_relative_eq!(out.dca_daughters, 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_geometry_points_away() {
        let kaon = track(ThreeVector::default(), ThreeVector::new(1.0, 0.0, 0.0));
        let pion = track(ThreeVector::default(), ThreeVector::new(0.0, 1.0, 0.0));
        let out = StraightLineFit.fit(&kaon, &pion, 0, 1, &ThreeVector::default(), 0.0);
        assert_relative_eq!(out.decay_length, 0.0);
        assert_relative_eq!(out.pointing_angle, std::f32::consts::PI);
    }

    #[test]
    fn test_parallel_daughters_stay_finite() {
        let kaon = track(ThreeVector::new(0.0, 0.001, 0.0), ThreeVector::new(1.0, 0.0, 0.0));
        let pion = track(ThreeVector::new(0.0, -0.001, 0.0), ThreeVector::new(2.0, 0.0, 0.0));
        let out = StraightLineFit.fit(&kaon, &pion, 0, 1, &ThreeVector::default(), 0.0);
        assert!(out.mass.is_finite());
        assert!(out.decay_length.is_finite());
        assert_relative_eq!(out.dca_daughters, 0.002, epsilon = 1e-6);
    }
}
