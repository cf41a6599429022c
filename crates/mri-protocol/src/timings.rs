// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — Sequence Timings
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Stejskal-Tanner relation for pulsed-gradient spin-echo sequences.
//!
//! `b = gamma^2 * G^2 * delta^2 * (Delta - delta / 3)`
//!
//! with `G` the gradient amplitude [T/m], `Delta` the gradient separation [s]
//! and `delta` the gradient duration [s]. b-values are in s/m^2.

use mri_types::constants::GAMMA_H_SQ;
use mri_types::error::{MriError, MriResult};

const BISECTION_MAX_ITERS: usize = 200;

/// b-value [s/m^2] from the three sequence timings.
pub fn b_value(g: f64, big_delta: f64, small_delta: f64) -> f64 {
    GAMMA_H_SQ * g * g * small_delta * small_delta * (big_delta - small_delta / 3.0)
}

/// Gradient amplitude [T/m] reaching `b` with the given timings.
pub fn gradient_amplitude(b: f64, big_delta: f64, small_delta: f64) -> MriResult<f64> {
    if b == 0.0 {
        return Ok(0.0);
    }
    let den = GAMMA_H_SQ * small_delta * small_delta * (big_delta - small_delta / 3.0);
    if !(den > 0.0) {
        return Err(MriError::InvalidTiming(format!(
            "no gradient amplitude for Delta={big_delta}, delta={small_delta}"
        )));
    }
    let g = (b / den).sqrt();
    if !g.is_finite() {
        return Err(MriError::InvalidTiming(format!(
            "gradient amplitude for b={b} is not finite"
        )));
    }
    Ok(g)
}

/// Gradient separation [s] reaching `b` with the given amplitude and duration.
///
/// Volumes with `G = 0` or `delta = 0` have no defined separation; those map to 0.
pub fn big_delta(b: f64, g: f64, small_delta: f64) -> f64 {
    let gg = GAMMA_H_SQ * g * g;
    let value = (b - gg * small_delta.powi(3) / 3.0) / (gg * small_delta * small_delta);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Gradient duration [s] reaching `b` with the given amplitude and separation.
///
/// Solves `-delta^3 / 3 + Delta * delta^2 - b / (gamma^2 G^2) = 0` for the root
/// in `[0, Delta]`. The left side is monotone on that interval, so bisection
/// always converges when a root exists.
pub fn small_delta(b: f64, g: f64, big_delta: f64) -> MriResult<f64> {
    if b == 0.0 {
        return Ok(0.0);
    }
    if !(g > 0.0) || !(big_delta > 0.0) || !(b > 0.0) {
        return Err(MriError::InvalidTiming(format!(
            "no gradient duration for b={b}, G={g}, Delta={big_delta}"
        )));
    }

    let c = b / (GAMMA_H_SQ * g * g);
    let f = |d: f64| big_delta * d * d - d * d * d / 3.0 - c;

    let b_reachable = 2.0 * GAMMA_H_SQ * g * g * big_delta.powi(3) / 3.0;
    if b > b_reachable * (1.0 + 1e-12) {
        return Err(MriError::InvalidTiming(format!(
            "b={b} exceeds {b_reachable} reachable with G={g}, Delta={big_delta}"
        )));
    }
    if f(big_delta) <= 0.0 {
        return Ok(big_delta);
    }

    let mut lo = 0.0;
    let mut hi = big_delta;
    for _ in 0..BISECTION_MAX_ITERS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if f(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Timings `(G, Delta, delta)` for a volume when only b-values are known.
///
/// Assumes `Delta = delta`, sized so that `b_max` is reached at `max_g`, and
/// scales the amplitude as `sqrt(b / b_max)`.
pub fn estimate_from_b(b: f64, b_max: f64, max_g: f64) -> MriResult<(f64, f64, f64)> {
    if !(b_max > 0.0) || !(max_g > 0.0) {
        return Err(MriError::InvalidTiming(format!(
            "cannot estimate timings with b_max={b_max}, maxG={max_g}"
        )));
    }
    let delta = (3.0 * b_max / (2.0 * GAMMA_H_SQ * max_g * max_g)).cbrt();
    let g = (b.max(0.0) / b_max).sqrt() * max_g;
    Ok((g, delta, delta))
}
