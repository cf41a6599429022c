// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! MRI specific physical constants used by the diffusion protocol code.
//!
//! This module is the only place these values are defined. Everything else
//! (including the re-exports at the crate root) refers back to these items.

use std::f64::consts::PI;

/// Gyromagnetic ratio of protons in water (nucleus of H) [rad s^-1 T^-1].
pub const GAMMA_H: f64 = 267.5987e6;

/// `GAMMA_H / (2 pi)` [s^-1 T^-1].
pub const GAMMA_H_HZ: f64 = GAMMA_H / (2.0 * PI);

/// `GAMMA_H^2` [(rad s^-1 T^-1)^2]
pub const GAMMA_H_SQ: f64 = GAMMA_H * GAMMA_H;

/// `GAMMA_H_HZ^2` [(s^-1 T^-1)^2]
pub const GAMMA_H_HZ_SQ: f64 = GAMMA_H_HZ * GAMMA_H_HZ;

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(actual: f64, expected: f64) -> f64 {
        (actual - expected).abs() / expected.abs()
    }

    #[test]
    fn test_gamma_h_value() {
        assert_eq!(GAMMA_H, 267_598_700.0);
    }

    #[test]
    fn test_gamma_h_hz_reference() {
        let err = rel_err(GAMMA_H_HZ, 42_589_655.869_965_17);
        assert!(err <= 1e-12, "GAMMA_H_HZ = {GAMMA_H_HZ}, rel_err = {err:e}");
        assert!(rel_err(GAMMA_H_HZ, GAMMA_H / (2.0 * PI)) <= 1e-12);
    }

    #[test]
    fn test_squares_are_derived() {
        assert!(rel_err(GAMMA_H_SQ, GAMMA_H * GAMMA_H) <= 1e-12);
        assert!(rel_err(GAMMA_H_HZ_SQ, GAMMA_H_HZ * GAMMA_H_HZ) <= 1e-12);
        let err = rel_err(GAMMA_H_SQ, 71_609_064_241_690_000.0);
        assert!(err <= 1e-12, "GAMMA_H_SQ = {GAMMA_H_SQ:e}, rel_err = {err:e}");
    }

    #[test]
    fn test_hz_square_matches_scaled_square() {
        let scaled = GAMMA_H_SQ / (4.0 * PI * PI);
        assert!(rel_err(GAMMA_H_HZ_SQ, scaled) <= 1e-12);
    }

    #[test]
    fn test_gamma_h_hz_is_not_codata_value() {
        // 42.577478 MHz/T belongs to the CODATA gamma (267.522e6), not to 267.5987e6.
        assert!(rel_err(GAMMA_H_HZ, 42_577_478.92) > 1e-4);
    }

    #[test]
    fn test_all_finite_and_positive() {
        for value in [GAMMA_H, GAMMA_H_HZ, GAMMA_H_SQ, GAMMA_H_HZ_SQ] {
            assert!(value.is_finite() && value > 0.0, "bad constant {value}");
        }
    }
}
