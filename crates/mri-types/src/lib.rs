// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — MRI Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
pub mod config;
pub mod constants;
pub mod error;

pub use constants::{GAMMA_H, GAMMA_H_HZ, GAMMA_H_HZ_SQ, GAMMA_H_SQ};
