// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — MRI Protocol
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Diffusion acquisition protocols for SCPN MRI Toolkit.

pub mod protocol;
pub mod timings;

pub use mri_types::constants;
