// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MriError {
    #[error("Protocol column not available: {0}")]
    MissingColumn(String),

    #[error("Column {column} has length {found}, protocol length is {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Invalid sequence timing: {0}")]
    InvalidTiming(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MriResult<T> = Result<T, MriError>;
