// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import failed: {0}")]
    InvalidImport(String),

    #[error("Please enter an opponent")]
    MissingOpponent,

    #[error("Season label must not be empty")]
    EmptySeasonLabel,

    #[error("Season '{0}' already exists")]
    DuplicateSeason(String),

    #[error("Account '{0}' not found")]
    UnknownAccount(String),

    #[error("Season '{0}' not found")]
    UnknownSeason(String),

    #[error("Match '{0}' not found")]
    UnknownMatch(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
