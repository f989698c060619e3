// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::db::BlobStore;
use crate::errors::{self, TrackerError};
use crate::queries::{matches_in_scope, Scope};
use crate::store::Tracker;
use crate::utils::iso_date;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use csv::{Terminator, WriterBuilder};
use std::io;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 12] = [
    "season",
    "opponent",
    "venue",
    "competition",
    "matchDate",
    "appliedStatus",
    "ticketAction",
    "creditCounts",
    "amountPaid",
    "notes",
    "createdAt",
    "updatedAt",
];

pub fn handle<B: BlobStore>(
    tracker: &Tracker<B>,
    cfg: &AppConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    let (ext, body, sub) = match m.subcommand() {
        Some(("json", sub)) => ("json", tracker.export_json()?, sub),
        Some(("csv", sub)) => ("csv", season_csv(tracker)?, sub),
        _ => return Ok(()),
    };
    let out = sub.get_one::<String>("out").map(PathBuf::from);
    let path = output_path(out.as_deref(), &tracker.export_file_name(&cfg.namespace, ext));
    std::fs::write(&path, body).with_context(|| format!("Write {}", path.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

/// A directory (or nothing) gets the default file name appended.
fn output_path(out: Option<&Path>, file_name: &str) -> PathBuf {
    match out {
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Every account's matches in the active season, oldest first.
pub fn season_csv<B: BlobStore>(tracker: &Tracker<B>) -> errors::Result<String> {
    let season_id = tracker.active_season_id();
    let label = tracker.season_label(season_id);
    let mut rows: Vec<_> = matches_in_scope(tracker.data(), &Scope::season_wide(season_id)).collect();
    rows.sort_by_key(|m| m.match_date);

    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for m in rows {
        wtr.write_record([
            label.clone(),
            m.opponent.clone(),
            m.venue.to_string(),
            m.competition.to_string(),
            iso_date(m.match_date),
            m.applied_status.to_string(),
            m.ticket_action.to_string(),
            m.credit_counts.to_string(),
            m.amount_paid
                .map(|d| d.normalize().to_string())
                .unwrap_or_default(),
            m.notes.clone(),
            m.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            m.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| TrackerError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| TrackerError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
