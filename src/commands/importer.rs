// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Tracker;
use anyhow::{Context, Result};

pub fn handle<B: BlobStore>(tracker: &mut Tracker<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("json", sub)) => import_backup(tracker, sub),
        _ => Ok(()),
    }
}

fn import_backup<B: BlobStore>(tracker: &mut Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").map(|s| s.trim()).unwrap_or("");
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open backup {}", path))?;
    tracker.import_json(&raw)?;
    let data = tracker.data();
    println!(
        "Imported {} seasons, {} accounts and {} matches from {}",
        data.seasons.len(),
        data.accounts.len(),
        data.matches.len(),
        path
    );
    Ok(())
}
