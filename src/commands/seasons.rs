// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Tracker;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<B: BlobStore>(tracker: &mut Tracker<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = tracker.data();
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data.seasons)? {
                return Ok(());
            }
            let rows = data
                .seasons
                .iter()
                .map(|s| {
                    let marker = if s.id == data.active_season_id { "*" } else { "" };
                    vec![marker.to_string(), s.id.clone(), s.label.clone()]
                })
                .collect();
            println!("{}", pretty_table(&["", "Id", "Label"], rows));
        }
        Some(("add", sub)) => {
            let label = sub.get_one::<String>("label").map(String::as_str).unwrap_or("");
            let season = tracker.add_season(label)?;
            println!("Added season '{}' ({}), now active", season.label, season.id);
        }
        Some(("use", sub)) => {
            let id = sub.get_one::<String>("season").map(String::as_str).unwrap_or("");
            tracker.select_season(id)?;
            println!("Active season: {}", tracker.season_label(id));
        }
        _ => {}
    }
    Ok(())
}
