// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::parse_opt;
use crate::config::AppConfig;
use crate::db::BlobStore;
use crate::fixtures::{import_calendar, select_fixtures, FixtureSource, FixtureWindow};
use crate::store::Tracker;
use crate::utils::{http_client, maybe_print_json, pretty_table};
use anyhow::{bail, Context, Result};
use tracing::debug;

pub fn handle<B: BlobStore>(
    tracker: &Tracker<B>,
    cfg: &AppConfig,
    source: &mut FixtureSource,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("import", sub)) => {
            let text = if let Some(path) = sub.get_one::<String>("path") {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read calendar file {}", path))?
            } else if let Some(url) = sub.get_one::<String>("url") {
                fetch_feed(url)?
            } else {
                bail!("Pass --path or --url");
            };
            let summary = import_calendar(tracker, &text, &cfg.club)?;
            source.invalidate();
            println!(
                "Imported {} fixtures ({} total).",
                summary.parsed, summary.total
            );
        }
        Some(("list", sub)) => {
            let window = match sub.get_one::<String>("show").map(String::as_str) {
                Some("past") => FixtureWindow::Past,
                Some("all") => FixtureWindow::All,
                _ => FixtureWindow::Upcoming,
            };
            let comp = parse_opt(sub, "competition")?;
            let today = tracker.today();
            let shown = select_fixtures(source.load(tracker)?, window, comp, today);
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shown)? {
                return Ok(());
            }
            if shown.is_empty() {
                println!("No fixtures to show. Import a calendar with `fixtures import`.");
                return Ok(());
            }
            let rows = shown
                .into_iter()
                .map(|f| {
                    vec![
                        f.day().map(|d| d.to_string()).unwrap_or_default(),
                        f.kickoff().unwrap_or("TBC").to_string(),
                        f.opponent.clone(),
                        f.venue.to_string(),
                        f.competition.label().to_string(),
                        f.location.clone(),
                        f.id.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["Date", "KO", "Opponent", "H/A", "Competition", "Location", "Id"],
                    rows
                )
            );
        }
        Some(("clear", _)) => {
            tracker.clear_imported_fixtures()?;
            source.invalidate();
            println!("Imported fixtures cleared.");
        }
        _ => {}
    }
    Ok(())
}

fn fetch_feed(url: &str) -> Result<String> {
    debug!(url, "fetching calendar feed");
    let resp = http_client()?
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()?;
    Ok(resp.text()?)
}
