// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::errors::TrackerError;
use crate::models::AutoCup;
use crate::store::{AccountSetup, Tracker};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde_json::json;

const MAX_SETUP_ACCOUNTS: usize = 10;

fn auto_cup_from(m: &clap::ArgMatches) -> AutoCup {
    AutoCup {
        lc: m.get_flag("lc"),
        fac: m.get_flag("fac"),
        ucl: m.get_flag("ucl"),
    }
}

fn yes_no(b: bool) -> String {
    let s = if b { "yes" } else { "-" };
    s.to_string()
}

pub fn handle<B: BlobStore>(tracker: &mut Tracker<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let entry = AccountSetup {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                auto_cup: auto_cup_from(sub),
            };
            let account = tracker.create_account(&entry.name, entry.auto_cup)?;
            if sub.get_flag("use") {
                tracker.set_active_account(&account.id)?;
            }
            println!("Added account '{}' ({})", account.name, account.id);
        }
        Some(("setup", sub)) => {
            let count = *sub.get_one::<u64>("count").unwrap_or(&1) as usize;
            let names: Vec<String> = sub
                .get_many::<String>("name")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            let auto_cup = auto_cup_from(sub);
            let entries: Vec<AccountSetup> = (0..count.max(names.len()).min(MAX_SETUP_ACCOUNTS))
                .map(|i| AccountSetup {
                    name: names.get(i).cloned().unwrap_or_default(),
                    auto_cup,
                })
                .collect();
            let season = sub.get_one::<String>("season").map(String::as_str);
            if let Some(id) = season {
                if !tracker.data().seasons.iter().any(|s| s.id == id) {
                    return Err(TrackerError::UnknownSeason(id.to_string()).into());
                }
            }
            let created = tracker.setup_accounts(&entries, season, false)?;
            println!(
                "Created {} account(s) for {}",
                created.len(),
                tracker.season_label(tracker.active_season_id())
            );
        }
        Some(("list", sub)) => {
            let active = tracker.active_account_id().map(str::to_string);
            let accounts = &tracker.data().accounts;
            let items: Vec<_> = accounts
                .iter()
                .map(|a| {
                    json!({
                        "id": a.id,
                        "name": a.name,
                        "autoCup": a.auto_cup,
                        "active": active.as_deref() == Some(a.id.as_str()),
                    })
                })
                .collect();
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                return Ok(());
            }
            let rows = accounts
                .iter()
                .map(|a| {
                    let marker = if active.as_deref() == Some(a.id.as_str()) { "*" } else { "" };
                    vec![
                        marker.to_string(),
                        a.name.clone(),
                        yes_no(a.auto_cup.lc),
                        yes_no(a.auto_cup.fac),
                        yes_no(a.auto_cup.ucl),
                        a.id.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["", "Name", "LC", "FAC", "UCL", "Id"], rows)
            );
        }
        Some(("use", sub)) => {
            let wanted = sub.get_one::<String>("account").map(String::as_str).unwrap_or("");
            tracker.select_account(wanted)?;
            if let Some(a) = tracker.active_account() {
                println!("Active account: {}", a.name);
            }
        }
        _ => {}
    }
    Ok(())
}
