// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::models::SettingRule;
use crate::store::Tracker;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<B: BlobStore>(tracker: &mut Tracker<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = &tracker.data().settings;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
                return Ok(());
            }
            let rows = vec![
                vec!["forwarded".into(), "Forwarded tickets don't count".into(), s.rule_forwarded_no_credit.to_string()],
                vec!["returned".into(), "Season ticket returns don't count".into(), s.rule_returned_no_credit.to_string()],
                vec!["hospitality".into(), "Hospitality doesn't count".into(), s.rule_hospitality_no_credit.to_string()],
            ];
            println!("{}", pretty_table(&["Rule", "Meaning", "On"], rows));
        }
        Some(("set", sub)) => {
            let rule: SettingRule = sub
                .get_one::<String>("rule")
                .map(String::as_str)
                .unwrap_or("")
                .parse()
                .map_err(anyhow::Error::msg)?;
            let value = *sub.get_one::<bool>("value").unwrap_or(&true);
            tracker.set_setting(rule, value)?;
            println!("Updated setting");
        }
        _ => {}
    }
    Ok(())
}
