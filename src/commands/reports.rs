// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::scope_from_args;
use crate::db::BlobStore;
use crate::queries::{
    breakdown_rows, compute_competition_breakdown, compute_credit_totals, compute_spend,
    eligibility_text, recent_matches, CreditTotals, Scope, Spend,
};
use crate::store::Tracker;
use crate::utils::{format_currency, format_optional_currency, iso_date, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle<B: BlobStore>(tracker: &Tracker<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(tracker, sub)?,
        Some(("breakdown", sub)) => breakdown(tracker, sub)?,
        Some(("recent", sub)) => recent(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

/// Headline numbers for one account and season.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub season_id: String,
    pub season_label: String,
    pub account: Option<String>,
    pub credits: CreditTotals,
    pub spend: Spend,
    pub eligibility: &'static str,
}

pub fn build_summary<B: BlobStore>(tracker: &Tracker<B>, scope: &Scope) -> Summary {
    let data = tracker.data();
    let credits = compute_credit_totals(data, scope);
    Summary {
        season_id: scope.season_id.clone(),
        season_label: tracker.season_label(&scope.season_id),
        account: tracker.active_account().map(|a| a.name.clone()),
        credits,
        spend: compute_spend(data, scope),
        eligibility: eligibility_text(&credits),
    }
}

fn summary<B: BlobStore>(tracker: &Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let scope = scope_from_args(tracker, sub)?;
    let s = build_summary(tracker, &scope);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    println!(
        "{} · {}",
        s.account.as_deref().unwrap_or("(no account)"),
        s.season_label
    );
    let rows = vec![
        vec!["Home credits".to_string(), s.credits.home.to_string()],
        vec!["Away credits".to_string(), s.credits.away.to_string()],
        vec!["Total credits".to_string(), s.credits.total.to_string()],
        vec!["Total spent".to_string(), format_currency(s.spend.total)],
        vec!["Average per paid match".to_string(), format_currency(s.spend.avg)],
        vec!["Paid matches".to_string(), s.spend.count.to_string()],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    println!("{}", s.eligibility);
    Ok(())
}

fn breakdown<B: BlobStore>(tracker: &Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let scope = scope_from_args(tracker, sub)?;
    let auto_cup = tracker
        .active_account()
        .map(|a| a.auto_cup)
        .unwrap_or_default();
    let totals = compute_competition_breakdown(tracker.data(), &scope);
    let rows = breakdown_rows(&totals, &auto_cup);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let table = rows
        .into_iter()
        .map(|r| vec![r.label.to_string(), r.home, r.away])
        .collect();
    println!("{}", pretty_table(&["Competition", "Home", "Away"], table));
    Ok(())
}

fn recent<B: BlobStore>(tracker: &Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let scope = scope_from_args(tracker, sub)?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&6);
    let list = recent_matches(tracker.data(), &scope, limit);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
        return Ok(());
    }
    if list.is_empty() {
        println!("No matches logged yet.");
        return Ok(());
    }
    let rows = list
        .iter()
        .map(|m| {
            vec![
                iso_date(m.match_date),
                format!("{} ({})", m.opponent, m.venue),
                m.competition.code().to_string(),
                m.credit_counts.to_string(),
                format_optional_currency(m.amount_paid),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Match", "Comp", "Credit", "Paid"], rows)
    );
    Ok(())
}
