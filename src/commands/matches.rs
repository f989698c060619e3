// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{parse_opt, scope_from_args};
use crate::db::BlobStore;
use crate::errors::TrackerError;
use crate::fixtures::FixtureSource;
use crate::matches::{
    delete_match, prefill_from_fixture, resolve_credit, set_applied_status, upsert_match,
    MatchInput,
};
use crate::models::{AppliedStatus, MatchEntry, TicketAction};
use crate::queries::{filter_matches, MatchFilter, MatchSort};
use crate::store::Tracker;
use crate::utils::{format_optional_currency, iso_date, maybe_print_json, parse_date, pretty_table};
use anyhow::{Context, Result};

pub fn handle<B: BlobStore>(
    tracker: &mut Tracker<B>,
    fixtures: &mut FixtureSource,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(tracker, fixtures, sub)?,
        Some(("edit", sub)) => edit(tracker, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or("");
            if !sub.get_flag("yes") {
                println!("Not deleted; pass --yes to delete match {}", id);
                return Ok(());
            }
            if delete_match(tracker, id)? {
                println!("Deleted match {}", id);
            } else {
                println!("No match with id {}", id);
            }
        }
        Some(("status", sub)) => {
            let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or("");
            let status: AppliedStatus = parse_opt(sub, "status")?.unwrap_or_default();
            let entry = set_applied_status(tracker, id, status)?;
            println!("{} vs {}: {}", iso_date(entry.match_date), entry.opponent, status);
        }
        Some(("list", sub)) => list(tracker, sub)?,
        _ => {}
    }
    Ok(())
}

/// Field overrides shared by `add` and `edit`. An explicit `--credit` always
/// wins; `--action` alone lets the credit follow the action.
fn apply_overrides(
    input: &mut MatchInput,
    m: &clap::ArgMatches,
    creating: bool,
) -> Result<()> {
    if let Some(opponent) = m.get_one::<String>("opponent") {
        input.opponent = opponent.clone();
    }
    if let Some(date) = m.get_one::<String>("date") {
        input.match_date = parse_date(date)?;
    }
    if let Some(venue) = parse_opt(m, "venue")? {
        input.venue = venue;
    }
    if let Some(comp) = parse_opt(m, "competition")? {
        input.competition = comp;
    }
    if let Some(action) = parse_opt::<TicketAction>(m, "action")? {
        input.ticket_action = action;
        input.credit_counts = if creating {
            None
        } else {
            input.credit_counts.map(|c| resolve_credit(c, action))
        };
    }
    if let Some(credit) = parse_opt(m, "credit")? {
        input.credit_counts = Some(credit);
    }
    if let Some(notes) = m.get_one::<String>("notes") {
        input.notes = notes.clone();
    }
    if let Some(amount) = m.get_one::<String>("amount") {
        input.amount = Some(amount.clone());
    }
    Ok(())
}

fn add<B: BlobStore>(
    tracker: &mut Tracker<B>,
    fixtures: &mut FixtureSource,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let today = tracker.today();
    let mut input = match sub.get_one::<String>("fixture") {
        Some(fid) => {
            let list = fixtures.load(tracker)?;
            let fixture = list
                .iter()
                .find(|f| &f.id == fid)
                .with_context(|| format!("Fixture '{}' not found", fid))?;
            prefill_from_fixture(fixture, today)
        }
        None => MatchInput::new("", today),
    };
    apply_overrides(&mut input, sub, true)?;
    let entry = upsert_match(tracker, input)?;
    println!(
        "Logged {} vs {} ({}, {}) credit: {} [{}]",
        iso_date(entry.match_date),
        entry.opponent,
        entry.venue,
        entry.competition,
        entry.credit_counts,
        entry.id
    );
    Ok(())
}

fn edit<B: BlobStore>(tracker: &mut Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or("");
    let stored = tracker
        .data()
        .matches
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| TrackerError::UnknownMatch(id.to_string()))?;
    let mut input = MatchInput::from_entry(stored);
    apply_overrides(&mut input, sub, false)?;
    let entry = upsert_match(tracker, input)?;
    println!("Updated {} vs {}", iso_date(entry.match_date), entry.opponent);
    Ok(())
}

fn list<B: BlobStore>(tracker: &Tracker<B>, sub: &clap::ArgMatches) -> Result<()> {
    let scope = scope_from_args(tracker, sub)?;
    let filter = MatchFilter {
        query: sub.get_one::<String>("search").cloned(),
        venue: parse_opt(sub, "venue")?,
        competition: parse_opt(sub, "competition")?,
        credit: parse_opt(sub, "credit")?,
    };
    let sort = match sub.get_one::<String>("sort").map(String::as_str) {
        Some("date-added") => MatchSort::DateAdded,
        _ => MatchSort::MatchDate,
    };
    let rows: Vec<&MatchEntry> = filter_matches(tracker.data(), &scope, &filter, sort);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("No matches logged for {} yet.", tracker.season_label(&scope.season_id));
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|m| {
            vec![
                iso_date(m.match_date),
                m.opponent.clone(),
                m.venue.to_string(),
                m.competition.label().to_string(),
                m.ticket_action.label().to_string(),
                m.credit_counts.to_string(),
                m.applied_status.to_string(),
                format_optional_currency(m.amount_paid),
                m.notes.clone(),
                m.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Opponent", "H/A", "Competition", "Ticket", "Credit", "Applied", "Paid", "Notes", "Id"],
            data
        )
    );
    Ok(())
}
