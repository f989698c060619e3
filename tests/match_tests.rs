// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use matchcredits::db::MemoryBlobStore;
use matchcredits::fixtures::FixtureSource;
use matchcredits::models::{AppliedStatus, CreditCounts, TicketAction, Venue};
use matchcredits::queries::{
    breakdown_rows, compute_competition_breakdown, compute_credit_totals, eligibility_text,
    Scope,
};
use matchcredits::store::Tracker;
use matchcredits::utils::FixedClock;
use matchcredits::{cli, commands};

fn tracker() -> Tracker<MemoryBlobStore> {
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 9, 20).unwrap());
    Tracker::load(MemoryBlobStore::new(), Box::new(clock)).unwrap()
}

fn run(t: &mut Tracker<MemoryBlobStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut fixtures = FixtureSource::new(None);
    run_with(t, &mut fixtures, args)
}

fn run_with(
    t: &mut Tracker<MemoryBlobStore>,
    fixtures: &mut FixtureSource,
    args: &[&str],
) -> anyhow::Result<()> {
    let mut argv = vec!["matchcredits"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(t, sub),
        Some(("season", sub)) => commands::seasons::handle(t, sub),
        Some(("match", sub)) => commands::matches::handle(t, fixtures, sub),
        Some(("report", sub)) => commands::reports::handle(t, sub),
        Some(("settings", sub)) => commands::settings::handle(t, sub),
        _ => Ok(()),
    }
}

#[test]
fn home_league_credit_counts_once() {
    let mut t = tracker();
    run(&mut t, &["account", "setup", "--name", "Me"]).unwrap();
    run(
        &mut t,
        &[
            "match", "add", "--opponent", "Chelsea", "--date", "2025-09-13", "--venue", "H",
            "--comp", "PL", "--action", "credit",
        ],
    )
    .unwrap();

    let totals = compute_credit_totals(t.data(), &Scope::active(t.data()));
    assert_eq!((totals.home, totals.away, totals.total), (1, 0, 1));
    assert_eq!(eligibility_text(&totals), "You've got 1+ tracked - keep going.");
    let m = &t.data().matches[0];
    assert_eq!(m.season_id, "2025-26");
    assert_eq!(m.credit_counts, CreditCounts::Yes);
    assert_eq!(m.applied_status, AppliedStatus::Na);
}

#[test]
fn non_credit_action_defaults_to_no_credit() {
    let mut t = tracker();
    run(&mut t, &["account", "setup"]).unwrap();
    run(
        &mut t,
        &[
            "match", "add", "--opponent", "Everton", "--date", "2025-10-04", "--venue", "A",
            "--action", "season_return", "--amount", "£43,85",
        ],
    )
    .unwrap();
    let m = &t.data().matches[0];
    assert_eq!(m.venue, Venue::Away);
    assert_eq!(m.credit_counts, CreditCounts::No);
    assert_eq!(m.amount_paid.map(|d| d.to_string()), Some("43.85".to_string()));
    let totals = compute_credit_totals(t.data(), &Scope::active(t.data()));
    assert_eq!(totals.total, 0);
}

#[test]
fn blank_opponent_is_rejected() {
    let mut t = tracker();
    let err = run(&mut t, &["match", "add", "--opponent", "  ", "--date", "2025-09-13"])
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter an opponent");
    assert!(t.data().matches.is_empty());
}

#[test]
fn edit_keeps_explicit_credit_when_action_changes() {
    let mut t = tracker();
    run(&mut t, &["account", "setup", "--name", "Me"]).unwrap();
    run(
        &mut t,
        &["match", "add", "--opponent", "Arsenal", "--date", "2025-08-30", "--credit", "yes"],
    )
    .unwrap();
    let id = t.data().matches[0].id.clone();
    run(&mut t, &["match", "edit", "--id", &id, "--action", "scan_nocredit"]).unwrap();

    let m = &t.data().matches[0];
    assert_eq!(m.ticket_action, TicketAction::ScanNocredit);
    assert_eq!(m.credit_counts, CreditCounts::Yes);
    assert!(m.updated_at >= m.created_at);
}

#[test]
fn remove_needs_confirmation() {
    let mut t = tracker();
    run(&mut t, &["match", "add", "--opponent", "Spurs", "--date", "2025-11-01"]).unwrap();
    let id = t.data().matches[0].id.clone();

    run(&mut t, &["match", "rm", "--id", &id]).unwrap();
    assert_eq!(t.data().matches.len(), 1);
    run(&mut t, &["match", "rm", "--id", &id, "--yes"]).unwrap();
    assert!(t.data().matches.is_empty());
}

#[test]
fn applied_status_survives_an_edit() {
    let mut t = tracker();
    run(&mut t, &["match", "add", "--opponent", "Spurs", "--date", "2025-11-01"]).unwrap();
    let id = t.data().matches[0].id.clone();
    run(&mut t, &["match", "status", "--id", &id, "--status", "successful"]).unwrap();
    run(&mut t, &["match", "edit", "--id", &id, "--notes", "Row 12"]).unwrap();
    let m = &t.data().matches[0];
    assert_eq!(m.applied_status, AppliedStatus::Successful);
    assert_eq!(m.notes, "Row 12");
}

#[test]
fn add_from_fixture_prefills_the_form() {
    let mut t = tracker();
    let embedded = r#"[{"id":"2025-10-25-pl-brentford-a-1500","date":"2025-10-25","time":"15:00",
        "competition":"PL","opponent":"Brentford","venue":"A","location":"Gtech"}]"#;
    let mut fixtures = FixtureSource::new(Some(embedded.to_string()));
    run_with(
        &mut t,
        &mut fixtures,
        &["match", "add", "--fixture", "2025-10-25-pl-brentford-a-1500"],
    )
    .unwrap();
    let m = &t.data().matches[0];
    assert_eq!(m.opponent, "Brentford");
    assert_eq!(m.venue, Venue::Away);
    assert_eq!(m.match_date, NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
    assert_eq!(m.notes, "KO 15:00");
    assert_eq!(m.credit_counts, CreditCounts::Yes);

    let err = run_with(&mut t, &mut fixtures, &["match", "add", "--fixture", "nope"]).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn matches_stay_with_their_account() {
    let mut t = tracker();
    run(&mut t, &["account", "setup", "--count", "2", "--name", "Me"]).unwrap();
    assert_eq!(t.data().accounts[1].name, "Account 2");
    run(&mut t, &["match", "add", "--opponent", "Chelsea", "--date", "2025-09-13"]).unwrap();
    run(&mut t, &["account", "use", "account 2"]).unwrap();
    let totals = compute_credit_totals(t.data(), &Scope::active(t.data()));
    assert_eq!(totals.total, 0);
    run(&mut t, &["account", "use", "Me"]).unwrap();
    let totals = compute_credit_totals(t.data(), &Scope::active(t.data()));
    assert_eq!(totals.total, 1);
}

#[test]
fn unnamed_accounts_are_named_by_position() {
    let mut t = tracker();
    run(&mut t, &["account", "add"]).unwrap();
    run(&mut t, &["account", "add"]).unwrap();
    let names: Vec<&str> = t.data().accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Me", "Account 2"]);
    assert_eq!(t.active_account().map(|a| a.name.as_str()), Some("Me"));

    run(&mut t, &["account", "add", "--name", "Dad", "--use"]).unwrap();
    assert_eq!(t.active_account().map(|a| a.name.as_str()), Some("Dad"));
}

#[test]
fn setup_count_must_be_between_one_and_ten() {
    for bad in ["0", "11"] {
        let parsed = cli::build_cli().try_get_matches_from(["matchcredits", "account", "setup", "--count", bad]);
        assert!(parsed.is_err(), "count {bad}");
    }
    let mut t = tracker();
    run(&mut t, &["account", "setup", "--count", "3"]).unwrap();
    let names: Vec<&str> = t.data().accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Me", "Account 2", "Account 3"]);
}

#[test]
fn auto_cup_home_cells_show_label() {
    let mut t = tracker();
    run(&mut t, &["account", "setup", "--name", "Me", "--lc"]).unwrap();
    run(
        &mut t,
        &["match", "add", "--opponent", "Southampton", "--date", "2025-09-23", "--comp", "LC"],
    )
    .unwrap();
    let account = t.active_account().unwrap().clone();
    let breakdown = compute_competition_breakdown(t.data(), &Scope::active(t.data()));
    let rows = breakdown_rows(&breakdown, &account.auto_cup);
    let lc = rows.iter().find(|r| r.label == "League Cup").unwrap();
    assert_eq!(lc.home, "AutoCup");
    assert_eq!(lc.away, "A: 0");
    assert_eq!(breakdown.values().map(|h| h.home).sum::<u32>(), 1);
    run(&mut t, &["report", "breakdown", "--json"]).unwrap();
}

#[test]
fn new_season_becomes_active() {
    let mut t = tracker();
    run(&mut t, &["season", "add", "--label", "2040/41"]).unwrap();
    assert_eq!(t.active_season_id(), "2040-41");
    let err = run(&mut t, &["season", "add", "--label", "2040/41"]).unwrap_err();
    assert_eq!(err.to_string(), "Season '2040-41' already exists");
    run(&mut t, &["season", "use", "2025-26"]).unwrap();
    assert_eq!(t.active_season_id(), "2025-26");
    assert!(run(&mut t, &["season", "use", "1999-00"]).is_err());
}

#[test]
fn settings_toggle_persists() {
    let mut t = tracker();
    run(&mut t, &["settings", "set", "--rule", "returned", "--value", "false"]).unwrap();
    assert!(!t.data().settings.rule_returned_no_credit);
    assert!(t.data().settings.rule_forwarded_no_credit);
}

#[test]
fn summary_report_for_unknown_season_errors() {
    let mut t = tracker();
    assert!(run(&mut t, &["report", "summary", "--season", "1900-01"]).is_err());
    run(&mut t, &["report", "summary", "--json"]).unwrap();
}
