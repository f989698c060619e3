// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregation over the store. Nothing here caches; every call
//! reads the current snapshot.

use crate::models::{AutoCup, Competition, CreditCounts, MatchEntry, StoreData, Venue};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which matches a query looks at. `account_id: None` means every account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub season_id: String,
    pub account_id: Option<String>,
}

impl Scope {
    pub fn new(season_id: &str, account_id: Option<&str>) -> Scope {
        Scope {
            season_id: season_id.to_string(),
            account_id: account_id.map(str::to_string),
        }
    }

    /// Active season and active account, as currently selected.
    pub fn active(data: &StoreData) -> Scope {
        Scope::new(&data.active_season_id, data.active_account_id.as_deref())
    }

    /// Active account in an explicit season.
    pub fn season(data: &StoreData, season_id: &str) -> Scope {
        Scope::new(season_id, data.active_account_id.as_deref())
    }

    /// Every account in one season.
    pub fn season_wide(season_id: &str) -> Scope {
        Scope::new(season_id, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Spend {
    pub total: Decimal,
    pub avg: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CreditTotals {
    pub home: u32,
    pub away: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HomeAway {
    pub home: u32,
    pub away: u32,
}

pub type Breakdown = BTreeMap<Competition, HomeAway>;

pub fn matches_in_scope<'a>(
    data: &'a StoreData,
    scope: &Scope,
) -> impl Iterator<Item = &'a MatchEntry> {
    data.matches.iter().filter(move |m| {
        m.season_id == scope.season_id
            && scope
                .account_id
                .as_deref()
                .is_none_or(|acc| m.account_id.as_deref() == Some(acc))
    })
}

pub fn compute_spend(data: &StoreData, scope: &Scope) -> Spend {
    let paid: Vec<Decimal> = matches_in_scope(data, scope)
        .filter_map(|m| m.amount_paid)
        .collect();
    // Saturates instead of overflowing on absurd typed amounts.
    let total = paid
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(*d));
    let count = paid.len();
    let avg = if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    };
    Spend { total, avg, count }
}

pub fn compute_credit_totals(data: &StoreData, scope: &Scope) -> CreditTotals {
    let mut totals = CreditTotals::default();
    for m in matches_in_scope(data, scope).filter(|m| m.counts_for_credit()) {
        match m.venue {
            Venue::Home => totals.home += 1,
            Venue::Away => totals.away += 1,
        }
    }
    totals.total = totals.home + totals.away;
    totals
}

/// Credited matches per competition; every competition has an entry.
pub fn compute_competition_breakdown(data: &StoreData, scope: &Scope) -> Breakdown {
    let mut out: Breakdown = Competition::ALL
        .iter()
        .map(|c| (*c, HomeAway::default()))
        .collect();
    for m in matches_in_scope(data, scope).filter(|m| m.counts_for_credit()) {
        let slot = out.entry(m.competition).or_default();
        match m.venue {
            Venue::Home => slot.home += 1,
            Venue::Away => slot.away += 1,
        }
    }
    out
}

const ELIGIBILITY_TIERS: [(u32, &str); 5] = [
    (13, "Likely in a high-credit bracket (tracked)."),
    (4, "You're at 4+ in at least one category (tracked)."),
    (3, "You're at 3+ in at least one category (tracked)."),
    (2, "You're building credits (2+ tracked in a category)."),
    (1, "You've got 1+ tracked - keep going."),
];

pub const NO_CREDITS_TEXT: &str = "Start logging matches to see your progress.";

pub fn eligibility_text(totals: &CreditTotals) -> &'static str {
    let max = totals.home.max(totals.away).max(totals.total);
    ELIGIBILITY_TIERS
        .iter()
        .find(|(threshold, _)| max >= *threshold)
        .map(|(_, text)| *text)
        .unwrap_or(NO_CREDITS_TEXT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub competition: Competition,
    pub label: &'static str,
    pub home: String,
    pub away: String,
}

/// Display rows for the breakdown table. Home counts of AutoCup
/// competitions are shown as `AutoCup`; they still count in the totals.
pub fn breakdown_rows(breakdown: &Breakdown, auto_cup: &AutoCup) -> Vec<BreakdownRow> {
    breakdown
        .iter()
        .map(|(comp, counts)| BreakdownRow {
            competition: *comp,
            label: comp.label(),
            home: if auto_cup.covers(*comp) {
                "AutoCup".to_string()
            } else {
                format!("H: {}", counts.home)
            },
            away: format!("A: {}", counts.away),
        })
        .collect()
}

/// Most recently touched matches first.
pub fn recent_matches<'a>(data: &'a StoreData, scope: &Scope, limit: usize) -> Vec<&'a MatchEntry> {
    let mut out: Vec<&MatchEntry> = matches_in_scope(data, scope).collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out.truncate(limit);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchSort {
    #[default]
    MatchDate,
    DateAdded,
}

#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub query: Option<String>,
    pub venue: Option<Venue>,
    pub competition: Option<Competition>,
    pub credit: Option<CreditCounts>,
}

impl MatchFilter {
    pub fn accepts(&self, m: &MatchEntry) -> bool {
        if self.venue.is_some_and(|v| v != m.venue) {
            return false;
        }
        if self.competition.is_some_and(|c| c != m.competition) {
            return false;
        }
        if self.credit.is_some_and(|c| c != m.credit_counts) {
            return false;
        }
        match self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => format!("{} {}", m.opponent, m.notes)
                .to_lowercase()
                .contains(&q.to_lowercase()),
            None => true,
        }
    }
}

/// Filtered matches in scope, newest first by the chosen key.
pub fn filter_matches<'a>(
    data: &'a StoreData,
    scope: &Scope,
    filter: &MatchFilter,
    sort: MatchSort,
) -> Vec<&'a MatchEntry> {
    let mut out: Vec<&MatchEntry> = matches_in_scope(data, scope)
        .filter(|m| filter.accepts(m))
        .collect();
    match sort {
        MatchSort::MatchDate => out.sort_by(|a, b| b.match_date.cmp(&a.match_date)),
        MatchSort::DateAdded => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppliedStatus, TicketAction};
    use crate::store::default_data;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn data() -> StoreData {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        default_data(today, Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap())
    }

    fn entry(
        id: &str,
        account: &str,
        venue: Venue,
        comp: Competition,
        credit: CreditCounts,
        amount: Option<Decimal>,
    ) -> MatchEntry {
        let at = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        MatchEntry {
            id: id.to_string(),
            account_id: Some(account.to_string()),
            season_id: "2025-26".to_string(),
            opponent: format!("Opponent {id}"),
            venue,
            competition: comp,
            match_date: NaiveDate::from_ymd_opt(2025, 9, 13).unwrap(),
            applied_status: AppliedStatus::Na,
            ticket_action: TicketAction::Credit,
            credit_counts: credit,
            notes: String::new(),
            amount_paid: amount,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn unset_account_scope_sees_all_accounts() {
        let mut d = data();
        d.matches.push(entry("1", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, None));
        d.matches.push(entry("2", "b", Venue::Away, Competition::PremierLeague, CreditCounts::Yes, None));
        let mut other_season = entry("3", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, None);
        other_season.season_id = "2024-25".into();
        d.matches.push(other_season);

        assert_eq!(matches_in_scope(&d, &Scope::season_wide("2025-26")).count(), 2);
        assert_eq!(matches_in_scope(&d, &Scope::new("2025-26", Some("a"))).count(), 1);
        assert_eq!(matches_in_scope(&d, &Scope::new("2024-25", Some("b"))).count(), 0);
    }

    #[test]
    fn spend_skips_missing_amounts_and_never_divides_by_zero() {
        let mut d = data();
        let scope = Scope::new("2025-26", Some("a"));
        assert_eq!(compute_spend(&d, &scope), Spend { total: Decimal::ZERO, avg: Decimal::ZERO, count: 0 });

        d.matches.push(entry("1", "a", Venue::Home, Competition::PremierLeague, CreditCounts::No, Some(Decimal::new(4000, 2))));
        d.matches.push(entry("2", "a", Venue::Away, Competition::PremierLeague, CreditCounts::Yes, Some(Decimal::new(5500, 2))));
        d.matches.push(entry("3", "a", Venue::Away, Competition::PremierLeague, CreditCounts::Yes, None));
        let spend = compute_spend(&d, &scope);
        assert_eq!(spend.total, Decimal::new(9500, 2));
        assert_eq!(spend.count, 2);
        assert_eq!(spend.avg, Decimal::new(4750, 2));
    }

    #[test]
    fn spend_saturates_on_huge_amounts() {
        let mut d = data();
        let scope = Scope::new("2025-26", Some("a"));
        let huge = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        d.matches.push(entry("1", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, Some(huge)));
        d.matches.push(entry("2", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, Some(huge)));
        let spend = compute_spend(&d, &scope);
        assert_eq!(spend.total, Decimal::MAX);
        assert_eq!(spend.count, 2);
    }

    #[test]
    fn only_yes_credits_are_counted() {
        let mut d = data();
        d.matches.push(entry("1", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, None));
        d.matches.push(entry("2", "a", Venue::Home, Competition::FaCup, CreditCounts::Unsure, None));
        d.matches.push(entry("3", "a", Venue::Away, Competition::LeagueCup, CreditCounts::No, None));
        d.matches.push(entry("4", "a", Venue::Away, Competition::ChampionsLeague, CreditCounts::Yes, None));
        let scope = Scope::new("2025-26", Some("a"));
        assert_eq!(
            compute_credit_totals(&d, &scope),
            CreditTotals { home: 1, away: 1, total: 2 }
        );
        let b = compute_competition_breakdown(&d, &scope);
        assert_eq!(b.len(), 5);
        assert_eq!(b[&Competition::PremierLeague], HomeAway { home: 1, away: 0 });
        assert_eq!(b[&Competition::ChampionsLeague], HomeAway { home: 0, away: 1 });
        assert_eq!(b[&Competition::FaCup], HomeAway::default());
    }

    #[test]
    fn eligibility_tiers_pick_highest_threshold() {
        let t = |home, away| CreditTotals { home, away, total: home + away };
        assert_eq!(eligibility_text(&t(0, 0)), NO_CREDITS_TEXT);
        assert_eq!(eligibility_text(&t(1, 0)), "You've got 1+ tracked - keep going.");
        assert_eq!(eligibility_text(&t(1, 1)), "You're building credits (2+ tracked in a category).");
        assert_eq!(eligibility_text(&t(2, 1)), "You're at 3+ in at least one category (tracked).");
        assert_eq!(eligibility_text(&t(9, 3)), "You're at 4+ in at least one category (tracked).");
        assert_eq!(eligibility_text(&t(7, 6)), "Likely in a high-credit bracket (tracked).");
    }

    #[test]
    fn autocup_replaces_home_cell_but_not_count() {
        let mut d = data();
        d.matches.push(entry("1", "a", Venue::Home, Competition::LeagueCup, CreditCounts::Yes, None));
        let scope = Scope::new("2025-26", Some("a"));
        let auto = AutoCup { lc: true, fac: false, ucl: false };
        let rows = breakdown_rows(&compute_competition_breakdown(&d, &scope), &auto);
        let lc = rows.iter().find(|r| r.competition == Competition::LeagueCup).unwrap();
        assert_eq!(lc.home, "AutoCup");
        assert_eq!(lc.away, "A: 0");
        assert_eq!(rows[0].label, "Premier League");
        assert_eq!(rows[0].home, "H: 0");
        assert_eq!(compute_credit_totals(&d, &scope).home, 1);
    }

    #[test]
    fn filters_and_sorts() {
        let mut d = data();
        let mut a = entry("1", "a", Venue::Home, Competition::PremierLeague, CreditCounts::Yes, None);
        a.opponent = "Everton".into();
        a.match_date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let mut b = entry("2", "a", Venue::Away, Competition::PremierLeague, CreditCounts::No, None);
        b.notes = "rainy night at Goodison".into();
        b.match_date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        b.created_at = b.created_at - Duration::days(3);
        b.updated_at = b.updated_at + Duration::days(1);
        d.matches.push(a);
        d.matches.push(b);
        let scope = Scope::new("2025-26", Some("a"));

        let by_date = filter_matches(&d, &scope, &MatchFilter::default(), MatchSort::MatchDate);
        assert_eq!(by_date.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), ["2", "1"]);
        let by_added = filter_matches(&d, &scope, &MatchFilter::default(), MatchSort::DateAdded);
        assert_eq!(by_added[0].id, "1");

        let goodison = MatchFilter { query: Some("GOODISON".into()), ..MatchFilter::default() };
        assert_eq!(filter_matches(&d, &scope, &goodison, MatchSort::MatchDate).len(), 1);
        let home_yes = MatchFilter { venue: Some(Venue::Home), credit: Some(CreditCounts::Yes), ..MatchFilter::default() };
        assert_eq!(filter_matches(&d, &scope, &home_yes, MatchSort::MatchDate)[0].opponent, "Everton");

        assert_eq!(recent_matches(&d, &scope, 6)[0].id, "2");
        assert_eq!(recent_matches(&d, &scope, 1).len(), 1);
    }
}
