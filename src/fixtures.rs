// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-feed (iCalendar) fixture import and the fixture list the
//! `fixtures` commands browse.

use crate::db::BlobStore;
use crate::errors::{Result, TrackerError};
use crate::models::{Competition, Fixture, Venue};
use crate::store::Tracker;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{info, warn};

static DTSTART_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"DTSTART[^:]*:([0-9]{8})(?:T([0-9]{6})Z?)?").expect("valid regex"));
static SUMMARY_JUNK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s/\-.&]").expect("valid regex"));
static VERSUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+vs\s+").expect("valid regex"));

/// Start date (`YYYY-MM-DD`) and time (`HH:MM`, `00:00` for all-day) of a
/// `DTSTART` property line.
pub fn parse_ics_start(line: &str) -> Option<(String, String)> {
    let caps = DTSTART_RE.captures(line)?;
    let ymd = caps.get(1)?.as_str();
    let date = format!("{}-{}-{}", &ymd[..4], &ymd[4..6], &ymd[6..8]);
    let time = caps
        .get(2)
        .map(|hms| format!("{}:{}", &hms.as_str()[..2], &hms.as_str()[2..4]))
        .unwrap_or_else(|| "00:00".to_string());
    Some((date, time))
}

pub fn clean_summary(s: &str) -> String {
    SUMMARY_JUNK_RE.replace_all(s, "").trim().to_string()
}

/// Opponent and venue from an event title like "Liverpool vs Chelsea".
/// Titles that do not split into exactly two sides are taken whole as the
/// opponent, at home.
pub fn opponent_venue_from_summary(summary: &str, club: &str) -> (String, Venue) {
    let s = clean_summary(summary);
    let parts: Vec<&str> = VERSUS_RE.split(&s).collect();
    if parts.len() != 2 {
        return (s, Venue::Home);
    }
    let (left, right) = (parts[0].trim(), parts[1].trim());
    if left.to_lowercase().starts_with(&club.trim().to_lowercase()) {
        (right.to_string(), Venue::Home)
    } else {
        (left.to_string(), Venue::Away)
    }
}

pub fn competition_from_description(desc: &str) -> Competition {
    let d = desc.to_lowercase();
    if d.contains("premier league") {
        Competition::PremierLeague
    } else if d.contains("champions league") {
        Competition::ChampionsLeague
    } else if d.contains("fa cup") {
        Competition::FaCup
    } else if d.contains("carabao") || d.contains("league cup") {
        Competition::LeagueCup
    } else {
        Competition::Other
    }
}

/// Canonical key: same event, same id, however often the feed is parsed.
pub fn fixture_id(
    date: &str,
    competition: Competition,
    opponent: &str,
    venue: Venue,
    time: &str,
) -> String {
    let opponent: String = opponent
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!(
        "{}-{}-{}-{}-{}",
        date,
        competition.code().to_lowercase(),
        opponent,
        venue.code().to_lowercase(),
        time.replace(':', "")
    )
}

/// Content lines of one event with RFC 5545 folding undone.
fn unfolded_lines(block: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in block.lines() {
        if let (Some(rest), Some(prev)) = (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            prev.push_str(rest);
            continue;
        }
        lines.push(raw.to_string());
    }
    lines
}

fn property<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|l| l.strip_prefix(name).and_then(|rest| rest.strip_prefix(':')))
        .map(str::trim)
}

/// Parse every `VEVENT` into a fixture. Events without a readable start are
/// skipped; repeated ids keep their first occurrence.
pub fn parse_ics_fixtures(text: &str, club: &str) -> Vec<Fixture> {
    let mut out: Vec<Fixture> = Vec::new();
    for block in text.split("BEGIN:VEVENT").skip(1) {
        let block = block.split("END:VEVENT").next().unwrap_or(block);
        let lines = unfolded_lines(block);
        let Some((date, time)) = lines
            .iter()
            .find(|l| l.starts_with("DTSTART"))
            .and_then(|l| parse_ics_start(l))
        else {
            continue;
        };
        let summary = property(&lines, "SUMMARY").unwrap_or("");
        let desc = property(&lines, "DESCRIPTION").unwrap_or("");
        let location = property(&lines, "LOCATION").unwrap_or("");

        let (opponent, venue) = opponent_venue_from_summary(summary, club);
        let competition = competition_from_description(desc);
        let id = fixture_id(&date, competition, &opponent, venue, &time);
        if out.iter().any(|f| f.id == id) {
            continue;
        }
        out.push(Fixture {
            id,
            datetime_utc: format!("{}T{}:00Z", date, time),
            date,
            time,
            competition,
            opponent,
            venue,
            location: location.to_string(),
        });
    }
    out
}

/// Union keyed by id in first-seen order; `incoming` replaces `existing`.
pub fn merge_fixtures(existing: Vec<Fixture>, incoming: Vec<Fixture>) -> Vec<Fixture> {
    let mut order: Vec<Fixture> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for f in existing.into_iter().chain(incoming) {
        if f.id.is_empty() {
            continue;
        }
        match index.get(&f.id) {
            Some(&i) => order[i] = f,
            None => {
                index.insert(f.id.clone(), order.len());
                order.push(f);
            }
        }
    }
    order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub parsed: usize,
    pub total: usize,
}

/// Parse a calendar feed and merge it into the imported-fixtures table.
pub fn import_calendar<B: BlobStore>(
    tracker: &Tracker<B>,
    text: &str,
    club: &str,
) -> Result<ImportSummary> {
    if !text.contains("BEGIN:VEVENT") && !text.contains("BEGIN:VCALENDAR") {
        return Err(TrackerError::InvalidImport(
            "not an iCalendar feed".to_string(),
        ));
    }
    let parsed = parse_ics_fixtures(text, club);
    let merged = merge_fixtures(tracker.imported_fixtures()?, parsed.clone());
    tracker.set_imported_fixtures(&merged)?;
    info!(parsed = parsed.len(), total = merged.len(), "fixtures imported");
    Ok(ImportSummary {
        parsed: parsed.len(),
        total: merged.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixtureWindow {
    #[default]
    Upcoming,
    Past,
    All,
}

/// Fixtures inside the window, optionally one competition only. Upcoming
/// and all run oldest first, past runs newest first.
pub fn select_fixtures(
    fixtures: &[Fixture],
    window: FixtureWindow,
    competition: Option<Competition>,
    today: NaiveDate,
) -> Vec<Fixture> {
    let mut out: Vec<(NaiveDate, &Fixture)> = fixtures
        .iter()
        .filter(|f| competition.is_none_or(|c| f.competition == c))
        .filter_map(|f| f.day().map(|d| (d, f)))
        .filter(|(d, _)| match window {
            FixtureWindow::Upcoming => *d >= today,
            FixtureWindow::Past => *d < today,
            FixtureWindow::All => true,
        })
        .collect();
    out.sort_by_key(|(d, _)| *d);
    if window == FixtureWindow::Past {
        out.reverse();
    }
    out.into_iter().map(|(_, f)| f.clone()).collect()
}

/// Memoised fixture list. Imported fixtures win; the embedded list is used
/// until something has been imported. Call `invalidate` after an import,
/// a clear, or to force a reload.
#[derive(Debug, Default)]
pub struct FixtureSource {
    embedded: Option<String>,
    cache: Option<Vec<Fixture>>,
}

impl FixtureSource {
    pub fn new(embedded: Option<String>) -> FixtureSource {
        FixtureSource {
            embedded,
            cache: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn load<B: BlobStore>(&mut self, tracker: &Tracker<B>) -> Result<&[Fixture]> {
        if self.cache.is_none() {
            let imported = tracker.imported_fixtures()?;
            let list = if !imported.is_empty() {
                imported
            } else {
                self.embedded_list()
            };
            self.cache = Some(list);
        }
        Ok(self.cache.as_deref().unwrap_or(&[]))
    }

    fn embedded_list(&self) -> Vec<Fixture> {
        let Some(raw) = self.embedded.as_deref() else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Fixture>>(raw) {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "embedded fixture list unreadable");
                Vec::new()
            }
        }
    }
}
