// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::errors::{Result, TrackerError};
use crate::models::{
    AppliedStatus, Competition, CreditCounts, Fixture, MatchEntry, TicketAction, Venue,
};
use crate::store::{new_uid, Tracker};
use crate::utils::parse_amount;
use chrono::NaiveDate;
use tracing::info;

/// Scheme default for a raw ticket-action code; unknown codes are `Unsure`.
pub fn default_credit_from_action(action: &str) -> CreditCounts {
    action
        .parse::<TicketAction>()
        .map(TicketAction::default_credit)
        .unwrap_or(CreditCounts::Unsure)
}

/// `Unsure` means "not chosen yet" and takes the action's default; any
/// other value is an explicit choice and is kept.
pub fn resolve_credit(current: CreditCounts, action: TicketAction) -> CreditCounts {
    match current {
        CreditCounts::Unsure => action.default_credit(),
        explicit => explicit,
    }
}

/// Form-shaped input for creating or editing a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInput {
    pub id: Option<String>,
    pub opponent: String,
    pub venue: Venue,
    pub competition: Competition,
    pub match_date: NaiveDate,
    pub ticket_action: TicketAction,
    /// `None` on create takes the ticket action's default; on update the
    /// stored value is kept.
    pub credit_counts: Option<CreditCounts>,
    pub notes: String,
    pub amount: Option<String>,
}

impl MatchInput {
    pub fn new(opponent: &str, match_date: NaiveDate) -> MatchInput {
        MatchInput {
            id: None,
            opponent: opponent.to_string(),
            venue: Venue::Home,
            competition: Competition::PremierLeague,
            match_date,
            ticket_action: TicketAction::Credit,
            credit_counts: None,
            notes: String::new(),
            amount: None,
        }
    }

    /// Start an edit from what is stored.
    pub fn from_entry(m: &MatchEntry) -> MatchInput {
        MatchInput {
            id: Some(m.id.clone()),
            opponent: m.opponent.clone(),
            venue: m.venue,
            competition: m.competition,
            match_date: m.match_date,
            ticket_action: m.ticket_action,
            credit_counts: Some(m.credit_counts),
            notes: m.notes.clone(),
            amount: m.amount_paid.map(|d| d.to_string()),
        }
    }
}

/// Create or replace a match. Opponent is required; nothing is written
/// when it is blank.
pub fn upsert_match<B: BlobStore>(tracker: &mut Tracker<B>, input: MatchInput) -> Result<MatchEntry> {
    let opponent = input.opponent.trim().to_string();
    if opponent.is_empty() {
        return Err(TrackerError::MissingOpponent);
    }
    let now = tracker.now();
    let existing = input
        .id
        .as_deref()
        .and_then(|id| tracker.data().matches.iter().position(|m| m.id == id));

    let entry = match existing {
        Some(idx) => {
            let prev = &tracker.data().matches[idx];
            MatchEntry {
                id: prev.id.clone(),
                account_id: prev.account_id.clone(),
                season_id: prev.season_id.clone(),
                opponent,
                venue: input.venue,
                competition: input.competition,
                match_date: input.match_date,
                applied_status: prev.applied_status,
                ticket_action: input.ticket_action,
                credit_counts: input.credit_counts.unwrap_or(prev.credit_counts),
                notes: input.notes.trim().to_string(),
                amount_paid: input.amount.as_deref().and_then(parse_amount),
                created_at: prev.created_at,
                updated_at: now,
            }
        }
        None => MatchEntry {
            id: input.id.clone().unwrap_or_else(new_uid),
            account_id: tracker.active_account_id().map(str::to_string),
            season_id: tracker.active_season_id().to_string(),
            opponent,
            venue: input.venue,
            competition: input.competition,
            match_date: input.match_date,
            applied_status: AppliedStatus::Na,
            ticket_action: input.ticket_action,
            credit_counts: input
                .credit_counts
                .unwrap_or_else(|| input.ticket_action.default_credit()),
            notes: input.notes.trim().to_string(),
            amount_paid: input.amount.as_deref().and_then(parse_amount),
            created_at: now,
            updated_at: now,
        },
    };

    let matches = &mut tracker.data_mut().matches;
    match existing {
        Some(idx) => matches[idx] = entry.clone(),
        None => matches.push(entry.clone()),
    }
    tracker.save()?;
    info!(
        id = %entry.id,
        opponent = %entry.opponent,
        updated = existing.is_some(),
        "match saved"
    );
    Ok(entry)
}

/// Remove a match. Returns whether anything was removed.
pub fn delete_match<B: BlobStore>(tracker: &mut Tracker<B>, id: &str) -> Result<bool> {
    let matches = &mut tracker.data_mut().matches;
    let before = matches.len();
    matches.retain(|m| m.id != id);
    if matches.len() == before {
        return Ok(false);
    }
    tracker.save()?;
    info!(id, "match deleted");
    Ok(true)
}

pub fn set_applied_status<B: BlobStore>(
    tracker: &mut Tracker<B>,
    id: &str,
    status: AppliedStatus,
) -> Result<MatchEntry> {
    let now = tracker.now();
    let entry = tracker
        .data_mut()
        .matches
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| TrackerError::UnknownMatch(id.to_string()))?;
    entry.applied_status = status;
    entry.updated_at = now;
    let updated = entry.clone();
    tracker.save()?;
    Ok(updated)
}

/// Pre-fill a new match from a fixture, ticket action `credit`.
pub fn prefill_from_fixture(f: &Fixture, fallback_date: NaiveDate) -> MatchInput {
    let action = TicketAction::Credit;
    MatchInput {
        id: None,
        opponent: f.opponent.clone(),
        venue: f.venue,
        competition: f.competition,
        match_date: f.day().unwrap_or(fallback_date),
        ticket_action: action,
        credit_counts: Some(resolve_credit(CreditCounts::Unsure, action)),
        notes: f.kickoff().map(|t| format!("KO {}", t)).unwrap_or_default(),
        amount: None,
    }
}
