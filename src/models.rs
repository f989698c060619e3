// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STORE_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "A")]
    Away,
}

impl Venue {
    pub fn code(self) -> &'static str {
        match self {
            Venue::Home => "H",
            Venue::Away => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Competition {
    #[serde(rename = "PL")]
    PremierLeague,
    #[serde(rename = "UCL")]
    ChampionsLeague,
    #[serde(rename = "FAC")]
    FaCup,
    #[serde(rename = "LC")]
    LeagueCup,
    #[serde(rename = "OTHER")]
    Other,
}

impl Competition {
    pub const ALL: [Competition; 5] = [
        Competition::PremierLeague,
        Competition::ChampionsLeague,
        Competition::FaCup,
        Competition::LeagueCup,
        Competition::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Competition::PremierLeague => "PL",
            Competition::ChampionsLeague => "UCL",
            Competition::FaCup => "FAC",
            Competition::LeagueCup => "LC",
            Competition::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Competition::PremierLeague => "Premier League",
            Competition::ChampionsLeague => "UCL",
            Competition::FaCup => "FA Cup",
            Competition::LeagueCup => "League Cup",
            Competition::Other => "Other",
        }
    }

    /// Maps any code outside the known five to `Other`.
    pub fn from_code_lenient(code: &str) -> Competition {
        code.parse().unwrap_or(Competition::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliedStatus {
    #[default]
    Na,
    Applied,
    Successful,
    Unsuccessful,
}

impl AppliedStatus {
    pub fn code(self) -> &'static str {
        match self {
            AppliedStatus::Na => "na",
            AppliedStatus::Applied => "applied",
            AppliedStatus::Successful => "successful",
            AppliedStatus::Unsuccessful => "unsuccessful",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Credit,
    SeasonReturn,
    FwdMeCredit,
    FwdMeNocredit,
    HospCredit,
    HospNocredit,
    ScanNocredit,
}

impl TicketAction {
    pub fn code(self) -> &'static str {
        match self {
            TicketAction::Credit => "credit",
            TicketAction::SeasonReturn => "season_return",
            TicketAction::FwdMeCredit => "fwd_me_credit",
            TicketAction::FwdMeNocredit => "fwd_me_nocredit",
            TicketAction::HospCredit => "hosp_credit",
            TicketAction::HospNocredit => "hosp_nocredit",
            TicketAction::ScanNocredit => "scan_nocredit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketAction::Credit => "Credit",
            TicketAction::SeasonReturn => "Season Ticket Return",
            TicketAction::FwdMeCredit => "Forwarded (credit)",
            TicketAction::FwdMeNocredit => "Forwarded (no credit)",
            TicketAction::HospCredit => "Hospitality (credit)",
            TicketAction::HospNocredit => "Hospitality (no credit)",
            TicketAction::ScanNocredit => "Scan in (no credit)",
        }
    }

    /// Scheme default for this disposition; the user may override it per match.
    pub fn default_credit(self) -> CreditCounts {
        match self {
            TicketAction::Credit | TicketAction::FwdMeCredit | TicketAction::HospCredit => {
                CreditCounts::Yes
            }
            TicketAction::SeasonReturn
            | TicketAction::FwdMeNocredit
            | TicketAction::HospNocredit
            | TicketAction::ScanNocredit => CreditCounts::No,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditCounts {
    Yes,
    No,
    Unsure,
}

impl CreditCounts {
    pub fn code(self) -> &'static str {
        match self {
            CreditCounts::Yes => "yes",
            CreditCounts::No => "no",
            CreditCounts::Unsure => "unsure",
        }
    }
}

macro_rules! code_from_str {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.code().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("Unknown {} '{}'", $what, s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_from_str!(Venue, "venue", [Venue::Home, Venue::Away]);
code_from_str!(
    Competition,
    "competition",
    [
        Competition::PremierLeague,
        Competition::ChampionsLeague,
        Competition::FaCup,
        Competition::LeagueCup,
        Competition::Other,
    ]
);
code_from_str!(
    AppliedStatus,
    "applied status",
    [
        AppliedStatus::Na,
        AppliedStatus::Applied,
        AppliedStatus::Successful,
        AppliedStatus::Unsuccessful,
    ]
);
code_from_str!(
    TicketAction,
    "ticket action",
    [
        TicketAction::Credit,
        TicketAction::SeasonReturn,
        TicketAction::FwdMeCredit,
        TicketAction::FwdMeNocredit,
        TicketAction::HospCredit,
        TicketAction::HospNocredit,
        TicketAction::ScanNocredit,
    ]
);
code_from_str!(
    CreditCounts,
    "credit value",
    [CreditCounts::Yes, CreditCounts::No, CreditCounts::Unsure]
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCup {
    #[serde(rename = "LC", default)]
    pub lc: bool,
    #[serde(rename = "FAC", default)]
    pub fac: bool,
    #[serde(rename = "UCL", default)]
    pub ucl: bool,
}

impl AutoCup {
    /// Whether home credits in `comp` are granted automatically for this account.
    pub fn covers(&self, comp: Competition) -> bool {
        match comp {
            Competition::LeagueCup => self.lc,
            Competition::FaCup => self.fac,
            Competition::ChampionsLeague => self.ucl,
            Competition::PremierLeague | Competition::Other => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub auto_cup: AutoCup,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub id: String,
    pub account_id: Option<String>,
    pub season_id: String,
    pub opponent: String,
    pub venue: Venue,
    pub competition: Competition,
    pub match_date: NaiveDate,
    #[serde(default)]
    pub applied_status: AppliedStatus,
    pub ticket_action: TicketAction,
    pub credit_counts: CreditCounts,
    #[serde(default)]
    pub notes: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount_paid: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchEntry {
    pub fn counts_for_credit(&self) -> bool {
        self.credit_counts == CreditCounts::Yes
    }
}

/// Advisory credit-scheme interpretation toggles. Stored, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub rule_forwarded_no_credit: bool,
    pub rule_returned_no_credit: bool,
    pub rule_hospitality_no_credit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rule_forwarded_no_credit: true,
            rule_returned_no_credit: true,
            rule_hospitality_no_credit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingRule {
    ForwardedNoCredit,
    ReturnedNoCredit,
    HospitalityNoCredit,
}

impl FromStr for SettingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forwarded" | "ruleforwardednocredit" => Ok(SettingRule::ForwardedNoCredit),
            "returned" | "rulereturnednocredit" => Ok(SettingRule::ReturnedNoCredit),
            "hospitality" | "rulehospitalitynocredit" => Ok(SettingRule::HospitalityNoCredit),
            other => Err(format!("Unknown setting '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: Settings,
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub active_season_id: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub active_account_id: Option<String>,
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

/// A scheduled match from a calendar feed or the embedded fixture list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default = "midnight")]
    pub time: String,
    #[serde(default)]
    pub datetime_utc: String,
    #[serde(default = "other_competition", deserialize_with = "competition_lenient")]
    pub competition: Competition,
    #[serde(default)]
    pub opponent: String,
    #[serde(default = "home_venue", deserialize_with = "venue_lenient")]
    pub venue: Venue,
    #[serde(default)]
    pub location: String,
}

impl Fixture {
    /// Calendar day of the fixture, taken from `date` or the UTC timestamp.
    pub fn day(&self) -> Option<NaiveDate> {
        let raw = if self.date.is_empty() {
            self.datetime_utc.get(..10).unwrap_or("")
        } else {
            self.date.as_str()
        };
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Kick-off time, unless the feed only carried a date.
    pub fn kickoff(&self) -> Option<&str> {
        if self.time.is_empty() || self.time == "00:00" {
            None
        } else {
            Some(self.time.as_str())
        }
    }
}

fn midnight() -> String {
    "00:00".to_string()
}

fn other_competition() -> Competition {
    Competition::Other
}

fn home_venue() -> Venue {
    Venue::Home
}

fn competition_lenient<'de, D>(d: D) -> Result<Competition, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw
        .as_deref()
        .map(Competition::from_code_lenient)
        .unwrap_or(Competition::Other))
}

fn venue_lenient<'de, D>(d: D) -> Result<Venue, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(match raw.as_deref() {
        Some("A") => Venue::Away,
        _ => Venue::Home,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_wire_codes() {
        assert_eq!(serde_json::to_string(&Venue::Away).unwrap(), "\"A\"");
        assert_eq!(
            serde_json::to_string(&TicketAction::FwdMeNocredit).unwrap(),
            "\"fwd_me_nocredit\""
        );
        assert_eq!(
            serde_json::to_string(&Competition::LeagueCup).unwrap(),
            "\"LC\""
        );
        assert!(serde_json::from_str::<CreditCounts>("\"maybe\"").is_err());
    }

    #[test]
    fn fixture_folds_unknown_competition() {
        let f: Fixture = serde_json::from_str(
            r#"{"id":"x","date":"2025-09-01","competition":"EUROPA","opponent":"Ajax","venue":"A"}"#,
        )
        .unwrap();
        assert_eq!(f.competition, Competition::Other);
        assert_eq!(f.venue, Venue::Away);
        assert_eq!(f.time, "00:00");
        assert_eq!(f.kickoff(), None);
    }

    #[test]
    fn fixture_day_falls_back_to_utc_timestamp() {
        let f: Fixture =
            serde_json::from_str(r#"{"id":"y","datetime_utc":"2026-01-31T20:00:00Z"}"#).unwrap();
        assert_eq!(f.day(), NaiveDate::from_ymd_opt(2026, 1, 31));
    }

    #[test]
    fn match_amount_is_a_json_number() {
        let raw = r#"{
            "id":"m1","accountId":"a1","seasonId":"2025-26","opponent":"Chelsea",
            "venue":"H","competition":"PL","matchDate":"2025-09-13",
            "appliedStatus":"na","ticketAction":"credit","creditCounts":"yes",
            "notes":"","amountPaid":43.85,
            "createdAt":"2025-09-13T10:00:00.000Z","updatedAt":"2025-09-13T10:00:00.000Z"
        }"#;
        let m: MatchEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(m.amount_paid, Some(Decimal::new(4385, 2)));
        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["amountPaid"], serde_json::json!(43.85));
    }
}
