// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The tracker context: owns the store data, its persistence backend and
//! the clock. Every mutation persists the whole blob before returning.

use crate::db::BlobStore;
use crate::errors::{Result, TrackerError};
use crate::models::{
    Account, AutoCup, Fixture, Season, SettingRule, Settings, StoreData, STORE_VERSION,
};
use crate::seasons::{generate_seasons, DEFAULT_BACK, DEFAULT_FORWARD};
use crate::utils::{iso_date, Clock};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const STORAGE_KEY: &str = "thlfc_credit_tracker_v1";
pub const FIXTURES_KEY: &str = "thlfc_importedFixtures";

/// One row of the onboarding flow.
#[derive(Debug, Clone, Default)]
pub struct AccountSetup {
    pub name: String,
    pub auto_cup: AutoCup,
}

pub struct Tracker<B: BlobStore> {
    backend: B,
    clock: Box<dyn Clock>,
    data: StoreData,
}

pub fn new_uid() -> String {
    Uuid::new_v4().to_string()
}

pub fn default_data(today: NaiveDate, now: DateTime<Utc>) -> StoreData {
    let generated = generate_seasons(today, DEFAULT_BACK, DEFAULT_FORWARD, now);
    StoreData {
        version: STORE_VERSION,
        created_at: now,
        settings: Settings::default(),
        seasons: generated.seasons,
        active_season_id: generated.active_season_id,
        accounts: Vec::new(),
        active_account_id: None,
        matches: Vec::new(),
    }
}

/// Positional placeholder used when an account is created without a name.
pub fn default_account_name(position: usize) -> String {
    if position <= 1 {
        "Me".to_string()
    } else {
        format!("Account {}", position)
    }
}

fn season_id_from_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace('/', "-")
        .to_lowercase()
}

impl<B: BlobStore> Tracker<B> {
    /// Read the persisted store, replacing anything missing or unreadable
    /// with a fresh default store. Only backend I/O failures are returned.
    pub fn load(backend: B, clock: Box<dyn Clock>) -> Result<Tracker<B>> {
        let parsed = match backend.get(STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str::<StoreData>(&raw) {
                Ok(data) => Some(data),
                Err(err) => {
                    warn!(error = %err, "persisted store unreadable, starting fresh");
                    None
                }
            },
            None => None,
        };
        let fresh = parsed.is_none();
        let data = parsed.unwrap_or_else(|| default_data(clock.today(), clock.now()));
        let tracker = Tracker {
            backend,
            clock,
            data,
        };
        if fresh {
            info!(
                active_season = %tracker.data.active_season_id,
                "initialised default store"
            );
            tracker.save()?;
        }
        Ok(tracker)
    }

    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.data)?;
        self.backend.put(STORAGE_KEY, &raw)?;
        debug!(bytes = raw.len(), matches = self.data.matches.len(), "store saved");
        Ok(())
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut StoreData {
        &mut self.data
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn active_season_id(&self) -> &str {
        &self.data.active_season_id
    }

    pub fn active_account_id(&self) -> Option<&str> {
        self.data.active_account_id.as_deref()
    }

    pub fn active_account(&self) -> Option<&Account> {
        let id = self.active_account_id()?;
        self.data.accounts.iter().find(|a| a.id == id)
    }

    pub fn set_active_season(&mut self, id: &str) -> Result<()> {
        self.data.active_season_id = id.to_string();
        self.save()
    }

    pub fn set_active_account(&mut self, id: &str) -> Result<()> {
        self.data.active_account_id = Some(id.to_string());
        self.save()
    }

    /// Like `set_active_season`, but the id has to exist.
    pub fn select_season(&mut self, id: &str) -> Result<()> {
        if !self.data.seasons.iter().any(|s| s.id == id) {
            return Err(TrackerError::UnknownSeason(id.to_string()));
        }
        self.set_active_season(id)
    }

    /// Select an account by id or by (case-insensitive) name.
    pub fn select_account(&mut self, id_or_name: &str) -> Result<()> {
        let id = self
            .find_account(id_or_name)
            .map(|a| a.id.clone())
            .ok_or_else(|| TrackerError::UnknownAccount(id_or_name.to_string()))?;
        self.set_active_account(&id)
    }

    pub fn find_account(&self, id_or_name: &str) -> Option<&Account> {
        let needle = id_or_name.trim();
        self.data
            .accounts
            .iter()
            .find(|a| a.id == needle)
            .or_else(|| {
                self.data
                    .accounts
                    .iter()
                    .find(|a| a.name.eq_ignore_ascii_case(needle))
            })
    }

    pub fn season_label(&self, id: &str) -> String {
        self.data
            .seasons
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn create_account(&mut self, name: &str, auto_cup: AutoCup) -> Result<Account> {
        let position = self.data.accounts.len() + 1;
        let account = self.push_account(name, auto_cup, position);
        self.save()?;
        Ok(account)
    }

    fn push_account(&mut self, name: &str, auto_cup: AutoCup, position: usize) -> Account {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            default_account_name(position)
        } else {
            trimmed.to_string()
        };
        let account = Account {
            id: new_uid(),
            name,
            auto_cup,
            created_at: self.clock.now(),
        };
        self.data.accounts.push(account.clone());
        if self.data.active_account_id.is_none() {
            self.data.active_account_id = Some(account.id.clone());
        }
        info!(account = %account.name, "account created");
        account
    }

    /// Onboarding: pick the season, then create one account per entry with
    /// placeholder names by position in the batch. When a single account is
    /// added to an existing set it becomes the active one.
    pub fn setup_accounts(
        &mut self,
        entries: &[AccountSetup],
        season_id: Option<&str>,
        adding_single: bool,
    ) -> Result<Vec<Account>> {
        if let Some(season) = season_id {
            self.data.active_season_id = season.to_string();
        }
        let mut created = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            created.push(self.push_account(&entry.name, entry.auto_cup, i + 1));
        }
        if adding_single {
            if let Some(last) = created.last() {
                self.data.active_account_id = Some(last.id.clone());
            }
        }
        self.save()?;
        Ok(created)
    }

    /// Add a season from a free-text label; the new season becomes active.
    pub fn add_season(&mut self, label: &str) -> Result<Season> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TrackerError::EmptySeasonLabel);
        }
        let id = season_id_from_label(label);
        if self.data.seasons.iter().any(|s| s.id == id) {
            return Err(TrackerError::DuplicateSeason(id));
        }
        let season = Season {
            id: id.clone(),
            label: label.to_string(),
            created_at: self.clock.now(),
        };
        self.data.seasons.push(season.clone());
        self.data.active_season_id = id;
        self.save()?;
        Ok(season)
    }

    pub fn set_setting(&mut self, rule: SettingRule, value: bool) -> Result<()> {
        let s = &mut self.data.settings;
        match rule {
            SettingRule::ForwardedNoCredit => s.rule_forwarded_no_credit = value,
            SettingRule::ReturnedNoCredit => s.rule_returned_no_credit = value,
            SettingRule::HospitalityNoCredit => s.rule_hospitality_no_credit = value,
        }
        self.save()
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replace the whole store with a backup. Nothing changes on failure.
    pub fn import_json(&mut self, raw: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| TrackerError::InvalidImport(format!("Invalid JSON backup: {}", e)))?;
        for field in ["seasons", "matches"] {
            if value.get(field).is_none_or(|v| v.is_null()) {
                return Err(TrackerError::InvalidImport(format!(
                    "Invalid JSON backup: missing '{}'",
                    field
                )));
            }
        }
        let data: StoreData = serde_json::from_value(value)
            .map_err(|e| TrackerError::InvalidImport(format!("Invalid JSON backup: {}", e)))?;
        info!(
            seasons = data.seasons.len(),
            matches = data.matches.len(),
            "store replaced from backup"
        );
        self.data = data;
        self.save()
    }

    /// `<namespace>-credits-<seasonId>-<YYYY-MM-DD>.<ext>`
    pub fn export_file_name(&self, namespace: &str, ext: &str) -> String {
        format!(
            "{}-credits-{}-{}.{}",
            namespace,
            self.data.active_season_id,
            iso_date(self.clock.now().date_naive()),
            ext
        )
    }

    /// Fixtures imported from calendar feeds. Unreadable data reads as empty.
    pub fn imported_fixtures(&self) -> Result<Vec<Fixture>> {
        let Some(raw) = self.backend.get(FIXTURES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Fixture>>(&raw) {
            Ok(list) => Ok(list),
            Err(err) => {
                warn!(error = %err, "imported fixtures unreadable, ignoring");
                Ok(Vec::new())
            }
        }
    }

    pub fn set_imported_fixtures(&self, fixtures: &[Fixture]) -> Result<()> {
        let raw = serde_json::to_string(fixtures)?;
        self.backend.put(FIXTURES_KEY, &raw)
    }

    pub fn clear_imported_fixtures(&self) -> Result<()> {
        self.set_imported_fixtures(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBlobStore;
    use crate::utils::FixedClock;

    fn clock() -> Box<dyn Clock> {
        Box::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 10, 4).unwrap()))
    }

    #[test]
    fn missing_blob_is_replaced_and_persisted() {
        let backend = MemoryBlobStore::new();
        let t = Tracker::load(&backend, clock()).unwrap();
        assert_eq!(t.active_season_id(), "2025-26");
        assert_eq!(t.data().seasons.len(), 10);
        assert!(t.active_account_id().is_none());
        assert!(backend.get(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_blob_self_heals() {
        for raw in ["{not json", r#"{"matches":[]}"#, "null"] {
            let backend = MemoryBlobStore::with_entry(STORAGE_KEY, raw);
            let t = Tracker::load(&backend, clock()).unwrap();
            assert_eq!(t.data().seasons.len(), 10);
            let stored = backend.get(STORAGE_KEY).unwrap().unwrap();
            assert!(stored.contains("\"seasons\""));
        }
    }

    #[test]
    fn blob_without_matches_keeps_its_accounts() {
        let raw = r#"{"version":2,"seasons":[{"id":"2025-26","label":"25/26","createdAt":"2025-07-01T00:00:00Z"}],
            "activeSeasonId":"2025-26",
            "accounts":[{"id":"acc-1","name":"Sam","createdAt":"2025-07-01T00:00:00Z"}],
            "activeAccountId":"acc-1"}"#;
        let backend = MemoryBlobStore::with_entry(STORAGE_KEY, raw);
        let t = Tracker::load(&backend, clock()).unwrap();
        assert_eq!(t.data().seasons.len(), 1);
        assert_eq!(t.data().accounts[0].name, "Sam");
        assert!(t.data().matches.is_empty());
        assert_eq!(backend.get(STORAGE_KEY).unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn account_names_default_by_position() {
        let mut t = Tracker::load(MemoryBlobStore::new(), clock()).unwrap();
        let me = t.create_account("   ", AutoCup::default()).unwrap();
        let second = t.create_account("", AutoCup::default()).unwrap();
        let named = t.create_account("  Sam ", AutoCup::default()).unwrap();
        assert_eq!(me.name, "Me");
        assert_eq!(second.name, "Account 2");
        assert_eq!(named.name, "Sam");
        assert_eq!(t.active_account_id(), Some(me.id.as_str()));
    }

    #[test]
    fn add_season_rejects_duplicates_without_mutation() {
        let mut t = Tracker::load(MemoryBlobStore::new(), clock()).unwrap();
        let s = t.add_season("2040/41").unwrap();
        assert_eq!(s.id, "2040-41");
        assert_eq!(s.label, "2040/41");
        assert_eq!(t.active_season_id(), "2040-41");
        assert_eq!(t.add_season(" Cup Run  2026 ").unwrap().id, "cup-run-2026");
        let before = t.data().seasons.len();
        t.set_active_season("2025-26").unwrap();
        let err = t.add_season("2025/26").unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateSeason(id) if id == "2025-26"));
        assert_eq!(t.data().seasons.len(), before);
        assert_eq!(t.active_season_id(), "2025-26");
    }

    #[test]
    fn setup_adding_single_switches_to_new_account() {
        let mut t = Tracker::load(MemoryBlobStore::new(), clock()).unwrap();
        let first = t
            .setup_accounts(
                &[AccountSetup::default(), AccountSetup::default()],
                Some("2024-25"),
                false,
            )
            .unwrap();
        assert_eq!(first[0].name, "Me");
        assert_eq!(first[1].name, "Account 2");
        assert_eq!(t.active_account_id(), Some(first[0].id.as_str()));
        assert_eq!(t.active_season_id(), "2024-25");

        let added = t
            .setup_accounts(
                &[AccountSetup {
                    name: "Jo".into(),
                    auto_cup: AutoCup {
                        lc: true,
                        ..AutoCup::default()
                    },
                }],
                None,
                true,
            )
            .unwrap();
        assert_eq!(t.active_account_id(), Some(added[0].id.as_str()));
        assert!(t.active_account().unwrap().auto_cup.lc);
    }

    #[test]
    fn select_account_accepts_names_and_rejects_unknown() {
        let mut t = Tracker::load(MemoryBlobStore::new(), clock()).unwrap();
        t.create_account("Me", AutoCup::default()).unwrap();
        let other = t.create_account("Dad", AutoCup::default()).unwrap();
        t.select_account("dad").unwrap();
        assert_eq!(t.active_account_id(), Some(other.id.as_str()));
        assert!(matches!(
            t.select_account("nobody"),
            Err(TrackerError::UnknownAccount(_))
        ));
        assert!(matches!(
            t.select_season("1999-00"),
            Err(TrackerError::UnknownSeason(_))
        ));
    }

    #[test]
    fn settings_toggle_and_persist() {
        let backend = MemoryBlobStore::new();
        let mut t = Tracker::load(&backend, clock()).unwrap();
        t.set_setting(SettingRule::ReturnedNoCredit, false).unwrap();
        let reloaded = Tracker::load(&backend, clock()).unwrap();
        assert!(!reloaded.data().settings.rule_returned_no_credit);
        assert!(reloaded.data().settings.rule_forwarded_no_credit);
    }

    #[test]
    fn export_file_name_uses_namespace_and_date() {
        let t = Tracker::load(MemoryBlobStore::new(), clock()).unwrap();
        assert_eq!(
            t.export_file_name("thlfc", "csv"),
            "thlfc-credits-2025-26-2025-10-04.csv"
        );
    }

    #[test]
    fn bad_fixture_side_table_reads_empty() {
        let backend = MemoryBlobStore::with_entry(FIXTURES_KEY, "oops");
        let t = Tracker::load(&backend, clock()).unwrap();
        assert!(t.imported_fixtures().unwrap().is_empty());
    }
}
