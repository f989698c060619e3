// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod exporter;
pub mod fixtures;
pub mod importer;
pub mod matches;
pub mod reports;
pub mod seasons;
pub mod settings;

use crate::db::BlobStore;
use crate::errors::TrackerError;
use crate::queries::Scope;
use crate::store::Tracker;
use anyhow::Result;
use std::str::FromStr;

/// Parse an optional code-valued argument (venue, competition, ...).
pub(crate) fn parse_opt<T>(m: &clap::ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    m.get_one::<String>(name)
        .map(|raw| raw.parse::<T>().map_err(anyhow::Error::msg))
        .transpose()
}

/// Active account within `--season` when given, else the active season.
pub(crate) fn scope_from_args<B: BlobStore>(
    tracker: &Tracker<B>,
    m: &clap::ArgMatches,
) -> Result<Scope> {
    match m.get_one::<String>("season") {
        Some(id) => {
            if !tracker.data().seasons.iter().any(|s| &s.id == id) {
                return Err(TrackerError::UnknownSeason(id.clone()).into());
            }
            Ok(Scope::season(tracker.data(), id))
        }
        None => Ok(Scope::active(tracker.data())),
    }
}
