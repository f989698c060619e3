// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Season;
use crate::utils::{season_id_for_date, season_id_for_start_year, season_label_from_id};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const DEFAULT_BACK: u32 = 3;
pub const DEFAULT_FORWARD: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSeasons {
    pub seasons: Vec<Season>,
    pub active_season_id: String,
}

/// Rolling window of seasons around the one containing `today`, oldest first.
pub fn generate_seasons(
    today: NaiveDate,
    back: u32,
    forward: u32,
    created_at: DateTime<Utc>,
) -> GeneratedSeasons {
    let anchor = if today.month() >= 7 {
        today.year()
    } else {
        today.year() - 1
    };
    let first = anchor - back as i32;
    let last = anchor + forward as i32;
    let seasons = (first..=last)
        .map(|start| {
            let id = season_id_for_start_year(start);
            Season {
                label: season_label_from_id(&id),
                id,
                created_at,
            }
        })
        .collect();
    GeneratedSeasons {
        seasons,
        active_season_id: season_id_for_date(today),
    }
}
