// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod matches;
pub mod models;
pub mod queries;
pub mod seasons;
pub mod store;
pub mod utils;
