// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use matchcredits::fixtures::FixtureSource;
use matchcredits::store::Tracker;
use matchcredits::utils::SystemClock;
use matchcredits::{cli, commands, config, db};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = config::load_app_configuration()?;
    let backend = db::SqliteBlobStore::open(&cfg.database)?;
    let mut tracker = Tracker::load(backend, Box::new(SystemClock))?;
    let mut fixtures = FixtureSource::new(cfg.embedded_fixtures()?);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Store ready at {}", cfg.database.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&mut tracker, sub)?,
        Some(("season", sub)) => commands::seasons::handle(&mut tracker, sub)?,
        Some(("match", sub)) => commands::matches::handle(&mut tracker, &mut fixtures, sub)?,
        Some(("report", sub)) => commands::reports::handle(&tracker, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut tracker, sub)?,
        Some(("fixtures", sub)) => commands::fixtures::handle(&tracker, &cfg, &mut fixtures, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&tracker, &cfg, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut tracker, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
