// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn auto_cup_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("lc")
            .long("lc")
            .action(ArgAction::SetTrue)
            .help("League Cup home credits are automatic"),
    )
    .arg(
        Arg::new("fac")
            .long("fac")
            .action(ArgAction::SetTrue)
            .help("FA Cup home credits are automatic"),
    )
    .arg(
        Arg::new("ucl")
            .long("ucl")
            .action(ArgAction::SetTrue)
            .help("Champions League home credits are automatic"),
    )
}

fn season_arg() -> Arg {
    Arg::new("season")
        .long("season")
        .help("Season id (defaults to the active season)")
}

fn match_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("opponent").long("opponent").help("Opponent name"))
    .arg(Arg::new("date").long("date").help("Match date YYYY-MM-DD"))
    .arg(
        Arg::new("venue")
            .long("venue")
            .value_parser(["H", "A", "h", "a"])
            .help("H or A"),
    )
    .arg(
        Arg::new("competition")
            .long("comp")
            .help("PL, UCL, FAC, LC or OTHER"),
    )
    .arg(
        Arg::new("action")
            .long("action")
            .help("credit, season_return, fwd_me_credit, fwd_me_nocredit, hosp_credit, hosp_nocredit, scan_nocredit"),
    )
    .arg(
        Arg::new("credit")
            .long("credit")
            .value_parser(["yes", "no", "unsure"])
            .help("Whether the match counts as a credit (defaults from --action)"),
    )
    .arg(Arg::new("notes").long("notes"))
    .arg(
        Arg::new("amount")
            .long("amount")
            .allow_hyphen_values(true)
            .help("Amount paid, e.g. £43.85"),
    )
}

pub fn build_cli() -> Command {
    Command::new("matchcredits")
        .about("Track match attendance and ticket credits per season and account")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the local store if missing"))
        .subcommand(
            Command::new("account")
                .about("Manage tracked ticket holders")
                .subcommand(auto_cup_flags(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").default_value(""))
                        .arg(
                            Arg::new("use")
                                .long("use")
                                .action(ArgAction::SetTrue)
                                .help("Make the new account active"),
                        ),
                ))
                .subcommand(auto_cup_flags(
                    Command::new("setup")
                        .about("First-run setup: choose a season and create accounts")
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .value_parser(value_parser!(u64).range(1..=10))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("name")
                                .long("name")
                                .action(ArgAction::Append)
                                .help("Account name, in order; blank names get defaults"),
                        )
                        .arg(season_arg()),
                ))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("use").arg(Arg::new("account").required(true))),
        )
        .subcommand(
            Command::new("season")
                .about("Manage seasons")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("add").arg(
                        Arg::new("label")
                            .long("label")
                            .required(true)
                            .help("Season label, e.g. 2026/27"),
                    ),
                )
                .subcommand(Command::new("use").arg(Arg::new("season").required(true))),
        )
        .subcommand(
            Command::new("match")
                .about("Log, edit and list matches")
                .subcommand(match_fields(
                    Command::new("add").arg(
                        Arg::new("fixture")
                            .long("fixture")
                            .help("Pre-fill from a fixture id"),
                    ),
                ))
                .subcommand(match_fields(
                    Command::new("edit").arg(Arg::new("id").long("id").required(true)),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm deletion"),
                        ),
                )
                .subcommand(
                    Command::new("status")
                        .about("Record the ticket application outcome")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .value_parser(["na", "applied", "successful", "unsuccessful"]),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(season_arg())
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("venue")
                                .long("venue")
                                .value_parser(["H", "A", "h", "a"]),
                        )
                        .arg(Arg::new("competition").long("comp"))
                        .arg(
                            Arg::new("credit")
                                .long("credit")
                                .value_parser(["yes", "no", "unsure"]),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .value_parser(["match-date", "date-added"])
                                .default_value("match-date"),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Season totals and breakdowns for the active account")
                .subcommand(json_flags(Command::new("summary").arg(season_arg())))
                .subcommand(json_flags(Command::new("breakdown").arg(season_arg())))
                .subcommand(json_flags(
                    Command::new("recent").arg(season_arg()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("6"),
                    ),
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Credit-scheme interpretation toggles")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("rule")
                                .long("rule")
                                .required(true)
                                .value_parser(["forwarded", "returned", "hospitality"]),
                        )
                        .arg(
                            Arg::new("value")
                                .long("value")
                                .required(true)
                                .value_parser(value_parser!(bool)),
                        ),
                ),
        )
        .subcommand(
            Command::new("fixtures")
                .about("Browse fixtures and import calendar feeds")
                .subcommand(
                    Command::new("import")
                        .arg(Arg::new("path").long("path").help("Path to an .ics file"))
                        .arg(
                            Arg::new("url")
                                .long("url")
                                .conflicts_with("path")
                                .help("URL of an .ics feed"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("show")
                                .long("show")
                                .value_parser(["upcoming", "past", "all"])
                                .default_value("upcoming"),
                        )
                        .arg(Arg::new("competition").long("comp")),
                ))
                .subcommand(Command::new("clear").about("Forget imported fixtures")),
        )
        .subcommand(
            Command::new("export")
                .about("Export the store")
                .subcommand(
                    Command::new("json").arg(
                        Arg::new("out")
                            .long("out")
                            .help("Output file or directory (default: current dir)"),
                    ),
                )
                .subcommand(
                    Command::new("csv").arg(
                        Arg::new("out")
                            .long("out")
                            .help("Output file or directory (default: current dir)"),
                    ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Restore the store from a JSON backup")
                .subcommand(Command::new("json").arg(Arg::new("path").long("path").required(true))),
        )
}
