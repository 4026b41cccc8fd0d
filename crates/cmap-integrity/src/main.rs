//! `cmap-integrity` command-line tool
//!
//! `check` runs the reference check and can repair missing nodes in place;
//! `validate` prints the full schema report as text or JSON.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cmap_integrity::prelude::*;
use cmap_integrity::{logging, VERSION};
use std::path::{Path, PathBuf};

fn cli() -> Command {
    Command::new("cmap-integrity")
        .version(VERSION)
        .about("Concept map integrity checker and auto-repair")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit diagnostic logs as JSON"),
        )
        .subcommand(
            Command::new("check")
                .about("Check that every link endpoint is a defined node")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Concept map JSON file"),
                )
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Create placeholder nodes for missing references"),
                )
                .arg(
                    Arg::new("backup")
                        .long("backup")
                        .action(ArgAction::SetTrue)
                        .help("Back up the file before fixing"),
                )
                .arg(
                    Arg::new("check-orphans")
                        .long("check-orphans")
                        .action(ArgAction::SetTrue)
                        .help("List nodes that no link references"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate the full concept map schema")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Concept map JSON file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("log-json"));

    match run(&matches) {
        Ok(passed) => std::process::exit(if passed { 0 } else { 1 }),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => IntegrityConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => IntegrityConfig::default(),
    };

    match matches.subcommand() {
        Some(("check", args)) => {
            let path = required_path(args)?;
            Ok(check(
                path,
                args.get_flag("fix"),
                args.get_flag("backup"),
                args.get_flag("check-orphans"),
                &config,
            ))
        }
        Some(("validate", args)) => {
            let path = required_path(args)?;
            let report = Validator::with_config(config).validate_file(path);
            if args.get_flag("json") {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text(path));
            }
            Ok(report.valid)
        }
        _ => Ok(false),
    }
}

fn required_path(args: &ArgMatches) -> anyhow::Result<&Path> {
    args.get_one::<PathBuf>("path")
        .map(PathBuf::as_path)
        .context("missing <path> argument")
}

fn check(path: &Path, fix: bool, backup: bool, orphans: bool, config: &IntegrityConfig) -> bool {
    println!("Processing: {}", path.display());

    let mut passed = check_references_file(path);
    println!("Validation result: {}", verdict(passed));

    if !passed {
        let missing: Vec<String> = missing_nodes(path).into_iter().collect();
        println!("Missing nodes: {missing:?}");

        if fix {
            match RepairEngine::with_config(config.clone()).repair_file(path, backup) {
                Ok(outcome) => {
                    println!("Fix completed successfully!");
                    if let Some(backup) = &outcome.backup {
                        println!("Backup created: {}", backup.display());
                    }
                    for id in &outcome.created {
                        println!("  Created placeholder: {id}");
                    }
                    passed = check_references_file(path);
                    println!("Post-fix validation: {}", verdict(passed));
                }
                Err(err) => {
                    println!("Fix failed! {err}");
                }
            }
        }
    }

    if orphans {
        let orphaned: Vec<String> = orphaned_nodes(path).into_iter().collect();
        if orphaned.is_empty() {
            println!("No orphaned nodes");
        } else {
            println!("Orphaned nodes: {orphaned:?}");
        }
    }

    passed
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmap_test_utils::{document_with_missing, ids, write_document, write_raw};

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn check_flags_parse() {
        let m = cli()
            .try_get_matches_from(["cmap-integrity", "-vv", "check", "map.json", "--fix", "--backup"])
            .unwrap();
        assert_eq!(m.get_count("verbose"), 2);
        let (name, args) = m.subcommand().unwrap();
        assert_eq!(name, "check");
        assert!(args.get_flag("fix"));
        assert!(args.get_flag("backup"));
        assert!(!args.get_flag("check-orphans"));
        assert_eq!(required_path(args).unwrap(), Path::new("map.json"));
    }

    #[test]
    fn check_reports_failure_without_fix() {
        let file = write_document(&document_with_missing());
        let before = file.contents();

        assert!(!check(&file.path, false, false, true, &IntegrityConfig::default()));
        assert_eq!(file.contents(), before);
    }

    #[test]
    fn check_with_fix_repairs_and_passes() {
        let file = write_document(&document_with_missing());

        assert!(check(&file.path, true, true, true, &IntegrityConfig::default()));
        assert_eq!(ids(&file.json()), vec!["n1", "n2", "missing"]);
        assert_eq!(file.json()["nodes"][2]["status"], "placeholder");
        assert_eq!(file.backups().len(), 1);
        assert!(check(&file.path, false, false, false, &IntegrityConfig::default()));
    }

    #[test]
    fn check_on_unreadable_file_fails() {
        let file = write_raw("{ not json");
        assert!(!check(&file.path, true, false, true, &IntegrityConfig::default()));
        assert_eq!(file.contents(), "{ not json");
    }

    #[test]
    fn path_is_required() {
        assert!(cli().try_get_matches_from(["cmap-integrity", "validate"]).is_err());
    }
}
