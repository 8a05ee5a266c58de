//! Command-line definition

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::{ConfigError, Overrides, StrategyKind};

/// Build the `storyscaffold` command
#[must_use]
pub fn command() -> Command {
    Command::new("storyscaffold")
        .version(crate::VERSION)
        .about("Generate end-to-end test files from component story files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: ./storyscaffold.toml when present)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("transform")
                .about("Append generated tests to story files")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Story files to transform"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for <stem>.test.js files"),
                )
                .args(selection_args())
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .value_parser(["playwright", "smoke"])
                        .help("Test body strategy"),
                )
                .arg(
                    Arg::new("clear-body")
                        .long("clear-body")
                        .action(ArgAction::SetTrue)
                        .help("Emit only the generated tests"),
                )
                .arg(
                    Arg::new("insert-test-if-empty")
                        .long("insert-test-if-empty")
                        .action(ArgAction::SetTrue)
                        .help("Emit a skipped placeholder when no story qualifies"),
                )
                .arg(
                    Arg::new("page-setup")
                        .long("page-setup")
                        .action(ArgAction::SetTrue)
                        .help("Reset the page before each test"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the parsed story module and story classification as JSON")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Story file to inspect"),
                )
                .args(selection_args()),
        )
}

fn selection_args() -> [Arg; 5] {
    [
        Arg::new("include-tags")
            .long("include-tags")
            .env("STORYBOOK_INCLUDE_TAGS")
            .help("Comma-separated tags a story needs one of"),
        Arg::new("exclude-tags")
            .long("exclude-tags")
            .env("STORYBOOK_EXCLUDE_TAGS")
            .help("Comma-separated tags that drop a story"),
        Arg::new("skip-tags")
            .long("skip-tags")
            .env("STORYBOOK_SKIP_TAGS")
            .help("Comma-separated tags that skip a story's test"),
        Arg::new("title-prefix")
            .long("title-prefix")
            .help("Prefix for every title"),
        Arg::new("stories-dir")
            .long("stories-dir")
            .value_parser(value_parser!(PathBuf))
            .help("Root that auto titles are relative to"),
    ]
}

/// Collect overrides from a subcommand's matches
///
/// # Errors
/// Fails on an unknown strategy name
pub fn overrides(matches: &ArgMatches) -> Result<Overrides, ConfigError> {
    let text = |id: &str| matches.try_get_one::<String>(id).ok().flatten().cloned();
    let flag = |id: &str| matches.try_get_one::<bool>(id).ok().flatten().copied().unwrap_or(false);

    Ok(Overrides {
        include_tags: text("include-tags"),
        exclude_tags: text("exclude-tags"),
        skip_tags: text("skip-tags"),
        title_prefix: text("title-prefix"),
        stories_dir: matches.try_get_one::<PathBuf>("stories-dir").ok().flatten().cloned(),
        strategy: text("strategy").map(|s| s.parse::<StrategyKind>()).transpose()?,
        clear_body: flag("clear-body"),
        insert_test_if_empty: flag("insert-test-if-empty"),
        page_setup: flag("page-setup"),
    })
}
