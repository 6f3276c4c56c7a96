mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Style};
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;

use commands::{
    check::{CheckArgs, handle_check},
    normalize::{NormalizeArgs, handle_normalize},
};
use context::CliContext;
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("FINDOM_CONFIG", "Path to a findom.toml configuration file"),
    ("RUST_LOG", "Log filter, e.g. findom=debug"),
];

#[derive(Parser)]
#[command(name = "findom")]
#[command(version)]
#[command(
    about = "Inspect and normalize ORM find options",
    long_about = r#"Inspect and normalize ORM find options:

• Check whether a JSON document is recognized as find options
• Rewrite shorthand filter operators ({"$like": "%x%"}) into canonical form

Commands:
  check      Report which find-options fields a document carries
  normalize  Print the normalized find options
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to a findom.toml configuration file
    #[arg(long, global = true, env = "FINDOM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a JSON document is recognized as find options
    Check(CheckArgs),

    /// Rewrite shorthand filter operators and print the normalized options
    Normalize(NormalizeArgs),
}

impl Cli {
    /// Parse arguments with findom's help styling and per-command examples.
    /// Help, version and usage errors exit the process inside clap.
    fn parse_with_help() -> Self {
        let matches = cli_command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn cli_command() -> Command {
    let mut command = Cli::command()
        .styles(help_styles())
        .after_long_help(environment_help());
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(examples_help(example.groups));
        }
    }
    command
}

fn heading_style() -> Style {
    AnsiColor::Cyan.on_default().bold()
}

// clap strips the escapes itself when color is off
fn help_styles() -> Styles {
    Styles::styled()
        .header(heading_style())
        .usage(heading_style())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
}

fn environment_help() -> String {
    let heading = heading_style();
    let mut help = format!("{heading}Environment Variables:{heading:#}\n");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(help, "  {key:<15}{description}");
    }
    help
}

fn examples_help(groups: &[ExampleGroup]) -> String {
    let heading = heading_style();
    let mut help = format!("{heading}Examples:{heading:#}\n");
    for group in groups {
        let _ = writeln!(help, "  {}:", group.title);
        for line in group.commands {
            let _ = writeln!(help, "    {} {line}", theme::ARROW);
        }
    }
    help
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_help();
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli, &output) {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    match cli.command {
        Commands::Check(args) => handle_check(args, output)?,
        Commands::Normalize(args) => {
            let ctx = CliContext::load(cli.config.as_deref())?;
            if let Some(path) = &ctx.config_path {
                output.verbose(&format!("using config {}", path.display()));
            }
            handle_normalize(args, &ctx.config, output)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli_command().debug_assert();
    }

    #[test]
    fn every_subcommand_has_examples() {
        let command = cli_command();
        for example in command_examples() {
            assert!(command.find_subcommand(example.name).is_some(), "{}", example.name);
        }
    }

    #[test]
    fn environment_help_lists_variables() {
        let help = environment_help();
        assert!(help.contains("FINDOM_CONFIG"));
        assert!(help.contains("RUST_LOG"));
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let matches = cli_command()
            .try_get_matches_from(["findom", "normalize", "q.json", "-o", "json", "--verbose"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Normalize(_)));
    }
}
