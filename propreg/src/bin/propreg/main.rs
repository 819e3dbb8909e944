mod commands;
mod context;
mod examples;
mod output;
mod theme;
mod utils;

use anyhow::Result;
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{
    create::{handle_create, CreateArgs},
    init::{handle_init, InitArgs},
    list::{handle_list, ListArgs},
    show::{handle_show, ShowArgs},
    suggest::{handle_suggest, SuggestArgs},
    update::{handle_update, UpdateArgs},
    validate::{handle_validate, ValidateArgs},
    Session,
};
use examples::command_examples;
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT_HELP: &str = "\
Environment Variables:
  PROPREG_API_URL  Backend base URL (overrides .propreg/config.toml)
  RUST_LOG         Log filter for diagnostic output, e.g. propreg=debug

Run 'propreg <command> --help' for examples.";

#[derive(Parser)]
#[command(name = "propreg")]
#[command(version)]
#[command(
    about = "Register, search and edit property records",
    long_about = r#"Property registration client that provides:

• Field validation with the same rules as the registration form
• Search with autocomplete over the full record list
• Paged record listing
• Create and update against the registry backend

Commands:
  init      Write a project config
  list      Search and page through records
  suggest   Autocomplete candidates for a search
  show      Show one record
  create    Register a new property
  update    Edit an existing record
  validate  Check a record file offline
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
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

    /// Backend base URL
    #[arg(long, env = "PROPREG_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// The clap command with help colours, the environment table and per-command examples.
fn cli_command() -> Command {
    let mut command = Cli::command()
        .styles(theme::help_styles())
        .after_long_help(ENVIRONMENT_HELP);
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(examples::render(example.groups));
        }
    }
    command
}

#[derive(Subcommand)]
enum Commands {
    /// Write .propreg/config.toml in the current directory
    Init(InitArgs),

    /// Search and page through records
    List(ListArgs),

    /// Show autocomplete candidates for a search
    Suggest(SuggestArgs),

    /// Show one record
    Show(ShowArgs),

    /// Register a new property
    Create(CreateArgs),

    /// Edit an existing record
    Update(UpdateArgs),

    /// Validate a record file without contacting the backend
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = cli_command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    let session = Session {
        output: OutputManager::new(global_options),
        api_url: cli.api_url,
    };

    match cli.command {
        Commands::Init(args) => handle_init(args, &session).await?,
        Commands::List(args) => handle_list(args, &session).await?,
        Commands::Suggest(args) => handle_suggest(args, &session).await?,
        Commands::Show(args) => handle_show(args, &session).await?,
        Commands::Create(args) => handle_create(args, &session).await?,
        Commands::Update(args) => handle_update(args, &session).await?,
        Commands::Validate(args) => handle_validate(args, &session).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli_command().debug_assert();
    }

    #[test]
    fn every_subcommand_carries_examples() {
        let mut command = cli_command();
        for name in ["init", "list", "suggest", "show", "create", "update", "validate"] {
            let subcommand = command.find_subcommand_mut(name).expect("subcommand exists");
            let help = subcommand.render_long_help().to_string();
            assert!(help.contains("Examples:"), "{name} help lacks examples");
        }
        assert!(command.render_long_help().to_string().contains("PROPREG_API_URL"));
    }

    #[test]
    fn api_url_flag_is_global() {
        let cli = Cli::try_parse_from(["propreg", "list", "--api-url", "http://registry.test", "--page", "1"]);
        let cli = cli.expect("parses");
        assert_eq!(cli.api_url.as_deref(), Some("http://registry.test"));
        assert!(matches!(cli.command, Commands::List(_)));
    }
}
