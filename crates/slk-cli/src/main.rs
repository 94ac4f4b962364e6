//! CLI interface for slk - Slack search from the terminal.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use env_logger::fmt::WriteStyle;
use log::{LevelFilter, debug};
use slk_core::paths::write_default_config;
use slk_core::search::{RawOptions, SearchKind, run_search};
use slk_core::{
    AppConfig, AppPaths, OutputFormat, Printer, SlackClient, generate_example_config,
    generate_schema,
};

const APP_NAME: &str = "slk";
const REPO_URL: &str = env!("CARGO_PKG_REPOSITORY");

const MESSAGES_LONG_ABOUT: &str = "Search messages across channels.

Requires a user token (xoxp-*) with search:read scope.

Search modifiers:
  in:#channel    Search in specific channel
  in:@user       Search in DMs with user
  from:@user     Messages from specific user
  before:date    Messages before date (YYYY-MM-DD)
  after:date     Messages after date (YYYY-MM-DD)
  has:link       Messages containing links
  has:reaction   Messages with reactions";

const MESSAGES_EXAMPLES: &str = "Examples:
  slk search messages \"quarterly report\"
  slk search messages \"in:#engineering bug fix\"
  slk search messages \"from:@alice project update\"
  slk search messages \"after:2025-01-01 deployment\"";

const FILES_LONG_ABOUT: &str = "Search files across channels.

Requires a user token (xoxp-*) with search:read scope.

Search modifiers:
  in:#channel    Search in specific channel
  from:@user     Files from specific user
  type:filetype  Filter by file type (pdf, doc, image, etc.)
  before:date    Files before date (YYYY-MM-DD)
  after:date     Files after date (YYYY-MM-DD)";

const FILES_EXAMPLES: &str = "Examples:
  slk search files \"budget spreadsheet\"
  slk search files \"in:#finance quarterly report\"
  slk search files \"from:@alice type:pdf\"
  slk search files \"type:image logo\"";

fn main() -> anyhow::Result<()> {
    try_main()
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let write_missing_config = !matches!(cli.command, Command::Init(_));
    let ctx = RuntimeContext::new(cli.common.clone(), write_missing_config)?;
    ctx.init_logging()?;
    debug!("resolved paths: {}", ctx.paths);

    match cli.command {
        Command::Search { subcommand } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(handle_search(&ctx, subcommand))
        }
        Command::Init(cmd) => handle_init(&ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "slk",
    author,
    version,
    about = "Search Slack messages and files from the terminal",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

/// Common CLI options shared across all subcommands.
#[derive(Debug, Clone, Args)]
pub struct CommonOpts {
    /// Override the config file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Output format: text, json, or table.
    #[arg(short = 'o', long = "output", value_name = "FORMAT", global = true)]
    pub output: Option<OutputFormat>,
    /// Reduce output to only errors.
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    pub quiet: bool,
    /// Increase logging verbosity (stackable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
    /// Enable trace logging.
    #[arg(long, global = true)]
    pub trace: bool,
    /// Output machine-readable JSON (same as `-o json`).
    #[arg(long, global = true)]
    pub json: bool,
    /// Disable ANSI colors in output.
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    pub no_color: bool,
    /// Control color output.
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    pub color: ColorOption,
    /// Do not change anything on disk.
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,
    /// Assume "yes" for interactive prompts.
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
    /// Detect terminal capabilities automatically.
    Auto,
    /// Always emit ANSI color codes.
    Always,
    /// Never emit ANSI color codes.
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search messages and files (requires a user token).
    Search {
        #[command(subcommand)]
        subcommand: SearchSubcommand,
    },
    /// Create the default config file.
    Init(InitCommand),
    /// Inspect and manage configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
enum SearchSubcommand {
    /// Search messages.
    #[command(long_about = MESSAGES_LONG_ABOUT, after_long_help = MESSAGES_EXAMPLES)]
    Messages(SearchArgs),
    /// Search files.
    #[command(long_about = FILES_LONG_ABOUT, after_long_help = FILES_EXAMPLES)]
    Files(SearchArgs),
}

impl SearchSubcommand {
    const fn parts(&self) -> (SearchKind, &SearchArgs) {
        match self {
            Self::Messages(args) => (SearchKind::Messages, args),
            Self::Files(args) => (SearchKind::Files, args),
        }
    }
}

#[derive(Debug, Clone, Args)]
struct SearchArgs {
    /// Search query, including any modifiers.
    query: String,
    /// Results per page (max 100) [default: 20].
    #[arg(short, long, allow_negative_numbers = true)]
    count: Option<i64>,
    /// Page number (max 100) [default: 1].
    #[arg(short, long, allow_negative_numbers = true)]
    page: Option<i64>,
    /// Sort by: score or timestamp [default: score].
    #[arg(short, long)]
    sort: Option<String>,
    /// Sort direction: asc or desc [default: desc].
    #[arg(long = "sort-dir")]
    sort_dir: Option<String>,
    /// Highlight matching terms in results.
    #[arg(long)]
    highlight: bool,
}

#[derive(Debug, Clone, Copy, Args)]
struct InitCommand {
    /// Recreate configuration even if it already exists.
    #[arg(long = "force")]
    force: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration.
    Show,
    /// Print the resolved config file path.
    Path,
    /// Print all resolved paths.
    Paths,
    /// Print the JSON schema.
    Schema,
    /// Print a commented example configuration.
    Example,
    /// Regenerate the default configuration file.
    Reset,
}

// ─── Runtime ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
}

impl RuntimeContext {
    /// `write_missing_config` is false for `init`, which owns file creation.
    fn new(common: CommonOpts, write_missing_config: bool) -> Result<Self> {
        let paths = AppPaths::discover(common.config.as_deref())?;
        let config = if write_missing_config {
            AppConfig::load(&paths, common.dry_run)?
        } else {
            AppConfig::load_from_path(&paths.config_file)?
        };
        Ok(Self {
            common,
            paths,
            config,
        })
    }

    fn init_logging(&self) -> Result<()> {
        if self.common.quiet {
            log::set_max_level(LevelFilter::Off);
            return Ok(());
        }
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        builder.filter_level(self.effective_log_level());

        let force_color = matches!(self.common.color, ColorOption::Always)
            || env::var_os("FORCE_COLOR").is_some();
        let disable_color = self.color_disabled() || (!force_color && !io::stderr().is_terminal());

        if let Some(file) = &self.config.logging.file {
            let target = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .with_context(|| format!("opening log file {file}"))?;
            builder.target(env_logger::Target::Pipe(Box::new(target)));
            builder.write_style(WriteStyle::Never);
        } else if disable_color {
            builder.write_style(WriteStyle::Never);
        } else if force_color {
            builder.write_style(WriteStyle::Always);
        } else {
            builder.write_style(WriteStyle::Auto);
        }

        builder.try_init().or_else(|err| {
            if self.common.verbose > 0 {
                eprintln!("logger already initialized: {err}");
            }
            Ok(())
        })
    }

    const fn effective_log_level(&self) -> LevelFilter {
        if self.common.trace {
            LevelFilter::Trace
        } else if self.common.debug {
            LevelFilter::Debug
        } else {
            match self.common.verbose {
                0 => self.config.logging.level.to_level_filter(),
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    fn color_disabled(&self) -> bool {
        self.common.no_color
            || matches!(self.common.color, ColorOption::Never)
            || env::var_os("NO_COLOR").is_some()
    }

    /// Whether stdout output may carry ANSI styling.
    fn stdout_color(&self) -> bool {
        if self.color_disabled() {
            return false;
        }
        matches!(self.common.color, ColorOption::Always)
            || env::var_os("FORCE_COLOR").is_some()
            || io::stdout().is_terminal()
    }

    fn output_format(&self) -> OutputFormat {
        if self.common.json {
            OutputFormat::Json
        } else {
            self.common.output.unwrap_or(self.config.output.format)
        }
    }

    fn printer(&self) -> Printer<io::Stdout> {
        Printer::stdout(self.output_format(), self.stdout_color())
    }
}

// ─── Handlers ────────────────────────────────────────────────────────

async fn handle_search(ctx: &RuntimeContext, cmd: SearchSubcommand) -> Result<()> {
    let (kind, args) = cmd.parts();
    let defaults = &ctx.config.search;
    let sort = args
        .sort
        .clone()
        .unwrap_or_else(|| defaults.sort.to_string());
    let sort_dir = args
        .sort_dir
        .clone()
        .unwrap_or_else(|| defaults.sort_dir.to_string());
    let raw = RawOptions {
        count: args.count.unwrap_or(defaults.count),
        page: args.page.unwrap_or(defaults.page),
        sort: &sort,
        sort_dir: &sort_dir,
        highlight: args.highlight || defaults.highlight,
    };
    debug!("search {kind}: {raw:?}");

    let mut out = ctx.printer();
    run_search(
        kind,
        &args.query,
        raw,
        None::<SlackClient>,
        || SlackClient::from_config(&ctx.config),
        &mut out,
    )
    .await?;
    Ok(())
}

fn handle_init(ctx: &RuntimeContext, cmd: InitCommand) -> Result<()> {
    if ctx.paths.config_file.exists() && !(cmd.force || ctx.common.assume_yes) {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            ctx.paths.config_file.display()
        ));
    }
    if ctx.common.dry_run {
        log::info!(
            "dry-run: would write default config to {}",
            ctx.paths.config_file.display()
        );
        return Ok(());
    }
    write_default_config(&ctx.paths.config_file)?;
    println!("wrote {}", ctx.paths.config_file.display());
    Ok(())
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let mut shown = ctx.config.clone();
            if shown.slack.token.is_some() {
                shown.slack.token = Some("<redacted>".to_string());
            }
            if ctx.output_format() == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&shown).context("serializing config to JSON")?
                );
            } else {
                print!(
                    "{}",
                    toml::to_string_pretty(&shown).context("serializing config to TOML")?
                );
            }
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.paths.config_file.display());
            Ok(())
        }
        ConfigCommand::Paths => {
            let log_file = ctx.config.logging.file.as_deref();
            if ctx.output_format() == OutputFormat::Json {
                let paths = serde_json::json!({
                    "config": ctx.paths.config_file,
                    "log": log_file,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&paths).context("serializing paths to JSON")?
                );
            } else {
                println!("config: {}", ctx.paths.config_file.display());
                println!("log:    {}", log_file.unwrap_or("(stderr)"));
            }
            Ok(())
        }
        ConfigCommand::Schema => {
            println!("{}", generate_schema(APP_NAME, REPO_URL)?);
            Ok(())
        }
        ConfigCommand::Example => {
            print!("{}", generate_example_config(APP_NAME, REPO_URL)?);
            Ok(())
        }
        ConfigCommand::Reset => {
            if ctx.common.dry_run {
                log::info!(
                    "dry-run: would reset config at {}",
                    ctx.paths.config_file.display()
                );
                return Ok(());
            }
            write_default_config(&ctx.paths.config_file)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}
