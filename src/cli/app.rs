//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use floortriage::config::Config;
use floortriage::output::OutputMode;

/// floortriage - Offline task triage for factory floors
#[derive(Parser, Debug)]
#[command(
    name = "floortriage",
    version,
    about = "Offline task triage for factory floors",
    long_about = "Suggest category, priority and due date for factory task reports.\n\n\
                  Safety rules always override the suggestion model.\n\
                  Every decision is written to an append-only audit log."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: ./triage.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write triage.toml, rules.toml and model.toml to the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Suggest category, priority and due date for task reports
    Classify {
        /// Task description
        #[arg(required_unless_present = "input")]
        description: Option<String>,

        /// Equipment the task concerns
        #[arg(short, long, required_unless_present = "input")]
        equipment: Option<String>,

        /// When the task was reported (RFC 3339, e.g. 2025-12-29T10:15:00+01:00)
        #[arg(short = 't', long = "shift-time", required_unless_present = "input")]
        shift_time: Option<String>,

        /// Role of the reporter
        #[arg(short, long, default_value = "operator")]
        role: String,

        /// Structured tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Task id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Read records from a JSON file (one object or an array; "-" for stdin)
        #[arg(short, long, conflicts_with_all = ["description", "equipment", "shift_time", "id"])]
        input: Option<PathBuf>,
    },

    /// Review the audit log
    Audit {
        #[command(subcommand)]
        action: AuditAction,
    },

    /// Inspect safety rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Show version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum AuditAction {
    /// List audit entries
    List {
        /// Only entries for this task
        #[arg(long)]
        task: Option<String>,

        /// Only safety overrides
        #[arg(long)]
        overrides: bool,
    },

    /// Show one audit entry in full
    Show {
        /// Sequence number
        sequence: u64,
    },

    /// Totals by source, priority and rule
    Summary,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List the rules in force
    List,

    /// Validate a rule table file (default: the configured one)
    Check {
        /// Rule table to validate
        path: Option<PathBuf>,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Init { force }) => commands::init(force, output_mode),
        Some(Command::Classify {
            description,
            equipment,
            shift_time,
            role,
            tags,
            id,
            input,
        }) => {
            let config = Config::discover(cli.config.as_deref())?;
            let source = match input {
                Some(path) => commands::RecordSource::File(path),
                None => commands::RecordSource::Args {
                    description: description.unwrap_or_default(),
                    equipment,
                    shift_time,
                    role,
                    tags,
                    id,
                },
            };
            commands::classify(source, &config, output_mode)
        },
        Some(Command::Audit { action }) => {
            let config = Config::discover(cli.config.as_deref())?;
            commands::audit(action, &config, output_mode)
        },
        Some(Command::Rules { action }) => {
            let config = Config::discover(cli.config.as_deref())?;
            commands::rules(action, &config, output_mode)
        },
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": floortriage::VERSION
                    })
                );
            } else {
                println!("floortriage v{}", floortriage::VERSION);
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": floortriage::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("floortriage v{}", floortriage::VERSION);
                println!("\nRun 'floortriage --help' for usage");
                println!("Run 'floortriage init' to get started");
            }
            Ok(())
        },
    }
}
