use clap::{Parser, Subcommand};
use colored::Colorize;
use opsbuddy_core::{CliErrorDisplay, LoggingConfig, OpsBuddyError, ResponseMode};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod render;

use commands::{
    handle_ask_command, handle_chat_command, handle_incidents_command, handle_probe_command,
    IncidentsCommand,
};
use config::{load_config, CliOverrides};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "opsbuddy")]
#[command(version = VERSION)]
#[command(about = "OpsBuddy - incident resolution chat assistant")]
#[command(long_about = r#"
OpsBuddy answers questions about IT incidents. Mention an incident ID
(INC0010001) to look it up, ask it to "find" or "search" for a keyword, or
ask for a status summary. Other questions go to the incident backend
(--mode backend) or to a language model once an API key is known.

Run 'opsbuddy' or 'opsbuddy chat' to start an interactive session.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Where unmatched questions go (local, backend)"
    )]
    mode: Option<ResponseMode>,

    #[arg(long, global = true, help = "Base URL of the incident backend")]
    backend_url: Option<String>,

    #[arg(long, global = true, help = "Disable colored output")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start an interactive chat session (default)")]
    Chat {
        #[arg(long, help = "Skip the simulated thinking and typing delays")]
        no_delay: bool,
    },

    #[command(about = "Ask a single question and print the reply")]
    Ask {
        #[arg(required = true, help = "Question text")]
        text: Vec<String>,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Browse the incident dataset")]
    Incidents {
        #[command(subcommand)]
        action: Option<IncidentsCommand>,
    },

    #[command(about = "Check whether the incident backend is reachable")]
    Probe {
        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            mode: self.mode,
            backend_url: self.backend_url.clone(),
            no_color: self.no_color,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, &config.logging);
    if !config.display.color {
        colored::control::set_override(false);
    }

    match run(cli, config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(err: &anyhow::Error) {
    match err.downcast_ref::<OpsBuddyError>() {
        Some(e) => eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(e)),
        None => eprintln!("{}: {:#}", "Error".red().bold(), err),
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    if logging.json_format {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    }
}

async fn run(cli: Cli, config: opsbuddy_core::OpsBuddyConfig) -> anyhow::Result<()> {
    match cli.command {
        None => handle_chat_command(&config, false).await,
        Some(Commands::Chat { no_delay }) => handle_chat_command(&config, no_delay).await,
        Some(Commands::Ask { text, format }) => {
            handle_ask_command(&config, &text.join(" "), &format).await
        }
        Some(Commands::Incidents { action }) => handle_incidents_command(action, &config),
        Some(Commands::Probe { format }) => handle_probe_command(&config, &format).await,
        Some(Commands::Version { detailed }) => cmd_version(detailed),
    }
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "OpsBuddy Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} {}", "Core:".bold(), opsbuddy_core::VERSION);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!();
        println!("  {}", "Response Modes:".bold());
        println!("    local    dataset, then language model, then offline analysis");
        println!("    backend  dataset, then backend, then language model, then offline analysis");
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("opsbuddy {}", VERSION);
    }

    Ok(())
}
