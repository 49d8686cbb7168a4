//! trait-compose - CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use trait_compose::demos::{self, Transcript};
use trait_compose::util::config::{self, LoadedConfig};
use trait_compose::util::logger::{self, LogLevel};
use trait_compose::{run_demo, NAME, VERSION};

/// Walk through the trait composition engine
#[derive(Parser, Debug)]
#[command(name = "trait-compose")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (DEBUG logging)
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (RON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one scenario, or all of them
    Demo {
        /// Scenario name (see `list`)
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// List built-in scenarios
    List,

    /// Print the effective configuration
    Config,

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let LoadedConfig { mut config, source } =
        config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.verbose {
        config.log.level = LogLevel::Debug;
    }
    logger::init_from_config(&config);

    if args.verbose {
        eprintln!("{} version: {}", NAME, VERSION);
        eprintln!("Host: {}", std::env::consts::OS);
    }

    let color = config.log.ansi;
    match args.command {
        Commands::Demo { name: Some(name) } => {
            let transcript = run_demo(&name)?;
            print_transcript(&name, &transcript, color);
        }
        Commands::Demo { name: None } => {
            for scenario in demos::SCENARIOS {
                let transcript = run_demo(scenario.name)?;
                print_transcript(scenario.name, &transcript, color);
                println!();
            }
        }
        Commands::List => {
            for scenario in demos::SCENARIOS {
                if color {
                    println!("{:<14} {}", scenario.name.bold(), scenario.summary);
                } else {
                    println!("{:<14} {}", scenario.name, scenario.summary);
                }
            }
        }
        Commands::Config => {
            match &source {
                Some(path) => println!("// loaded from {}", path.display()),
                None => println!("// defaults"),
            }
            println!("{}", config.to_ron()?);
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

fn print_transcript(
    name: &str,
    transcript: &Transcript,
    color: bool,
) {
    if color {
        println!("== {} ==", name.bold());
    } else {
        println!("== {} ==", name);
    }
    for (expression, outcome) in transcript {
        let failed = outcome.starts_with("error:");
        if !color {
            println!("  {} => {}", expression, outcome);
        } else if failed {
            println!("  {} => {}", expression, outcome.red());
        } else {
            println!("  {} => {}", expression, outcome.green());
        }
    }
}
