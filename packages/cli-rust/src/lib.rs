//! wsctl CLI - Keep ~/.ssh/config in sync with your remote workspaces
//!
//! This module contains the CLI implementation used by the `wsctl` binary.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;
use wsctl_core::{config, get_version, get_version_long, load_config};

/// Keep ~/.ssh/config in sync with your remote workspaces
#[derive(Parser)]
#[command(name = "wsctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep ~/.ssh/config in sync with your remote workspaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List workspaces of the active organization
    Ls(commands::LsArgs),
    /// Manage workspace entries in your SSH config
    SshConfig(commands::SshConfigArgs),
    /// Forward a workspace's notebook server to localhost
    Notebook(commands::NotebookArgs),
    /// Manage configuration
    Config(commands::ConfigArgs),
}

/// Default log level by `-v` count; `RUST_LOG` takes precedence
fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Load config (creates default if missing)
    let config_path = config::get_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            // Display rich error for invalid config
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {:#}", e);
            eprintln!();
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    if cli.verbose > 0 {
        eprintln!("{} wsctl {}", style("[info]").cyan(), get_version_long());
        eprintln!(
            "{} Config: {}",
            style("[info]").cyan(),
            config_path.display()
        );
    }

    match cli.command {
        Some(Commands::Ls(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_ls(&args, &config, cli.quiet))
        }
        Some(Commands::SshConfig(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_ssh_config(args, &config, cli.quiet))
        }
        Some(Commands::Notebook(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_notebook(&args, &config, cli.quiet))
        }
        Some(Commands::Config(cmd)) => commands::cmd_config(cmd, &config, cli.quiet),
        None => {
            // No command - show a welcome message and hint to use --help
            if !cli.quiet {
                println!("{} {}", style("wsctl").cyan().bold(), style(get_version()).dim());
                println!();
                println!("Run {} for available commands.", style("--help").green());
            }
            Ok(())
        }
    }
}
