mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod progress;
mod ui;

use anyhow::Result;
use colored::Colorize;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, OutputFormat, ProviderArgs};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub output: OutputFormat,
    pub config: Option<PathBuf>,
    pub provider: ProviderArgs,
}

impl Context {
    /// Whether results go out as JSON
    pub fn json(&self) -> bool {
        self.output == OutputFormat::Json
    }

    /// Whether spinners, bars and prompts may be shown
    pub fn interactive(&self) -> bool {
        !self.quiet && !self.json()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        quiet: cli.quiet,
        output: cli.output,
        config: cli.config,
        provider: cli.provider,
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&ctx, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Validate => commands::validate::run(ctx),
        Command::Plan(args) => commands::plan::run(ctx, args.target.as_deref()),
        Command::Apply(args) => {
            commands::apply::run(ctx, args.target.as_deref(), args.yes, args.push)
        }
        Command::Ensure(args) => commands::ensure::run(ctx, &args),
        Command::Push(args) => {
            commands::push::run(ctx, &args.folders, args.description.as_deref())
        }
        Command::List(args) => commands::list::run(ctx, &args.kind, &args.folder),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prismactl", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print the failure in the selected output format
fn report_failure(ctx: &Context, err: &anyhow::Error) {
    if ctx.json() {
        println!("{}", ui::failure(err));
        return;
    }

    ui::error(&err.to_string());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
    if let Some(advice) = advice(err) {
        eprintln!("  {}", advice.yellow());
    }
}

/// What the user can do about a remote failure, if anything is known
fn advice(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<declarative::Error>() {
            return match err {
                declarative::Error::Authentication(inner)
                | declarative::Error::Transport(inner) => Some(inner.category().advice()),
                declarative::Error::RemoteMutation { .. } => {
                    Some(sasekit::ErrorCategory::Remote.advice())
                }
                _ => None,
            };
        }
        cause
            .downcast_ref::<sasekit::Error>()
            .map(|inner| inner.category().advice())
    })
}
