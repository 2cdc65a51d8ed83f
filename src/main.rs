//! skillpack - Scaffold, validate and package agent skills.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skillpack::app::AppContext;
use skillpack::cli::Cli;
use skillpack::cli::output::{emit_robot, robot_error};
use skillpack::{Result, SkillpackError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&cli, &e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    skillpack::cli::commands::run(&ctx, &cli.command)
}

fn report_error(cli: &Cli, e: &SkillpackError) {
    // Failed reports were already printed by the command.
    if let SkillpackError::ValidationFailed(report) = e {
        if !cli.robot {
            eprintln!("Error: {e}");
            eprintln!("{}", report.summary());
        }
        return;
    }

    if cli.robot {
        // Robot mode: JSON error output to stdout
        if emit_robot(&robot_error(e.code(), e.to_string())).is_err() {
            eprintln!("Error: {e}");
        }
        return;
    }

    eprintln!("Error: {e}");
    if let SkillpackError::InvalidName {
        suggestion: Some(suggestion),
        ..
    } = e
    {
        eprintln!("Hint: try '{suggestion}'");
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skillpack=warn",
        1 => "info,skillpack=info",
        2 => "debug,skillpack=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
