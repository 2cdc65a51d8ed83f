//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod init;
pub mod list;
pub mod package;
pub mod rules;
pub mod validate;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new skill skeleton
    Init(init::InitArgs),

    /// Validate a skill directory
    Validate(validate::ValidateArgs),

    /// Validate a skill and write its archive
    Package(package::PackageArgs),

    /// List the skills below a directory
    List(list::ListArgs),

    /// Show the built-in validation rules
    Rules(rules::RulesArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Package(args) => package::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Rules(args) => rules::run(ctx, args),
    }
}
