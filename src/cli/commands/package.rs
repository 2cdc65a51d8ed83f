//! skillpack package - Validate a skill and write its archive

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::bundler::Packager;
use crate::cli::output::{HumanLayout, emit_human, emit_report, emit_robot, robot_ok};
use crate::error::{Result, SkillpackError};
use crate::utils::format::format_size;

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Skill directory
    pub path: PathBuf,

    /// Directory to write the archive to (default: current directory)
    pub output_dir: Option<PathBuf>,

    /// Archive extension, overriding the config
    #[arg(long)]
    pub extension: Option<String>,
}

pub fn run(ctx: &AppContext, args: &PackageArgs) -> Result<()> {
    let mut settings = ctx.config.package.clone();
    if let Some(extension) = &args.extension {
        settings.extension.clone_from(extension);
    }
    settings.check()?;

    let root = ctx.resolve(&args.path);
    let output_dir = args
        .output_dir
        .as_deref()
        .map_or_else(|| ctx.cwd.clone(), |dir| ctx.resolve(dir));

    let packager = Packager::new(ctx.config.validation.clone(), settings);
    let outcome = match packager.package(&root, &output_dir) {
        Ok(outcome) => outcome,
        Err(SkillpackError::ValidationFailed(report)) => {
            emit_report(ctx.robot_mode, &report)?;
            return Err(SkillpackError::ValidationFailed(report));
        }
        Err(err) => return Err(err),
    };

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&outcome));
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!("Packaged '{}'", outcome.skill));
    layout.kv("Archive", &outcome.archive_path.display().to_string());
    layout.kv("Files", &outcome.file_count.to_string());
    layout.kv("Size", &format_size(outcome.bytes));
    layout.kv("SHA-256", &outcome.sha256);
    if outcome.warnings > 0 {
        layout.kv("Warnings", &format!("{} (run 'skillpack validate' for details)", outcome.warnings));
    }
    emit_human(layout);
    Ok(())
}
