//! skillpack init - Create a new skill skeleton

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::scaffold::Scaffolder;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Skill name: lowercase letters, digits and single hyphens
    pub name: String,

    /// Directory to create the skill in
    #[arg(long, short, default_value = ".")]
    pub path: PathBuf,
}

#[derive(Serialize)]
struct InitReport {
    name: String,
    path: PathBuf,
    files: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let destination = ctx.resolve(&args.path);
    let skill = Scaffolder::new().create(&args.name, &destination)?;
    let files: Vec<String> = skill.files().map(|e| e.rel_path.clone()).collect();

    if ctx.robot_mode {
        return emit_robot(&robot_ok(InitReport {
            name: skill.name,
            path: skill.root,
            files,
        }));
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!("Created skill '{}'", skill.name));
    layout.kv("Path", &skill.root.display().to_string());
    layout.blank();
    layout.section("Files");
    for file in &files {
        layout.bullet(file);
    }
    layout.blank();
    layout.section("Next steps");
    layout.bullet("Replace the placeholder description in SKILL.md (say what it does and when to use it)");
    layout.bullet("Replace or delete the example files under scripts/, references/ and assets/");
    layout.bullet(&format!("Run 'skillpack validate {}'", skill.root.display()));
    emit_human(layout);
    Ok(())
}
