//! skillpack list - List the agents and skills below a directory

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::readme::{self, ReadmeSync};
use crate::catalog::{Catalog, CatalogScope, DEFAULT_AGENTS_DIR};
use crate::cli::output::{HumanLayout, emit_human, emit_json, emit_robot, robot_ok};
use crate::error::Result;

/// Output format for the skill list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Name and "Use when" clause columns
    #[default]
    Table,
    /// One name per line
    Compact,
    /// Plain-text tree
    Tree,
    /// JSON for programmatic consumption
    Json,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory containing skill directories
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = ListFormat::Table)]
    pub format: ListFormat,

    /// Show descriptions in compact and tree formats
    #[arg(long, short = 'd')]
    pub descriptions: bool,

    /// Directory of agent definitions (default: <PATH>/agents)
    #[arg(long)]
    pub agents_dir: Option<PathBuf>,

    /// Show only agents
    #[arg(long, conflicts_with = "skills_only")]
    pub agents_only: bool,

    /// Show only skills
    #[arg(long)]
    pub skills_only: bool,

    /// Rewrite the catalog tree between the AGENTS-SKILLS-TREE markers of FILE
    #[arg(long, value_name = "FILE")]
    pub update_readme: Option<PathBuf>,

    /// With --update-readme, fail if FILE is stale instead of rewriting it
    #[arg(long, requires = "update_readme")]
    pub check: bool,
}

impl ListArgs {
    fn scope(&self) -> CatalogScope {
        if self.agents_only {
            CatalogScope::AgentsOnly
        } else if self.skills_only {
            CatalogScope::SkillsOnly
        } else {
            CatalogScope::All
        }
    }
}

#[derive(Serialize)]
struct ReadmeReport {
    readme: PathBuf,
    status: ReadmeSync,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let root = ctx.resolve(&args.path);
    let agents_dir = args
        .agents_dir
        .as_ref()
        .map_or_else(|| root.join(DEFAULT_AGENTS_DIR), |dir| ctx.resolve(dir));
    let catalog = Catalog::discover_scoped(&root, &agents_dir, args.scope())?;

    if let Some(file) = &args.update_readme {
        return update_readme(ctx, &catalog, &ctx.resolve(file), args.check);
    }

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&catalog));
    }

    match args.format {
        ListFormat::Json => return emit_json(&catalog),
        ListFormat::Table => emit_human(table(&catalog)),
        ListFormat::Compact => emit_human(compact(&catalog, args.descriptions)),
        ListFormat::Tree => println!("{}", catalog.render_tree(args.descriptions)),
    }

    println!();
    println!(
        "{}",
        style(format!(
            "Total: {} agent(s), {} skill(s)",
            catalog.agents.len(),
            catalog.skills.len()
        ))
        .dim()
    );
    Ok(())
}

/// The README always carries the tree with descriptions.
fn update_readme(ctx: &AppContext, catalog: &Catalog, file: &Path, check: bool) -> Result<()> {
    let tree = catalog.render_tree(true);
    let status = if check {
        readme::check(file, &tree)?;
        ReadmeSync::Unchanged
    } else {
        readme::sync(file, &tree)?
    };

    if ctx.robot_mode {
        return emit_robot(&robot_ok(ReadmeReport {
            readme: file.to_path_buf(),
            status,
        }));
    }
    match status {
        ReadmeSync::Updated => println!("{} {}", style("Updated").green(), file.display()),
        ReadmeSync::Unchanged => println!("{} is up to date", file.display()),
    }
    Ok(())
}

fn name_width(names: impl Iterator<Item = usize>, min: usize) -> usize {
    names.max().unwrap_or(0).max(min)
}

fn table(catalog: &Catalog) -> HumanLayout {
    let mut layout = HumanLayout::new();

    if !catalog.agents.is_empty() {
        let width = name_width(catalog.agents.iter().map(|a| a.name.chars().count()), 15);
        layout.section("Agents");
        layout.push_line(format!(
            "{} {} {}",
            style(format!("{:width$}", "Name")).bold(),
            style(format!("{:12}", "Mode")).bold(),
            style("Description").bold()
        ));
        for agent in &catalog.agents {
            layout.push_line(format!(
                "{} {} {}",
                style(format!("{:width$}", agent.name)).green(),
                style(format!("{:12}", agent.mode.as_deref().unwrap_or("-"))).yellow(),
                agent.use_when()
            ));
        }
    }

    if catalog.skills.is_empty() {
        return layout;
    }
    let width = name_width(catalog.skills.iter().map(|s| s.name.chars().count()), 20);
    layout.section("Skills");
    layout.push_line(format!(
        "{} {}",
        style(format!("{:width$}", "Name")).bold(),
        style("Description").bold()
    ));
    for skill in &catalog.skills {
        layout.push_line(format!(
            "{} {}",
            style(format!("{:width$}", skill.name)).green(),
            skill.use_when()
        ));
    }
    layout
}

fn compact(catalog: &Catalog, descriptions: bool) -> HumanLayout {
    let mut layout = HumanLayout::new();
    if !catalog.agents.is_empty() {
        layout.section("Agents");
        for agent in &catalog.agents {
            match &agent.mode {
                Some(mode) => layout.push_line(format!(
                    "  {} {}",
                    style(&agent.name).green(),
                    style(format!("({mode})")).dim()
                )),
                None => layout.push_line(format!("  {}", style(&agent.name).green())),
            };
            if descriptions {
                layout.push_line(format!("      {}", style(agent.use_when()).dim()));
            }
        }
    }
    if catalog.skills.is_empty() {
        return layout;
    }
    layout.section("Skills");
    for skill in &catalog.skills {
        layout.push_line(format!("  {}", style(&skill.name).green()));
        if descriptions {
            layout.push_line(format!("      {}", style(skill.use_when()).dim()));
        }
    }
    layout
}
