//! skillpack - scaffold, validate and package agent skills.
//!
//! A skill is a directory with a `SKILL.md` entrypoint (YAML frontmatter plus
//! a markdown body) and optional `scripts/`, `references/` and `assets/`
//! directories. This crate creates skeletons, checks them against a battery
//! of rules and seals valid ones into deterministic archives.

pub mod app;
pub mod bundler;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lint;
pub mod scaffold;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use error::{Result, SkillpackError};
