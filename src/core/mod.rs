//! Core skill types and logic

pub mod frontmatter;
pub mod identifier;
pub mod markdown;
pub mod skill;

pub use frontmatter::{Frontmatter, FrontmatterError};
pub use identifier::{Identifier, IdentifierProblem, check_identifier, normalize_identifier};
pub use skill::{
    ENTRYPOINT, Entry, EntryKind, Entrypoint, FrontmatterState, Resource, ResourceKind,
    SkillPackage,
};
