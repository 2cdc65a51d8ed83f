//! Skill packaging for distribution

pub mod archive;
pub mod package;

pub use archive::{ArchiveSummary, unpack};
pub use package::{DEFAULT_EXTENSION, PackageOutcome, PackagePhase, PackageSettings, Packager};
