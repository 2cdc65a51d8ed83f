//! Shared test utilities for skillpack.

pub mod fixtures;

pub use fixtures::SkillFixture;
