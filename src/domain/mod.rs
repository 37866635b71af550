//! Core domain models for depinspect
//!
//! This module contains the fundamental types used throughout the application:
//! - Package-manager dialects (npm, yarn)
//! - Declared dependency specifications and their classification
//! - Normalized installed/outdated listings produced from tool output
//! - The reconciled per-package status record

mod dependency;
mod dialect;
mod listing;

pub use dependency::{
    DeclaredDependencies, DependencySpec, DependencyStatus, DependencyType, SimpleDependency,
};
pub use dialect::Dialect;
pub use listing::{InstalledEntry, InstalledMap, MalformedEntry, OutdatedEntry, OutdatedMap};
