//! depinspect - npm/yarn dependency inspection library
//!
//! This library reconciles what a JavaScript project declares with what its
//! package manager reports:
//! - Declared dependencies (package.json)
//! - Installed packages (`npm ls` / `yarn list`)
//! - Outdated packages (`npm outdated` / `yarn outdated`)

pub mod adapter;
pub mod cache;
pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod reconcile;
pub mod service;
