//! Stackforge - manifest-driven installer for AI application stacks
//!
//! Stackforge installs third-party AI application stacks (base software,
//! Python dependencies, model assets, extensions, optional post-install
//! steps) by executing declarative JSON manifests. The crate is organized
//! around a small set of components:
//!
//! - [`manifest`]: manifest model, loading, validation, and directory watching
//! - [`engine`]: the staged installation pipeline with weighted progress
//! - [`logging`]: composable log sinks (buffering, file-backed, fan-out)
//! - [`paths`]: install-root path resolution with escape protection
//! - [`runner`]: the step-runner seam that performs clones, pip installs,
//!   asset transfers, and post-install commands
//! - [`cli`] / [`commands`]: the command line surface

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod runner;
