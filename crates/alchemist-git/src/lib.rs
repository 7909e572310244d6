//! Git integration for gitalchemist.
//!
//! This crate provides the thin wrapper around `git` subprocess invocation
//! that the formula engine uses to replay version-control operations.

pub mod commands;

pub use commands::{GIT_EXE, GIT_EXE_WINDOWS, GitError, git_command, is_git_executable};
