//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, HTTP
//! downloads, archive extraction, package install, and filesystem access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod archive;
pub mod command_runner;
pub mod download;
pub mod fs;
pub mod npm;
pub mod profile;
