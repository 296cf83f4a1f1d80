//! Code Studio - AI pair-programming workbench for web projects
//!
//! This crate provides the core functionality for the `studio` CLI tool:
//! a chat-driven workspace where the model's streamed replies are parsed
//! for embedded file blocks and materialized into a live project.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (ProjectFile, ChatMessage, SavedProject)
//! - [`workspace`] - Live state: files, tabs, transcript, version ledger
//! - [`stream`] - Streamed-file extraction from model replies
//! - [`api`] - OpenAI-compatible streaming chat client
//! - [`storage`] - JSON record persistence under the home directory
//! - [`preview`] - Self-contained preview document assembly
//! - [`importer`] - Folder import from disk
//! - [`config`] - Home directory and API settings resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod importer;
pub mod model;
pub mod preview;
pub mod storage;
pub mod stream;
pub mod workspace;

pub use error::{Error, Result};
