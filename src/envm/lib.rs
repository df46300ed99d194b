//! # Envm Architecture
//!
//! Envm is a **UI-agnostic environment variable manager**. The crate is a
//! library that happens to ship a CLI client, not the other way around:
//! the same core could sit behind a TUI or a daemon.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs, returns structured Result types       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure operation logic, no I/O assumptions                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence Layer (platform/, backup.rs)                   │
//! │  - EnvAdapter trait: POSIX files or the Windows registry    │
//! │  - BackupStore: pre-mutation snapshots + retention          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Transaction Protocol
//!
//! Every persistent mutation (user/system scope) runs snapshot → write →
//! re-read → compare, rolling the medium back from the snapshot when the
//! re-read does not match intent. A mutation "succeeds" only when it
//! verifies; the full story of a write lives in
//! [`model::MutationResult`], never in a panic or a silent drop.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular arguments, returns regular
//! `Result` types, never writes to stdout/stderr and never calls
//! `std::process::exit`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, the entry point for all operations
//! - [`commands`]: Operation logic for each subcommand
//! - [`platform`]: The `EnvAdapter` trait and its POSIX/Windows variants
//! - [`backup`]: Snapshot archive and retention policy
//! - [`expand`]: Single-pass `$VAR` / `%VAR%` reference expansion
//! - [`segments`]: PATH-like list helpers (split/join/unique/validate)
//! - [`model`]: Core data types (`Scope`, `MutationResult`)
//! - [`config`]: Configuration management
//! - [`init`]: Project-root discovery and context wiring
//! - [`error`]: Error types

pub mod api;
pub mod backup;
pub mod commands;
pub mod config;
pub mod error;
pub mod expand;
pub mod init;
pub mod model;
pub mod platform;
pub mod segments;
