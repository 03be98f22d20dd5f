//! Libris - Terminal-based library lending tracker
//!
//! This library provides the core of the Libris console: a small library's
//! catalog, its members, and the loans between them, kept in three flat files
//! and driven from an interactive menu.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and lending/session settings
//! - `error`: Custom error types
//! - `models`: Books, members, transactions and their ids
//! - `crypto`: Credential codec and zeroizing password buffers
//! - `storage`: Flat-file record tables with locked writes
//! - `audit`: Append-only audit trail of mutations
//! - `services`: Catalog, membership and lending rules
//! - `auth`: Password policy, login attempts and the session state machine
//! - `display`: Fixed-width table formatting
//! - `cli`: Interactive menus
//!
//! # Example
//!
//! ```rust,ignore
//! use libris::config::{LibrisPaths, Settings};
//! use libris::storage::Storage;
//!
//! let paths = LibrisPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LibrisError, LibrisResult};
