//! Credential handling for Libris
//!
//! Provides the pluggable credential codec used for passwords at rest and a
//! zero-on-drop string for passwords held in memory. Nothing here is a
//! security boundary.

pub mod codec;
pub mod secure_memory;

pub use codec::{CaesarCodec, CredentialCodec, DEFAULT_SHIFT};
pub use secure_memory::SecureString;
