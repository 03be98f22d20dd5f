//! Credential codec for passwords at rest
//!
//! WARNING: this is obfuscation, not security. It only keeps plaintext
//! passwords from appearing verbatim in `members.txt`. Anyone who can read the
//! file can recover every password. Callers go through [`CredentialCodec`] so
//! a real password hash can replace [`CaesarCodec`] without touching them.

use super::secure_memory::SecureString;
use crate::error::{LibrisError, LibrisResult};

/// Lowest byte the Caesar codec accepts (space)
const RANGE_START: u8 = 0x20;
/// Highest byte the Caesar codec accepts (`~`)
const RANGE_END: u8 = 0x7E;
const RANGE_LEN: u8 = RANGE_END - RANGE_START + 1;

/// Default shift distance, compatible with existing record files
pub const DEFAULT_SHIFT: u8 = 3;

/// Reversible transform applied to passwords before they are stored
pub trait CredentialCodec {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// Transform a plaintext password into its stored form
    fn encode(&self, plaintext: &str) -> LibrisResult<String>;

    /// Recover the plaintext from its stored form
    fn decode(&self, stored: &str) -> LibrisResult<SecureString>;

    /// Check a candidate password against a stored value
    fn verify(&self, stored: &str, candidate: &str) -> bool {
        match self.decode(stored) {
            Ok(plain) => plain.as_str() == candidate,
            Err(_) => false,
        }
    }
}

/// Per-character shift over printable ASCII
///
/// Every character must lie in `' '..='~'`; the shift wraps inside that range,
/// so encode and decode are exact inverses and never produce a byte outside it.
/// Anything else is rejected rather than silently mangled.
#[derive(Debug, Clone, Copy)]
pub struct CaesarCodec {
    shift: u8,
}

impl CaesarCodec {
    pub fn new(shift: u8) -> Self {
        Self {
            shift: shift % RANGE_LEN,
        }
    }

    fn rotate(&self, input: &str, forward: bool) -> LibrisResult<String> {
        let offset = if forward {
            self.shift
        } else {
            RANGE_LEN - self.shift
        };

        input
            .chars()
            .map(|c| {
                if !(RANGE_START as char..=RANGE_END as char).contains(&c) {
                    return Err(LibrisError::Codec(format!(
                        "unsupported character {:?}; only printable ASCII is allowed",
                        c
                    )));
                }
                let index = (c as u8 - RANGE_START + offset) % RANGE_LEN;
                Ok((RANGE_START + index) as char)
            })
            .collect()
    }
}

impl Default for CaesarCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SHIFT)
    }
}

impl CredentialCodec for CaesarCodec {
    fn name(&self) -> &'static str {
        "caesar"
    }

    fn encode(&self, plaintext: &str) -> LibrisResult<String> {
        self.rotate(plaintext, true)
    }

    fn decode(&self, stored: &str) -> LibrisResult<SecureString> {
        self.rotate(stored, false).map(SecureString::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_legacy_shift() {
        let codec = CaesarCodec::default();
        assert_eq!(codec.encode("abc123").unwrap(), "def456");
        assert_eq!(
            codec.encode("AdminPassword123!").unwrap(),
            "DgplqSdvvzrug456$"
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        let codec = CaesarCodec::default();
        let stored = codec.encode("P@ss word~|}").unwrap();
        assert_eq!(codec.decode(&stored).unwrap().as_str(), "P@ss word~|}");
    }

    #[test]
    fn test_top_of_range_wraps() {
        let codec = CaesarCodec::default();
        assert_eq!(codec.encode("~").unwrap(), "\"");
        assert_eq!(codec.decode("\"").unwrap().as_str(), "~");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let codec = CaesarCodec::default();
        assert!(matches!(codec.encode("pässword"), Err(LibrisError::Codec(_))));
        assert!(codec.encode("tab\there").is_err());
        assert!(codec.decode("\u{7f}").is_err());
    }

    #[test]
    fn test_verify() {
        let codec = CaesarCodec::default();
        let stored = codec.encode("secret99").unwrap();
        assert!(codec.verify(&stored, "secret99"));
        assert!(!codec.verify(&stored, "secret98"));
        assert!(!codec.verify("\u{7f}", "anything"));
    }
}
