//! Identity types for salvo.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Identifier of one game. Each game owns one shared database.
///
/// Restricted to `[A-Za-z0-9_-]{1,64}` because it becomes part of a file name.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Maximum identifier length.
    pub const MAX_LEN: usize = 64;

    /// Validate and wrap a user-supplied identifier.
    pub fn new(id: &str) -> Result<Self, ValidationError> {
        let valid = !id.is_empty()
            && id.len() <= Self::MAX_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(ValidationError::InvalidGameId(id.to_string()))
        }
    }

    /// Generate a short random identifier.
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Self(simple[..8].to_string())
    }

    /// Name of the shared database holding this game.
    pub fn database_name(&self) -> String {
        format!("game_{}", self.0)
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GameId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

/// Content digest of an entire ledger snapshot.
///
/// Opaque: two fingerprints are only ever compared for equality.
/// 32 bytes, displayed as URL-safe base64.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub(crate) fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Fingerprint from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() == 32 {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(bytes);
            Some(Self(arr))
        } else {
            None
        }
    }

    /// Get the raw bytes of this Fingerprint.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_id_accepts_simple_names() {
        let id = GameId::new("friday-night_01").unwrap();
        assert_eq!(id.as_str(), "friday-night_01");
        assert_eq!(id.database_name(), "game_friday-night_01");
    }

    #[test]
    fn game_id_rejects_path_characters() {
        let long = "x".repeat(65);
        for bad in ["", "../etc", "a b", "game/1", long.as_str()] {
            assert!(GameId::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn generated_game_ids_are_valid_and_distinct() {
        let a = GameId::generate();
        let b = GameId::generate();
        assert_eq!(a.as_str().len(), 8);
        assert!(GameId::new(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_base64_display() {
        let fp = Fingerprint::from_bytes(&[7u8; 32]).unwrap();
        assert_eq!(fp.to_string().len(), 43); // 32 bytes = 43 base64 chars (no padding)
    }

    #[test]
    fn fingerprint_from_invalid_length_fails() {
        assert!(Fingerprint::from_bytes(&[0u8; 16]).is_none());
        assert!(Fingerprint::from_bytes(&[0u8; 33]).is_none());
    }
}
