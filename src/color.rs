//! Stable colour derivation for role identification

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// RGB colour shown for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Derive a colour from an identifier. Same id, same colour, on every platform.
    pub fn from_id(id: &str) -> Self {
        let digest = Sha256::digest(id.as_bytes());
        Color { r: digest[0], g: digest[1], b: digest[2] }
    }

    /// Hex form, e.g. `#1a2b3c`
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
