//! Garment size labels.
//!
//! The fixed XS..XXL vocabulary covers most fashion products; anything else
//! (numeric shoe sizes, one-size) is carried through as a custom label.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A size label from the standard vocabulary, or a custom label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Custom(String),
}

/// Error parsing a size label.
#[derive(Debug, Error)]
pub enum SizeParseError {
    /// Size labels must be non-empty.
    #[error("empty size label")]
    Empty,
}

impl Size {
    /// The label as displayed and sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
            Self::Custom(label) => label,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SizeParseError::Empty);
        }
        Ok(match trimmed.to_ascii_uppercase().as_str() {
            "XS" => Self::Xs,
            "S" => Self::S,
            "M" => Self::M,
            "L" => Self::L,
            "XL" => Self::Xl,
            "XXL" => Self::Xxl,
            _ => Self::Custom(trimmed.to_owned()),
        })
    }
}

impl TryFrom<String> for Size {
    type Error = SizeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.as_str().to_owned()
    }
}
