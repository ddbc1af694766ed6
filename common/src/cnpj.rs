//! # CNPJ Identifier
//!
//! A CNPJ is the 14-digit Brazilian taxpayer number. Users type it with
//! punctuation (`36.498.670/0001-27`), the registry expects bare digits.

use std::fmt;

/// Number of digits in a well-formed CNPJ.
pub const CNPJ_LENGTH: usize = 14;

/// A normalized identifier: decimal digits only.
///
/// Normalization never fails. The length check is a separate gate so callers
/// can tell "nothing was sent" apart from "something malformed was sent".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cnpj(String);

impl Cnpj {
    /// Strips every non-digit character from `raw`.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    pub fn is_valid_length(&self) -> bool {
        self.0.len() == CNPJ_LENGTH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
