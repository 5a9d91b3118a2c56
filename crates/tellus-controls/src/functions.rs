//! Functions that a control document may name with a `"name()"` marker.
//!
//! Only names on this list are ever invoked. Anything else is treated as an
//! unknown function by the binder.

use rand::Rng;

use crate::color::random_hex_color;

/// The allow-list of functions callable from a control document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowedFunction {
    /// Returns a random `#rrggbb` string.
    RandomHexadecimalColor,
}

impl AllowedFunction {
    pub const ALL: [Self; 1] = [Self::RandomHexadecimalColor];

    /// The name used in documents, without the trailing `()`.
    pub fn name(self) -> &'static str {
        match self {
            Self::RandomHexadecimalColor => "randomHexadecimalColor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn invoke<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            Self::RandomHexadecimalColor => random_hex_color(rng),
        }
    }
}

/// The function name inside a `"name()"` marker, or `None` for plain strings.
pub fn parse_marker(s: &str) -> Option<&str> {
    s.strip_suffix("()").filter(|name| !name.is_empty())
}
