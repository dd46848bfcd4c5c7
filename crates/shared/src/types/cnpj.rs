//! CNPJ (Brazilian business registration number).
//!
//! Receipts are accepted only when the payee CNPJ printed on them matches the
//! configured one, so the type only guarantees shape (14 ASCII digits). Check
//! digits are not verified: the value is compared, never issued.

use serde::{Deserialize, Serialize};

/// A 14-digit CNPJ, stored without punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj([u8; 14]);

/// Error returned when a string is not a CNPJ.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CNPJ '{0}': expected 14 digits")]
pub struct InvalidCnpj(pub String);

impl Cnpj {
    /// Payee CNPJ of the Fazenda Rio Grande congregation.
    pub const OFFICIAL: Self = Self(*b"33206513000102");

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the conventional `XX.XXX.XXX/XXXX-XX` rendering.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = self.as_str();
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }

    /// Returns true if `digits` contains this CNPJ.
    ///
    /// `digits` is expected to be already stripped of everything but digits.
    #[must_use]
    pub fn is_contained_in(&self, digits: &str) -> bool {
        digits.contains(self.as_str())
    }
}

impl std::str::FromStr for Cnpj {
    type Err = InvalidCnpj;

    /// Parses a CNPJ, accepting the punctuated form as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .bytes()
            .filter(|b| !matches!(b, b'.' | b'/' | b'-' | b' '))
            .collect();

        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(InvalidCnpj(s.to_string()));
        }

        <[u8; 14]>::try_from(digits.as_slice())
            .map(Self)
            .map_err(|_| InvalidCnpj(s.to_string()))
    }
}

impl TryFrom<String> for Cnpj {
    type Error = InvalidCnpj;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cnpj> for String {
    fn from(value: Cnpj) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Cnpj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
