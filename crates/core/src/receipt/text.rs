//! Receipt text normalization.

/// The two views of extracted text the matcher works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Line breaks replaced by spaces; used for amount extraction.
    pub words: String,
    /// ASCII digits only; used for CNPJ matching.
    pub digits: String,
}

impl NormalizedText {
    /// Normalizes raw extracted text.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        Self {
            words: raw.replace('\n', " "),
            digits: raw.chars().filter(char::is_ascii_digit).collect(),
        }
    }
}
