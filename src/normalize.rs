//! Token normalization.
//!
//! Every ingested line and every query term passes through the same rules:
//! trim, lowercase with the locale-independent Unicode mapping, then drop
//! every character outside `a`-`z`. Applying one function on both paths is
//! what lets a query with any casing or punctuation find the token that the
//! same raw spelling produced during ingestion.

use std::fmt;

/// A normalized, non-empty token over the working alphabet.
///
/// The only way to build one is through [`Token::parse`], so holding a
/// `Token` means the string is non-empty and contains only `a`-`z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Normalizes `raw` into a token, or rejects it when nothing survives.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_term(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a raw line into an insertable token.
///
/// Returns `None` (a reject) when the line is empty after normalization.
pub fn normalize(raw: &str) -> Option<Token> {
    Token::parse(raw)
}

/// Normalizes a query term.
///
/// Unlike [`normalize`] this never rejects: a term with no surviving
/// characters becomes the empty string, which the trie answers with its
/// empty-term rules.
pub fn normalize_term(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .collect()
}
