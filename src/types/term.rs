//! Term references: a root or a lemma, by normalized value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LensError;
use super::token::Token;
use crate::engine::normalize::normalize_arabic;

/// Which lexical layer a term lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Root,
    Lemma,
}

impl TermKind {
    /// The raw value of this layer on a token, if non-empty.
    pub fn value_of<'t>(&self, token: &'t Token) -> Option<&'t str> {
        match self {
            Self::Root => token.root_str(),
            Self::Lemma => token.lemma_str(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Lemma => "lemma",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermKind {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(Self::Root),
            "lemma" => Ok(Self::Lemma),
            other => Err(LensError::config(format!(
                "unknown term kind '{other}' (expected root or lemma)"
            ))),
        }
    }
}

/// A lexical term. `value` is always stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermRef {
    pub kind: TermKind,
    pub value: String,
}

impl TermRef {
    /// Build a term, normalizing the value.
    pub fn new(kind: TermKind, value: &str) -> Self {
        Self {
            kind,
            value: normalize_arabic(value),
        }
    }

    pub fn root(value: &str) -> Self {
        Self::new(TermKind::Root, value)
    }

    pub fn lemma(value: &str) -> Self {
        Self::new(TermKind::Lemma, value)
    }

    /// Whether the token realizes this term (diacritic-insensitive).
    /// Never true for an empty term.
    pub fn matches(&self, token: &Token) -> bool {
        !self.value.is_empty()
            && self
                .kind
                .value_of(token)
                .map(|v| normalize_arabic(v) == self.value)
                .unwrap_or(false)
    }
}

impl fmt::Display for TermRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenBuilder;

    #[test]
    fn test_term_matches_ignoring_diacritics() {
        let token = TokenBuilder::new(1, 1, 1)
            .root("ك ت ب")
            .lemma("كَتَبَ")
            .build();
        assert!(TermRef::lemma("كتب").matches(&token));
        assert!(TermRef::root("ك ت ب").matches(&token));
        assert!(!TermRef::root("ك ت").matches(&token));
    }

    #[test]
    fn test_term_kind_parse() {
        assert_eq!("Lemma".parse::<TermKind>().unwrap(), TermKind::Lemma);
        assert!("stem".parse::<TermKind>().unwrap_err().is_configuration());
    }
}
