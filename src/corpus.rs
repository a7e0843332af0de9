//! Immutable token snapshot and the JSON token loader.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::index::{FrequencyTables, WindowIndex};
use crate::types::{LensError, LensResult, Token};

/// blake3 digest identifying a token snapshot's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Digest of a token sequence: every token's id, address, root, lemma
    /// and POS, in slice order.
    pub fn of(tokens: &[Token]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(tokens.len() as u64).to_le_bytes());
        for token in tokens {
            for field in [
                token.id.as_str(),
                token.root.as_deref().unwrap_or(""),
                token.lemma.as_str(),
                token.pos.name(),
            ] {
                hasher.update(&(field.len() as u32).to_le_bytes());
                hasher.update(field.as_bytes());
            }
            hasher.update(&token.sura.to_le_bytes());
            hasher.update(&token.ayah.to_le_bytes());
            hasher.update(&token.position.to_le_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A materialized, canonically ordered token sequence together with the
/// indexes derived from it. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    tokens: Vec<Token>,
    frequencies: FrequencyTables,
    windows: WindowIndex,
    fingerprint: Fingerprint,
}

impl CorpusSnapshot {
    /// Validate, order and index a token sequence.
    ///
    /// Rejects zero-based indices, duplicate ids and duplicate
    /// `(sura, ayah, position)` addresses. Everything else (empty roots,
    /// empty lemmas) is accepted.
    pub fn new(mut tokens: Vec<Token>) -> LensResult<Self> {
        tokens.sort_by_key(Token::address);

        let mut seen: HashSet<(u32, u32, u32)> = HashSet::with_capacity(tokens.len());
        let mut ids: HashSet<&str> = HashSet::with_capacity(tokens.len());
        for token in &tokens {
            if token.sura == 0 || token.ayah == 0 || token.position == 0 {
                return Err(LensError::Corpus(format!(
                    "token '{}' has a zero index ({}:{}:{}); indices are 1-based",
                    token.id, token.sura, token.ayah, token.position
                )));
            }
            if !seen.insert(token.address()) {
                return Err(LensError::Corpus(format!(
                    "duplicate token address {}:{}:{}",
                    token.sura, token.ayah, token.position
                )));
            }
            if !ids.insert(token.id.as_str()) {
                return Err(LensError::Corpus(format!(
                    "duplicate token id '{}' at {}:{}:{}",
                    token.id, token.sura, token.ayah, token.position
                )));
            }
        }

        let fingerprint = Fingerprint::of(&tokens);
        let frequencies = FrequencyTables::build_identified(&tokens, fingerprint);
        let windows = WindowIndex::build_identified(&tokens, fingerprint);
        log::debug!(
            "snapshot {}: {} tokens, {} ayahs, {} surahs",
            fingerprint,
            tokens.len(),
            windows.ayah_count(),
            windows.sura_count()
        );

        Ok(Self {
            tokens,
            frequencies,
            windows,
            fingerprint,
        })
    }

    /// Read a JSON array of tokens and build a snapshot from it.
    pub fn load_json(path: impl AsRef<Path>) -> LensResult<Self> {
        Self::new(load_tokens_json(path)?)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn frequencies(&self) -> &FrequencyTables {
        &self.frequencies
    }

    pub fn windows(&self) -> &WindowIndex {
        &self.windows
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Distinct surah numbers, ascending.
    pub fn suras(&self) -> Vec<u32> {
        self.windows.suras().iter().map(|s| s.sura).collect()
    }

    /// A new snapshot restricted to one surah.
    pub fn filter_sura(&self, sura: u32) -> LensResult<Self> {
        Self::new(
            self.tokens
                .iter()
                .filter(|t| t.sura == sura)
                .cloned()
                .collect(),
        )
    }
}

/// Read a JSON array of [`Token`] records.
pub fn load_tokens_json(path: impl AsRef<Path>) -> LensResult<Vec<Token>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let tokens: Vec<Token> = serde_json::from_str(&data)?;
    log::debug!("loaded {} tokens from {}", tokens.len(), path.display());
    Ok(tokens)
}
