//! Root and lemma frequency tables.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::corpus::Fingerprint;
use crate::engine::normalize::{collate, normalize_arabic};
use crate::types::{AyahRef, TermKind, TermRef, Token};

/// Occurrence statistics for one normalized term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermStats {
    /// First raw spelling encountered.
    pub display: String,
    /// Total token count.
    pub count: u32,
    /// Distinct ayah windows containing the term.
    pub ayahs: BTreeSet<AyahRef>,
    /// Distinct surahs containing the term.
    pub suras: BTreeSet<u32>,
    /// Indices into the source token slice, in slice order.
    pub occurrences: Vec<usize>,
}

/// Root → stats and lemma → stats, keyed by normalized form.
///
/// Read-only once built; safe to share between concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTables {
    roots: HashMap<String, TermStats>,
    lemmas: HashMap<String, TermStats>,
    /// Number of tokens in the slice the tables were built from.
    token_count: usize,
    /// Identity of that slice. `None` for empty tables made by [`Self::new`].
    source: Option<Fingerprint>,
}

impl FrequencyTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build both tables in a single pass. Tokens with an empty root (or
    /// lemma) are skipped for that table only, as are values made only of
    /// diacritics or tatweel.
    pub fn build(tokens: &[Token]) -> Self {
        Self::build_identified(tokens, Fingerprint::of(tokens))
    }

    /// [`Self::build`] with the slice fingerprint already computed.
    pub(crate) fn build_identified(tokens: &[Token], source: Fingerprint) -> Self {
        let mut tables = Self::new();
        tables.source = Some(source);

        for (idx, token) in tokens.iter().enumerate() {
            if let Some(root) = token.root_str() {
                Self::record(&mut tables.roots, root, idx, token);
            }
            if let Some(lemma) = token.lemma_str() {
                Self::record(&mut tables.lemmas, lemma, idx, token);
            }
        }
        tables.token_count = tokens.len();

        log::debug!(
            "frequency tables: {} tokens, {} roots, {} lemmas",
            tables.token_count,
            tables.roots.len(),
            tables.lemmas.len()
        );
        tables
    }

    fn record(table: &mut HashMap<String, TermStats>, raw: &str, idx: usize, token: &Token) {
        let key = normalize_arabic(raw);
        if key.is_empty() {
            return;
        }
        let stats = table.entry(key).or_default();
        if stats.count == 0 {
            stats.display = raw.to_string();
        }
        stats.count += 1;
        stats.ayahs.insert(token.ayah_ref());
        stats.suras.insert(token.sura);
        stats.occurrences.push(idx);
    }

    fn table(&self, kind: TermKind) -> &HashMap<String, TermStats> {
        match kind {
            TermKind::Root => &self.roots,
            TermKind::Lemma => &self.lemmas,
        }
    }

    /// Look up a term by an already-normalized key.
    pub fn get(&self, kind: TermKind, key: &str) -> Option<&TermStats> {
        self.table(kind).get(key)
    }

    /// Look up a term reference.
    pub fn get_term(&self, term: &TermRef) -> Option<&TermStats> {
        self.get(term.kind, &term.value)
    }

    /// Total token count of a term (raw value, normalized here).
    pub fn count(&self, kind: TermKind, value: &str) -> u32 {
        self.get(kind, &normalize_arabic(value))
            .map(|s| s.count)
            .unwrap_or(0)
    }

    /// Number of distinct ayahs containing a term.
    pub fn ayah_frequency(&self, kind: TermKind, value: &str) -> usize {
        self.get(kind, &normalize_arabic(value))
            .map(|s| s.ayahs.len())
            .unwrap_or(0)
    }

    /// Number of distinct terms of a kind.
    pub fn term_count(&self, kind: TermKind) -> usize {
        self.table(kind).len()
    }

    /// Number of tokens the tables were built from.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Fingerprint of the token slice the tables index.
    pub fn source(&self) -> Option<Fingerprint> {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.lemmas.is_empty()
    }

    /// Iterate `(normalized key, stats)` pairs of one table, in no particular order.
    pub fn iter(&self, kind: TermKind) -> impl Iterator<Item = (&String, &TermStats)> {
        self.table(kind).iter()
    }

    /// The `limit` most frequent terms of a kind: count desc, then collation.
    pub fn top(&self, kind: TermKind, limit: usize) -> Vec<(&str, &TermStats)> {
        let mut entries: Vec<(&str, &TermStats)> = self
            .table(kind)
            .iter()
            .map(|(k, s)| (k.as_str(), s))
            .collect();
        entries.sort_by(|a, b| match b.1.count.cmp(&a.1.count) {
            Ordering::Equal => collate(a.0, b.0),
            other => other,
        });
        entries.truncate(limit);
        entries
    }
}
