//! Collocation engine: windowed co-occurrence counting and PMI scoring.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::normalize::{collate, normalize_arabic};
use super::window::{DistanceUnit, Window, WindowType};
use crate::corpus::{CorpusSnapshot, Fingerprint};
use crate::index::{FrequencyTables, TermStats, WindowIndex};
use crate::types::{LensError, LensResult, PartOfSpeech, TermKind, TermRef, Token};

/// Default number of lemma / window samples kept per collocate.
pub const DEFAULT_SAMPLE_CAP: usize = 6;

/// Default minimum co-occurrence count.
pub const DEFAULT_MIN_FREQUENCY: u32 = 2;

/// Query parameters for [`get_collocations`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollocationOptions {
    pub window_type: WindowType,
    /// Only read when `window_type` is `Distance`.
    pub distance: u32,
    pub distance_unit: DistanceUnit,
    pub min_frequency: u32,
    /// Whether collocates are identified by root or by lemma.
    pub group_by: TermKind,
    /// Restrict candidate tokens to these parts of speech.
    pub pos_filter: Option<BTreeSet<PartOfSpeech>>,
    /// Only count windows that also contain this term.
    pub pair_term: Option<TermRef>,
    pub sample_cap: usize,
}

impl Default for CollocationOptions {
    fn default() -> Self {
        Self {
            window_type: WindowType::Ayah,
            distance: 3,
            distance_unit: DistanceUnit::Ayah,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            group_by: TermKind::Root,
            pos_filter: None,
            pair_term: None,
            sample_cap: DEFAULT_SAMPLE_CAP,
        }
    }
}

impl CollocationOptions {
    /// Check every parameter and resolve the window policy.
    pub fn validate(&self) -> LensResult<Window> {
        if self.min_frequency < 1 {
            return Err(LensError::config("min_frequency must be at least 1"));
        }
        if let Some(filter) = &self.pos_filter {
            if filter.is_empty() {
                return Err(LensError::config(
                    "pos filter is empty; omit it to allow every part of speech",
                ));
            }
        }
        if let Some(pair) = &self.pair_term {
            if normalize_arabic(&pair.value).is_empty() {
                return Err(LensError::config("pair term has an empty value"));
            }
        }
        Window::resolve(self.window_type, self.distance, self.distance_unit)
    }
}

/// One co-occurring term relative to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollocationResult {
    /// Display spelling of the collocate.
    pub label: String,
    /// Normalized key of the collocate.
    pub key: String,
    /// Raw co-occurrence count: (target occurrence, collocate occurrence) pairs.
    pub count: u32,
    /// Windows containing both the target and the collocate.
    pub windows: u32,
    /// log2 of the observed-to-expected joint window probability. May be negative.
    pub pmi: f64,
    pub sample_lemmas: Vec<String>,
    pub sample_windows: Vec<String>,
}

/// Raw overlap statistics for two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCooccurrence {
    /// Windows containing term A.
    pub count_a: usize,
    /// Windows containing term B.
    pub count_b: usize,
    /// Windows containing both.
    pub cooccurrence_count: usize,
    pub total_windows: usize,
}

#[derive(Default)]
struct Accumulator {
    count: u32,
    windows: u32,
    last_window: Option<usize>,
    sample_lemmas: Vec<String>,
    sample_windows: Vec<String>,
}

/// Compute collocates of `target`. Builds a [`WindowIndex`] for the call;
/// use [`collocations_with_index`] to reuse one across queries.
pub fn get_collocations(
    target: &TermRef,
    tokens: &[Token],
    freq: &FrequencyTables,
    options: &CollocationOptions,
) -> LensResult<Vec<CollocationResult>> {
    let window = options.validate()?;
    let source = Fingerprint::of(tokens);
    check_source(freq.token_count(), freq.source(), tokens, source)?;
    let index = WindowIndex::build_identified(tokens, source);
    collocate(target, tokens, freq, &index, window, options)
}

/// Compute collocates of `target` against a prebuilt window index.
///
/// Results are sorted by PMI desc, count desc, then label. Collocates whose
/// count is below `min_frequency` are dropped; negative PMI is kept.
///
/// `freq` and `index` must have been built from exactly `tokens`, in the
/// same order; anything else is a [`LensError::SnapshotMismatch`].
pub fn collocations_with_index(
    target: &TermRef,
    tokens: &[Token],
    freq: &FrequencyTables,
    index: &WindowIndex,
    options: &CollocationOptions,
) -> LensResult<Vec<CollocationResult>> {
    let window = options.validate()?;
    let source = Fingerprint::of(tokens);
    check_source(freq.token_count(), freq.source(), tokens, source)?;
    check_source(index.token_count(), index.source(), tokens, source)?;
    collocate(target, tokens, freq, index, window, options)
}

/// Collocates over a snapshot, whose indexes match its tokens by construction.
pub(crate) fn snapshot_collocations(
    snapshot: &CorpusSnapshot,
    target: &TermRef,
    options: &CollocationOptions,
) -> LensResult<Vec<CollocationResult>> {
    let window = options.validate()?;
    collocate(
        target,
        snapshot.tokens(),
        snapshot.frequencies(),
        snapshot.windows(),
        window,
        options,
    )
}

fn collocate(
    target: &TermRef,
    tokens: &[Token],
    freq: &FrequencyTables,
    index: &WindowIndex,
    window: Window,
    options: &CollocationOptions,
) -> LensResult<Vec<CollocationResult>> {
    let target = TermRef::new(target.kind, &target.value);
    let pair = options
        .pair_term
        .as_ref()
        .map(|p| TermRef::new(p.kind, &p.value));

    let Some(target_stats) = freq.get_term(&target) else {
        log::debug!("collocations: target {target} not in corpus");
        return Ok(Vec::new());
    };

    let total = window.total_windows(index);
    let target_windows = window.windows_containing(index, &target_stats.occurrences);
    let n_target = target_windows.len();

    let qualifying = match &pair {
        Some(p) => match freq.get_term(p) {
            Some(pair_stats) => intersect_sorted(
                &target_windows,
                &window.windows_containing(index, &pair_stats.occurrences),
            ),
            None => {
                log::debug!("collocations: pair term {p} not in corpus");
                return Ok(Vec::new());
            }
        },
        None => target_windows,
    };
    if qualifying.is_empty() {
        return Ok(Vec::new());
    }

    let candidate_key = |idx: usize| -> Option<String> {
        let token = &tokens[idx];
        if let Some(filter) = &options.pos_filter {
            if !filter.contains(&token.pos) {
                return None;
            }
        }
        if target.matches(token) || pair.as_ref().is_some_and(|p| p.matches(token)) {
            return None;
        }
        options
            .group_by
            .value_of(token)
            .map(normalize_arabic)
            .filter(|key| !key.is_empty())
    };

    let mut acc: HashMap<String, Accumulator> = HashMap::new();

    // Raw counts: every target occurrence paired with each token in its
    // anchored neighbourhood.
    let mut occurrences = target_stats.occurrences.clone();
    occurrences.sort_by_key(|&i| index.rank_of(i));
    for &occ in &occurrences {
        let anchor = window.anchor(index, occ);
        if pair.is_some() && qualifying.binary_search(&anchor).is_err() {
            continue;
        }
        let mut anchor_label: Option<String> = None;
        for rank in window.members(index, anchor) {
            let idx = index.token_at(rank);
            if idx == occ {
                continue;
            }
            let Some(key) = candidate_key(idx) else {
                continue;
            };
            let entry = acc.entry(key).or_default();
            entry.count += 1;

            if entry.sample_lemmas.len() < options.sample_cap {
                if let Some(lemma) = tokens[idx].lemma_str() {
                    if !entry.sample_lemmas.iter().any(|l| l == lemma) {
                        entry.sample_lemmas.push(lemma.to_string());
                    }
                }
            }
            if entry.sample_windows.len() < options.sample_cap {
                let label =
                    anchor_label.get_or_insert_with(|| window.label(index, tokens, anchor));
                if !entry.sample_windows.contains(label) {
                    entry.sample_windows.push(label.clone());
                }
            }
        }
    }

    // Joint window counts over the qualifying universe.
    for &slot in &qualifying {
        for rank in window.members(index, slot) {
            let Some(key) = candidate_key(index.token_at(rank)) else {
                continue;
            };
            if let Some(entry) = acc.get_mut(&key) {
                if entry.last_window != Some(slot) {
                    entry.windows += 1;
                    entry.last_window = Some(slot);
                }
            }
        }
    }

    let candidates = acc.len();
    let mut results: Vec<CollocationResult> = acc
        .into_iter()
        .filter(|(_, a)| a.count >= options.min_frequency)
        .filter_map(|(key, a)| {
            let stats = freq.get(options.group_by, &key)?;
            let n_candidate = marginal_windows(window, index, stats);
            let pmi = pmi(a.windows as usize, n_target, n_candidate, total)?;
            Some(CollocationResult {
                label: stats.display.clone(),
                key,
                count: a.count,
                windows: a.windows,
                pmi,
                sample_lemmas: a.sample_lemmas,
                sample_windows: a.sample_windows,
            })
        })
        .collect();

    results.sort_by(result_order);

    log::debug!(
        "collocations: target={} window={:?} qualifying={} candidates={} kept={}",
        target,
        window,
        qualifying.len(),
        candidates,
        results.len()
    );
    Ok(results)
}

/// Count windows containing A, B and both, under the same window rules as
/// [`get_collocations`]. No PMI is computed.
pub fn get_pair_cooccurrence(
    term_a: &TermRef,
    term_b: &TermRef,
    tokens: &[Token],
    options: &CollocationOptions,
) -> LensResult<PairCooccurrence> {
    let window = options.validate()?;
    let index = WindowIndex::build(tokens);
    Ok(pair_windows(term_a, term_b, tokens, &index, window))
}

/// [`get_pair_cooccurrence`] against a prebuilt index and resolved window.
/// The index must have been built from exactly `tokens`.
pub fn pair_cooccurrence_with_index(
    term_a: &TermRef,
    term_b: &TermRef,
    tokens: &[Token],
    index: &WindowIndex,
    window: Window,
) -> LensResult<PairCooccurrence> {
    check_source(index.token_count(), index.source(), tokens, Fingerprint::of(tokens))?;
    Ok(pair_windows(term_a, term_b, tokens, index, window))
}

fn pair_windows(
    term_a: &TermRef,
    term_b: &TermRef,
    tokens: &[Token],
    index: &WindowIndex,
    window: Window,
) -> PairCooccurrence {
    let term_a = TermRef::new(term_a.kind, &term_a.value);
    let term_b = TermRef::new(term_b.kind, &term_b.value);

    let occurrences = |term: &TermRef| -> Vec<usize> {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| term.matches(t))
            .map(|(i, _)| i)
            .collect()
    };
    let windows_a = window.windows_containing(index, &occurrences(&term_a));
    let windows_b = window.windows_containing(index, &occurrences(&term_b));
    let both = intersect_sorted(&windows_a, &windows_b);

    PairCooccurrence {
        count_a: windows_a.len(),
        count_b: windows_b.len(),
        cooccurrence_count: both.len(),
        total_windows: window.total_windows(index),
    }
}

impl super::query::QueryEngine {
    /// Collocates of `target` within a snapshot, reusing its indexes.
    pub fn collocations(
        &self,
        snapshot: &CorpusSnapshot,
        target: &TermRef,
        options: &CollocationOptions,
    ) -> LensResult<Vec<CollocationResult>> {
        snapshot_collocations(snapshot, target, options)
    }

    /// Window overlap of two terms within a snapshot.
    pub fn pair_cooccurrence(
        &self,
        snapshot: &CorpusSnapshot,
        term_a: &TermRef,
        term_b: &TermRef,
        options: &CollocationOptions,
    ) -> LensResult<PairCooccurrence> {
        let window = options.validate()?;
        Ok(pair_windows(
            term_a,
            term_b,
            snapshot.tokens(),
            snapshot.windows(),
            window,
        ))
    }
}

/// An index is only valid for the exact token sequence it was built from.
fn check_source(
    indexed: usize,
    built_from: Option<Fingerprint>,
    tokens: &[Token],
    source: Fingerprint,
) -> LensResult<()> {
    if built_from != Some(source) {
        return Err(LensError::SnapshotMismatch {
            tables: indexed,
            tokens: tokens.len(),
        });
    }
    Ok(())
}

/// Windows of the policy's universe containing the term.
fn marginal_windows(window: Window, index: &WindowIndex, stats: &TermStats) -> usize {
    match window {
        Window::Ayah => stats.ayahs.len(),
        Window::Surah => stats.suras.len(),
        Window::AyahDistance(_) | Window::TokenDistance(_) => {
            window.windows_containing(index, &stats.occurrences).len()
        }
    }
}

/// `log2(P(t,c) / (P(t) P(c)))`, or `None` when any probability is zero.
fn pmi(joint: usize, n_target: usize, n_candidate: usize, total: usize) -> Option<f64> {
    if joint == 0 || n_target == 0 || n_candidate == 0 || total == 0 {
        return None;
    }
    let total = total as f64;
    let p_joint = joint as f64 / total;
    let p_target = n_target as f64 / total;
    let p_candidate = n_candidate as f64 / total;
    Some((p_joint / (p_target * p_candidate)).log2())
}

fn result_order(a: &CollocationResult, b: &CollocationResult) -> Ordering {
    b.pmi
        .partial_cmp(&a.pmi)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.count.cmp(&a.count))
        .then_with(|| collate(&a.label, &b.label))
        .then_with(|| a.key.cmp(&b.key))
}

fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
