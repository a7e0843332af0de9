//! Root → lemma flow aggregation for the Sankey view.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::normalize::collate;
use crate::corpus::CorpusSnapshot;
use crate::types::Token;

/// One aggregated (root, lemma) edge. `count == token_ids.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFlow {
    pub root: String,
    pub lemma: String,
    pub count: u32,
    pub token_ids: Vec<String>,
}

/// Display order: count desc, then root, then lemma (Arabic collation).
fn flow_order(a: &RootFlow, b: &RootFlow) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| collate(&a.root, &b.root))
        .then_with(|| collate(&a.lemma, &b.lemma))
}

/// Group tokens by exact (root, lemma). Tokens with an empty root are skipped.
pub fn build_root_word_flows(tokens: &[Token]) -> Vec<RootFlow> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut flows: Vec<RootFlow> = Vec::new();

    for token in tokens {
        let Some(root) = token.root_str() else {
            continue;
        };
        let lemma = token.lemma.trim();
        let slot = *slots.entry((root, lemma)).or_insert_with(|| {
            flows.push(RootFlow {
                root: root.to_string(),
                lemma: lemma.to_string(),
                count: 0,
                token_ids: Vec::new(),
            });
            flows.len() - 1
        });
        let flow = &mut flows[slot];
        flow.count += 1;
        flow.token_ids.push(token.id.clone());
    }

    flows.sort_by(flow_order);
    flows
}

/// Re-derive globally built flows for one surah: keep only token ids whose
/// token lies in `sura`, recount, drop empty flows and re-sort.
///
/// Ids are resolved per (id, root, lemma) in token order, so the k-th
/// occurrence of an id inside a flow is the k-th such token even when ids
/// repeat across surahs.
pub fn scope_flows_to_sura(flows: &[RootFlow], tokens: &[Token], sura: u32) -> Vec<RootFlow> {
    let mut suras_of: HashMap<(&str, &str, &str), Vec<u32>> = HashMap::new();
    for token in tokens {
        if let Some(root) = token.root_str() {
            suras_of
                .entry((token.id.as_str(), root, token.lemma.trim()))
                .or_default()
                .push(token.sura);
        }
    }

    let mut scoped: Vec<RootFlow> = flows
        .iter()
        .filter_map(|flow| {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            let token_ids: Vec<String> = flow
                .token_ids
                .iter()
                .filter(|id| {
                    let nth = seen.entry(id.as_str()).or_insert(0);
                    let found = suras_of
                        .get(&(id.as_str(), flow.root.as_str(), flow.lemma.as_str()))
                        .and_then(|suras| suras.get(*nth));
                    *nth += 1;
                    found == Some(&sura)
                })
                .cloned()
                .collect();
            if token_ids.is_empty() {
                return None;
            }
            Some(RootFlow {
                root: flow.root.clone(),
                lemma: flow.lemma.clone(),
                count: token_ids.len() as u32,
                token_ids,
            })
        })
        .collect();

    scoped.sort_by(flow_order);
    scoped
}

/// Distinct non-empty roots, sorted by Arabic collation.
pub fn unique_roots(tokens: &[Token]) -> Vec<String> {
    let mut roots: Vec<String> = tokens
        .iter()
        .filter_map(|t| t.root_str())
        .map(str::to_string)
        .collect();
    roots.sort_by(|a, b| collate(a, b));
    roots.dedup();
    roots
}

impl super::query::QueryEngine {
    /// Flows for the whole snapshot, or for one surah when `sura` is set.
    pub fn root_word_flows(&self, snapshot: &CorpusSnapshot, sura: Option<u32>) -> Vec<RootFlow> {
        let flows = build_root_word_flows(snapshot.tokens());
        match sura {
            Some(s) => scope_flows_to_sura(&flows, snapshot.tokens(), s),
            None => flows,
        }
    }

    /// Sorted distinct roots of the snapshot.
    pub fn unique_roots(&self, snapshot: &CorpusSnapshot) -> Vec<String> {
        unique_roots(snapshot.tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenBuilder;

    fn tok(sura: u32, ayah: u32, pos: u32, root: &str, lemma: &str) -> Token {
        TokenBuilder::new(sura, ayah, pos)
            .root(root)
            .lemma(lemma)
            .build()
    }

    #[test]
    fn test_global_flow_build() {
        let tokens = vec![
            tok(1, 2, 1, "ك ت ب", "كَتَبَ"),
            tok(1, 3, 1, "ك ت ب", "كِتَاب"),
            tok(2, 1, 1, "ك ت ب", "كَتَبَ"),
        ];
        let flows = build_root_word_flows(&tokens);
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].lemma, "كَتَبَ");
        assert_eq!(flows[0].count, 2);
        assert_eq!(flows[0].token_ids, vec!["1:2:1", "2:1:1"]);
        assert_eq!(flows[1].lemma, "كِتَاب");
        assert_eq!(flows[1].count, 1);
    }

    #[test]
    fn test_empty_root_skipped() {
        let tokens = vec![
            TokenBuilder::new(1, 1, 1).lemma("فِي").build(),
            tok(1, 1, 2, "ق و ل", "قَالَ"),
        ];
        let flows = build_root_word_flows(&tokens);
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].root, "ق و ل");
    }

    #[test]
    fn test_ties_broken_by_root() {
        let tokens = vec![tok(1, 1, 1, "ت", "a"), tok(1, 1, 2, "ب", "b")];
        let flows = build_root_word_flows(&tokens);
        assert_eq!(flows[0].root, "ب");
        assert_eq!(flows[1].root, "ت");
    }

    #[test]
    fn test_scope_drops_empty_flows() {
        let tokens = vec![
            tok(1, 2, 1, "ك ت ب", "كَتَبَ"),
            tok(1, 3, 1, "ك ت ب", "كِتَاب"),
            tok(2, 1, 1, "ك ت ب", "كَتَبَ"),
        ];
        let flows = build_root_word_flows(&tokens);
        let scoped = scope_flows_to_sura(&flows, &tokens, 2);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].count, 1);
        assert_eq!(scoped[0].token_ids, vec!["2:1:1"]);
    }

    #[test]
    fn test_scope_with_repeated_ids_matches_direct_build() {
        let tokens = vec![
            TokenBuilder::new(1, 1, 1).id("w").root("ك ت ب").build(),
            TokenBuilder::new(2, 1, 1).id("w").root("ك ت ب").build(),
            TokenBuilder::new(2, 1, 2).id("w").root("ك ت ب").build(),
        ];
        let flows = build_root_word_flows(&tokens);
        for sura in [1, 2] {
            let direct: Vec<Token> = tokens.iter().filter(|t| t.sura == sura).cloned().collect();
            assert_eq!(
                scope_flows_to_sura(&flows, &tokens, sura),
                build_root_word_flows(&direct)
            );
        }
    }

    #[test]
    fn test_unique_roots_sorted_dedup() {
        let tokens = vec![
            tok(1, 1, 1, "ق و ل", "x"),
            tok(1, 1, 2, "ا م ر", "y"),
            tok(1, 1, 3, "ق و ل", "z"),
            TokenBuilder::new(1, 1, 4).build(),
        ];
        assert_eq!(unique_roots(&tokens), vec!["ا م ر", "ق و ل"]);
    }
}
