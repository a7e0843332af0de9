//! Phase 3 tests: layout generators fed from real engine output.
//!
//! Covers the seeded radial layouts, the force graph seeded from a
//! collocation layout, and the Sankey band layout over aggregated flows.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quranic_lens::layout::{
    collocation_radial_layout, flow_width, radial_ayah_layout, sankey_layout,
    seed_collocation_graph, sector_count, Mulberry32, SankeySide,
};
use quranic_lens::{
    build_root_word_flows, CollocationOptions, CorpusSnapshot, LayoutConfig, QueryEngine,
    TermRef, Token, TokenBuilder, WindowType,
};

// ==================== Helpers ====================

const ROOTS: [&str; 8] = [
    "ك ت ب", "ق و ل", "ع ل م", "ر ب ب", "أ م ن", "ن ز ل", "س م و", "ه د ي",
];

fn random_corpus(seed: u64) -> Vec<Token> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tokens = Vec::new();
    for sura in 1..=3u32 {
        for ayah in 1..=rng.gen_range(4..=9u32) {
            for pos in 1..=rng.gen_range(2..=6u32) {
                let root = ROOTS[rng.gen_range(0..ROOTS.len())];
                tokens.push(
                    TokenBuilder::new(sura, ayah, pos)
                        .root(root)
                        .lemma(format!("{root}/{}", rng.gen_range(0..3)))
                        .build(),
                );
            }
        }
    }
    tokens
}

fn snapshot() -> CorpusSnapshot {
    CorpusSnapshot::new(random_corpus(42)).unwrap()
}

fn surah_options() -> CollocationOptions {
    CollocationOptions {
        window_type: WindowType::Surah,
        min_frequency: 1,
        ..Default::default()
    }
}

// ==================== Radial Ayah Layout Tests ====================

#[test]
fn test_radial_layout_reproducible() {
    let snap = snapshot();
    let cfg = LayoutConfig::default();
    for sura in snap.suras() {
        let a = radial_ayah_layout(snap.tokens(), sura, &cfg);
        let b = radial_ayah_layout(snap.tokens(), sura, &cfg);
        assert_eq!(a, b);
        let first = a.bars.iter().flat_map(|bar| &bar.nodes);
        let second = b.bars.iter().flat_map(|bar| &bar.nodes);
        for (p, q) in first.zip(second) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }
}

#[test]
fn test_radial_layout_independent_of_token_order() {
    let tokens = random_corpus(42);
    let mut shuffled = tokens.clone();
    shuffled.reverse();
    let cfg = LayoutConfig::default();
    assert_eq!(
        radial_ayah_layout(&tokens, 2, &cfg),
        radial_ayah_layout(&shuffled, 2, &cfg)
    );
}

#[test]
fn test_radial_nodes_inside_ring() {
    let snap = snapshot();
    let cfg = LayoutConfig::default();
    let layout = radial_ayah_layout(snap.tokens(), 1, &cfg);
    for bar in &layout.bars {
        for node in &bar.nodes {
            assert!(node.distance > cfg.inner_radius && node.distance < cfg.outer_radius);
            assert!(node.r >= cfg.min_node_radius && node.r <= cfg.max_node_radius);
        }
    }
}

// ==================== Collocation Layout Tests ====================

#[test]
fn test_collocation_layout_from_engine() {
    let snap = snapshot();
    let target = TermRef::root("ك ت ب");
    let results = QueryEngine::new()
        .collocations(&snap, &target, &surah_options())
        .unwrap();
    assert!(!results.is_empty());

    let cfg = LayoutConfig::default();
    let layout = collocation_radial_layout(&target, &results, &cfg);
    assert_eq!(layout.nodes.len(), results.len());
    assert_eq!(layout.sectors, sector_count(results.len()));

    let span = TAU / layout.sectors as f64;
    for node in &layout.nodes {
        assert!(node.sector < layout.sectors);
        assert!(node.angle >= node.sector as f64 * span);
        assert!(node.angle <= (node.sector + 1) as f64 * span);
        assert!(node.distance >= cfg.inner_radius - 1e-9);
        assert!(node.distance <= cfg.outer_radius + 1e-9);
    }
    assert_eq!(layout, collocation_radial_layout(&target, &results, &cfg));
}

#[test]
fn test_collocation_layout_empty_results() {
    let layout = collocation_radial_layout(&TermRef::root("x"), &[], &LayoutConfig::default());
    assert!(layout.nodes.is_empty());
    assert_eq!(layout.pmi_domain, None);
    assert_eq!(layout.sectors, 4);
}

// ==================== Force Graph Seeding Tests ====================

#[test]
fn test_force_graph_seeded_from_anchors() {
    let snap = snapshot();
    let target = TermRef::root("ق و ل");
    let results = QueryEngine::new()
        .collocations(&snap, &target, &surah_options())
        .unwrap();
    let layout = collocation_radial_layout(&target, &results, &LayoutConfig::default());
    let graph = seed_collocation_graph(&layout);

    assert_eq!(graph.len(), layout.nodes.len() + 1);
    for (node, placed) in graph.nodes()[1..].iter().zip(&layout.nodes) {
        assert_eq!((node.x, node.y), (placed.x, placed.y));
        let idx = graph.find(&node.id).unwrap();
        assert_eq!(graph.parent_of(idx).unwrap().id, target.value);
    }
    let center = &graph.nodes()[0];
    assert_eq!(center.pinned, Some((layout.center.x, layout.center.y)));
}

#[test]
fn test_pinned_target_survives_position_writes() {
    let snap = snapshot();
    let target = TermRef::root("ع ل م");
    let results = QueryEngine::new()
        .collocations(&snap, &target, &surah_options())
        .unwrap();
    let layout = collocation_radial_layout(&target, &results, &LayoutConfig::default());
    let mut graph = seed_collocation_graph(&layout);

    // A physics step nudging every node by index.
    for idx in 0..graph.len() {
        let (x, y) = (graph.nodes()[idx].x, graph.nodes()[idx].y);
        graph.set_position(idx, x + 3.0, y - 3.0);
    }
    let center = &graph.nodes()[0];
    assert_eq!((center.x, center.y), (layout.center.x, layout.center.y));
    for (node, placed) in graph.nodes()[1..].iter().zip(&layout.nodes) {
        assert_eq!(node.x, placed.x + 3.0);
    }
    assert_eq!(seed_collocation_graph(&layout), seed_collocation_graph(&layout));
}

// ==================== Sankey Tests ====================

#[test]
fn test_sankey_from_flows() {
    let snap = snapshot();
    let flows = build_root_word_flows(snap.tokens());
    let cfg = LayoutConfig::default();
    let layout = sankey_layout(&flows, &cfg);

    assert_eq!(layout.links.len(), flows.len());
    let max = flows.iter().map(|f| f.count).max().unwrap();
    for link in &layout.links {
        assert_eq!(link.width, flow_width(link.count, max));
        assert!(link.width >= 4.0 && link.width <= 18.0);
        assert_eq!(layout.nodes[link.source].side, SankeySide::Source);
        assert_eq!(layout.nodes[link.target].side, SankeySide::Target);
    }

    // Bands sorted by source, then target, then count desc.
    for pair in layout.links.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!((a.source, a.target) <= (b.source, b.target));
        if (a.source, a.target) == (b.source, b.target) {
            assert!(a.count >= b.count);
        }
    }

    // Every band sits inside its nodes.
    for link in &layout.links {
        let (s, t) = (&layout.nodes[link.source], &layout.nodes[link.target]);
        assert!(link.y_source - link.width / 2.0 >= s.y - 1e-9);
        assert!(link.y_source + link.width / 2.0 <= s.y + s.height + 1e-9);
        assert!(link.y_target - link.width / 2.0 >= t.y - 1e-9);
        assert!(link.y_target + link.width / 2.0 <= t.y + t.height + 1e-9);
    }
}

#[test]
fn test_sankey_node_totals_match_flows() {
    let snap = snapshot();
    let flows = build_root_word_flows(snap.tokens());
    let layout = sankey_layout(&flows, &LayoutConfig::default());
    for node in layout.nodes.iter().filter(|n| n.side == SankeySide::Source) {
        let expected: u32 = flows
            .iter()
            .filter(|f| f.root == node.label)
            .map(|f| f.count)
            .sum();
        assert_eq!(node.total, expected);
    }
}

// ==================== PRNG Tests ====================

#[test]
fn test_prng_seeded_by_identifier() {
    let mut a = Mulberry32::from_parts(&["ك ت ب", "1:1:1"]);
    let mut b = Mulberry32::from_parts(&["ك ت ب", "1:1:1"]);
    let mut c = Mulberry32::from_parts(&["ك ت ب", "1:1:2"]);
    let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
    let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
    let zs: Vec<u32> = (0..8).map(|_| c.next_u32()).collect();
    assert_eq!(xs, ys);
    assert_ne!(xs, zs);
}
