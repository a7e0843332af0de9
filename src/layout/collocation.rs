//! Collocation radial layout: target at the centre, collocates in hashed sectors.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::prng::{hash_str, Mulberry32};
use super::scale::{extent, LinearScale, SqrtScale};
use super::{LayoutConfig, Point};
use crate::engine::CollocationResult;
use crate::types::TermRef;

/// A collocate positioned around the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollocationNode {
    pub id: String,
    pub label: String,
    pub pmi: f64,
    pub count: u32,
    pub sector: usize,
    pub angle: f64,
    pub distance: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollocationLayout {
    pub target: TermRef,
    pub center: Point,
    pub sectors: usize,
    /// PMI extent of the result set; `None` when there are no collocates.
    pub pmi_domain: Option<(f64, f64)>,
    pub nodes: Vec<CollocationNode>,
}

/// `min(7, max(4, ceil(sqrt(n))))`.
pub fn sector_count(candidates: usize) -> usize {
    let root = (candidates as f64).sqrt().ceil() as usize;
    root.clamp(4, 7)
}

/// Place collocates around `target`.
///
/// Sector = `hash(label) % sectors`. Distance falls linearly from
/// `outer_radius` at the lowest PMI to `inner_radius` at the highest; node
/// radius rises with a square-root scale over the same domain. The angle
/// within a sector comes from a generator seeded with `target:label`.
pub fn collocation_radial_layout(
    target: &TermRef,
    results: &[CollocationResult],
    config: &LayoutConfig,
) -> CollocationLayout {
    let center = config.center();
    let sectors = sector_count(results.len());
    let span = TAU / sectors as f64;

    let pmi_domain = extent(results.iter().map(|r| r.pmi));
    let domain = pmi_domain.unwrap_or((0.0, 0.0));
    let distance = LinearScale::new(domain, (config.outer_radius, config.inner_radius)).clamped();
    let radius = SqrtScale::new(domain, (config.min_node_radius, config.max_node_radius)).clamped();

    let nodes = results
        .iter()
        .map(|result| {
            let sector = (hash_str(&result.label) as usize) % sectors;
            let mut rng = Mulberry32::from_parts(&[target.value.as_str(), result.label.as_str()]);
            let angle = sector as f64 * span + span * rng.range(0.15, 0.85);
            let d = distance.scale(result.pmi);
            let p = center.polar(angle, d);
            CollocationNode {
                id: format!("{}:{}", target.value, result.key),
                label: result.label.clone(),
                pmi: result.pmi,
                count: result.count,
                sector,
                angle,
                distance: d,
                x: p.x,
                y: p.y,
                r: radius.scale(result.pmi),
            }
        })
        .collect();

    CollocationLayout {
        target: target.clone(),
        center,
        sectors,
        pmi_domain,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, pmi: f64, count: u32) -> CollocationResult {
        CollocationResult {
            label: label.to_string(),
            key: label.to_string(),
            count,
            windows: count,
            pmi,
            sample_lemmas: Vec::new(),
            sample_windows: Vec::new(),
        }
    }

    #[test]
    fn test_sector_count_bounds() {
        assert_eq!(sector_count(0), 4);
        assert_eq!(sector_count(9), 4);
        assert_eq!(sector_count(17), 5);
        assert_eq!(sector_count(36), 6);
        assert_eq!(sector_count(1000), 7);
    }

    #[test]
    fn test_higher_pmi_is_closer_and_larger() {
        let cfg = LayoutConfig::default();
        let results = vec![result("a", 3.0, 4), result("b", 1.0, 9), result("c", -1.0, 2)];
        let layout = collocation_radial_layout(&TermRef::root("ك ت ب"), &results, &cfg);
        let [a, b, c] = [&layout.nodes[0], &layout.nodes[1], &layout.nodes[2]];
        assert_eq!(a.distance, cfg.inner_radius);
        assert_eq!(c.distance, cfg.outer_radius);
        assert!(a.distance < b.distance && b.distance < c.distance);
        assert!(a.r > b.r && b.r > c.r);
        assert_eq!(a.r, cfg.max_node_radius);
        assert_eq!(c.r, cfg.min_node_radius);
    }

    #[test]
    fn test_angle_inside_sector() {
        let cfg = LayoutConfig::default();
        let results: Vec<_> = (0..20).map(|i| result(&format!("w{i}"), i as f64, 2)).collect();
        let layout = collocation_radial_layout(&TermRef::lemma("قال"), &results, &cfg);
        let span = TAU / layout.sectors as f64;
        for node in &layout.nodes {
            let start = node.sector as f64 * span;
            assert!(node.angle > start && node.angle < start + span);
        }
    }

    #[test]
    fn test_single_result_degenerate_domain() {
        let cfg = LayoutConfig::default();
        let layout =
            collocation_radial_layout(&TermRef::root("x"), &[result("y", 2.5, 3)], &cfg);
        let mid = (cfg.inner_radius + cfg.outer_radius) / 2.0;
        assert_eq!(layout.nodes[0].distance, mid);
        assert_eq!(layout.pmi_domain, Some((2.5, 2.5)));
    }

    #[test]
    fn test_reproducible() {
        let cfg = LayoutConfig::default();
        let results = vec![result("a", 1.0, 2), result("b", 2.0, 2)];
        let target = TermRef::root("ع ل م");
        assert_eq!(
            collocation_radial_layout(&target, &results, &cfg),
            collocation_radial_layout(&target, &results, &cfg)
        );
    }
}
