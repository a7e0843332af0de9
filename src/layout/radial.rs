//! Radial ayah layout: one spoke per ayah, roots stacked along each spoke.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::prng::Mulberry32;
use super::scale::SqrtScale;
use super::{LayoutConfig, Point};
use crate::engine::normalize::{collate, normalize_arabic};
use crate::types::Token;

/// A root placed on an ayah spoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialRootNode {
    /// `sura:ayah:root`, also the jitter seed.
    pub id: String,
    pub root: String,
    /// Occurrences of the root within this ayah.
    pub count: u32,
    /// 0-based rank among the ayah's roots (most frequent first).
    pub rank: usize,
    pub angle: f64,
    pub distance: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// One spoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AyahBar {
    pub ayah: u32,
    /// 0-based ordinal among the surah's ayahs.
    pub index: usize,
    pub angle: f64,
    pub nodes: Vec<RadialRootNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialAyahLayout {
    pub sura: u32,
    pub center: Point,
    pub bars: Vec<AyahBar>,
}

struct LocalRoot<'t> {
    display: &'t str,
    key: String,
    count: u32,
}

/// Lay out every ayah of `sura`.
///
/// The spoke angle is `index / ayah_count * 2π`; roots sit at
/// `inner + (rank + 0.5) / n * (outer - inner)` and get a square-root
/// radius over the surah-wide maximum local count. Each node's angle is
/// jittered by a generator seeded with its id, so repeated calls agree.
pub fn radial_ayah_layout(tokens: &[Token], sura: u32, config: &LayoutConfig) -> RadialAyahLayout {
    let mut ayahs: Vec<(u32, Vec<LocalRoot<'_>>)> = Vec::new();
    let mut slot_of: HashMap<u32, usize> = HashMap::new();

    let mut in_sura: Vec<&Token> = tokens.iter().filter(|t| t.sura == sura).collect();
    in_sura.sort_by_key(|t| t.address());

    for token in in_sura {
        let slot = *slot_of.entry(token.ayah).or_insert_with(|| {
            ayahs.push((token.ayah, Vec::new()));
            ayahs.len() - 1
        });
        let Some(root) = token.root_str() else {
            continue;
        };
        let key = normalize_arabic(root);
        let roots = &mut ayahs[slot].1;
        match roots.iter_mut().find(|r| r.key == key) {
            Some(local) => local.count += 1,
            None => roots.push(LocalRoot {
                display: root,
                key,
                count: 1,
            }),
        }
    }

    let max_count = ayahs
        .iter()
        .flat_map(|(_, roots)| roots.iter().map(|r| r.count))
        .max()
        .unwrap_or(0);
    let radius = SqrtScale::new(
        (0.0, max_count as f64),
        (config.min_node_radius, config.max_node_radius),
    )
    .clamped();

    let center = config.center();
    let ayah_count = ayahs.len();
    let bars = ayahs
        .into_iter()
        .enumerate()
        .map(|(index, (ayah, mut roots))| {
            let angle = index as f64 / ayah_count as f64 * TAU;
            roots.sort_by(|a, b| match b.count.cmp(&a.count) {
                Ordering::Equal => collate(a.display, b.display),
                other => other,
            });
            let n = roots.len() as f64;
            let nodes = roots
                .iter()
                .enumerate()
                .map(|(rank, local)| {
                    let id = format!("{sura}:{ayah}:{}", local.key);
                    let mut rng = Mulberry32::from_parts(&[id.as_str()]);
                    let node_angle = angle + rng.range(-config.jitter, config.jitter);
                    let distance = config.inner_radius
                        + (rank as f64 + 0.5) / n * (config.outer_radius - config.inner_radius);
                    let p = center.polar(node_angle, distance);
                    RadialRootNode {
                        id,
                        root: local.display.to_string(),
                        count: local.count,
                        rank,
                        angle: node_angle,
                        distance,
                        x: p.x,
                        y: p.y,
                        r: radius.scale(local.count as f64),
                    }
                })
                .collect();
            AyahBar {
                ayah,
                index,
                angle,
                nodes,
            }
        })
        .collect();

    RadialAyahLayout { sura, center, bars }
}
