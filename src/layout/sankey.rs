//! Sankey band layout for root → lemma flows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::LayoutConfig;
use crate::engine::RootFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SankeySide {
    /// Root column.
    Source,
    /// Lemma column.
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    /// `root:<root>` or `lemma:<lemma>`.
    pub id: String,
    pub label: String,
    pub side: SankeySide,
    pub x: f64,
    pub y: f64,
    pub height: f64,
    /// Sum of the counts of every flow touching this node.
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    /// Index into [`SankeyLayout::nodes`].
    pub source: usize,
    pub target: usize,
    pub count: u32,
    pub normalized: f64,
    pub width: f64,
    /// Centre of the band where it leaves the source node.
    pub y_source: f64,
    /// Centre of the band where it enters the target node.
    pub y_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLayout {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    /// Height of the taller column.
    pub height: f64,
}

/// Band width for a flow: `4 + 14 * count / max_count`.
pub fn flow_width(count: u32, max_count: u32) -> f64 {
    if max_count == 0 {
        return 4.0;
    }
    4.0 + 14.0 * count as f64 / max_count as f64
}

struct Column {
    side: SankeySide,
    slots: HashMap<String, usize>,
    members: Vec<usize>,
}

impl Column {
    fn new(side: SankeySide) -> Self {
        Self {
            side,
            slots: HashMap::new(),
            members: Vec::new(),
        }
    }

    /// Arena index of `label` in this column, creating the node on first sight.
    fn slot(&mut self, label: &str, nodes: &mut Vec<SankeyNode>) -> usize {
        if let Some(&idx) = self.slots.get(label) {
            return idx;
        }
        let prefix = match self.side {
            SankeySide::Source => "root",
            SankeySide::Target => "lemma",
        };
        let idx = nodes.len();
        nodes.push(SankeyNode {
            id: format!("{prefix}:{label}"),
            label: label.to_string(),
            side: self.side,
            x: 0.0,
            y: 0.0,
            height: 0.0,
            total: 0,
        });
        self.slots.insert(label.to_string(), idx);
        self.members.push(idx);
        idx
    }
}

/// Lay out flows as two columns of stacked nodes joined by bands.
///
/// Nodes appear in first-appearance order of the flow list. A node's height
/// is the sum of its band widths plus `sankey_flow_gap` between bands.
/// Bands are ordered by source node, then target node, then descending
/// count, and stacked in that order on both ends.
pub fn sankey_layout(flows: &[RootFlow], config: &LayoutConfig) -> SankeyLayout {
    let mut nodes: Vec<SankeyNode> = Vec::new();
    let mut roots = Column::new(SankeySide::Source);
    let mut lemmas = Column::new(SankeySide::Target);

    let max_count = flows.iter().map(|f| f.count).max().unwrap_or(0);

    let mut links: Vec<SankeyLink> = flows
        .iter()
        .map(|flow| {
            let source = roots.slot(&flow.root, &mut nodes);
            let target = lemmas.slot(&flow.lemma, &mut nodes);
            SankeyLink {
                source,
                target,
                count: flow.count,
                normalized: if max_count == 0 {
                    0.0
                } else {
                    flow.count as f64 / max_count as f64
                },
                width: flow_width(flow.count, max_count),
                y_source: 0.0,
                y_target: 0.0,
            }
        })
        .collect();

    // Arena indices grow in first-appearance order within each column, so
    // comparing indices compares column order.
    links.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then_with(|| a.target.cmp(&b.target))
            .then_with(|| b.count.cmp(&a.count))
    });

    // Size nodes from their bands.
    let mut band_count = vec![0usize; nodes.len()];
    for link in &links {
        for idx in [link.source, link.target] {
            nodes[idx].height += link.width;
            nodes[idx].total += link.count;
            band_count[idx] += 1;
        }
    }
    for (node, bands) in nodes.iter_mut().zip(&band_count) {
        node.height += config.sankey_flow_gap * bands.saturating_sub(1) as f64;
    }

    let right = config.width - config.sankey_node_width;
    let mut height: f64 = 0.0;
    for (column, x) in [(&roots, 0.0), (&lemmas, right)] {
        let mut y = 0.0;
        for (i, &idx) in column.members.iter().enumerate() {
            if i > 0 {
                y += config.sankey_node_gap;
            }
            nodes[idx].x = x;
            nodes[idx].y = y;
            y += nodes[idx].height;
        }
        height = height.max(y);
    }

    // Stack bands inside each node in link order.
    let mut cursor: Vec<f64> = nodes.iter().map(|n| n.y).collect();
    for link in &mut links {
        link.y_source = cursor[link.source] + link.width / 2.0;
        cursor[link.source] += link.width + config.sankey_flow_gap;
        link.y_target = cursor[link.target] + link.width / 2.0;
        cursor[link.target] += link.width + config.sankey_flow_gap;
    }

    log::trace!(
        "sankey layout: {} flows, {} roots, {} lemmas",
        links.len(),
        roots.members.len(),
        lemmas.members.len()
    );

    SankeyLayout {
        nodes,
        links,
        height,
    }
}
