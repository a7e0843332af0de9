//! Force-graph seeding: an index-based node arena handed to a physics step.
//!
//! Nodes refer to their parent by arena index, never by owning pointer. A
//! physics step reads and writes positions through [`ForceGraph::set_position`]
//! by index; pinned nodes ignore those writes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::collocation::CollocationLayout;

/// A simulated node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceNode {
    pub id: String,
    /// Arena index of the parent node, if any.
    pub parent: Option<usize>,
    /// Seed position (anchor angle and distance resolved to pixels).
    pub anchor: (f64, f64),
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Fixed position. A pinned node never moves.
    pub pinned: Option<(f64, f64)>,
}

/// A spring between two arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceLink {
    pub source: usize,
    pub target: usize,
    /// Rest length.
    pub distance: f64,
}

/// Node arena plus links.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForceGraph {
    nodes: Vec<ForceNode>,
    links: Vec<ForceLink>,
    #[serde(skip)]
    id_to_idx: HashMap<String, usize>,
}

impl ForceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at its anchor and return its arena index. An existing id
    /// returns the existing index unchanged.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        anchor: (f64, f64),
        radius: f64,
        parent: Option<usize>,
    ) -> usize {
        let id = id.into();
        if let Some(&idx) = self.id_to_idx.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.id_to_idx.insert(id.clone(), idx);
        self.nodes.push(ForceNode {
            id,
            parent: parent.filter(|&p| p < idx),
            anchor,
            x: anchor.0,
            y: anchor.1,
            radius,
            pinned: None,
        });
        idx
    }

    /// Fix a node at a position for as long as it stays pinned.
    pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.pinned = Some((x, y));
            node.x = x;
            node.y = y;
        }
    }

    pub fn unpin(&mut self, idx: usize) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.pinned = None;
        }
    }

    /// Move a node. Returns `false` (and leaves it in place) when the node
    /// is pinned or the index is out of range.
    pub fn set_position(&mut self, idx: usize, x: f64, y: f64) -> bool {
        match self.nodes.get_mut(idx) {
            Some(node) if node.pinned.is_none() => {
                node.x = x;
                node.y = y;
                true
            }
            _ => false,
        }
    }

    /// Connect two distinct nodes. Out-of-range indices are ignored.
    pub fn link(&mut self, source: usize, target: usize, distance: f64) {
        if source < self.nodes.len() && target < self.nodes.len() && source != target {
            self.links.push(ForceLink {
                source,
                target,
                distance,
            });
        }
    }

    pub fn nodes(&self) -> &[ForceNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }

    pub fn node(&self, idx: usize) -> Option<&ForceNode> {
        self.nodes.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.id_to_idx.get(id).copied()
    }

    /// Parent of a node, looked up through the arena.
    pub fn parent_of(&self, idx: usize) -> Option<&ForceNode> {
        self.nodes.get(idx)?.parent.and_then(|p| self.nodes.get(p))
    }

    /// Arena indices of a node's children, in insertion order.
    pub fn children_of(&self, idx: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(idx))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of links touching each node, indexed like [`Self::nodes`].
    pub fn degrees(&self) -> Vec<usize> {
        let mut degree = vec![0usize; self.nodes.len()];
        for link in &self.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        degree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Seed a force graph from a collocation layout: the target is pinned at
/// the centre and each collocate starts at its anchor angle and distance,
/// linked to the target with that distance as rest length.
pub fn seed_collocation_graph(layout: &CollocationLayout) -> ForceGraph {
    let mut graph = ForceGraph::new();
    let c = layout.center;
    let target = graph.add_node(layout.target.value.clone(), (c.x, c.y), 0.0, None);
    graph.pin(target, c.x, c.y);

    for node in &layout.nodes {
        let idx = graph.add_node(node.id.clone(), (node.x, node.y), node.r, Some(target));
        graph.link(target, idx, node.distance);
    }
    log::trace!(
        "seeded force graph for {}: {} nodes, {} links",
        layout.target,
        graph.len(),
        graph.links.len()
    );
    graph
}
