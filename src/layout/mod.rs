//! Layout generators: deterministic geometry for the radial, collocation,
//! force-graph and Sankey views.

pub mod collocation;
pub mod force;
pub mod prng;
pub mod radial;
pub mod sankey;
pub mod scale;

use serde::{Deserialize, Serialize};

use crate::types::{LensError, LensResult};

pub use collocation::{collocation_radial_layout, sector_count, CollocationLayout, CollocationNode};
pub use force::{seed_collocation_graph, ForceGraph, ForceLink, ForceNode};
pub use prng::{hash_str, seed_from, Mulberry32};
pub use radial::{radial_ayah_layout, AyahBar, RadialAyahLayout, RadialRootNode};
pub use sankey::{sankey_layout, flow_width, SankeyLayout, SankeyLink, SankeyNode, SankeySide};
pub use scale::{extent, LinearScale, SqrtScale};

/// A 2D point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset from this point by `distance` at `angle` radians, measured
    /// clockwise from twelve o'clock.
    pub fn polar(&self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + distance * angle.sin(),
            y: self.y - distance * angle.cos(),
        }
    }
}

/// Canvas geometry shared by every layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub min_node_radius: f64,
    pub max_node_radius: f64,
    /// Maximum angular jitter in radians.
    pub jitter: f64,
    pub sankey_node_width: f64,
    /// Vertical gap between Sankey nodes on the same side.
    pub sankey_node_gap: f64,
    /// Vertical gap between flows sharing a Sankey node.
    pub sankey_flow_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            inner_radius: 60.0,
            outer_radius: 360.0,
            min_node_radius: 3.0,
            max_node_radius: 18.0,
            jitter: 0.02,
            sankey_node_width: 14.0,
            sankey_node_gap: 12.0,
            sankey_flow_gap: 2.0,
        }
    }
}

impl LayoutConfig {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Collect every geometric problem into one configuration error.
    pub fn validate(&self) -> LensResult<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(LensError::config(problems.join("; ")))
        }
    }

    /// Every geometric problem, empty when the configuration is usable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.width > 0.0 && self.height > 0.0) {
            problems.push("width and height must be positive".to_string());
        }
        if !(self.inner_radius >= 0.0 && self.inner_radius < self.outer_radius) {
            problems.push("inner_radius must be >= 0 and below outer_radius".to_string());
        }
        if !(self.min_node_radius > 0.0 && self.min_node_radius <= self.max_node_radius) {
            problems.push("node radii must satisfy 0 < min <= max".to_string());
        }
        if !(self.jitter >= 0.0) {
            problems.push("jitter must be >= 0".to_string());
        }
        if !(self.sankey_node_width > 0.0 && self.sankey_node_gap >= 0.0 && self.sankey_flow_gap >= 0.0) {
            problems.push("sankey widths and gaps must be non-negative".to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_clockwise_from_top() {
        let c = Point::new(100.0, 100.0);
        let top = c.polar(0.0, 10.0);
        assert!((top.x - 100.0).abs() < 1e-9 && (top.y - 90.0).abs() < 1e-9);
        let right = c.polar(std::f64::consts::FRAC_PI_2, 10.0);
        assert!((right.x - 110.0).abs() < 1e-9 && (right.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_config_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_collects_problems() {
        let cfg = LayoutConfig {
            inner_radius: 500.0,
            min_node_radius: 30.0,
            ..Default::default()
        };
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("inner_radius"));
        assert!(msg.contains("node radii"));
    }
}
