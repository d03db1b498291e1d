//! Layered layout for canonical graphs.
//!
//! The graph is split into weakly-connected components. A component whose
//! nodes all carry author-supplied positions is left untouched; every other
//! component gets a longest-path layered layout (or a sequential fallback if
//! it contains a cycle) and is stacked along the secondary axis, one margin
//! apart from everything placed before it.

use crate::config::{LayoutConfig, LayoutDirection};
use crate::model::{CanonicalEdge, CanonicalNode, Position};
use itertools::Itertools;

mod geometry;
mod graph;

pub use geometry::Rect;
use graph::LayoutGraph;

/// What a layout pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSummary {
    /// Weakly-connected components in the graph.
    pub components: usize,
    /// Components that received computed positions.
    pub laid_out: usize,
    /// Components placed sequentially because they could not be ranked.
    pub fallbacks: usize,
    /// Bounding box of every component, in component order.
    pub bounds: Vec<Rect>,
}

impl LayoutSummary {
    /// True if every node kept its author-supplied position.
    pub fn skipped(&self) -> bool {
        self.laid_out == 0
    }
}

/// Node position along the rank axis (primary) and within the rank (secondary).
#[derive(Debug, Clone, Copy)]
struct Placement {
    node: usize,
    primary: f64,
    secondary: f64,
}

/// A component laid out in local coordinates, with its extent.
struct LocalLayout {
    placements: Vec<Placement>,
    primary_extent: f64,
    secondary_extent: f64,
    ranked: bool,
}

/// Assigns positions to canonical nodes.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The box a node occupies at its current position, if it has one.
    pub fn node_rect(&self, node: &CanonicalNode) -> Option<Rect> {
        let (width, height) = self.config.node_size(node.role);
        node.position
            .map(|p| Rect::new(p.x, p.y, width, height))
    }

    /// Gives every node a finite position. Ids and edges are never changed.
    pub fn apply(&self, nodes: &mut [CanonicalNode], edges: &[CanonicalEdge]) -> LayoutSummary {
        let mut summary = LayoutSummary::default();
        if nodes.iter().all(|n| n.position.is_some_and(|p| p.is_finite())) {
            log::debug!("All {} node(s) carry positions; skipping layout", nodes.len());
            let graph = LayoutGraph::new(nodes, edges);
            let components = graph.components();
            summary.components = components.len();
            summary.bounds = components
                .iter()
                .filter_map(|c| self.bounds_of(nodes, c))
                .collect();
            return summary;
        }

        let graph = LayoutGraph::new(nodes, edges);
        let components = graph.components();
        summary.components = components.len();

        let (preserved, pending): (Vec<&Vec<usize>>, Vec<&Vec<usize>>) = components
            .iter()
            .partition(|c| c.iter().all(|&i| nodes[i].position.is_some_and(|p| p.is_finite())));

        // Laid-out components start one margin past the far edge of anything preserved.
        let mut cursor = preserved
            .iter()
            .filter_map(|c| self.bounds_of(nodes, c))
            .map(|r| self.secondary_end(&r) + self.config.component_margin)
            .fold(0.0_f64, f64::max);

        for component in pending {
            let local = match graph.longest_path_ranks(component) {
                Some(ranks) => self.layered(nodes, &graph, component, &ranks),
                None => {
                    log::warn!(
                        "Component of {} node(s) contains a cycle; placing it sequentially",
                        component.len()
                    );
                    self.sequential(nodes, component)
                }
            };
            if !local.ranked {
                summary.fallbacks += 1;
            }
            for placement in &local.placements {
                nodes[placement.node].position =
                    Some(self.to_position(placement.primary, placement.secondary + cursor));
            }
            cursor += local.secondary_extent + self.config.component_margin;
            summary.laid_out += 1;
            log::debug!(
                "Laid out component of {} node(s): {:.0} x {:.0}",
                component.len(),
                local.primary_extent,
                local.secondary_extent
            );
        }

        summary.bounds = components
            .iter()
            .filter_map(|c| self.bounds_of(nodes, c))
            .collect();
        summary
    }

    /// Longest-path layering; within a rank, nodes follow first-visit order.
    fn layered(
        &self,
        nodes: &[CanonicalNode],
        graph: &LayoutGraph,
        component: &[usize],
        ranks: &ahash::AHashMap<usize, usize>,
    ) -> LocalLayout {
        let rank_count = ranks.values().copied().max().map_or(0, |r| r + 1);
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
        for node in graph.visit_order(component) {
            buckets[ranks[&node]].push(node);
        }

        let extents = |i: usize| self.extents(&nodes[i]);
        let rank_depth: Vec<f64> = buckets
            .iter()
            .map(|bucket| bucket.iter().map(|&i| extents(i).0).fold(0.0, f64::max))
            .collect();
        let rank_breadth: Vec<f64> = buckets
            .iter()
            .map(|bucket| {
                let sizes: f64 = bucket.iter().map(|&i| extents(i).1).sum();
                sizes + self.config.node_spacing * bucket.len().saturating_sub(1) as f64
            })
            .collect();
        let secondary_extent = rank_breadth.iter().copied().fold(0.0, f64::max);

        let mut placements = Vec::with_capacity(component.len());
        let mut rank_start = 0.0;
        for (rank, bucket) in buckets.iter().enumerate() {
            let mut offset = (secondary_extent - rank_breadth[rank]) / 2.0;
            for &node in bucket {
                let (depth, breadth) = extents(node);
                placements.push(Placement {
                    node,
                    primary: rank_start + (rank_depth[rank] - depth) / 2.0,
                    secondary: offset,
                });
                offset += breadth + self.config.node_spacing;
            }
            rank_start += rank_depth[rank] + self.config.rank_spacing;
        }

        let primary_extent = rank_depth.iter().sum::<f64>()
            + self.config.rank_spacing * rank_count.saturating_sub(1) as f64;
        LocalLayout {
            placements,
            primary_extent,
            secondary_extent,
            ranked: true,
        }
    }

    /// One row along the primary axis at a fixed pitch, in traversal order.
    fn sequential(&self, nodes: &[CanonicalNode], component: &[usize]) -> LocalLayout {
        let widest = component
            .iter()
            .map(|&i| self.extents(&nodes[i]).0)
            .fold(0.0, f64::max);
        let pitch = self.config.fallback_pitch.max(widest + self.config.node_spacing);
        let secondary_extent = component
            .iter()
            .map(|&i| self.extents(&nodes[i]).1)
            .fold(0.0, f64::max);

        let placements = component
            .iter()
            .enumerate()
            .map(|(step, &node)| Placement {
                node,
                primary: step as f64 * pitch,
                secondary: 0.0,
            })
            .collect_vec();
        LocalLayout {
            primary_extent: pitch * component.len().saturating_sub(1) as f64 + widest,
            placements,
            secondary_extent,
            ranked: false,
        }
    }

    /// (primary, secondary) size of a node's box.
    fn extents(&self, node: &CanonicalNode) -> (f64, f64) {
        let (width, height) = self.config.node_size(node.role);
        match self.config.direction {
            LayoutDirection::LeftToRight => (width, height),
            LayoutDirection::TopToBottom => (height, width),
        }
    }

    fn to_position(&self, primary: f64, secondary: f64) -> Position {
        match self.config.direction {
            LayoutDirection::LeftToRight => Position::new(primary, secondary),
            LayoutDirection::TopToBottom => Position::new(secondary, primary),
        }
    }

    fn secondary_end(&self, rect: &Rect) -> f64 {
        match self.config.direction {
            LayoutDirection::LeftToRight => rect.bottom(),
            LayoutDirection::TopToBottom => rect.right(),
        }
    }

    fn bounds_of(&self, nodes: &[CanonicalNode], component: &[usize]) -> Option<Rect> {
        Rect::enclosing(component.iter().filter_map(|&i| self.node_rect(&nodes[i])))
    }
}

/// Weakly-connected components of a canonical graph, as lists of node ids.
pub fn connected_components(nodes: &[CanonicalNode], edges: &[CanonicalEdge]) -> Vec<Vec<String>> {
    LayoutGraph::new(nodes, edges)
        .components()
        .into_iter()
        .map(|c| c.into_iter().map(|i| nodes[i].id.clone()).collect())
        .collect()
}
