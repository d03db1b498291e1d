//! Index-based adjacency lists and the pure graph passes used by layout.

use crate::model::{CanonicalEdge, CanonicalNode};
use ahash::AHashMap;
use std::collections::VecDeque;

/// Directed adjacency over node indices. Self-loops and duplicate edges are dropped.
pub(crate) struct LayoutGraph {
    pub(crate) successors: Vec<Vec<usize>>,
    pub(crate) predecessors: Vec<Vec<usize>>,
}

impl LayoutGraph {
    pub(crate) fn new(nodes: &[CanonicalNode], edges: &[CanonicalEdge]) -> Self {
        let index: AHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        for edge in edges {
            let (Some(&u), Some(&v)) = (
                index.get(edge.source_id.as_str()),
                index.get(edge.target_id.as_str()),
            ) else {
                continue;
            };
            if u == v || successors[u].contains(&v) {
                continue;
            }
            successors[u].push(v);
            predecessors[v].push(u);
        }

        Self {
            successors,
            predecessors,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.successors.len()
    }

    /// Weakly-connected components, each listed in breadth-first visit order.
    ///
    /// Components are ordered by their lowest node index, so the result is
    /// deterministic for a given node order.
    pub(crate) fn components(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.len()];
        let mut components = Vec::new();

        for start in 0..self.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut queue = VecDeque::from([start]);
            let mut component = Vec::new();
            while let Some(u) = queue.pop_front() {
                component.push(u);
                for &v in self.successors[u].iter().chain(&self.predecessors[u]) {
                    if !visited[v] {
                        visited[v] = true;
                        queue.push_back(v);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Longest-path ranks for the nodes of one component, by Kahn's algorithm.
    ///
    /// Sources get rank 0 and every edge points from a lower to a strictly
    /// higher rank. Returns `None` if the component contains a cycle.
    pub(crate) fn longest_path_ranks(&self, component: &[usize]) -> Option<AHashMap<usize, usize>> {
        let mut in_degree: AHashMap<usize, usize> = component
            .iter()
            .map(|&u| (u, self.predecessors[u].len()))
            .collect();
        let mut ranks: AHashMap<usize, usize> = component.iter().map(|&u| (u, 0)).collect();

        let mut queue: VecDeque<usize> = component
            .iter()
            .copied()
            .filter(|u| in_degree[u] == 0)
            .collect();
        let mut processed = 0;

        while let Some(u) = queue.pop_front() {
            processed += 1;
            let next_rank = ranks[&u] + 1;
            for &v in &self.successors[u] {
                let rank = ranks.entry(v).or_insert(0);
                *rank = (*rank).max(next_rank);
                if let Some(degree) = in_degree.get_mut(&v) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(v);
                    }
                }
            }
        }

        (processed == component.len()).then_some(ranks)
    }

    /// Directed breadth-first visit order from the component's sources.
    ///
    /// Nodes unreachable from any source (only possible with cycles) are
    /// appended in the component's own order.
    pub(crate) fn visit_order(&self, component: &[usize]) -> Vec<usize> {
        let mut order = Vec::with_capacity(component.len());
        let mut visited: AHashMap<usize, bool> = component.iter().map(|&u| (u, false)).collect();
        let mut queue: VecDeque<usize> = component
            .iter()
            .copied()
            .filter(|&u| self.predecessors[u].is_empty())
            .collect();
        for u in &queue {
            visited.insert(*u, true);
        }

        while let Some(u) = queue.pop_front() {
            order.push(u);
            for &v in &self.successors[u] {
                if let Some(seen) = visited.get_mut(&v) {
                    if !*seen {
                        *seen = true;
                        queue.push_back(v);
                    }
                }
            }
        }

        for &u in component {
            if !visited[&u] {
                order.push(u);
            }
        }
        order
    }
}
