//! Layout engine tests
//!
//! Finite positions, rank ordering, component separation and the cycle fallback.
mod common;
use common::*;
use flowport::layout::connected_components;
use flowport::prelude::*;

#[cfg(test)]
mod layout_tests {
    use super::*;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default())
    }

    fn position(nodes: &[CanonicalNode], id: &str) -> Position {
        nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.position)
            .unwrap()
    }

    fn assert_all_finite(nodes: &[CanonicalNode]) {
        for node in nodes {
            let p = node.position.expect("every node is positioned");
            assert!(p.is_finite(), "node {} has non-finite position {:?}", node.id, p);
        }
    }

    fn assert_no_component_overlap(summary: &LayoutSummary) {
        for (i, a) in summary.bounds.iter().enumerate() {
            for b in &summary.bounds[i + 1..] {
                assert!(!a.intersects(b), "components overlap: {:?} and {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_chain_ranks_advance_left_to_right() {
        let mut nodes = vec![
            node("a", NodeRole::Trigger),
            node("b", NodeRole::Action),
            node("c", NodeRole::Action),
        ];
        let edges = vec![edge("a", "b"), edge("b", "c")];
        let summary = engine().apply(&mut nodes, &edges);

        assert_all_finite(&nodes);
        assert_eq!(summary.components, 1);
        assert_eq!(summary.laid_out, 1);
        assert_eq!(summary.fallbacks, 0);
        assert!(position(&nodes, "a").x < position(&nodes, "b").x);
        assert!(position(&nodes, "b").x < position(&nodes, "c").x);
        assert_eq!(position(&nodes, "a").x, 0.0);
        // default width 200 plus rank spacing 100
        assert_eq!(position(&nodes, "b").x, 300.0);
    }

    #[test]
    fn test_source_rank_below_target_with_skip_edge() {
        // a -> b -> c and a -> c: c sits on the longest path, rank 2.
        let mut nodes = vec![
            node("a", NodeRole::Trigger),
            node("b", NodeRole::Action),
            node("c", NodeRole::Action),
        ];
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("a", "c")];
        engine().apply(&mut nodes, &edges);
        for e in &edges {
            assert!(position(&nodes, &e.source_id).x < position(&nodes, &e.target_id).x);
        }
    }

    #[test]
    fn test_branches_share_a_rank() {
        let mut nodes = vec![
            node("router", NodeRole::Decision),
            node("left", NodeRole::Action),
            node("right", NodeRole::Action),
        ];
        let edges = vec![edge("router", "left"), edge("router", "right")];
        engine().apply(&mut nodes, &edges);

        let left = position(&nodes, "left");
        let right = position(&nodes, "right");
        assert_eq!(left.x, right.x);
        // first-visit order keeps "left" above "right"
        assert!(left.y < right.y);
        // decision box is 240 wide
        assert_eq!(left.x, 340.0);
    }

    #[test]
    fn test_top_to_bottom_direction() {
        let config = LayoutConfig {
            direction: LayoutDirection::TopToBottom,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![node("a", NodeRole::Trigger), node("b", NodeRole::Action)];
        let edges = vec![edge("a", "b")];
        LayoutEngine::new(config).apply(&mut nodes, &edges);

        let a = position(&nodes, "a");
        let b = position(&nodes, "b");
        assert_eq!(a.x, b.x);
        assert_eq!(b.y, 180.0);
    }

    #[test]
    fn test_disconnected_components_do_not_overlap() {
        let mut nodes = vec![
            node("a1", NodeRole::Trigger),
            node("a2", NodeRole::Decision),
            node("a3", NodeRole::Action),
            node("a4", NodeRole::Action),
            node("b1", NodeRole::Trigger),
            node("b2", NodeRole::Action),
            node("lonely", NodeRole::Action),
        ];
        let edges = vec![
            edge("a1", "a2"),
            edge("a2", "a3"),
            edge("a2", "a4"),
            edge("b1", "b2"),
        ];
        let summary = engine().apply(&mut nodes, &edges);

        assert_all_finite(&nodes);
        assert_eq!(summary.components, 3);
        assert_eq!(summary.laid_out, 3);
        assert_eq!(summary.bounds.len(), 3);
        assert_no_component_overlap(&summary);

        // stacked with at least the configured margin between them
        let margin = LayoutConfig::default().component_margin;
        assert!(summary.bounds[1].y >= summary.bounds[0].bottom() + margin);
        assert!(summary.bounds[2].y >= summary.bounds[1].bottom() + margin);
    }

    #[test]
    fn test_cycle_falls_back_to_sequential() {
        let mut nodes = vec![
            node("a", NodeRole::Action),
            node("b", NodeRole::Action),
            node("c", NodeRole::Action),
        ];
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a")];
        let summary = engine().apply(&mut nodes, &edges);

        assert_all_finite(&nodes);
        assert_eq!(summary.fallbacks, 1);
        let ys: Vec<f64> = nodes.iter().map(|n| n.position.unwrap().y).collect();
        assert!(ys.iter().all(|&y| y == ys[0]));
        let mut xs: Vec<f64> = nodes.iter().map(|n| n.position.unwrap().x).collect();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs, [0.0, 300.0, 600.0]);
    }

    #[test]
    fn test_cycle_next_to_dag_does_not_overlap() {
        let mut nodes = vec![
            node("x", NodeRole::Trigger),
            node("y", NodeRole::Action),
            node("p", NodeRole::Decision),
            node("q", NodeRole::Action),
        ];
        let edges = vec![edge("x", "y"), edge("p", "q"), edge("q", "p")];
        let summary = engine().apply(&mut nodes, &edges);
        assert_eq!(summary.fallbacks, 1);
        assert_no_component_overlap(&summary);
    }

    #[test]
    fn test_fully_positioned_graph_is_untouched() {
        let mut nodes = vec![
            positioned("a", NodeRole::Trigger, 13.0, 17.0),
            positioned("b", NodeRole::Action, -400.0, 900.0),
        ];
        let before = nodes.clone();
        let edges = vec![edge("a", "b")];
        let summary = engine().apply(&mut nodes, &edges);

        assert!(summary.skipped());
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_positioned_component_preserved_beside_laid_out_one() {
        let mut nodes = vec![
            positioned("a", NodeRole::Trigger, 0.0, 0.0),
            positioned("b", NodeRole::Action, 300.0, 0.0),
            node("c", NodeRole::Trigger),
            node("d", NodeRole::Action),
        ];
        let edges = vec![edge("a", "b"), edge("c", "d")];
        let summary = engine().apply(&mut nodes, &edges);

        assert_eq!(summary.laid_out, 1);
        assert_eq!(position(&nodes, "a"), Position::new(0.0, 0.0));
        assert_eq!(position(&nodes, "b"), Position::new(300.0, 0.0));
        assert_all_finite(&nodes);
        assert_no_component_overlap(&summary);
    }

    #[test]
    fn test_partially_positioned_component_is_laid_out() {
        let mut nodes = vec![
            positioned("a", NodeRole::Trigger, 5000.0, 5000.0),
            node("b", NodeRole::Action),
        ];
        let edges = vec![edge("a", "b")];
        engine().apply(&mut nodes, &edges);
        assert_eq!(position(&nodes, "a"), Position::new(0.0, 0.0));
        assert_all_finite(&nodes);
    }

    #[test]
    fn test_ids_and_edges_unchanged() {
        let mut nodes = vec![node("a", NodeRole::Trigger), node("b", NodeRole::Action)];
        let edges = vec![edge("a", "b")];
        let ids_before: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let edges_before = edges.clone();
        engine().apply(&mut nodes, &edges);

        let ids_after: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(edges, edges_before);
    }

    #[test]
    fn test_connected_components_ignore_direction() {
        let nodes = vec![
            node("a", NodeRole::Action),
            node("b", NodeRole::Action),
            node("c", NodeRole::Action),
            node("d", NodeRole::Action),
        ];
        // a -> b <- c, d alone
        let edges = vec![edge("a", "b"), edge("c", "b")];
        let components = connected_components(&nodes, &edges);
        assert_eq!(components.len(), 2);
        let mut first = components[0].clone();
        first.sort();
        assert_eq!(first, ["a", "b", "c"]);
        assert_eq!(components[1], ["d"]);
    }

    #[test]
    fn test_empty_graph() {
        let mut nodes: Vec<CanonicalNode> = Vec::new();
        let summary = engine().apply(&mut nodes, &[]);
        assert_eq!(summary.components, 0);
        assert!(summary.bounds.is_empty());
    }
}
