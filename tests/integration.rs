//! Integration tests for flowport
//!
//! End-to-end imports through the public entry points: guard, detection,
//! validation, normalization and layout working together.
//!
mod common;
use common::*;
use flowport::prelude::*;
use serde_json::json;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_zapier_two_steps_end_to_end() {
        let result = import_workflow(ZAPIER_TWO_STEP_JSON).expect("import succeeds");

        assert_eq!(result.metadata.platform, Platform::Zapier);
        assert_eq!(result.metadata.original_name, "Test");
        assert_eq!(result.metadata.node_count, 2);
        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.nodes[0].role, NodeRole::Trigger);
        assert_eq!(result.nodes[1].role, NodeRole::Action);

        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].source_id, "s1");
        assert_eq!(result.edges[0].target_id, "s2");

        // 0.5 + 2
        assert_eq!(result.metadata.estimated_duration_minutes, 2.5);
        assert!(result.nodes.iter().all(|n| n.position.is_some_and(|p| p.is_finite())));
    }

    #[test]
    fn test_make_router_end_to_end() {
        let result = Importer::default()
            .import_value(&make_router_blueprint())
            .unwrap();

        assert_eq!(result.metadata.platform, Platform::Make);
        assert_eq!(result.count_role(NodeRole::Decision), 1);
        assert_eq!(result.count_role(NodeRole::Action), 2);
        let mut labels: Vec<&str> = result.edges.iter().filter_map(|e| e.label.as_deref()).collect();
        labels.sort();
        assert_eq!(labels, ["Route 1", "Route 2"]);
        // 1 + 2 + 2
        assert_eq!(result.metadata.estimated_duration_minutes, 5.0);
        assert_edges_resolve(&result);
    }

    #[test]
    fn test_n8n_dangling_reference_is_parse_error() {
        let text = n8n_dangling_workflow().to_string();
        let err = import_workflow(&text).unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::ParseError);
    }

    #[test]
    fn test_1500_steps_rejected_before_layout() {
        let text = zapier_steps(1500).to_string();
        let err = import_workflow(&text).unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::ParseError);
        assert_eq!(err, ImportError::NodeLimitExceeded { count: 1500, max: 1000 });
    }

    #[test]
    fn test_nested_nodes_count_toward_cap() {
        // 500 routers, each with two routes of one module: 1500 nodes in total.
        let flow: Vec<serde_json::Value> = (0..500)
            .map(|i| {
                json!({
                    "id": i * 3 + 1,
                    "module": "builtin:BasicRouter",
                    "routes": [
                        { "flow": [ { "id": i * 3 + 2, "module": "json:ParseJSON" } ] },
                        { "flow": [ { "id": i * 3 + 3, "module": "json:ParseJSON" } ] }
                    ]
                })
            })
            .collect();
        let root = json!({ "flow": flow });
        let err = Importer::default().import_value(&root).unwrap_err();
        assert_eq!(err, ImportError::NodeLimitExceeded { count: 1500, max: 1000 });
    }

    #[test]
    fn test_unknown_shape_is_unsupported() {
        let err = import_workflow(r#"{"foo":1}"#).unwrap_err();
        assert_eq!(err, ImportError::UnsupportedPlatform);
        assert_eq!(err.code(), ImportErrorCode::UnsupportedPlatform);
        assert!(err.detail().is_none());
    }

    #[test]
    fn test_1001_top_level_nodes_rejected() {
        let err = Importer::default()
            .import_value(&make_chain(1001))
            .unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::ParseError);

        let ok = Importer::default().import_value(&make_chain(1000)).unwrap();
        assert_eq!(ok.nodes.len(), 1000);
        assert_eq!(ok.edges.len(), 999);
    }

    #[test]
    fn test_11_mib_rejected_before_parse() {
        let size = 11 * 1024 * 1024;
        let err = flowport::guard::check_size(size, ImportConfig::default().max_payload_bytes)
            .unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::FileTooLarge);
        assert_eq!(
            err.detail().unwrap(),
            json!({ "size": size, "max": 10 * 1024 * 1024 })
        );

        // Invalid JSON past the limit still reports the size, proving no parse was attempted.
        let mut text = oversized_payload(size);
        text.push_str("{{{");
        let err = import_workflow(&text).unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::FileTooLarge);
    }

    #[test]
    fn test_malformed_json_is_invalid_format() {
        let err = import_workflow("{\"zaps\": [").unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::InvalidFormat);
        let ImportError::InvalidJson { line, .. } = err else {
            panic!("expected an invalid JSON error");
        };
        assert_eq!(line, 1);

        let err = Importer::default().import_bytes(&[0xff, 0xfe, b'{']).unwrap_err();
        assert_eq!(err.code(), ImportErrorCode::InvalidFormat);
    }

    #[test]
    fn test_import_bytes_matches_import_str() {
        let from_bytes = Importer::default()
            .import_bytes(ZAPIER_TWO_STEP_JSON.as_bytes())
            .unwrap();
        let from_str = Importer::default().import_str(ZAPIER_TWO_STEP_JSON).unwrap();
        assert_eq!(from_bytes.nodes, from_str.nodes);
        assert_eq!(from_bytes.edges, from_str.edges);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = import_workflow(ZAPIER_TWO_STEP_JSON).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["metadata"]["platform"], json!("zapier"));
        assert_eq!(value["metadata"]["originalName"], json!("Test"));
        assert_eq!(value["metadata"]["nodeCount"], json!(2));
        assert!(value["metadata"]["importTimestamp"].is_string());
        assert_eq!(value["nodes"][0]["role"], json!("trigger"));
        assert_eq!(value["nodes"][0]["appName"], json!("Zapier"));
        assert!(value["nodes"][0]["platformMetadata"].is_object());
        assert_eq!(value["edges"][0]["sourceId"], json!("s1"));
        assert!(value["edges"][0].get("label").is_none());

        let back: ImportResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_error_report_shape() {
        let err = import_workflow(&n8n_dangling_workflow().to_string()).unwrap_err();
        let report = serde_json::to_value(err.to_report()).unwrap();
        assert_eq!(report["code"], json!("ParseError"));
        assert!(report["message"].as_str().unwrap().contains("Ghost"));
        assert_eq!(report["detail"]["sourceNode"], json!("Start"));
    }

    #[test]
    fn test_discard_source_positions() {
        let importer = Importer::builder().discard_source_positions(true).build();
        let result = importer.import_value(&n8n_if_workflow()).unwrap();

        let start = result.nodes.iter().find(|n| n.label == "Start").unwrap();
        // laid out from scratch: the trigger opens rank 0
        assert_eq!(start.position.unwrap().x, 0.0);
        let notify = result.nodes.iter().find(|n| n.label == "Notify").unwrap();
        assert_ne!(notify.position, Some(Position::new(500.0, -100.0)));
    }

    #[test]
    fn test_authored_layout_survives_import() {
        let (result, summary) = Importer::default()
            .import_with_summary(&n8n_if_workflow())
            .unwrap();
        assert!(summary.skipped());
        let log = result.nodes.iter().find(|n| n.label == "Log").unwrap();
        assert_eq!(log.position, Some(Position::new(500.0, 100.0)));
    }

    #[test]
    fn test_config_from_json() {
        let config = ImportConfig::from_json(
            r#"{ "maxNodes": 2, "layout": { "direction": "topToBottom", "rankSpacing": 40 } }"#,
        )
        .unwrap();
        assert_eq!(config.max_nodes, 2);
        assert_eq!(config.max_payload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.layout.direction, LayoutDirection::TopToBottom);
        assert_eq!(config.layout.rank_spacing, 40.0);
        assert_eq!(config.layout.node_width, 200.0);

        let importer = Importer::new(config);
        let err = importer.import_value(&make_linear_blueprint()).unwrap_err();
        assert_eq!(err, ImportError::NodeLimitExceeded { count: 3, max: 2 });

        assert!(ImportConfig::from_json(r#"{ "maxNode": 2 }"#).is_err());
    }

    #[test]
    fn test_concurrent_imports_share_one_importer() {
        let importer = Importer::default();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| importer.import_value(&make_router_blueprint())))
                .collect();
            for handle in handles {
                let result = handle.join().unwrap().unwrap();
                assert_eq!(result.nodes.len(), 3);
            }
        });
    }
}
