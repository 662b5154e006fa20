//! Tests for importing editor document exports into a pipeline graph.
use rensa::prelude::*;

const EDITOR_EXPORT: &str = r#"{
    "nodes": [
        {"id": "input-1", "type": "input", "position": {"x": 0, "y": 120}},
        {
            "id": "fn-1",
            "type": "function-blur",
            "position": {"x": 240, "y": 120},
            "data": {"selectedFunction": "blur", "params": {"kernelSize": 9}}
        },
        {
            "id": "output-1",
            "type": "output",
            "position": {"x": 480, "y": 120},
            "width": 160,
            "height": 80
        }
    ],
    "edges": [
        {"source": "input-1", "target": "fn-1"},
        {"source": "fn-1", "target": "output-1"}
    ]
}"#;

#[test]
fn test_imports_an_editor_export() {
    let document = UiDocument::from_json(EDITOR_EXPORT).expect("Failed to parse");
    let import = document.into_graph().expect("Failed to import");

    assert_eq!(import.graph.node_count(), 3);
    assert_eq!(import.graph.edge_count(), 2);

    let source = import.node_id("input-1").expect("source mapped");
    let stage = import.node_id("fn-1").expect("stage mapped");
    let sink = import.node_id("output-1").expect("sink mapped");

    assert_eq!(import.graph.node(source).unwrap().kind(), NodeKind::Source);
    assert_eq!(import.graph.node(sink).unwrap().kind(), NodeKind::Sink);

    let payload = import
        .graph
        .node(stage)
        .and_then(Node::as_stage)
        .expect("stage payload");
    assert_eq!(payload.op_name, "blur");
    assert_eq!(
        payload.params.get("kernelSize"),
        Some(&ParamValue::Integer(9))
    );

    // Canvas geometry passes through untouched.
    let geometry = import.graph.node(sink).unwrap().geometry;
    assert_eq!(geometry.x, 480.0);
    assert_eq!(geometry.width, Some(160.0));
    assert_eq!(geometry.height, Some(80.0));

    // The imported edges follow the document wiring.
    assert_eq!(
        import.graph.incoming_edge(stage),
        Some(Edge { source, target: stage })
    );
    assert_eq!(
        import.graph.incoming_edge(sink),
        Some(Edge { source: stage, target: sink })
    );
}

#[test]
fn test_selected_function_wins_over_type_suffix() {
    let json = r#"{
        "nodes": [{
            "id": "fn-1",
            "type": "function-blur",
            "data": {"selectedFunction": "canny"}
        }],
        "edges": []
    }"#;
    let import = UiDocument::from_json(json)
        .expect("Failed to parse")
        .into_graph()
        .expect("Failed to import");

    let stage = import.node_id("fn-1").unwrap();
    let payload = import.graph.node(stage).and_then(Node::as_stage).unwrap();
    assert_eq!(payload.op_name, "canny");
}

#[test]
fn test_type_suffix_is_used_without_selected_function() {
    let json = r#"{
        "nodes": [{"id": "fn-1", "type": "function-histogram_equalization"}],
        "edges": []
    }"#;
    let import = UiDocument::from_json(json)
        .expect("Failed to parse")
        .into_graph()
        .expect("Failed to import");

    let stage = import.node_id("fn-1").unwrap();
    let payload = import.graph.node(stage).and_then(Node::as_stage).unwrap();
    assert_eq!(payload.op_name, "histogram_equalization");
    assert!(payload.params.is_empty());
}

#[test]
fn test_duplicate_node_ids_are_rejected() {
    let json = r#"{
        "nodes": [
            {"id": "n", "type": "input"},
            {"id": "n", "type": "output"}
        ],
        "edges": []
    }"#;
    let result = UiDocument::from_json(json)
        .expect("Failed to parse")
        .into_graph();
    match result {
        Err(DocumentError::DuplicateNodeId(id)) => assert_eq!(id, "n"),
        other => panic!("Expected DuplicateNodeId, got {:?}", other),
    }
}

#[test]
fn test_unknown_node_types_are_rejected() {
    for node_type in ["group", "function-sepia"] {
        let json = format!(
            r#"{{"nodes": [{{"id": "n1", "type": "{node_type}"}}], "edges": []}}"#
        );
        let result = UiDocument::from_json(&json)
            .expect("Failed to parse")
            .into_graph();
        match result {
            Err(DocumentError::UnknownNodeType { id, type_name }) => {
                assert_eq!(id, "n1");
                assert_eq!(type_name, node_type);
            }
            other => panic!("Expected UnknownNodeType for '{node_type}', got {:?}", other),
        }
    }
}

#[test]
fn test_edges_must_reference_document_nodes() {
    let json = r#"{
        "nodes": [{"id": "input-1", "type": "input"}],
        "edges": [{"source": "input-1", "target": "ghost"}]
    }"#;
    let result = UiDocument::from_json(json)
        .expect("Failed to parse")
        .into_graph();
    match result {
        Err(DocumentError::UnknownEndpoint { missing, .. }) => assert_eq!(missing, "ghost"),
        other => panic!("Expected UnknownEndpoint, got {:?}", other),
    }
}

#[test]
fn test_fan_in_documents_are_rejected() {
    let json = r#"{
        "nodes": [
            {"id": "input-1", "type": "input"},
            {"id": "input-2", "type": "input"},
            {"id": "output-1", "type": "output"}
        ],
        "edges": [
            {"source": "input-1", "target": "output-1"},
            {"source": "input-2", "target": "output-1"}
        ]
    }"#;
    let result = UiDocument::from_json(json)
        .expect("Failed to parse")
        .into_graph();
    match result {
        Err(DocumentError::InvalidConnection { source, target, .. }) => {
            assert_eq!(source, "input-2");
            assert_eq!(target, "output-1");
        }
        other => panic!("Expected InvalidConnection, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    match UiDocument::from_json("{\"nodes\": [") {
        Err(DocumentError::Json(_)) => {}
        other => panic!("Expected Json error, got {:?}", other),
    }
}
