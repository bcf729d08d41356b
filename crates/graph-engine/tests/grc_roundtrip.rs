//! End-to-end converter tests: export a graph, re-import it, and compare
//! the logical content.

use block_registry::{
    BlockDefinition, BlockParameter, BlockRegistry, ParamValue, PortSpec,
};
use graph_engine::editor::EditorSession;
use graph_engine::grc::{
    export_grc, parse_grc, read_flowgraph, validate_grc_file, write_flowgraph, GrcExportOptions,
};
use graph_engine::layout::LayoutOptions;
use graph_engine::types::Position;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn source_definition() -> BlockDefinition {
    BlockDefinition {
        id: "analog_sig_source_x".to_string(),
        label: "Signal Source".to_string(),
        category: Some("Waveform Generators".to_string()),
        flags: Vec::new(),
        parameters: vec![
            BlockParameter {
                id: "type".to_string(),
                label: "Output Type".to_string(),
                dtype: "enum".to_string(),
                default: Some(ParamValue::from("complex")),
                options: Some(vec!["complex".to_string(), "float".to_string()]),
                option_labels: None,
                hide: None,
            },
            BlockParameter {
                id: "freq".to_string(),
                label: "Frequency".to_string(),
                dtype: "real".to_string(),
                default: Some(ParamValue::Int(1000)),
                options: None,
                option_labels: None,
                hide: None,
            },
        ],
        inputs: Vec::new(),
        outputs: vec![PortSpec::stream("${ type }")],
        documentation: None,
        file_format: None,
    }
}

fn sink_definition() -> BlockDefinition {
    BlockDefinition {
        id: "blocks_null_sink".to_string(),
        label: "Null Sink".to_string(),
        category: Some("Misc".to_string()),
        flags: Vec::new(),
        parameters: Vec::new(),
        inputs: vec![PortSpec::stream("complex")],
        outputs: Vec::new(),
        documentation: None,
        file_format: None,
    }
}

fn registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();
    registry.register(source_definition());
    registry.register(sink_definition());
    registry
}

#[test]
fn two_block_scenario_round_trips() {
    init_logging();

    // Two blocks dropped at (0,0) and (200,0), wired out0 -> in0
    let mut session = EditorSession::new();
    let a = session.drop_block(source_definition(), Position::new(0.0, 0.0));
    let b = session.drop_block(sink_definition(), Position::new(200.0, 0.0));
    session.connect(&a, "out0", &b, "in0").unwrap();

    let text = session.save_grc();
    let result = parse_grc(&text, &registry());

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.nodes.len(), 2);
    assert_eq!(result.edges.len(), 1);

    // Instance names and block types survive
    let names: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(names.contains(&a.as_str()));
    assert!(names.contains(&b.as_str()));
    let imported_a = result.nodes.iter().find(|n| n.id == a).unwrap();
    assert_eq!(imported_a.data.block_definition.id, "analog_sig_source_x");
    assert_eq!(imported_a.position, Position::new(0.0, 0.0));

    // The edge reconnects the same logical ports
    let edge = &result.edges[0];
    assert_eq!(edge.source, a);
    assert_eq!(edge.source_handle, "out0");
    assert_eq!(edge.target, b);
    assert_eq!(edge.target_handle, "in0");
}

#[test]
fn round_trip_preserves_names_parameters_and_connections() {
    init_logging();

    let registry = registry();
    let original = r#"
options:
  parameters:
    author: test author
    title: Round Trip
  states:
    coordinate: [8, 8]
    rotation: 0
    state: enabled

blocks:
- name: src_0
  id: analog_sig_source_x
  parameters:
    freq: '4400'
    type: float
  states:
    coordinate: [32, 156]
    rotation: 0
    state: enabled
- name: sink_0
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [288, 156]
    rotation: 180
    state: disabled

connections:
- [src_0, '0', sink_0, '0']

metadata:
  file_format: 1
  grc_version: 3.10.12.0
"#;

    let first = parse_grc(original, &registry);
    assert!(first.warnings.is_empty(), "{:?}", first.warnings);

    let text = export_grc(
        &first.nodes,
        &first.edges,
        GrcExportOptions {
            options: first.options.clone(),
            metadata: first.metadata.clone(),
        },
    );
    let second = parse_grc(&text, &registry);

    // Same block names with the same parameter maps
    assert_eq!(first.nodes.len(), second.nodes.len());
    for (a, b) in first.nodes.iter().zip(&second.nodes) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.data.parameters, b.data.parameters);
        assert_eq!(a.data.enabled, b.data.enabled);
        assert_eq!(a.data.rotation, b.data.rotation);
        assert_eq!(a.position, b.position);
    }

    // Same connection endpoint pairs
    assert_eq!(first.edges.len(), second.edges.len());
    for (a, b) in first.edges.iter().zip(&second.edges) {
        assert_eq!(a.source, b.source);
        assert_eq!(a.source_handle, b.source_handle);
        assert_eq!(a.target, b.target);
        assert_eq!(a.target_handle, b.target_handle);
    }

    // Unmodeled options survive the cycle
    assert_eq!(
        second.options.unwrap().parameters["author"].as_display(),
        "test author"
    );
}

#[test]
fn re_export_is_deterministic() {
    init_logging();

    let registry = registry();
    let mut session = EditorSession::new();
    let a = session.drop_block(source_definition(), Position::new(10.4, 20.6));
    let b = session.drop_block(sink_definition(), Position::new(210.0, 20.0));
    session.connect(&a, "out0", &b, "in0").unwrap();

    let text = session.save_grc();
    let reparsed = parse_grc(&text, &registry);
    let text_again = export_grc(
        &reparsed.nodes,
        &reparsed.edges,
        GrcExportOptions {
            options: reparsed.options,
            metadata: reparsed.metadata,
        },
    );
    assert_eq!(text, text_again);
}

#[test]
fn partial_failure_import_keeps_valid_blocks() {
    init_logging();

    let yaml = r#"
blocks:
- name: good_0
  id: analog_sig_source_x
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled
- name: good_1
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [200, 0]
    rotation: 0
    state: enabled
- name: bad_0
  id: no_such_block_type
  parameters: {}
  states:
    coordinate: [400, 0]
    rotation: 0
    state: enabled

connections:
- [good_0, '0', good_1, '0']
- [bad_0, '0', good_1, '0']

metadata:
  file_format: 1
  grc_version: 3.10.12.0
"#;

    let result = parse_grc(yaml, &registry());
    // Exactly the valid blocks parsed, nothing threw
    assert_eq!(result.nodes.len(), 2);
    assert_eq!(result.edges.len(), 1);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("no_such_block_type")));
    assert!(result.warnings.iter().any(|w| w.contains("bad_0")));
}

#[test]
fn validation_flags_duplicates_in_written_files() {
    init_logging();

    let yaml = r#"
options:
  parameters: {}
  states:
    coordinate: [8, 8]
    rotation: 0
    state: enabled

blocks:
- name: dup
  id: analog_sig_source_x
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled
- name: dup
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [100, 0]
    rotation: 0
    state: enabled

connections: []

metadata:
  file_format: 1
  grc_version: 3.10.12.0
"#;

    let file: graph_engine::grc::GrcFile = serde_yaml::from_str(yaml).unwrap();
    let errors = validate_grc_file(&file).unwrap();
    assert!(errors.iter().any(|e| e.to_string().contains("'dup'")));

    // A clean export validates to the None sentinel
    let session_text = {
        let mut session = EditorSession::new();
        session.drop_block(source_definition(), Position::new(0.0, 0.0));
        session.save_grc()
    };
    let clean: graph_engine::grc::GrcFile = serde_yaml::from_str(&session_text).unwrap();
    assert!(validate_grc_file(&clean).is_none());
}

#[test]
fn save_load_through_the_filesystem() {
    init_logging();

    let registry = registry();
    let mut session = EditorSession::new();
    let a = session.drop_block(source_definition(), Position::new(0.0, 0.0));
    let b = session.drop_block(sink_definition(), Position::new(200.0, 100.0));
    session.connect(&a, "out0", &b, "in0").unwrap();
    session.auto_layout(&LayoutOptions::default());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowgraph.grc");
    write_flowgraph(&path, &session.save_grc()).unwrap();

    let text = read_flowgraph(&path).unwrap();
    let mut fresh = EditorSession::new();
    let warnings = fresh.load_grc(&text, &registry);
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(fresh.graph().nodes().len(), 2);
    assert_eq!(fresh.graph().edges().len(), 1);
    assert!(!fresh.can_undo());
    assert!(!fresh.is_dirty());
}

#[test]
fn imported_parameters_fall_back_to_defaults() {
    init_logging();

    // A file that omits freq entirely: the instance falls back to the
    // declared default via the definition
    let yaml = r#"
blocks:
- name: src_0
  id: analog_sig_source_x
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled

connections: []

metadata:
  file_format: 1
  grc_version: 3.10.12.0
"#;
    let result = parse_grc(yaml, &registry());
    let node = &result.nodes[0];
    assert!(node.data.parameters.is_empty());
    assert_eq!(node.data.parameter("freq"), Some(ParamValue::Int(1000)));

    // Overrides win over declared defaults
    let mut overridden = node.clone();
    overridden
        .data
        .parameters
        .insert("freq".to_string(), ParamValue::from("2e6"));
    assert_eq!(
        overridden.data.parameter("freq"),
        Some(ParamValue::from("2e6"))
    );
}
