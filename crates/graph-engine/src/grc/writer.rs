//! Deterministic YAML writer for flowgraph files
//!
//! The interchange format has an idiomatic layout that generic YAML
//! emitters do not produce: flow-style short arrays (coordinates,
//! connection tuples), stable key order, and blank lines between top-level
//! sections. This writer emits exactly that layout; parsing still goes
//! through `serde_yaml`. Parameter maps are ordered, so two exports of the
//! same graph are byte-identical.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use block_registry::ParamValue;

use super::model::{GrcBlock, GrcFile, GrcStates};

/// Render a flowgraph file to its on-disk text form
pub fn write_grc(file: &GrcFile) -> String {
    let mut out = String::new();

    if let Some(options) = &file.options {
        out.push_str("options:\n");
        write_parameters(&mut out, &options.parameters, 1);
        write_states(&mut out, &options.states, 1);
        out.push('\n');
    }

    match file.blocks.as_deref() {
        Some([]) | None => out.push_str("blocks: []\n"),
        Some(blocks) => {
            out.push_str("blocks:\n");
            for block in blocks {
                write_block(&mut out, block);
            }
        }
    }
    out.push('\n');

    if file.connections.is_empty() {
        out.push_str("connections: []\n");
    } else {
        out.push_str("connections:\n");
        for connection in &file.connections {
            let _ = writeln!(
                out,
                "- [{}, {}, {}, {}]",
                plain(connection.source()),
                plain(connection.source_port()),
                plain(connection.target()),
                plain(connection.target_port()),
            );
        }
    }
    out.push('\n');

    if let Some(metadata) = &file.metadata {
        out.push_str("metadata:\n");
        let _ = writeln!(out, "  file_format: {}", metadata.file_format);
        let _ = writeln!(out, "  grc_version: {}", plain(&metadata.grc_version));
    }

    out
}

fn write_block(out: &mut String, block: &GrcBlock) {
    let _ = writeln!(out, "- name: {}", plain(&block.name));
    let _ = writeln!(out, "  id: {}", plain(&block.id));
    write_parameters(out, &block.parameters, 1);
    write_states(out, &block.states, 1);
}

fn write_parameters(out: &mut String, parameters: &BTreeMap<String, ParamValue>, level: usize) {
    let indent = "  ".repeat(level);
    if parameters.is_empty() {
        let _ = writeln!(out, "{indent}parameters: {{}}");
        return;
    }
    let _ = writeln!(out, "{indent}parameters:");
    for (key, value) in parameters {
        let _ = writeln!(out, "{indent}  {}: {}", plain(key), scalar(value));
    }
}

fn write_states(out: &mut String, states: &GrcStates, level: usize) {
    let indent = "  ".repeat(level);
    let _ = writeln!(out, "{indent}states:");
    let _ = writeln!(out, "{indent}  bus_sink: {}", states.bus_sink);
    let _ = writeln!(out, "{indent}  bus_source: {}", states.bus_source);
    match &states.bus_structure {
        Some(s) => {
            let _ = writeln!(out, "{indent}  bus_structure: {}", plain(s));
        }
        None => {
            let _ = writeln!(out, "{indent}  bus_structure: null");
        }
    }
    // The file format requires integer coordinates
    let _ = writeln!(
        out,
        "{indent}  coordinate: [{}, {}]",
        states.coordinate.0.round() as i64,
        states.coordinate.1.round() as i64
    );
    let _ = writeln!(out, "{indent}  rotation: {}", states.rotation);
    let _ = writeln!(out, "{indent}  state: {}", plain(&states.state));
}

fn scalar(value: &ParamValue) -> String {
    match value {
        ParamValue::Null => "null".to_string(),
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::Int(i) => i.to_string(),
        ParamValue::Float(f) => {
            // Keep a decimal point so the value re-parses as a float
            if f.fract() == 0.0 && f.is_finite() {
                format!("{f:.1}")
            } else {
                format!("{f}")
            }
        }
        ParamValue::Text(s) => plain(s),
    }
}

/// Quote a string only when the plain form would not re-parse as the same
/// string: empty, number-like, boolean-like, or containing structural
/// characters.
fn plain(s: &str) -> String {
    if s.contains('\n') {
        let escaped = s
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        return format!("\"{escaped}\"");
    }
    if needs_quote(s) {
        format!("'{}'", s.replace('\'', "''"))
    } else {
        s.to_string()
    }
}

fn needs_quote(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.parse::<f64>().is_ok() {
        return true;
    }
    // Values a YAML 1.1 reader would coerce; the catalog's "True"/"False"
    // strings must survive as strings
    if matches!(
        s,
        "true" | "false" | "True" | "False" | "TRUE" | "FALSE" | "null" | "Null" | "NULL" | "~"
            | "yes" | "no" | "Yes" | "No" | "on" | "off" | "On" | "Off"
    ) {
        return true;
    }
    let first = match s.chars().next() {
        Some(c) => c,
        None => return true,
    };
    if first.is_whitespace() || "!&*?|>%@`\"'#-[]{},".contains(first) {
        return true;
    }
    s.ends_with(char::is_whitespace)
        || s.contains(": ")
        || s.contains(" #")
        || s.contains(['[', ']', '{', '}', ',', ':', '\t'])
}
