//! Port handle derivation and dtype resolution
//!
//! Handle ids are the stable string keys edges use to address ports. The
//! derivation is a total, order-dependent function of the port list: an
//! explicit `id` wins, then a sanitized `label`, then an index-based
//! fallback. The reverse lookup re-derives candidate handles with the same
//! rule, so the two directions cannot drift apart.

use block_registry::{BlockParameter, ParamValue, PortDomain, PortSpec, StreamDtype};

use crate::types::{BlockInstanceData, GraphNode};

/// Which port list a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Derive the handle id for a port at the given index.
///
/// `{domain: message, id: "cmd"}` yields `"cmd"`; `{label: "Trigger
/// Signal"}` yields `"trigger_signal"`; an anonymous port yields
/// `"in2"`/`"out3"` style ids. Reordering the port list changes the handles
/// of index-based fallbacks.
pub fn port_handle_id(port: &PortSpec, index: usize, direction: PortDirection) -> String {
    if let Some(id) = &port.id {
        return id.clone();
    }
    if let Some(label) = &port.label {
        return label
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
            .collect();
    }
    match direction {
        PortDirection::Input => format!("in{index}"),
        PortDirection::Output => format!("out{index}"),
    }
}

/// Ports to render: optional ports are hidden unless the instance opts in
pub fn visible_ports(ports: &[PortSpec], show_optional: bool) -> Vec<&PortSpec> {
    ports
        .iter()
        .filter(|p| show_optional || !p.is_optional())
        .collect()
}

/// Block-level dtype from the `type` parameter, when the block declares one.
///
/// Resolution order: instance override, declared default, first enumerated
/// option. The resolved value overrides per-port static dtypes for
/// rendering and compatibility checks.
pub fn block_dtype(data: &BlockInstanceData) -> Option<String> {
    let type_param = data.block_definition.parameter("type")?;
    if let Some(value) = data.parameters.get("type") {
        return Some(value.as_display());
    }
    if let Some(default) = &type_param.default {
        return Some(default.as_display());
    }
    type_param
        .options
        .as_ref()
        .and_then(|options| options.first().cloned())
}

/// Whether the instance requests rendering of optional ports.
///
/// The catalog encodes this as a `showports` parameter holding the literal
/// string "True"; that convention is matched verbatim.
pub fn should_show_optional_ports(data: &BlockInstanceData) -> bool {
    data.parameter("showports")
        .is_some_and(|v| v.is_true_literal())
}

fn static_port_dtype(port: &PortSpec) -> Option<String> {
    let dtype = port.dtype.as_ref()?;
    // Template expressions resolve through the block dtype instead
    if dtype.contains("${") {
        return None;
    }
    Some(dtype.clone())
}

/// Resolve the dtype of the port a handle refers to.
///
/// Scans the relevant port list re-deriving each candidate's handle until a
/// match is found (the inverse of [`port_handle_id`]). Message ports have no
/// stream dtype and resolve to `None`.
pub fn port_dtype_from_node(
    node: &GraphNode,
    handle: &str,
    direction: PortDirection,
) -> Option<String> {
    let ports = match direction {
        PortDirection::Input => &node.data.block_definition.inputs,
        PortDirection::Output => &node.data.block_definition.outputs,
    };
    let port = ports
        .iter()
        .enumerate()
        .find(|(index, port)| port_handle_id(port, *index, direction) == handle)
        .map(|(_, port)| port)?;

    if port.domain == PortDomain::Message {
        return None;
    }
    block_dtype(&node.data).or_else(|| static_port_dtype(port))
}

/// Neutral color for untyped or message connections
pub const NEUTRAL_EDGE_COLOR: &str = "#e2e8f0";
/// Distinct color flagging a dtype mismatch (advisory, never blocking)
pub const MISMATCH_EDGE_COLOR: &str = "#ef4444";

/// Display color for a stream dtype
pub fn dtype_color(dtype: &str) -> &'static str {
    match StreamDtype::parse(dtype) {
        Some(StreamDtype::Complex) => "#0ea5e9",
        Some(StreamDtype::Float) => "#fbbf24",
        Some(StreamDtype::Int) => "#4ade80",
        Some(StreamDtype::Short) => "#fef08a",
        Some(StreamDtype::Byte) => "#e879f9",
        None => NEUTRAL_EDGE_COLOR,
    }
}

/// Edge color from the two endpoint dtypes.
///
/// Unknown on either side means compatible (neutral); both known and unequal
/// is flagged as a mismatch. The connection is permitted either way.
pub fn edge_color_from_dtypes(source: Option<&str>, target: Option<&str>) -> &'static str {
    match (source, target) {
        (Some(src), Some(dst)) if src == dst => dtype_color(src),
        (Some(_), Some(_)) => MISMATCH_EDGE_COLOR,
        _ => NEUTRAL_EDGE_COLOR,
    }
}

/// Base height of a rendered block node
pub const BASE_NODE_HEIGHT: f64 = 100.0;
/// Height added per port row
pub const PORT_HEIGHT: f64 = 40.0;

/// Minimum render height for a block given its port counts
pub fn node_height(input_count: usize, output_count: usize) -> f64 {
    BASE_NODE_HEIGHT + PORT_HEIGHT * input_count.max(output_count) as f64
}

/// Declared parameters with instance overrides merged over their defaults,
/// for parameter editors.
pub fn parameters_with_values(
    declared: &[BlockParameter],
    current: &std::collections::BTreeMap<String, ParamValue>,
) -> Vec<BlockParameter> {
    declared
        .iter()
        .map(|param| {
            let mut merged = param.clone();
            if let Some(value) = current.get(&param.id) {
                merged.default = Some(value.clone());
            }
            merged
        })
        .collect()
}
