//! Port-identifier reconciliation between the file format and handle ids
//!
//! The file addresses stream ports by numeric index into the declared port
//! list and message ports by their explicit id; the editor addresses every
//! port by its derived handle id. Both directions live here so the mapping
//! cannot drift. Identifiers that resolve to no declared port pass through
//! unchanged: lenient by design, so foreign or hand-edited files degrade to
//! opaque strings instead of failing the whole document.

use block_registry::{BlockDefinition, PortSpec};

use crate::ports::{port_handle_id, PortDirection};

fn ports_for(definition: &BlockDefinition, direction: PortDirection) -> &[PortSpec] {
    match direction {
        PortDirection::Input => &definition.inputs,
        PortDirection::Output => &definition.outputs,
    }
}

/// Convert a file port identifier to a handle id.
///
/// Numeric identifiers index the declared port list; non-numeric ones are
/// matched against explicit port ids and derived handles.
pub fn handle_from_file_port(
    definition: &BlockDefinition,
    raw: &str,
    direction: PortDirection,
) -> String {
    let ports = ports_for(definition, direction);

    if let Ok(index) = raw.parse::<usize>() {
        if let Some(port) = ports.get(index) {
            return port_handle_id(port, index, direction);
        }
    }

    for (index, port) in ports.iter().enumerate() {
        if port.id.as_deref() == Some(raw) || port_handle_id(port, index, direction) == raw {
            return raw.to_string();
        }
    }

    log::warn!(
        "port '{raw}' does not resolve on block type '{}', passing through",
        definition.id
    );
    raw.to_string()
}

/// Convert a handle id back to the file format's identifier.
///
/// Ports with an explicit id keep it (the handle is the id); positional
/// ports emit their index as a string.
pub fn file_port_from_handle(
    definition: &BlockDefinition,
    handle: &str,
    direction: PortDirection,
) -> String {
    let ports = ports_for(definition, direction);

    for (index, port) in ports.iter().enumerate() {
        if port_handle_id(port, index, direction) == handle {
            return if port.id.is_some() {
                handle.to_string()
            } else {
                index.to_string()
            };
        }
    }

    log::warn!(
        "handle '{handle}' does not resolve on block type '{}', passing through",
        definition.id
    );
    handle.to_string()
}
