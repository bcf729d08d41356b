//! Block catalog types
//!
//! These types describe signal-processing block definitions as delivered by
//! the external catalog (one entry per block descriptor file). Definitions
//! are immutable: the editor only ever reads them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar parameter value as it appears in catalog and flowgraph files.
///
/// The catalog keys parameter values by an open-ended set of dtypes, so the
/// runtime representation is a tagged scalar rather than a stringly union.
/// Untagged serde keeps file scalars round-tripping verbatim: quoted text
/// stays text, plain numbers stay numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit YAML/JSON null
    Null,
    /// Real boolean (`true`/`false`)
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// Text scalar (including the catalog's "True"/"False" convention)
    Text(String),
}

impl ParamValue {
    /// Render the value the way parameter editors display it
    pub fn as_display(&self) -> String {
        match self {
            ParamValue::Null => String::new(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }

    /// Borrow the text content, if this is a text scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True when the value is the literal string `"True"`.
    ///
    /// Several catalog parameters (`showports` among them) encode booleans as
    /// the strings "True"/"False". That convention is external and fixed, so
    /// it is matched verbatim rather than coerced.
    pub fn is_true_literal(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s == "True")
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// Whether a port carries sample streams or asynchronous messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDomain {
    Stream,
    Message,
}

/// The closed set of stream dtypes that drive port coloring and
/// compatibility checks. Anything outside it (template expressions, vector
/// types, absent dtypes) is treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDtype {
    Complex,
    Float,
    Int,
    Short,
    Byte,
}

impl StreamDtype {
    /// Parse a catalog dtype string; `None` for anything outside the set
    pub fn parse(dtype: &str) -> Option<Self> {
        match dtype {
            "complex" => Some(Self::Complex),
            "float" => Some(Self::Float),
            "int" => Some(Self::Int),
            "short" => Some(Self::Short),
            "byte" => Some(Self::Byte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complex => "complex",
            Self::Float => "float",
            Self::Int => "int",
            Self::Short => "short",
            Self::Byte => "byte",
        }
    }
}

/// Declared parameter dtypes from the catalog, enumerated explicitly.
///
/// The raw string stays on [`BlockParameter::dtype`] for round-tripping;
/// this is the classification the editor reasons about. `Other` carries
/// nothing: a dtype the taxonomy does not know is rendered as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDtype {
    Int,
    Float,
    Real,
    Enum,
    /// Boolean encoded as the literal strings "True"/"False"
    Bool,
    String,
    Raw,
    Id,
    Other,
}

impl ParamDtype {
    pub fn parse(dtype: &str) -> Self {
        match dtype {
            "int" => Self::Int,
            "float" => Self::Float,
            "real" => Self::Real,
            "enum" => Self::Enum,
            "bool" => Self::Bool,
            "string" => Self::String,
            "raw" => Self::Raw,
            "id" => Self::Id,
            _ => Self::Other,
        }
    }
}

/// The `optional` flag on a port spec.
///
/// Catalog descriptors write this either as a real boolean or as the
/// "True"/"False" strings; both forms are accepted and preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionalFlag {
    Bool(bool),
    Text(String),
}

impl OptionalFlag {
    /// Whether the flag marks the port as optional
    pub fn is_set(&self) -> bool {
        match self {
            OptionalFlag::Bool(b) => *b,
            OptionalFlag::Text(s) => matches!(s.as_str(), "True" | "true" | "1"),
        }
    }
}

/// A declared input or output port on a block definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Stream or message domain
    pub domain: PortDomain,
    /// Static data type; may be a template expression resolved per instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
    /// Explicit port identifier (message ports usually carry one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Vector length passthrough
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlen: Option<ParamValue>,
    /// Multiplicity passthrough
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<ParamValue>,
    /// Whether the port is hidden unless the instance opts in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<OptionalFlag>,
}

impl PortSpec {
    /// Convenience constructor for a plain stream port
    pub fn stream(dtype: impl Into<String>) -> Self {
        Self {
            domain: PortDomain::Stream,
            dtype: Some(dtype.into()),
            id: None,
            label: None,
            vlen: None,
            multiplicity: None,
            optional: None,
        }
    }

    /// Convenience constructor for a named message port
    pub fn message(id: impl Into<String>) -> Self {
        Self {
            domain: PortDomain::Message,
            dtype: None,
            id: Some(id.into()),
            label: None,
            vlen: None,
            multiplicity: None,
            optional: None,
        }
    }

    /// Whether this port is flagged optional
    pub fn is_optional(&self) -> bool {
        self.optional.as_ref().is_some_and(OptionalFlag::is_set)
    }
}

/// A declared block parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockParameter {
    /// Parameter identifier, unique within the block
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Declared dtype (`int`, `float`, `real`, `enum`, `string`, `raw`, ...)
    pub dtype: String,
    /// Declared default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    /// Enumerated value choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Display labels matching `options` by index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_labels: Option<Vec<String>>,
    /// Visibility predicate expression, evaluated by the parameter editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<String>,
}

impl BlockParameter {
    /// Classify the declared dtype against the known taxonomy
    pub fn param_dtype(&self) -> ParamDtype {
        ParamDtype::parse(&self.dtype)
    }
}

/// Static description of a block type, as parsed from its descriptor file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Type identifier, unique within the catalog
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Category path for palette grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form flags such as "deprecated"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Ordered parameter declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<BlockParameter>,
    /// Ordered input port declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<PortSpec>,
    /// Ordered output port declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PortSpec>,
    /// Documentation text from the descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Descriptor file format revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<u32>,
}

impl BlockDefinition {
    /// Look up a declared parameter by id
    pub fn parameter(&self, id: &str) -> Option<&BlockParameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// Whether the definition carries the given flag
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// The full catalog payload as produced by the descriptor-parsing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    /// Timestamp the payload was generated at
    #[serde(default)]
    pub generated_at: String,
    /// Number of blocks in the payload
    #[serde(default)]
    pub total_blocks: usize,
    /// All category paths present in the payload
    #[serde(default)]
    pub categories: Vec<String>,
    /// All block definitions
    pub blocks: Vec<BlockDefinition>,
    /// Definitions grouped by category; rebuilt locally when absent
    #[serde(default, rename = "blocksByCategory")]
    pub blocks_by_category: BTreeMap<String, Vec<BlockDefinition>>,
}
