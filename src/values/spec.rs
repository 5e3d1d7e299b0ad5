//! Raw host values and typed value specification trees.

use smol_str::SmolStr;

use crate::base::ArPath;

/// A loosely-typed host value, the input side of the value builder.
///
/// Mappings preserve insertion order; the builder reports extra keys in
/// the order they were given.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(SmolStr),
    Seq(Vec<RawValue>),
    Map(Vec<(SmolStr, RawValue)>),
}

impl RawValue {
    /// Get a display label for this value's shape.
    pub fn shape_name(&self) -> &'static str {
        match self {
            RawValue::Int(_) | RawValue::Float(_) => "numerical",
            RawValue::Bool(_) => "boolean",
            RawValue::Text(_) => "text",
            RawValue::Seq(_) => "sequence",
            RawValue::Map(_) => "mapping",
        }
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn map<I>(entries: I) -> RawValue
    where
        I: IntoIterator<Item = (&'static str, RawValue)>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (SmolStr::new(k), v))
                .collect(),
        )
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(SmolStr::new(v))
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(v: Vec<RawValue>) -> Self {
        RawValue::Seq(v)
    }
}

/// A numeric literal in a value specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

impl std::fmt::Display for NumberValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberValue::Int(v) => write!(f, "{v}"),
            NumberValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A typed value specification tree, the output side of the value
/// builder. The runtime kind of the root matches the resolved category of
/// the data type it was built against.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    /// A numeric literal (`VALUE` category).
    Numerical {
        label: Option<SmolStr>,
        value: NumberValue,
    },
    /// A text literal, including enum-table symbols.
    Text {
        label: Option<SmolStr>,
        value: SmolStr,
    },
    /// A record value with fields in declared member order (`STRUCTURE`).
    Record {
        label: Option<SmolStr>,
        fields: Vec<ValueSpec>,
    },
    /// A fixed-length array value (`ARRAY`).
    Array {
        label: Option<SmolStr>,
        elements: Vec<ValueSpec>,
    },
    /// A reference to a constant, kept as a reference (AUTOSAR 4 style).
    ConstantRef {
        label: Option<SmolStr>,
        constant_ref: ArPath,
    },
}

impl ValueSpec {
    /// The element label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            ValueSpec::Numerical { label, .. }
            | ValueSpec::Text { label, .. }
            | ValueSpec::Record { label, .. }
            | ValueSpec::Array { label, .. }
            | ValueSpec::ConstantRef { label, .. } => label.as_deref(),
        }
    }

    /// Get a display label for this node's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueSpec::Numerical { .. } => "Numerical",
            ValueSpec::Text { .. } => "Text",
            ValueSpec::Record { .. } => "Record",
            ValueSpec::Array { .. } => "Array",
            ValueSpec::ConstantRef { .. } => "ConstantRef",
        }
    }

    /// Replace the label, returning the modified tree.
    pub fn with_label(mut self, new_label: impl Into<SmolStr>) -> Self {
        let slot = match &mut self {
            ValueSpec::Numerical { label, .. }
            | ValueSpec::Text { label, .. }
            | ValueSpec::Record { label, .. }
            | ValueSpec::Array { label, .. }
            | ValueSpec::ConstantRef { label, .. } => label,
        };
        *slot = Some(new_label.into());
        self
    }
}
