//! Error types for the workspace model.
//!
//! The taxonomy has three fatal families (reference, conflict, validation)
//! plus a non-fatal warning channel. Fatal errors are always
//! raised synchronously to the immediate caller; warnings accumulate on
//! the workspace (see [`crate::model::Workspace::warnings`]) and never
//! halt an algorithm.

use smol_str::SmolStr;
use thiserror::Error;

/// Top-level error for every fallible model operation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A path string that did not lead to a usable node.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// A segment of the path had no match in the container being walked.
    #[error("unresolved reference '{path}': segment '{segment}' not found")]
    Unresolved { path: String, segment: String },

    /// The path resolved, but to a node of the wrong kind.
    #[error("reference '{path}' resolved to {actual}, expected {expected}")]
    WrongKind {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A `NodeId` whose node has been deleted from the workspace.
    #[error("node is no longer part of the workspace (deleted or foreign id)")]
    DeadNode,
}

/// An append-time collision. The tree is left exactly as before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConflictError {
    /// Same name, different runtime kind.
    #[error(
        "name conflict in '{container}': '{name}' is already a {existing_kind}, \
         cannot append a {incoming_kind} with the same name"
    )]
    KindMismatch {
        container: String,
        name: SmolStr,
        existing_kind: &'static str,
        incoming_kind: &'static str,
    },

    /// Same name and kind, but the definitions differ.
    #[error(
        "conflicting redefinition of {kind} '{name}' in '{container}': \
         existing {existing} vs incoming {incoming}"
    )]
    Redefinition {
        container: String,
        name: SmolStr,
        kind: &'static str,
        existing: String,
        incoming: String,
    },

    /// Demoting a bare sibling would overwrite an existing `_0` name.
    #[error("cannot demote '{name}' in '{container}': '{name}_0' is already taken")]
    DemotionBlocked { container: String, name: SmolStr },
}

/// A semantic constraint violated by otherwise well-formed input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A config field set on a port whose direction does not allow it.
    #[error("field '{field}' is not allowed for a {interface} com-spec on a {direction} port")]
    FieldNotAllowed {
        field: &'static str,
        interface: &'static str,
        direction: &'static str,
    },

    /// A config field (or interface family) gated behind a newer schema era.
    #[error("'{feature}' requires {needed}, but the workspace schema is {actual}")]
    EraNotSupported {
        feature: &'static str,
        needed: &'static str,
        actual: &'static str,
    },

    /// Two fields that may never both be set.
    #[error("'{a}' and '{b}' are mutually exclusive")]
    MutuallyExclusive { a: &'static str, b: &'static str },

    /// A config variant handed to a port bound to a different interface family.
    #[error("a {given} com-spec config cannot apply to {interface} interface '{name}'")]
    ConfigMismatch {
        given: &'static str,
        interface: &'static str,
        name: SmolStr,
    },

    /// A config named a member the bound interface does not have.
    #[error("interface '{interface}' has no member named '{member}'")]
    UnknownMember { interface: SmolStr, member: SmolStr },

    /// No member name given and the interface has more than one candidate.
    #[error("interface '{interface}' has {count} members; a member name is required")]
    AmbiguousMember { interface: SmolStr, count: usize },

    /// Two configs selected the same interface member.
    #[error("duplicate com-spec for member '{member}' of interface '{interface}'")]
    DuplicateComSpec { interface: SmolStr, member: SmolStr },

    /// A declared record member absent from the raw mapping.
    #[error("missing record member '{member}' building a value for '{data_type}'")]
    MissingRecordMember { data_type: String, member: SmolStr },

    /// Raw mapping keys that are not declared members, all listed at once.
    #[error("unexpected record members [{members}] building a value for '{data_type}'")]
    UnexpectedRecordMembers { data_type: String, members: String },

    /// A numerical raw value outside the bound constraint range.
    #[error("value {value} is outside the constraint [{lower}, {upper}] of '{data_type}'")]
    OutOfRange {
        data_type: String,
        value: String,
        lower: String,
        upper: String,
    },

    /// A raw value with no row in the bound enumeration table.
    #[error("'{given}' has no entry in the enumeration table bound to '{data_type}'")]
    NotInEnumTable { data_type: String, given: String },

    /// The raw host value's shape does not fit the data type's category.
    #[error("expected a {expected} raw value for '{data_type}', got {got}")]
    RawShapeMismatch {
        data_type: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A type-reference chain that loops back on itself.
    #[error("type reference cycle while resolving '{data_type}'")]
    TypeReferenceCycle { data_type: String },

    /// Connector endpoints bound to different interfaces.
    #[error("connector endpoints bind different interfaces: '{provider}' vs '{requester}'")]
    InterfaceMismatch { provider: String, requester: String },

    /// Delegation between ports of different polarity.
    #[error("delegation requires matching polarity: inner port is {inner}, outer port is {outer}")]
    PolarityMismatch {
        inner: &'static str,
        outer: &'static str,
    },

    /// A role name outside the closed role enum.
    #[error("unknown package role '{0}'")]
    UnknownRole(String),

    /// An operation needed a role's package path, but none is configured.
    #[error("no package path configured for role {role}")]
    RoleNotConfigured { role: &'static str },
}

/// Non-fatal findings, reported on the workspace side channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelWarning {
    /// Several components provide a port of the same name during wiring;
    /// the name-sorted first was used as the matching candidate.
    #[error(
        "port '{port}' is provided by {} components; using '{chosen}' as the candidate",
        .ignored.len() + 1
    )]
    DuplicateProvider {
        port: SmolStr,
        chosen: SmolStr,
        ignored: Vec<SmolStr>,
    },

    /// A raw sequence shorter or longer than the declared array length.
    #[error("array value for '{data_type}' has {actual} elements, declared length is {expected}")]
    ArrayLengthMismatch {
        data_type: String,
        expected: u32,
        actual: usize,
    },
}
