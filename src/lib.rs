//! # autosar-model
//!
//! In-memory AUTOSAR workspace model: a hierarchical package namespace of
//! typed elements with reference resolution, com-spec derivation, value
//! building and composition auto-wiring.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! wiring    → composition auto-connect, unconnected-port scan
//!   ↓
//! comspec   → com-spec types, configs, type-directed derivation
//!   ↓
//! values    → raw host values, value trees, recursive builder
//!   ↓
//! resolve   → path string → node resolution (role-aware)
//!   ↓
//! model     → node arena, packages, workspace, append discipline, errors
//!   ↓
//! base      → primitives (ArPath, SchemaVersion, SchemaEra)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → resolve → values → comspec → wiring)
// ============================================================================

/// Foundation types: ArPath, SchemaVersion, SchemaEra
pub mod base;

/// Workspace object model: arena, namespaces, append discipline, errors
pub mod model;

/// Reference resolution: path strings to live nodes
pub mod resolve;

/// Value building: raw values, value trees, the recursive builder
pub mod values;

/// Communication specifications: types, configs, derivation
pub mod comspec;

/// Composition auto-wiring
pub mod wiring;

// Re-export foundation types
pub use base::{ArPath, SchemaEra, SchemaVersion};

// Re-export the model surface most callers need
pub use model::{
    ComponentKind, ConflictError, ElementData, InterfaceFamily, ModelError, ModelWarning, Node,
    NodeId, PackageRole, PortDirection, ReferenceError, ValidationError, Workspace,
};

pub use comspec::{ComSpec, ComSpecConfig};
pub use values::{RawValue, ValueSpec};
pub use wiring::UnconnectedPort;
