//! The workspace object model.
//!
//! Everything addressable lives as a [`Node`] in the [`Workspace`] arena:
//! packages, typed elements, interface members, ports, prototypes and
//! connectors. This module owns the namespaces, the append discipline and
//! the error taxonomy; the engines (resolution, value building, com-spec
//! derivation, wiring) live in their own modules and operate on this tree.

pub mod components;
pub mod datatypes;
pub mod error;
pub mod interfaces;
pub mod node;
pub mod package;
pub mod workspace;

#[cfg(test)]
mod tests;

pub use components::{
    AssemblyConnectorData, ComponentData, ComponentKind, ComponentPrototypeData,
    DelegationConnectorData, PortData, PortDirection, PortEndpoint,
};
pub use datatypes::{
    ArrayTypeData, BaseTypeData, CompuMethodData, CompuScale, ConstantData, DataConstraintData,
    IntegerTypeData, RealTypeData, RecordMember, RecordTypeData, StringTypeData, TypeAliasData,
    UnitData,
};
pub use error::{ConflictError, ModelError, ModelWarning, ReferenceError, ValidationError};
pub use interfaces::{
    ArgumentDirection, DataElementData, InterfaceFamily, InterfaceParameterData,
    ModeDeclarationGroupData, ModeGroupData, OperationArgument, OperationData, PortInterfaceData,
};
pub use node::{AdminData, ElementData, Node, NodeId};
pub use package::{PackageData, PackageRole};
pub use workspace::Workspace;
