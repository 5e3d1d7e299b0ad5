//! Arena node storage.
//!
//! Every addressable thing in a workspace (packages, elements, interface
//! members, ports, prototypes, connectors) is a [`Node`] in the workspace
//! arena, addressed by [`NodeId`]. The owner edge is a non-owning
//! back-pointer into the same arena, so the tree has no reference cycles.

use indexmap::IndexMap;
use smol_str::SmolStr;
use uuid::Uuid;

use super::components::{
    AssemblyConnectorData, ComponentData, ComponentPrototypeData, DelegationConnectorData,
    PortData,
};
use super::datatypes::{
    ArrayTypeData, BaseTypeData, CompuMethodData, ConstantData, DataConstraintData,
    IntegerTypeData, RealTypeData, StringTypeData, RecordTypeData, TypeAliasData, UnitData,
};
use super::interfaces::{
    DataElementData, InterfaceParameterData, ModeDeclarationGroupData, ModeGroupData,
    OperationData, PortInterfaceData,
};
use super::package::PackageData;

/// Unique identifier for a node in the workspace arena.
/// Uses u32 for compact storage (supports ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Administrative data carried by an element, opaque to the engine.
///
/// The XML layer round-trips this; the resolution engine only stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminData {
    /// Special data groups as (GID, value) pairs.
    pub sdgs: Vec<(SmolStr, SmolStr)>,
}

/// A named node in the workspace tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: SmolStr,
    pub(crate) owner: Option<NodeId>,
    pub(crate) category: Option<SmolStr>,
    pub(crate) admin_data: Option<AdminData>,
    pub(crate) uuid: Uuid,
    pub(crate) data: ElementData,
    /// Owned named members, ordered and name-unique. For a package this
    /// holds its elements; sub-packages live in their own namespace on
    /// [`PackageData`].
    pub(crate) children: IndexMap<SmolStr, NodeId>,
}

impl Node {
    pub(crate) fn new(name: impl Into<SmolStr>, data: ElementData) -> Self {
        Self {
            name: name.into(),
            owner: None,
            category: None,
            admin_data: None,
            uuid: Uuid::new_v4(),
            data,
            children: IndexMap::new(),
        }
    }

    pub(crate) fn with_category(mut self, category: &str) -> Self {
        self.category = Some(SmolStr::new(category));
        self
    }

    /// The short name, unique among same-kind siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The exclusive owner, `None` for root packages.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// The element category tag, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Administrative data, if any.
    pub fn admin_data(&self) -> Option<&AdminData> {
        self.admin_data.as_ref()
    }

    /// Stable element identity for the interchange layer.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The kind-specific payload.
    pub fn data(&self) -> &ElementData {
        &self.data
    }

    /// Display name of the node's runtime kind.
    pub fn kind_name(&self) -> &'static str {
        self.data.kind_name()
    }

    /// Owned named members in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Look up an owned member by name.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Two nodes carry the same definition when their payloads and
    /// categories agree. Owned subtrees are compared by their own appends,
    /// not here.
    pub(crate) fn same_definition(&self, other: &Node) -> bool {
        self.category == other.category && self.data == other.data
    }
}

/// The kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Package(PackageData),
    // Data types
    IntegerType(IntegerTypeData),
    RealType(RealTypeData),
    BooleanType,
    StringType(StringTypeData),
    RecordType(RecordTypeData),
    ArrayType(ArrayTypeData),
    TypeAlias(TypeAliasData),
    // Support elements
    CompuMethod(CompuMethodData),
    DataConstraint(DataConstraintData),
    Unit(UnitData),
    BaseType(BaseTypeData),
    Constant(ConstantData),
    ModeDeclarationGroup(ModeDeclarationGroupData),
    // Port interfaces and their members
    PortInterface(PortInterfaceData),
    DataElement(DataElementData),
    Operation(OperationData),
    ModeGroup(ModeGroupData),
    InterfaceParameter(InterfaceParameterData),
    // Components and their members
    Component(ComponentData),
    Port(PortData),
    ComponentPrototype(ComponentPrototypeData),
    AssemblyConnector(AssemblyConnectorData),
    DelegationConnector(DelegationConnectorData),
}

impl ElementData {
    /// Get a display label for this kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementData::Package(_) => "Package",
            ElementData::IntegerType(_) => "IntegerType",
            ElementData::RealType(_) => "RealType",
            ElementData::BooleanType => "BooleanType",
            ElementData::StringType(_) => "StringType",
            ElementData::RecordType(_) => "RecordType",
            ElementData::ArrayType(_) => "ArrayType",
            ElementData::TypeAlias(_) => "TypeAlias",
            ElementData::CompuMethod(_) => "CompuMethod",
            ElementData::DataConstraint(_) => "DataConstraint",
            ElementData::Unit(_) => "Unit",
            ElementData::BaseType(_) => "BaseType",
            ElementData::Constant(_) => "Constant",
            ElementData::ModeDeclarationGroup(_) => "ModeDeclarationGroup",
            ElementData::PortInterface(data) => data.family.interface_kind_name(),
            ElementData::DataElement(_) => "DataElement",
            ElementData::Operation(_) => "Operation",
            ElementData::ModeGroup(_) => "ModeGroup",
            ElementData::InterfaceParameter(_) => "InterfaceParameter",
            ElementData::Component(data) => data.kind.kind_name(),
            ElementData::Port(_) => "Port",
            ElementData::ComponentPrototype(_) => "ComponentPrototype",
            ElementData::AssemblyConnector(_) => "AssemblyConnector",
            ElementData::DelegationConnector(_) => "DelegationConnector",
        }
    }

    /// True for kinds that can be bound to a value (data types).
    pub fn is_data_type(&self) -> bool {
        matches!(
            self,
            ElementData::IntegerType(_)
                | ElementData::RealType(_)
                | ElementData::BooleanType
                | ElementData::StringType(_)
                | ElementData::RecordType(_)
                | ElementData::ArrayType(_)
                | ElementData::TypeAlias(_)
        )
    }

    /// True for the five port interface families.
    pub fn is_port_interface(&self) -> bool {
        matches!(self, ElementData::PortInterface(_))
    }

    /// True for component types (atomic or composition).
    pub fn is_component(&self) -> bool {
        matches!(self, ElementData::Component(_))
    }
}
