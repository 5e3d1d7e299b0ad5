//! Component types, ports, prototypes and connectors.
//!
//! Atomic components own ports; compositions additionally own component
//! prototypes and the connectors wired between them. Connectors are pure
//! reference holders: endpoints are canonical path strings, resolved on
//! demand.

use smol_str::SmolStr;

use crate::base::ArPath;
use crate::comspec::ComSpec;
use crate::model::error::{ModelError, ReferenceError, ValidationError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;

/// The component type variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Application,
    ComplexDeviceDriver,
    Service,
    ParameterComponent,
    Composition,
}

impl ComponentKind {
    /// The element kind label of a component of this kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ComponentKind::Application => "ApplicationComponent",
            ComponentKind::ComplexDeviceDriver => "ComplexDeviceDriverComponent",
            ComponentKind::Service => "ServiceComponent",
            ComponentKind::ParameterComponent => "ParameterComponent",
            ComponentKind::Composition => "Composition",
        }
    }
}

/// Payload of a component type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentData {
    pub kind: ComponentKind,
}

/// Port polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Require,
    Provide,
    ProvideRequire,
}

impl PortDirection {
    /// Lower-case label used in diagnostics.
    pub fn display(&self) -> &'static str {
        match self {
            PortDirection::Require => "require",
            PortDirection::Provide => "provide",
            PortDirection::ProvideRequire => "provide-require",
        }
    }

    /// True if this polarity has a provide side.
    pub fn provides(&self) -> bool {
        matches!(self, PortDirection::Provide | PortDirection::ProvideRequire)
    }

    /// True if this polarity has a require side.
    pub fn requires(&self) -> bool {
        matches!(self, PortDirection::Require | PortDirection::ProvideRequire)
    }
}

/// A port: one bound interface plus its ordered com-spec list.
#[derive(Debug, Clone, PartialEq)]
pub struct PortData {
    pub direction: PortDirection,
    pub interface_ref: ArPath,
    pub com_specs: Vec<ComSpec>,
}

/// An instance of a component type inside a composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPrototypeData {
    pub type_ref: ArPath,
}

/// One end of a connector: a prototype inside the composition plus a port
/// on that prototype's component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEndpoint {
    pub prototype_ref: ArPath,
    pub port_ref: ArPath,
}

/// Links a provide port of one inner prototype to a require port of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConnectorData {
    pub provider: PortEndpoint,
    pub requester: PortEndpoint,
}

/// Links an inner prototype's port to an outer port of the composition
/// with the same polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationConnectorData {
    pub inner: PortEndpoint,
    pub outer_port_ref: ArPath,
}

/// An inner port seen through a prototype, as used by connector
/// validation and the wiring pass.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedInnerPort {
    pub prototype: NodeId,
    pub prototype_name: SmolStr,
    pub port: NodeId,
    pub port_name: SmolStr,
    pub direction: PortDirection,
    pub interface_ref: ArPath,
}

// ============================================================================
// FACTORIES
// ============================================================================

impl Workspace {
    /// Create an atomic component type or a composition under `package`.
    pub fn create_component(
        &mut self,
        package: NodeId,
        name: &str,
        kind: ComponentKind,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(name, ElementData::Component(ComponentData { kind }));
        self.append_element(package, node)
    }

    /// Create a composition under `package`.
    pub fn create_composition(&mut self, package: NodeId, name: &str) -> Result<NodeId, ModelError> {
        self.create_component(package, name, ComponentKind::Composition)
    }

    /// Instantiate a component type inside a composition.
    pub fn create_component_prototype(
        &mut self,
        composition: NodeId,
        name: &str,
        type_ref: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_composition(composition)?;
        let component = self.resolve_component(type_ref)?;
        let canonical = self.path_of(component);
        let node = Node::new(
            name,
            ElementData::ComponentPrototype(ComponentPrototypeData { type_ref: canonical }),
        );
        self.append_element(composition, node)
    }

    /// Create an assembly connector between two inner ports, named after
    /// its endpoints. The provider end must have a provide side, the
    /// requester end a require side, and both must bind the same
    /// interface.
    pub fn create_assembly_connector(
        &mut self,
        composition: NodeId,
        provider: (&str, &str),
        requester: (&str, &str),
    ) -> Result<NodeId, ModelError> {
        self.expect_composition(composition)?;
        let provide = self.resolve_inner_port(composition, provider.0, provider.1)?;
        let require = self.resolve_inner_port(composition, requester.0, requester.1)?;

        if !provide.direction.provides() {
            return Err(ReferenceError::WrongKind {
                path: self.path_of(provide.port).to_string(),
                expected: "provide port",
                actual: provide.direction.display(),
            }
            .into());
        }
        if !require.direction.requires() {
            return Err(ReferenceError::WrongKind {
                path: self.path_of(require.port).to_string(),
                expected: "require port",
                actual: require.direction.display(),
            }
            .into());
        }
        if provide.interface_ref != require.interface_ref {
            return Err(ValidationError::InterfaceMismatch {
                provider: provide.interface_ref.to_string(),
                requester: require.interface_ref.to_string(),
            }
            .into());
        }

        let node = Self::assembly_connector_node(&provide, &require, |id| self.path_of(id));
        self.append_element(composition, node)
    }

    /// Create a delegation connector between an inner port and an outer
    /// port of the composition. Polarity and interface must match.
    pub fn create_delegation_connector(
        &mut self,
        composition: NodeId,
        inner: (&str, &str),
        outer_port: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_composition(composition)?;
        let inner_port = self.resolve_inner_port(composition, inner.0, inner.1)?;
        let outer = self
            .get(composition)?
            .child(outer_port)
            .ok_or_else(|| ReferenceError::Unresolved {
                path: self.path_of(composition).join(outer_port).to_string(),
                segment: outer_port.to_string(),
            })?;
        let outer_data = self.expect_port(outer)?.clone();

        if outer_data.direction != inner_port.direction {
            return Err(ValidationError::PolarityMismatch {
                inner: inner_port.direction.display(),
                outer: outer_data.direction.display(),
            }
            .into());
        }
        if outer_data.interface_ref != inner_port.interface_ref {
            return Err(ValidationError::InterfaceMismatch {
                provider: inner_port.interface_ref.to_string(),
                requester: outer_data.interface_ref.to_string(),
            }
            .into());
        }

        let node = Self::delegation_connector_node(&inner_port, outer_port, |id| self.path_of(id));
        self.append_element(composition, node)
    }

    // ------------------------------------------------------------------
    // Shared endpoint helpers (also used by the wiring pass)
    // ------------------------------------------------------------------

    pub(crate) fn assembly_connector_node(
        provide: &ResolvedInnerPort,
        require: &ResolvedInnerPort,
        mut path_of: impl FnMut(NodeId) -> ArPath,
    ) -> Node {
        let name = format!(
            "{}_{}__{}_{}",
            provide.prototype_name, provide.port_name, require.prototype_name, require.port_name
        );
        Node::new(
            name,
            ElementData::AssemblyConnector(AssemblyConnectorData {
                provider: PortEndpoint {
                    prototype_ref: path_of(provide.prototype),
                    port_ref: path_of(provide.port),
                },
                requester: PortEndpoint {
                    prototype_ref: path_of(require.prototype),
                    port_ref: path_of(require.port),
                },
            }),
        )
    }

    pub(crate) fn delegation_connector_node(
        inner: &ResolvedInnerPort,
        outer_port: &str,
        mut path_of: impl FnMut(NodeId) -> ArPath,
    ) -> Node {
        let name = format!("{}_{}__{}", inner.prototype_name, inner.port_name, outer_port);
        let composition_path = path_of(inner.prototype)
            .parent()
            .unwrap_or_else(|| ArPath::new(""));
        Node::new(
            name,
            ElementData::DelegationConnector(DelegationConnectorData {
                inner: PortEndpoint {
                    prototype_ref: path_of(inner.prototype),
                    port_ref: path_of(inner.port),
                },
                outer_port_ref: composition_path.join(outer_port),
            }),
        )
    }

    /// Resolve `(prototype name, port name)` inside a composition to the
    /// prototype, the port node on its component type, and the port facts
    /// connector validation needs.
    pub(crate) fn resolve_inner_port(
        &self,
        composition: NodeId,
        prototype_name: &str,
        port_name: &str,
    ) -> Result<ResolvedInnerPort, ModelError> {
        let comp_node = self.get(composition)?;
        let prototype = comp_node.child(prototype_name).ok_or_else(|| {
            ReferenceError::Unresolved {
                path: self.path_of(composition).join(prototype_name).to_string(),
                segment: prototype_name.to_string(),
            }
        })?;
        let type_ref = match self.get(prototype)?.data() {
            ElementData::ComponentPrototype(data) => data.type_ref.clone(),
            other => {
                return Err(ReferenceError::WrongKind {
                    path: self.path_of(prototype).to_string(),
                    expected: "ComponentPrototype",
                    actual: other.kind_name(),
                }
                .into());
            }
        };
        let component = self.resolve_component(type_ref.as_str())?;
        let port = self.get(component)?.child(port_name).ok_or_else(|| {
            ReferenceError::Unresolved {
                path: type_ref.join(port_name).to_string(),
                segment: port_name.to_string(),
            }
        })?;
        let data = self.expect_port(port)?;
        Ok(ResolvedInnerPort {
            prototype,
            prototype_name: SmolStr::new(prototype_name),
            port,
            port_name: SmolStr::new(port_name),
            direction: data.direction,
            interface_ref: data.interface_ref.clone(),
        })
    }

    pub(crate) fn expect_composition(&self, id: NodeId) -> Result<(), ModelError> {
        match self.get(id)?.data() {
            ElementData::Component(data) if data.kind == ComponentKind::Composition => Ok(()),
            other => Err(ReferenceError::WrongKind {
                path: self.path_of(id).to_string(),
                expected: "Composition",
                actual: other.kind_name(),
            }
            .into()),
        }
    }

    pub(crate) fn expect_port(&self, id: NodeId) -> Result<&PortData, ModelError> {
        match self.get(id)?.data() {
            ElementData::Port(data) => Ok(data),
            other => Err(ReferenceError::WrongKind {
                path: self.path_of(id).to_string(),
                expected: "Port",
                actual: other.kind_name(),
            }
            .into()),
        }
    }
}
