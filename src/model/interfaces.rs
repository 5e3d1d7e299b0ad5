//! Port interfaces and their typed members.
//!
//! An interface is one node whose family tag selects the member kind it
//! may own: data elements (sender-receiver, NV data), operations
//! (client-server), mode groups (mode switch) or parameters (parameter).
//! Members are child nodes, so `(interface ref, member name)` resolves
//! through the ordinary path descent.

use smol_str::SmolStr;

use crate::base::{ArPath, SchemaEra};
use crate::model::error::{ModelError, ReferenceError, ValidationError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;

/// The five port interface families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceFamily {
    SenderReceiver,
    ClientServer,
    ModeSwitch,
    Parameter,
    NvData,
}

impl InterfaceFamily {
    /// The element kind label of an interface of this family.
    pub fn interface_kind_name(&self) -> &'static str {
        match self {
            InterfaceFamily::SenderReceiver => "SenderReceiverInterface",
            InterfaceFamily::ClientServer => "ClientServerInterface",
            InterfaceFamily::ModeSwitch => "ModeSwitchInterface",
            InterfaceFamily::Parameter => "ParameterInterface",
            InterfaceFamily::NvData => "NvDataInterface",
        }
    }

    /// Lower-case label used in diagnostics.
    pub fn display(&self) -> &'static str {
        match self {
            InterfaceFamily::SenderReceiver => "sender-receiver",
            InterfaceFamily::ClientServer => "client-server",
            InterfaceFamily::ModeSwitch => "mode-switch",
            InterfaceFamily::Parameter => "parameter",
            InterfaceFamily::NvData => "NV-data",
        }
    }
}

/// Payload shared by all interface families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInterfaceData {
    pub family: InterfaceFamily,
    pub is_service: bool,
}

/// A typed data element of a sender-receiver or NV-data interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataElementData {
    pub type_ref: ArPath,
    pub is_queued: bool,
}

/// Direction of a client-server operation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentDirection {
    In,
    Out,
    InOut,
}

/// One argument of a client-server operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationArgument {
    pub name: SmolStr,
    pub type_ref: ArPath,
    pub direction: ArgumentDirection,
}

/// A client-server operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationData {
    pub arguments: Vec<OperationArgument>,
}

/// A mode group member referencing its mode declaration group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeGroupData {
    pub mode_group_ref: ArPath,
}

/// A parameter member of a parameter interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceParameterData {
    pub type_ref: ArPath,
}

/// A mode declaration group: ordered mode names plus the initial mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDeclarationGroupData {
    pub modes: Vec<SmolStr>,
    pub initial_mode: Option<SmolStr>,
}

// ============================================================================
// FACTORIES
// ============================================================================

impl Workspace {
    /// Create a sender-receiver interface under `package`.
    pub fn create_sender_receiver_interface(
        &mut self,
        package: NodeId,
        name: &str,
    ) -> Result<NodeId, ModelError> {
        self.create_interface(package, name, InterfaceFamily::SenderReceiver)
    }

    /// Create a client-server interface under `package`.
    pub fn create_client_server_interface(
        &mut self,
        package: NodeId,
        name: &str,
    ) -> Result<NodeId, ModelError> {
        self.create_interface(package, name, InterfaceFamily::ClientServer)
    }

    /// Create a mode-switch interface with its single mode group member.
    pub fn create_mode_switch_interface(
        &mut self,
        package: NodeId,
        name: &str,
        mode_group_name: &str,
        mode_group_ref: &str,
    ) -> Result<NodeId, ModelError> {
        let group = self.resolve_with_role(mode_group_ref, crate::model::PackageRole::ModeDclrGroup)?;
        let canonical = match self.get(group)?.data() {
            ElementData::ModeDeclarationGroup(_) => self.path_of(group),
            other => {
                return Err(ReferenceError::WrongKind {
                    path: mode_group_ref.to_string(),
                    expected: "ModeDeclarationGroup",
                    actual: other.kind_name(),
                }
                .into());
            }
        };
        let iface = self.create_interface(package, name, InterfaceFamily::ModeSwitch)?;
        let member = Node::new(
            mode_group_name,
            ElementData::ModeGroup(ModeGroupData {
                mode_group_ref: canonical,
            }),
        );
        self.append_element(iface, member)?;
        Ok(iface)
    }

    /// Create a parameter interface under `package`.
    pub fn create_parameter_interface(
        &mut self,
        package: NodeId,
        name: &str,
    ) -> Result<NodeId, ModelError> {
        self.create_interface(package, name, InterfaceFamily::Parameter)
    }

    /// Create an NV-data interface under `package`. Rejected on an
    /// AUTOSAR 3 workspace: the family only exists in the 4.x schemas.
    pub fn create_nv_data_interface(
        &mut self,
        package: NodeId,
        name: &str,
    ) -> Result<NodeId, ModelError> {
        if self.era() == SchemaEra::Autosar3 {
            return Err(ValidationError::EraNotSupported {
                feature: "NV-data interfaces",
                needed: SchemaEra::Autosar4.display(),
                actual: SchemaEra::Autosar3.display(),
            }
            .into());
        }
        self.create_interface(package, name, InterfaceFamily::NvData)
    }

    fn create_interface(
        &mut self,
        package: NodeId,
        name: &str,
        family: InterfaceFamily,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::PortInterface(PortInterfaceData {
                family,
                is_service: false,
            }),
        );
        self.append_element(package, node)
    }

    /// Mark an interface as a service interface.
    pub fn set_service(&mut self, interface: NodeId, is_service: bool) -> Result<(), ModelError> {
        let path = self.path_of(interface).to_string();
        match &mut self.get_mut(interface)?.data {
            ElementData::PortInterface(data) => {
                data.is_service = is_service;
                Ok(())
            }
            other => Err(ReferenceError::WrongKind {
                path,
                expected: "PortInterface",
                actual: other.kind_name(),
            }
            .into()),
        }
    }

    /// Add a data element to a sender-receiver or NV-data interface.
    pub fn create_data_element(
        &mut self,
        interface: NodeId,
        name: &str,
        type_ref: &str,
        is_queued: bool,
    ) -> Result<NodeId, ModelError> {
        self.expect_interface_family(
            interface,
            &[InterfaceFamily::SenderReceiver, InterfaceFamily::NvData],
        )?;
        let (_, canonical) = self.resolve_data_type_ref(type_ref)?;
        let node = Node::new(
            name,
            ElementData::DataElement(DataElementData {
                type_ref: canonical,
                is_queued,
            }),
        );
        self.append_element(interface, node)
    }

    /// Add an operation to a client-server interface. Arguments are
    /// `(name, data type reference, direction)` triples.
    pub fn create_operation(
        &mut self,
        interface: NodeId,
        name: &str,
        arguments: &[(&str, &str, ArgumentDirection)],
    ) -> Result<NodeId, ModelError> {
        self.expect_interface_family(interface, &[InterfaceFamily::ClientServer])?;
        let mut resolved = Vec::with_capacity(arguments.len());
        for (arg_name, type_ref, direction) in arguments {
            let (_, canonical) = self.resolve_data_type_ref(type_ref)?;
            resolved.push(OperationArgument {
                name: SmolStr::new(arg_name),
                type_ref: canonical,
                direction: *direction,
            });
        }
        let node = Node::new(name, ElementData::Operation(OperationData { arguments: resolved }));
        self.append_element(interface, node)
    }

    /// Add a parameter to a parameter interface.
    pub fn create_interface_parameter(
        &mut self,
        interface: NodeId,
        name: &str,
        type_ref: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_interface_family(interface, &[InterfaceFamily::Parameter])?;
        let (_, canonical) = self.resolve_data_type_ref(type_ref)?;
        let node = Node::new(
            name,
            ElementData::InterfaceParameter(InterfaceParameterData { type_ref: canonical }),
        );
        self.append_element(interface, node)
    }

    /// Create a mode declaration group under `package`.
    pub fn create_mode_declaration_group(
        &mut self,
        package: NodeId,
        name: &str,
        modes: &[&str],
        initial_mode: Option<&str>,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::ModeDeclarationGroup(ModeDeclarationGroupData {
                modes: modes.iter().map(|m| SmolStr::new(m)).collect(),
                initial_mode: initial_mode.map(SmolStr::new),
            }),
        );
        self.append_element(package, node)
    }

    pub(crate) fn expect_interface_family(
        &self,
        interface: NodeId,
        allowed: &[InterfaceFamily],
    ) -> Result<InterfaceFamily, ModelError> {
        let node = self.get(interface)?;
        match node.data() {
            ElementData::PortInterface(data) if allowed.contains(&data.family) => Ok(data.family),
            other => Err(ReferenceError::WrongKind {
                path: self.path_of(interface).to_string(),
                expected: allowed[0].interface_kind_name(),
                actual: other.kind_name(),
            }
            .into()),
        }
    }
}
