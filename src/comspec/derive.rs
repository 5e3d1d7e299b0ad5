//! Type-directed com-spec derivation.
//!
//! Ports are created against an interface reference plus optional
//! configs. Derivation dispatches on the bound interface's family,
//! selects the target member (an explicit name, or the sole member),
//! validates every set field against the port direction and the schema
//! era, and resolves init values through the value builder or the
//! constant namespace. An omitted config derives one default com-spec per
//! member.

use smol_str::SmolStr;

use crate::base::{ArPath, SchemaEra};
use crate::comspec::{
    ClientServerComSpec, ClientServerConfig, ComSpec, ComSpecConfig, ModeSwitchComSpec,
    ModeSwitchConfig, ParameterComSpec, ParameterConfig, SenderReceiverComSpec,
    SenderReceiverConfig,
};
use crate::model::components::{PortData, PortDirection};
use crate::model::error::{ModelError, ReferenceError, ValidationError};
use crate::model::interfaces::InterfaceFamily;
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;
use crate::values::ValueSpec;

/// Facts about one interface member, collected before derivation so the
/// builder can borrow the workspace mutably.
#[derive(Debug, Clone)]
struct MemberInfo {
    name: SmolStr,
    type_ref: Option<ArPath>,
    is_queued: bool,
}

impl Workspace {
    /// Create a provide port on a component.
    pub fn create_provide_port(
        &mut self,
        component: NodeId,
        name: &str,
        interface_ref: &str,
        configs: &[ComSpecConfig],
    ) -> Result<NodeId, ModelError> {
        self.create_port(component, name, PortDirection::Provide, interface_ref, configs)
    }

    /// Create a require port on a component.
    pub fn create_require_port(
        &mut self,
        component: NodeId,
        name: &str,
        interface_ref: &str,
        configs: &[ComSpecConfig],
    ) -> Result<NodeId, ModelError> {
        self.create_port(component, name, PortDirection::Require, interface_ref, configs)
    }

    /// Create a combined provide-require port on a component.
    pub fn create_provide_require_port(
        &mut self,
        component: NodeId,
        name: &str,
        interface_ref: &str,
        configs: &[ComSpecConfig],
    ) -> Result<NodeId, ModelError> {
        self.create_port(
            component,
            name,
            PortDirection::ProvideRequire,
            interface_ref,
            configs,
        )
    }

    fn create_port(
        &mut self,
        component: NodeId,
        name: &str,
        direction: PortDirection,
        interface_ref: &str,
        configs: &[ComSpecConfig],
    ) -> Result<NodeId, ModelError> {
        match self.get(component)?.data() {
            ElementData::Component(_) => {}
            other => {
                return Err(ReferenceError::WrongKind {
                    path: self.path_of(component).to_string(),
                    expected: "component type",
                    actual: other.kind_name(),
                }
                .into());
            }
        }
        let interface = self.resolve_port_interface(interface_ref)?;
        let canonical = self.path_of(interface);
        let com_specs = self.derive_com_specs(direction, interface, configs)?;
        tracing::debug!(
            "derived {} com-spec(s) for {} port '{name}' bound to '{canonical}'",
            com_specs.len(),
            direction.display()
        );
        let node = Node::new(
            name,
            ElementData::Port(PortData {
                direction,
                interface_ref: canonical,
                com_specs,
            }),
        );
        self.append_element(component, node)
    }

    /// Derive the com-spec list for a port of `direction` bound to
    /// `interface`. Exposed for callers that manage ports themselves.
    pub fn derive_com_specs(
        &mut self,
        direction: PortDirection,
        interface: NodeId,
        configs: &[ComSpecConfig],
    ) -> Result<Vec<ComSpec>, ModelError> {
        let (family, iface_name) = match self.get(interface)?.data() {
            ElementData::PortInterface(data) => {
                (data.family, SmolStr::new(self.get(interface)?.name()))
            }
            other => {
                return Err(ReferenceError::WrongKind {
                    path: self.path_of(interface).to_string(),
                    expected: "port interface",
                    actual: other.kind_name(),
                }
                .into());
            }
        };
        if family == InterfaceFamily::NvData && self.era() == SchemaEra::Autosar3 {
            return Err(ValidationError::EraNotSupported {
                feature: "NV-data com-specs",
                needed: SchemaEra::Autosar4.display(),
                actual: SchemaEra::Autosar3.display(),
            }
            .into());
        }

        let members = self.collect_members(interface, family)?;
        let mut specs = Vec::new();
        let mut taken: Vec<SmolStr> = Vec::new();

        if configs.is_empty() {
            // One default com-spec per member.
            for member in &members {
                let spec = match family {
                    InterfaceFamily::SenderReceiver | InterfaceFamily::NvData => self
                        .derive_sender_receiver(
                            direction,
                            family,
                            &iface_name,
                            &members,
                            &SenderReceiverConfig {
                                element: Some(member.name.clone()),
                                ..SenderReceiverConfig::default()
                            },
                        )?,
                    InterfaceFamily::ClientServer => self.derive_client_server(
                        direction,
                        &iface_name,
                        &members,
                        &ClientServerConfig {
                            operation: Some(member.name.clone()),
                            ..ClientServerConfig::default()
                        },
                    )?,
                    InterfaceFamily::ModeSwitch => self.derive_mode_switch(
                        direction,
                        &iface_name,
                        &members,
                        &ModeSwitchConfig {
                            mode_group: Some(member.name.clone()),
                            ..ModeSwitchConfig::default()
                        },
                    )?,
                    InterfaceFamily::Parameter => self.derive_parameter(
                        &iface_name,
                        &members,
                        &ParameterConfig {
                            parameter: Some(member.name.clone()),
                            ..ParameterConfig::default()
                        },
                    )?,
                };
                specs.push(spec);
            }
            return Ok(specs);
        }

        for config in configs {
            let spec = match (family, config) {
                (
                    InterfaceFamily::SenderReceiver | InterfaceFamily::NvData,
                    ComSpecConfig::SenderReceiver(cfg),
                ) => self.derive_sender_receiver(direction, family, &iface_name, &members, cfg)?,
                (InterfaceFamily::ClientServer, ComSpecConfig::ClientServer(cfg)) => {
                    self.derive_client_server(direction, &iface_name, &members, cfg)?
                }
                (InterfaceFamily::ModeSwitch, ComSpecConfig::ModeSwitch(cfg)) => {
                    self.derive_mode_switch(direction, &iface_name, &members, cfg)?
                }
                (InterfaceFamily::Parameter, ComSpecConfig::Parameter(cfg)) => {
                    self.derive_parameter(&iface_name, &members, cfg)?
                }
                (family, config) => {
                    return Err(ValidationError::ConfigMismatch {
                        given: config.display(),
                        interface: family.display(),
                        name: iface_name.clone(),
                    }
                    .into());
                }
            };
            let member = SmolStr::new(spec.member());
            if taken.contains(&member) {
                return Err(ValidationError::DuplicateComSpec {
                    interface: iface_name.clone(),
                    member,
                }
                .into());
            }
            taken.push(member);
            specs.push(spec);
        }
        Ok(specs)
    }

    // ------------------------------------------------------------------
    // Per-family derivation
    // ------------------------------------------------------------------

    fn derive_sender_receiver(
        &mut self,
        direction: PortDirection,
        family: InterfaceFamily,
        iface_name: &SmolStr,
        members: &[MemberInfo],
        cfg: &SenderReceiverConfig,
    ) -> Result<ComSpec, ModelError> {
        let member = select_member(members, cfg.element.as_ref(), iface_name)?.clone();
        let iface_label = family.display();

        if cfg.init_value.is_some() && cfg.init_value_ref.is_some() {
            return Err(ValidationError::MutuallyExclusive {
                a: "init_value",
                b: "init_value_ref",
            }
            .into());
        }
        if cfg.alive_timeout.is_some() && !direction.requires() {
            return Err(ValidationError::FieldNotAllowed {
                field: "alive_timeout",
                interface: iface_label,
                direction: direction.display(),
            }
            .into());
        }
        if cfg.can_invalidate.is_some() && !direction.provides() {
            return Err(ValidationError::FieldNotAllowed {
                field: "can_invalidate",
                interface: iface_label,
                direction: direction.display(),
            }
            .into());
        }
        if cfg.queue_length.is_some() && (!direction.requires() || !member.is_queued) {
            return Err(ValidationError::FieldNotAllowed {
                field: "queue_length",
                interface: iface_label,
                direction: direction.display(),
            }
            .into());
        }

        let (init_value, init_value_ref) =
            self.resolve_init_value(&member, cfg.init_value.as_ref(), cfg.init_value_ref.as_ref())?;

        // Queued require elements always carry a queue length; zero or
        // unset means 1.
        let queue_length = if direction.requires() && member.is_queued {
            Some(cfg.queue_length.filter(|&n| n > 0).unwrap_or(1))
        } else {
            None
        };
        let can_invalidate = if direction.provides() {
            Some(cfg.can_invalidate.unwrap_or(false))
        } else {
            None
        };

        let spec = SenderReceiverComSpec {
            element: member.name.clone(),
            init_value,
            init_value_ref,
            alive_timeout: cfg.alive_timeout,
            queue_length,
            can_invalidate,
        };
        Ok(match family {
            InterfaceFamily::NvData => ComSpec::NvData(spec),
            _ => ComSpec::SenderReceiver(spec),
        })
    }

    fn derive_client_server(
        &mut self,
        direction: PortDirection,
        iface_name: &SmolStr,
        members: &[MemberInfo],
        cfg: &ClientServerConfig,
    ) -> Result<ComSpec, ModelError> {
        let member = select_member(members, cfg.operation.as_ref(), iface_name)?;
        if cfg.queue_length.is_some() && !direction.provides() {
            return Err(ValidationError::FieldNotAllowed {
                field: "queue_length",
                interface: "client-server",
                direction: direction.display(),
            }
            .into());
        }
        Ok(ComSpec::ClientServer(ClientServerComSpec {
            operation: member.name.clone(),
            queue_length: cfg.queue_length,
        }))
    }

    fn derive_mode_switch(
        &mut self,
        direction: PortDirection,
        iface_name: &SmolStr,
        members: &[MemberInfo],
        cfg: &ModeSwitchConfig,
    ) -> Result<ComSpec, ModelError> {
        let member = select_member(members, cfg.mode_group.as_ref(), iface_name)?;
        if cfg.support_async.is_some() && !direction.requires() {
            return Err(ValidationError::FieldNotAllowed {
                field: "support_async",
                interface: "mode-switch",
                direction: direction.display(),
            }
            .into());
        }
        if cfg.queue_length.is_some() && !direction.provides() {
            return Err(ValidationError::FieldNotAllowed {
                field: "queue_length",
                interface: "mode-switch",
                direction: direction.display(),
            }
            .into());
        }
        if cfg.mode_switch_ack_timeout.is_some() {
            if !direction.provides() {
                return Err(ValidationError::FieldNotAllowed {
                    field: "mode_switch_ack_timeout",
                    interface: "mode-switch",
                    direction: direction.display(),
                }
                .into());
            }
            if self.era() == SchemaEra::Autosar3 {
                return Err(ValidationError::EraNotSupported {
                    feature: "mode_switch_ack_timeout",
                    needed: SchemaEra::Autosar4.display(),
                    actual: SchemaEra::Autosar3.display(),
                }
                .into());
            }
        }
        Ok(ComSpec::ModeSwitch(ModeSwitchComSpec {
            mode_group: member.name.clone(),
            enhanced_mode: cfg.enhanced_mode,
            support_async: cfg.support_async,
            queue_length: cfg.queue_length,
            mode_switch_ack_timeout: cfg.mode_switch_ack_timeout,
        }))
    }

    fn derive_parameter(
        &mut self,
        iface_name: &SmolStr,
        members: &[MemberInfo],
        cfg: &ParameterConfig,
    ) -> Result<ComSpec, ModelError> {
        let member = select_member(members, cfg.parameter.as_ref(), iface_name)?.clone();
        let init_value = match &cfg.init_value {
            Some(raw) => {
                let (_, type_ref) = member_type(&member)?;
                let data_type = self.resolve_data_type(type_ref.as_str())?;
                Some(self.build_value(data_type, raw, Some(member.name.as_str()))?)
            }
            None => None,
        };
        Ok(ComSpec::Parameter(ParameterComSpec {
            parameter: member.name.clone(),
            init_value,
        }))
    }

    /// Resolve the init value of a sender-receiver com-spec: a raw value
    /// built against the element's type, or a constant reference. On an
    /// AUTOSAR 3 workspace a constant reference rewrites to the
    /// constant's inner value; AUTOSAR 4 keeps the reference.
    fn resolve_init_value(
        &mut self,
        member: &MemberInfo,
        raw: Option<&crate::values::RawValue>,
        reference: Option<&ArPath>,
    ) -> Result<(Option<ValueSpec>, Option<ArPath>), ModelError> {
        if let Some(raw) = raw {
            let (_, type_ref) = member_type(member)?;
            let data_type = self.resolve_data_type(type_ref.as_str())?;
            let value = self.build_value(data_type, raw, Some(member.name.as_str()))?;
            return Ok((Some(value), None));
        }
        let Some(reference) = reference else {
            return Ok((None, None));
        };
        let constant = self.resolve_constant(reference.as_str())?;
        let canonical = self.path_of(constant);
        match self.era() {
            SchemaEra::Autosar3 => {
                let inner = match self.get(constant)?.data() {
                    ElementData::Constant(data) => data.value.clone(),
                    _ => unreachable!("checked by resolve_constant"),
                };
                Ok((Some(inner), None))
            }
            SchemaEra::Autosar4 => Ok((None, Some(canonical))),
        }
    }

    /// Collect the family's members from the interface's children.
    fn collect_members(
        &self,
        interface: NodeId,
        family: InterfaceFamily,
    ) -> Result<Vec<MemberInfo>, ModelError> {
        let node = self.get(interface)?;
        let mut members = Vec::new();
        for child_id in node.children() {
            let child = self.get(child_id)?;
            let info = match (family, child.data()) {
                (
                    InterfaceFamily::SenderReceiver | InterfaceFamily::NvData,
                    ElementData::DataElement(data),
                ) => MemberInfo {
                    name: SmolStr::new(child.name()),
                    type_ref: Some(data.type_ref.clone()),
                    is_queued: data.is_queued,
                },
                (InterfaceFamily::ClientServer, ElementData::Operation(_)) => MemberInfo {
                    name: SmolStr::new(child.name()),
                    type_ref: None,
                    is_queued: false,
                },
                (InterfaceFamily::ModeSwitch, ElementData::ModeGroup(_)) => MemberInfo {
                    name: SmolStr::new(child.name()),
                    type_ref: None,
                    is_queued: false,
                },
                (InterfaceFamily::Parameter, ElementData::InterfaceParameter(data)) => MemberInfo {
                    name: SmolStr::new(child.name()),
                    type_ref: Some(data.type_ref.clone()),
                    is_queued: false,
                },
                _ => continue,
            };
            members.push(info);
        }
        Ok(members)
    }
}

/// Select the target member: the requested name, or the sole member.
fn select_member<'a>(
    members: &'a [MemberInfo],
    requested: Option<&SmolStr>,
    iface_name: &SmolStr,
) -> Result<&'a MemberInfo, ModelError> {
    match requested {
        Some(name) => members
            .iter()
            .find(|m| m.name == *name)
            .ok_or_else(|| {
                ValidationError::UnknownMember {
                    interface: iface_name.clone(),
                    member: name.clone(),
                }
                .into()
            }),
        None => {
            if members.len() == 1 {
                Ok(&members[0])
            } else {
                Err(ValidationError::AmbiguousMember {
                    interface: iface_name.clone(),
                    count: members.len(),
                }
                .into())
            }
        }
    }
}

fn member_type(member: &MemberInfo) -> Result<(&SmolStr, &ArPath), ModelError> {
    match &member.type_ref {
        Some(type_ref) => Ok((&member.name, type_ref)),
        None => Err(ReferenceError::WrongKind {
            path: member.name.to_string(),
            expected: "typed interface member",
            actual: "untyped member",
        }
        .into()),
    }
}
