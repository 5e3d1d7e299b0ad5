//! Composition auto-wiring.
//!
//! Inner ports are matched by name and exact interface-reference
//! equality, never structural compatibility. The pass is staged: the full
//! candidate connector set is built and validated first, then committed
//! all-or-nothing through the idempotent append path, so a failed run
//! leaves no partial connector set and a repeated run yields the
//! identical set.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::ArPath;
use crate::model::components::ResolvedInnerPort;
use crate::model::error::{ModelError, ModelWarning};
use crate::model::interfaces::InterfaceFamily;
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;

/// A port the unconnected-port scan found dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnconnectedPort {
    /// The prototype the port is seen through; `None` for a port on the
    /// composition boundary itself.
    pub prototype: Option<NodeId>,
    /// The port node on the component type.
    pub port: NodeId,
}

impl Workspace {
    /// Wire a composition: assembly connectors between same-named
    /// provide/require inner ports with identical interfaces, then
    /// delegation connectors for outer ports matching an inner port of
    /// the same name and polarity. Returns the connector nodes the run
    /// created or confirmed.
    pub fn auto_connect(&mut self, composition: NodeId) -> Result<Vec<NodeId>, ModelError> {
        self.expect_composition(composition)?;
        let inner = self.collect_inner_ports(composition)?;

        let mut provide: FxHashMap<SmolStr, Vec<&ResolvedInnerPort>> = FxHashMap::default();
        let mut require: FxHashMap<SmolStr, Vec<&ResolvedInnerPort>> = FxHashMap::default();
        for port in &inner {
            if port.direction.provides() {
                provide.entry(port.port_name.clone()).or_default().push(port);
            }
            if port.direction.requires() {
                require.entry(port.port_name.clone()).or_default().push(port);
            }
        }

        let mut staged: Vec<Node> = Vec::new();
        let mut warnings: Vec<ModelWarning> = Vec::new();

        // Assembly pass, name-sorted for determinism.
        let mut names: Vec<&SmolStr> = provide.keys().filter(|n| require.contains_key(*n)).collect();
        names.sort();
        for name in names {
            let providers = &provide[name];
            let provider = providers[0];
            if providers.len() > 1 {
                warnings.push(ModelWarning::DuplicateProvider {
                    port: name.clone(),
                    chosen: provider.prototype_name.clone(),
                    ignored: providers[1..]
                        .iter()
                        .map(|p| p.prototype_name.clone())
                        .collect(),
                });
            }
            for requester in require[name].iter().copied() {
                if requester.port == provider.port && requester.prototype == provider.prototype {
                    continue;
                }
                if requester.interface_ref != provider.interface_ref {
                    continue;
                }
                staged.push(Self::assembly_connector_node(provider, requester, |id| {
                    self.path_of(id)
                }));
            }
        }

        // Delegation pass over the composition's own boundary ports.
        let mut outer: Vec<NodeId> = self
            .get(composition)?
            .children()
            .filter(|&id| matches!(self.node(id).map(Node::data), Some(ElementData::Port(_))))
            .collect();
        outer.sort_by_key(|&id| self.node(id).map(|n| SmolStr::new(n.name())));
        for outer_id in outer {
            let outer_node = self.get(outer_id)?;
            let outer_name = SmolStr::new(outer_node.name());
            let outer_port = self.expect_port(outer_id)?.clone();
            for inner_port in &inner {
                if inner_port.port_name == outer_name
                    && inner_port.direction == outer_port.direction
                    && inner_port.interface_ref == outer_port.interface_ref
                {
                    staged.push(Self::delegation_connector_node(
                        inner_port,
                        &outer_name,
                        |id| self.path_of(id),
                    ));
                }
            }
        }

        // Validate the whole candidate set before touching the tree.
        for candidate in &staged {
            if let Some(existing) = self.get(composition)?.child(candidate.name()) {
                self.reconcile(composition, existing, candidate.clone())?;
            }
        }

        // Commit all-or-nothing. Appends here can only be inserts or
        // no-ops; conflicts were ruled out above.
        for warning in warnings {
            self.warn(warning);
        }
        let mut connectors = Vec::with_capacity(staged.len());
        for node in staged {
            connectors.push(self.append_element(composition, node)?);
        }
        tracing::debug!(
            "auto-connect staged and committed {} connector(s) in '{}'",
            connectors.len(),
            self.path_of(composition)
        );
        Ok(connectors)
    }

    /// Re-derive the port maps and return every inner or outer
    /// sender-receiver port that no existing connector touches.
    /// Ports of other interface families are out of scope.
    pub fn find_unconnected_ports(
        &self,
        composition: NodeId,
    ) -> Result<Vec<UnconnectedPort>, ModelError> {
        self.expect_composition(composition)?;
        let inner = self.collect_inner_ports(composition)?;

        // Gather the endpoints of every existing connector.
        let mut connected_inner: FxHashSet<(ArPath, ArPath)> = FxHashSet::default();
        let mut connected_outer: FxHashSet<ArPath> = FxHashSet::default();
        for child_id in self.get(composition)?.children() {
            match self.get(child_id)?.data() {
                ElementData::AssemblyConnector(data) => {
                    connected_inner.insert((
                        data.provider.prototype_ref.clone(),
                        data.provider.port_ref.clone(),
                    ));
                    connected_inner.insert((
                        data.requester.prototype_ref.clone(),
                        data.requester.port_ref.clone(),
                    ));
                }
                ElementData::DelegationConnector(data) => {
                    connected_inner.insert((
                        data.inner.prototype_ref.clone(),
                        data.inner.port_ref.clone(),
                    ));
                    connected_outer.insert(data.outer_port_ref.clone());
                }
                _ => {}
            }
        }

        let mut unconnected = Vec::new();
        for port in &inner {
            if !self.is_sender_receiver(&port.interface_ref)? {
                continue;
            }
            let key = (self.path_of(port.prototype), self.path_of(port.port));
            if !connected_inner.contains(&key) {
                unconnected.push(UnconnectedPort {
                    prototype: Some(port.prototype),
                    port: port.port,
                });
            }
        }

        let mut outer: Vec<NodeId> = self
            .get(composition)?
            .children()
            .filter(|&id| matches!(self.node(id).map(Node::data), Some(ElementData::Port(_))))
            .collect();
        outer.sort_by_key(|&id| self.node(id).map(|n| SmolStr::new(n.name())));
        for outer_id in outer {
            let data = self.expect_port(outer_id)?;
            if !self.is_sender_receiver(&data.interface_ref)? {
                continue;
            }
            if !connected_outer.contains(&self.path_of(outer_id)) {
                unconnected.push(UnconnectedPort {
                    prototype: None,
                    port: outer_id,
                });
            }
        }
        Ok(unconnected)
    }

    /// Every port of every prototype in the composition, resolved through
    /// the prototype's component type and sorted by (prototype, port)
    /// name for deterministic iteration.
    fn collect_inner_ports(
        &self,
        composition: NodeId,
    ) -> Result<Vec<ResolvedInnerPort>, ModelError> {
        let mut prototypes: Vec<(SmolStr, NodeId)> = Vec::new();
        for child_id in self.get(composition)?.children() {
            let child = self.get(child_id)?;
            if matches!(child.data(), ElementData::ComponentPrototype(_)) {
                prototypes.push((SmolStr::new(child.name()), child_id));
            }
        }
        prototypes.sort();

        let mut ports = Vec::new();
        for (proto_name, proto_id) in &prototypes {
            let type_ref = match self.get(*proto_id)?.data() {
                ElementData::ComponentPrototype(data) => data.type_ref.clone(),
                _ => continue,
            };
            let component = self.resolve_component(type_ref.as_str())?;
            let mut port_names: Vec<SmolStr> = self
                .get(component)?
                .children()
                .filter_map(|id| {
                    let node = self.node(id)?;
                    matches!(node.data(), ElementData::Port(_)).then(|| SmolStr::new(node.name()))
                })
                .collect();
            port_names.sort();
            for port_name in port_names {
                ports.push(self.resolve_inner_port(composition, proto_name, &port_name)?);
            }
        }
        Ok(ports)
    }

    fn is_sender_receiver(&self, interface_ref: &ArPath) -> Result<bool, ModelError> {
        let id = self.resolve(interface_ref.as_str())?;
        Ok(matches!(
            self.get(id)?.data(),
            ElementData::PortInterface(data) if data.family == InterfaceFamily::SenderReceiver
        ))
    }
}
