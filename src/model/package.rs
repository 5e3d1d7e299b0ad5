//! Packages, namespaces and the append discipline.
//!
//! A package keeps two separate namespaces: its elements (stored in the
//! node's generic child map) and its sub-packages. Both are ordered and
//! name-unique. All insertion goes through [`Workspace::append_element`] /
//! [`Workspace::append_sub_package`], which enforce the uniqueness rules:
//!
//! - free name: insert at the end, set ownership, index the name
//! - same name, different kind: fatal conflict
//! - same name, same kind, equal definition: silent no-op
//! - same name, same kind, different definition: fatal conflict
//!
//! A failed append leaves the tree exactly as before the call.

use std::str::FromStr;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::model::error::{ConflictError, ModelError, ValidationError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;

/// The closed set of semantic roles a package can fill for bare-name
/// reference shortening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageRole {
    DataType,
    Constant,
    PortInterface,
    ComponentType,
    ModeDclrGroup,
    CompuMethod,
    Unit,
    BaseType,
    DataConstraint,
}

impl PackageRole {
    pub const ALL: [PackageRole; 9] = [
        PackageRole::DataType,
        PackageRole::Constant,
        PackageRole::PortInterface,
        PackageRole::ComponentType,
        PackageRole::ModeDclrGroup,
        PackageRole::CompuMethod,
        PackageRole::Unit,
        PackageRole::BaseType,
        PackageRole::DataConstraint,
    ];

    /// Get a display label for this role.
    pub fn display(&self) -> &'static str {
        match self {
            PackageRole::DataType => "DataType",
            PackageRole::Constant => "Constant",
            PackageRole::PortInterface => "PortInterface",
            PackageRole::ComponentType => "ComponentType",
            PackageRole::ModeDclrGroup => "ModeDclrGroup",
            PackageRole::CompuMethod => "CompuMethod",
            PackageRole::Unit => "Unit",
            PackageRole::BaseType => "BaseType",
            PackageRole::DataConstraint => "DataConstraint",
        }
    }
}

impl FromStr for PackageRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageRole::ALL
            .iter()
            .copied()
            .find(|role| role.display() == s)
            .ok_or_else(|| ValidationError::UnknownRole(s.to_string()))
    }
}

/// Payload of a package node. Elements live in the node's generic child
/// map; sub-packages get their own namespace here.
#[derive(Debug, Clone, Default)]
pub struct PackageData {
    pub role: Option<PackageRole>,
    pub(crate) sub_packages: IndexMap<SmolStr, NodeId>,
}

impl PackageData {
    /// Sub-packages in insertion order.
    pub fn sub_packages(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sub_packages.values().copied()
    }

    /// Look up a sub-package by name.
    pub fn sub_package(&self, name: &str) -> Option<NodeId> {
        self.sub_packages.get(name).copied()
    }
}

// Two package nodes always carry the same definition; their contents are
// reconciled member by member through the append discipline.
impl PartialEq for PackageData {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

// ============================================================================
// APPEND & UNIQUE NAMES
// ============================================================================

impl Workspace {
    /// Append an element into a container's element namespace.
    pub(crate) fn append_element(
        &mut self,
        parent: NodeId,
        node: Node,
    ) -> Result<NodeId, ModelError> {
        if let Some(existing) = self.get(parent)?.child(&node.name) {
            return self.reconcile(parent, existing, node);
        }
        let name = node.name.clone();
        let id = self.adopt(parent, node);
        self.get_mut(parent)?.children.insert(name, id);
        Ok(id)
    }

    /// Append a sub-package into a package's package namespace.
    pub(crate) fn append_sub_package(
        &mut self,
        parent: NodeId,
        node: Node,
    ) -> Result<NodeId, ModelError> {
        let parent_data = self.expect_package(parent)?;
        if let Some(existing) = parent_data.sub_package(&node.name) {
            return self.reconcile(parent, existing, node);
        }
        let name = node.name.clone();
        let id = self.adopt(parent, node);
        match &mut self.get_mut(parent)?.data {
            ElementData::Package(data) => {
                data.sub_packages.insert(name, id);
            }
            _ => unreachable!("checked by expect_package"),
        }
        Ok(id)
    }

    /// Decide what a same-named sibling means: no-op for an equal
    /// definition, a fatal conflict otherwise. Never mutates.
    pub(crate) fn reconcile(
        &self,
        parent: NodeId,
        existing: NodeId,
        incoming: Node,
    ) -> Result<NodeId, ModelError> {
        let existing_node = self.get(existing)?;
        if existing_node.kind_name() != incoming.kind_name() {
            return Err(ConflictError::KindMismatch {
                container: self.path_of(parent).to_string(),
                name: incoming.name.clone(),
                existing_kind: existing_node.kind_name(),
                incoming_kind: incoming.kind_name(),
            }
            .into());
        }
        if existing_node.same_definition(&incoming) {
            tracing::trace!(
                "append of '{}' into '{}' is a no-op (equal definition)",
                incoming.name,
                self.path_of(parent)
            );
            return Ok(existing);
        }
        Err(ConflictError::Redefinition {
            container: self.path_of(parent).to_string(),
            name: incoming.name.clone(),
            kind: incoming.kind_name(),
            existing: format!("{:?}", existing_node.data()),
            incoming: format!("{:?}", incoming.data()),
        }
        .into())
    }

    /// First name of `base`, `base_1`, `base_2`, … free in both of the
    /// container's namespaces. Pure: never mutates.
    pub fn find_unique_name(&self, container: NodeId, base: &str) -> SmolStr {
        if !self.name_taken(container, base) {
            return SmolStr::new(base);
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.name_taken(container, &candidate) {
                return SmolStr::new(candidate);
            }
            n += 1;
        }
    }

    /// Reserve a suffixed name under `container`, demoting an existing
    /// un-suffixed `base` sibling to `base_0` first.
    ///
    /// This is the explicit spelling of what used to hide inside name
    /// lookup: after the call, a previously bare `base` node answers to
    /// `base_0` (its index entries move with it), and the returned name
    /// (`base_1`, `base_2`, …) is guaranteed free. Fails with a conflict
    /// if `base_0` is already taken.
    pub fn reserve_and_demote(
        &mut self,
        container: NodeId,
        base: &str,
    ) -> Result<SmolStr, ModelError> {
        if self.name_taken(container, base) {
            let demoted = format!("{base}_0");
            if self.name_taken(container, &demoted) {
                return Err(ConflictError::DemotionBlocked {
                    container: self.path_of(container).to_string(),
                    name: SmolStr::new(base),
                }
                .into());
            }
            self.rename(container, base, &demoted)?;
            tracing::debug!("demoted '{base}' to '{demoted}' while reserving a unique name");
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.name_taken(container, &candidate) {
                return Ok(SmolStr::new(candidate));
            }
            n += 1;
        }
    }

    fn name_taken(&self, container: NodeId, name: &str) -> bool {
        let Some(node) = self.node(container) else {
            return false;
        };
        if node.children.contains_key(name) {
            return true;
        }
        match node.data() {
            ElementData::Package(data) => data.sub_packages.contains_key(name),
            _ => false,
        }
    }

    /// Rename a direct member of `container`, keeping its index entry and
    /// its position in the ordered namespace.
    fn rename(&mut self, container: NodeId, from: &str, to: &str) -> Result<(), ModelError> {
        let renamed = {
            let container_node = self.get_mut(container)?;
            match rename_in(&mut container_node.children, from, to) {
                Some(id) => Some(id),
                None => match &mut container_node.data {
                    ElementData::Package(data) => rename_in(&mut data.sub_packages, from, to),
                    _ => None,
                },
            }
        };
        if let Some(id) = renamed {
            self.get_mut(id)?.name = SmolStr::new(to);
        }
        Ok(())
    }
}

/// Swap a key in an ordered namespace, keeping the entry's position.
fn rename_in(map: &mut IndexMap<SmolStr, NodeId>, from: &str, to: &str) -> Option<NodeId> {
    let index = map.get_index_of(from)?;
    let (_, id) = map.shift_remove_index(index)?;
    map.shift_insert(index, SmolStr::new(to), id);
    Some(id)
}
