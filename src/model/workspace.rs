//! The workspace: arena storage, root packages and the role table.
//!
//! The workspace owns every node. All mutation goes through `&mut self`
//! methods and is single-threaded; readers are pure and may run
//! concurrently with each other as long as no writer touches the same
//! tree (callers provide exclusion).

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{ArPath, SchemaEra, SchemaVersion};
use crate::model::error::{ModelError, ModelWarning, ReferenceError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::package::{PackageData, PackageRole};

/// The root of a model tree.
pub struct Workspace {
    /// Arena storage for all nodes - single source of truth. Deleted
    /// nodes leave a tombstone; slots are never reused.
    nodes: Vec<Option<Node>>,
    /// Root packages, ordered and name-unique.
    roots: IndexMap<SmolStr, NodeId>,
    /// Role table: semantic role -> absolute package path.
    roles: FxHashMap<PackageRole, ArPath>,
    version: SchemaVersion,
    warnings: Vec<ModelWarning>,
}

impl Workspace {
    /// Create an empty workspace against one schema version.
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            nodes: Vec::new(),
            roots: IndexMap::new(),
            roles: FxHashMap::default(),
            version,
            warnings: Vec::new(),
        }
    }

    /// The schema version fixed at construction.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// The schema era derived from the version, decided once.
    pub fn era(&self) -> SchemaEra {
        self.version.era()
    }

    // ------------------------------------------------------------------
    // Arena access
    // ------------------------------------------------------------------

    /// Get a node by id (O(1) arena lookup). `None` for deleted nodes.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node, ModelError> {
        self.node(id)
            .ok_or_else(|| ReferenceError::DeadNode.into())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, ModelError> {
        self.nodes
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| ReferenceError::DeadNode.into())
    }

    /// Push a node into the arena with its owner set.
    pub(crate) fn adopt(&mut self, owner: NodeId, mut node: Node) -> NodeId {
        node.owner = Some(owner);
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// The package payload of `id`, or a wrong-kind error naming the path.
    pub(crate) fn expect_package(&self, id: NodeId) -> Result<&PackageData, ModelError> {
        match self.get(id)?.data() {
            ElementData::Package(data) => Ok(data),
            other => Err(ReferenceError::WrongKind {
                path: self.path_of(id).to_string(),
                expected: "Package",
                actual: other.kind_name(),
            }
            .into()),
        }
    }

    // ------------------------------------------------------------------
    // Roots
    // ------------------------------------------------------------------

    /// Create (or re-open) a root package. Re-creating an existing root
    /// package of the same name is a no-op returning the existing node.
    pub fn create_package(&mut self, name: &str) -> Result<NodeId, ModelError> {
        if let Some(existing) = self.roots.get(name) {
            return Ok(*existing);
        }
        let node = Node::new(name, ElementData::Package(PackageData::default()));
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(node));
        self.roots.insert(SmolStr::new(name), id);
        Ok(id)
    }

    /// Create a sub-package inside an existing package.
    pub fn create_sub_package(&mut self, parent: NodeId, name: &str) -> Result<NodeId, ModelError> {
        let node = Node::new(name, ElementData::Package(PackageData::default()));
        self.append_sub_package(parent, node)
    }

    /// Root packages in insertion order.
    pub fn root_packages(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.values().copied()
    }

    /// Look up a root package by name.
    pub fn root_package(&self, name: &str) -> Option<NodeId> {
        self.roots.get(name).copied()
    }

    // ------------------------------------------------------------------
    // Role table
    // ------------------------------------------------------------------

    /// Bind a role to a package path. The path must resolve to a package;
    /// the package's own role tag is updated to match.
    pub fn set_role(&mut self, role: PackageRole, path: &str) -> Result<(), ModelError> {
        let package = self.resolve(path)?;
        self.expect_package(package)?;
        let canonical = self.path_of(package);
        match &mut self.get_mut(package)?.data {
            ElementData::Package(data) => data.role = Some(role),
            _ => unreachable!("checked by expect_package"),
        }
        self.roles.insert(role, canonical);
        Ok(())
    }

    /// The package path bound to a role, if any.
    pub fn role(&self, role: PackageRole) -> Option<&ArPath> {
        self.roles.get(&role)
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// The qualified path of a node, computed by walking owners.
    pub fn path_of(&self, id: NodeId) -> ArPath {
        let mut segments: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.node(cur) {
                Some(node) => {
                    segments.push(node.name());
                    current = node.owner();
                }
                None => break,
            }
        }
        let mut path = String::new();
        for segment in segments.iter().rev() {
            path.push('/');
            path.push_str(segment);
        }
        ArPath::new(path)
    }

    // ------------------------------------------------------------------
    // Element metadata
    // ------------------------------------------------------------------

    /// Set the category tag of an element.
    pub fn set_category(&mut self, id: NodeId, category: &str) -> Result<(), ModelError> {
        self.get_mut(id)?.category = Some(SmolStr::new(category));
        Ok(())
    }

    /// Attach administrative data to an element.
    pub fn set_admin_data(
        &mut self,
        id: NodeId,
        admin_data: crate::model::node::AdminData,
    ) -> Result<(), ModelError> {
        self.get_mut(id)?.admin_data = Some(admin_data);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Delete a subtree: detach it from its owner's collections and
    /// tombstone every node in it. Nothing is deleted implicitly.
    pub fn delete(&mut self, id: NodeId) -> Result<(), ModelError> {
        let (name, owner) = {
            let node = self.get(id)?;
            (node.name.clone(), node.owner())
        };
        match owner {
            Some(owner_id) => {
                let owner_node = self.get_mut(owner_id)?;
                if owner_node.children.shift_remove(&name).is_none() {
                    if let ElementData::Package(data) = &mut owner_node.data {
                        data.sub_packages.shift_remove(&name);
                    }
                }
            }
            None => {
                self.roots.shift_remove(&name);
            }
        }
        // Tombstone the whole subtree.
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.node(cur) {
                stack.extend(node.children());
                if let ElementData::Package(data) = node.data() {
                    stack.extend(data.sub_packages());
                }
            }
            self.nodes[cur.index()] = None;
        }
        tracing::debug!("deleted subtree rooted at '{}'", name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Warning channel
    // ------------------------------------------------------------------

    /// Record a non-fatal finding.
    pub(crate) fn warn(&mut self, warning: ModelWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Warnings accumulated since construction or the last
    /// [`Workspace::take_warnings`].
    pub fn warnings(&self) -> &[ModelWarning] {
        &self.warnings
    }

    /// Drain the warning channel.
    pub fn take_warnings(&mut self) -> Vec<ModelWarning> {
        std::mem::take(&mut self.warnings)
    }
}
