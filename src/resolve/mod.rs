//! Reference resolution — turning path strings into live nodes.
//!
//! Resolution is an iterative descent, one segment per step. A leading
//! `/` is absolute from the workspace; a bare path also starts at the
//! workspace top (there is no "current package"), unless a role hint is
//! given, in which case the role's configured package path is prefixed
//! once before descent. Packages and elements are separate namespaces at
//! each level; packages are probed first.
//!
//! Every public entry point returns `Result`; resolution has exactly one
//! fallible contract. Resolution never mutates the tree and is safe for
//! concurrent readers.

use crate::base::ArPath;
use crate::model::error::{ModelError, ReferenceError};
use crate::model::node::{ElementData, NodeId};
use crate::model::package::PackageRole;
use crate::model::workspace::Workspace;

impl Workspace {
    /// Resolve a path string to a node.
    pub fn resolve(&self, path: &str) -> Result<NodeId, ModelError> {
        self.descend(path, path)
    }

    /// Resolve a path string, prefixing the role's configured package
    /// path once when the path is not already absolute. With no package
    /// bound to the role, the bare path resolves from the workspace top.
    pub fn resolve_with_role(
        &self,
        path: &str,
        role: PackageRole,
    ) -> Result<NodeId, ModelError> {
        if path.starts_with('/') {
            return self.resolve(path);
        }
        match self.role(role) {
            Some(prefix) => {
                let full = format!("{}/{}", prefix.as_str(), path);
                tracing::trace!("role {} prefixes '{path}' -> '{full}'", role.display());
                self.descend(&full, &full)
            }
            None => self.resolve(path),
        }
    }

    fn descend(&self, full_path: &str, path: &str) -> Result<NodeId, ModelError> {
        let mut current: Option<NodeId> = None;
        let mut matched_any = false;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            matched_any = true;
            let next = match current {
                None => self.root_package(segment),
                Some(node) => self.find_child(node, segment),
            };
            match next {
                Some(id) => {
                    tracing::trace!("descend '{segment}' -> {:?}", self.path_of(id));
                    current = Some(id);
                }
                None => {
                    return Err(ReferenceError::Unresolved {
                        path: full_path.to_string(),
                        segment: segment.to_string(),
                    }
                    .into());
                }
            }
        }
        match (current, matched_any) {
            (Some(id), _) => Ok(id),
            _ => Err(ReferenceError::Unresolved {
                path: full_path.to_string(),
                segment: String::new(),
            }
            .into()),
        }
    }

    /// One descent step: probe the package namespace first, then the
    /// element namespace.
    fn find_child(&self, node: NodeId, segment: &str) -> Option<NodeId> {
        let current = self.node(node)?;
        if let ElementData::Package(data) = current.data() {
            if let Some(sub) = data.sub_package(segment) {
                return Some(sub);
            }
        }
        current.child(segment)
    }

    // ------------------------------------------------------------------
    // Kind-checked resolution
    // ------------------------------------------------------------------

    /// Resolve a path that must lead to a data type. Bare names are
    /// shortened through the [`PackageRole::DataType`] role.
    pub fn resolve_data_type(&self, path: &str) -> Result<NodeId, ModelError> {
        let id = self.resolve_with_role(path, PackageRole::DataType)?;
        self.check_kind(id, path, "data type", |data| data.is_data_type())
    }

    /// Resolve a path that must lead to a port interface, via the
    /// [`PackageRole::PortInterface`] role for bare names.
    pub fn resolve_port_interface(&self, path: &str) -> Result<NodeId, ModelError> {
        let id = self.resolve_with_role(path, PackageRole::PortInterface)?;
        self.check_kind(id, path, "port interface", |data| data.is_port_interface())
    }

    /// Resolve a path that must lead to a component type, via the
    /// [`PackageRole::ComponentType`] role for bare names.
    pub fn resolve_component(&self, path: &str) -> Result<NodeId, ModelError> {
        let id = self.resolve_with_role(path, PackageRole::ComponentType)?;
        self.check_kind(id, path, "component type", |data| data.is_component())
    }

    /// Resolve a path that must lead to a constant, via the
    /// [`PackageRole::Constant`] role for bare names.
    pub fn resolve_constant(&self, path: &str) -> Result<NodeId, ModelError> {
        let id = self.resolve_with_role(path, PackageRole::Constant)?;
        self.check_kind(id, path, "Constant", |data| {
            matches!(data, ElementData::Constant(_))
        })
    }

    /// Resolve a data type reference and return the node together with
    /// its canonical absolute path (the form stored in the model).
    pub(crate) fn resolve_data_type_ref(
        &self,
        path: &str,
    ) -> Result<(NodeId, ArPath), ModelError> {
        let id = self.resolve_data_type(path)?;
        Ok((id, self.path_of(id)))
    }

    fn check_kind(
        &self,
        id: NodeId,
        path: &str,
        expected: &'static str,
        pred: impl Fn(&ElementData) -> bool,
    ) -> Result<NodeId, ModelError> {
        let node = self.get(id)?;
        if pred(node.data()) {
            Ok(id)
        } else {
            Err(ReferenceError::WrongKind {
                path: path.to_string(),
                expected,
                actual: node.kind_name(),
            }
            .into())
        }
    }
}
