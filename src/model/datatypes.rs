//! Data type elements and their factories.
//!
//! Data types carry the category the value builder dispatches on:
//! `VALUE` for primitives, `STRUCTURE` for records, `ARRAY` for arrays and
//! `TYPE_REFERENCE` for one-step aliases. Support elements (compu methods,
//! data constraints, units, base types) live here as well.

use smol_str::SmolStr;

use crate::base::ArPath;
use crate::model::error::{ModelError, ValidationError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::package::PackageRole;
use crate::model::workspace::Workspace;

/// A bounded integer type, optionally bound to an enumeration table
/// (compu method) and/or an external data constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerTypeData {
    pub lower_limit: i64,
    pub upper_limit: i64,
    pub compu_method_ref: Option<ArPath>,
    pub data_constraint_ref: Option<ArPath>,
}

/// A floating point type with optional limits.
#[derive(Debug, Clone, PartialEq)]
pub struct RealTypeData {
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
}

/// A fixed-capacity string type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTypeData {
    pub max_length: u32,
    pub encoding: SmolStr,
}

/// One declared member of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMember {
    pub name: SmolStr,
    pub type_ref: ArPath,
}

/// A record type with an ordered member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTypeData {
    pub members: Vec<RecordMember>,
}

/// A fixed-length array type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayTypeData {
    pub element_type_ref: ArPath,
    pub length: u32,
}

/// One `TYPE_REFERENCE` indirection to another data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasData {
    pub referenced_type_ref: ArPath,
}

/// One row of an enumeration table: a closed numeric range mapped to a
/// symbolic text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompuScale {
    pub lower: i64,
    pub upper: i64,
    pub symbol: SmolStr,
}

/// An enumeration table (the only compu method shape the engine interprets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompuMethodData {
    pub scales: Vec<CompuScale>,
}

impl CompuMethodData {
    /// Map a numeral through the table.
    pub fn symbol_for(&self, value: i64) -> Option<&str> {
        self.scales
            .iter()
            .find(|s| s.lower <= value && value <= s.upper)
            .map(|s| s.symbol.as_str())
    }

    /// True if `symbol` appears in the table.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.scales.iter().any(|s| s.symbol == symbol)
    }
}

/// A closed integer range constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConstraintData {
    pub lower_limit: i64,
    pub upper_limit: i64,
}

/// A physical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitData {
    pub display_name: SmolStr,
}

/// A platform base type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTypeData {
    pub size_bits: u32,
    pub native_declaration: SmolStr,
}

/// A named constant owning one built value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantData {
    pub value: crate::values::ValueSpec,
}

// ============================================================================
// FACTORIES
// ============================================================================

impl Workspace {
    /// Create a bounded integer type under `package`.
    pub fn create_integer_type(
        &mut self,
        package: NodeId,
        name: &str,
        lower_limit: i64,
        upper_limit: i64,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::IntegerType(IntegerTypeData {
                lower_limit,
                upper_limit,
                compu_method_ref: None,
                data_constraint_ref: None,
            }),
        )
        .with_category("VALUE");
        self.append_element(package, node)
    }

    /// Create an enumerated integer type: the enumeration table is created
    /// as a compu method in the package configured for
    /// [`PackageRole::CompuMethod`], and the integer type is bound to it.
    pub fn create_enumerated_type(
        &mut self,
        package: NodeId,
        name: &str,
        symbols: &[&str],
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let compu_pkg_path = self
            .role(PackageRole::CompuMethod)
            .cloned()
            .ok_or(ValidationError::RoleNotConfigured {
                role: PackageRole::CompuMethod.display(),
            })?;
        let compu_pkg = self.resolve(compu_pkg_path.as_str())?;

        let scales = symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| CompuScale {
                lower: i as i64,
                upper: i as i64,
                symbol: SmolStr::new(symbol),
            })
            .collect();
        let compu = self.create_compu_method_from(compu_pkg, name, scales)?;
        let compu_ref = self.path_of(compu);

        let node = Node::new(
            name,
            ElementData::IntegerType(IntegerTypeData {
                lower_limit: 0,
                upper_limit: symbols.len().saturating_sub(1) as i64,
                compu_method_ref: Some(compu_ref),
                data_constraint_ref: None,
            }),
        )
        .with_category("VALUE");
        self.append_element(package, node)
    }

    /// Create a real type under `package`.
    pub fn create_real_type(
        &mut self,
        package: NodeId,
        name: &str,
        lower_limit: Option<f64>,
        upper_limit: Option<f64>,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::RealType(RealTypeData {
                lower_limit,
                upper_limit,
            }),
        )
        .with_category("VALUE");
        self.append_element(package, node)
    }

    /// Create a boolean type under `package`.
    pub fn create_boolean_type(
        &mut self,
        package: NodeId,
        name: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(name, ElementData::BooleanType).with_category("VALUE");
        self.append_element(package, node)
    }

    /// Create a string type under `package`.
    pub fn create_string_type(
        &mut self,
        package: NodeId,
        name: &str,
        max_length: u32,
        encoding: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::StringType(StringTypeData {
                max_length,
                encoding: SmolStr::new(encoding),
            }),
        )
        .with_category("VALUE");
        self.append_element(package, node)
    }

    /// Create a record type from `(member name, data type reference)` pairs.
    /// Every member type reference must resolve to a data type.
    pub fn create_record_type(
        &mut self,
        package: NodeId,
        name: &str,
        members: &[(&str, &str)],
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let mut resolved = Vec::with_capacity(members.len());
        for (member_name, type_ref) in members {
            let (_, canonical) = self.resolve_data_type_ref(type_ref)?;
            resolved.push(RecordMember {
                name: SmolStr::new(member_name),
                type_ref: canonical,
            });
        }
        let node = Node::new(name, ElementData::RecordType(RecordTypeData { members: resolved }))
            .with_category("STRUCTURE");
        self.append_element(package, node)
    }

    /// Create a fixed-length array type.
    pub fn create_array_type(
        &mut self,
        package: NodeId,
        name: &str,
        element_type_ref: &str,
        length: u32,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let (_, canonical) = self.resolve_data_type_ref(element_type_ref)?;
        let node = Node::new(
            name,
            ElementData::ArrayType(ArrayTypeData {
                element_type_ref: canonical,
                length,
            }),
        )
        .with_category("ARRAY");
        self.append_element(package, node)
    }

    /// Create a one-step type alias.
    pub fn create_type_alias(
        &mut self,
        package: NodeId,
        name: &str,
        referenced_type_ref: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let (_, canonical) = self.resolve_data_type_ref(referenced_type_ref)?;
        let node = Node::new(
            name,
            ElementData::TypeAlias(TypeAliasData {
                referenced_type_ref: canonical,
            }),
        )
        .with_category("TYPE_REFERENCE");
        self.append_element(package, node)
    }

    /// Create a compu method (enumeration table) under `package`.
    pub fn create_compu_method(
        &mut self,
        package: NodeId,
        name: &str,
        scales: Vec<CompuScale>,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        self.create_compu_method_from(package, name, scales)
    }

    fn create_compu_method_from(
        &mut self,
        package: NodeId,
        name: &str,
        scales: Vec<CompuScale>,
    ) -> Result<NodeId, ModelError> {
        let node = Node::new(name, ElementData::CompuMethod(CompuMethodData { scales }))
            .with_category("TEXTTABLE");
        self.append_element(package, node)
    }

    /// Create a data constraint under `package`.
    pub fn create_data_constraint(
        &mut self,
        package: NodeId,
        name: &str,
        lower_limit: i64,
        upper_limit: i64,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::DataConstraint(DataConstraintData {
                lower_limit,
                upper_limit,
            }),
        );
        self.append_element(package, node)
    }

    /// Create a unit under `package`.
    pub fn create_unit(
        &mut self,
        package: NodeId,
        name: &str,
        display_name: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::Unit(UnitData {
                display_name: SmolStr::new(display_name),
            }),
        );
        self.append_element(package, node)
    }

    /// Create a platform base type under `package`.
    pub fn create_base_type(
        &mut self,
        package: NodeId,
        name: &str,
        size_bits: u32,
        native_declaration: &str,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let node = Node::new(
            name,
            ElementData::BaseType(BaseTypeData {
                size_bits,
                native_declaration: SmolStr::new(native_declaration),
            }),
        );
        self.append_element(package, node)
    }

    /// Bind an existing integer type to a data constraint. The reference
    /// must resolve to a [`DataConstraintData`] element.
    pub fn bind_data_constraint(
        &mut self,
        integer_type: NodeId,
        constraint_ref: &str,
    ) -> Result<(), ModelError> {
        let constraint = self.resolve_with_role(constraint_ref, PackageRole::DataConstraint)?;
        let canonical = match self.get(constraint)?.data() {
            ElementData::DataConstraint(_) => self.path_of(constraint),
            other => {
                return Err(crate::model::error::ReferenceError::WrongKind {
                    path: constraint_ref.to_string(),
                    expected: "DataConstraint",
                    actual: other.kind_name(),
                }
                .into());
            }
        };
        let path = self.path_of(integer_type).to_string();
        match &mut self.get_mut(integer_type)?.data {
            ElementData::IntegerType(data) => {
                data.data_constraint_ref = Some(canonical);
                Ok(())
            }
            other => Err(crate::model::error::ReferenceError::WrongKind {
                path,
                expected: "IntegerType",
                actual: other.kind_name(),
            }
            .into()),
        }
    }
}
