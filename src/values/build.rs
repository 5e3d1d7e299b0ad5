//! The recursive, type-directed value builder.
//!
//! `build_value` walks a raw host value against a data type, resolving
//! one `TYPE_REFERENCE` indirection at a time, and produces the matching
//! [`ValueSpec`] tree. Range and enum-table violations and malformed
//! record shapes are fatal; array length mismatches are repaired
//! (zero-pad or truncate) and reported on the warning channel.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::model::error::{ModelError, ModelWarning, ReferenceError, ValidationError};
use crate::model::node::{ElementData, Node, NodeId};
use crate::model::workspace::Workspace;
use crate::values::{NumberValue, RawValue, ValueSpec};

impl Workspace {
    /// Build a typed value tree from a raw host value against `data_type`.
    pub fn build_value(
        &mut self,
        data_type: NodeId,
        raw: &RawValue,
        label: Option<&str>,
    ) -> Result<ValueSpec, ModelError> {
        let mut alias_chain = FxHashSet::default();
        self.build_value_inner(data_type, raw, label, &mut alias_chain)
    }

    /// Create a constant under `package` by building `raw` against the
    /// data type referenced by `type_ref`.
    pub fn create_constant(
        &mut self,
        package: NodeId,
        name: &str,
        type_ref: &str,
        raw: &RawValue,
    ) -> Result<NodeId, ModelError> {
        self.expect_package(package)?;
        let data_type = self.resolve_data_type(type_ref)?;
        let value = self.build_value(data_type, raw, Some(name))?;
        let node = Node::new(
            name,
            ElementData::Constant(crate::model::datatypes::ConstantData { value }),
        );
        self.append_element(package, node)
    }

    fn build_value_inner(
        &mut self,
        data_type: NodeId,
        raw: &RawValue,
        label: Option<&str>,
        alias_chain: &mut FxHashSet<NodeId>,
    ) -> Result<ValueSpec, ModelError> {
        let type_path = self.path_of(data_type).to_string();
        let data = self.get(data_type)?.data().clone();
        let label = label.map(SmolStr::new);

        match data {
            ElementData::TypeAlias(alias) => {
                if !alias_chain.insert(data_type) {
                    return Err(ValidationError::TypeReferenceCycle {
                        data_type: type_path,
                    }
                    .into());
                }
                let target = self.resolve_data_type(alias.referenced_type_ref.as_str())?;
                self.build_value_inner(target, raw, label.as_deref(), alias_chain)
            }

            ElementData::IntegerType(int_type) => {
                let table = match &int_type.compu_method_ref {
                    Some(path) => {
                        let id = self.resolve(path.as_str())?;
                        match self.get(id)?.data() {
                            ElementData::CompuMethod(cm) => Some(cm.clone()),
                            other => {
                                return Err(ReferenceError::WrongKind {
                                    path: path.to_string(),
                                    expected: "CompuMethod",
                                    actual: other.kind_name(),
                                }
                                .into());
                            }
                        }
                    }
                    None => None,
                };
                let (mut lower, mut upper) = (int_type.lower_limit, int_type.upper_limit);
                if let Some(path) = &int_type.data_constraint_ref {
                    let id = self.resolve(path.as_str())?;
                    match self.get(id)?.data() {
                        ElementData::DataConstraint(dc) => {
                            lower = dc.lower_limit;
                            upper = dc.upper_limit;
                        }
                        other => {
                            return Err(ReferenceError::WrongKind {
                                path: path.to_string(),
                                expected: "DataConstraint",
                                actual: other.kind_name(),
                            }
                            .into());
                        }
                    }
                }

                let numeral = match raw {
                    RawValue::Int(v) => Some(*v),
                    RawValue::Bool(b) => Some(i64::from(*b)),
                    RawValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
                    _ => None,
                };
                match (numeral, raw) {
                    (Some(v), _) => match &table {
                        Some(cm) => match cm.symbol_for(v) {
                            Some(symbol) => Ok(ValueSpec::Text {
                                label,
                                value: SmolStr::new(symbol),
                            }),
                            None => Err(ValidationError::NotInEnumTable {
                                data_type: type_path,
                                given: v.to_string(),
                            }
                            .into()),
                        },
                        None => {
                            if v < lower || v > upper {
                                return Err(ValidationError::OutOfRange {
                                    data_type: type_path,
                                    value: v.to_string(),
                                    lower: lower.to_string(),
                                    upper: upper.to_string(),
                                }
                                .into());
                            }
                            Ok(ValueSpec::Numerical {
                                label,
                                value: NumberValue::Int(v),
                            })
                        }
                    },
                    (None, RawValue::Text(symbol)) => match &table {
                        Some(cm) if cm.has_symbol(symbol) => Ok(ValueSpec::Text {
                            label,
                            value: symbol.clone(),
                        }),
                        Some(_) => Err(ValidationError::NotInEnumTable {
                            data_type: type_path,
                            given: symbol.to_string(),
                        }
                        .into()),
                        None => Err(ValidationError::RawShapeMismatch {
                            data_type: type_path,
                            expected: "numerical",
                            got: raw.shape_name(),
                        }
                        .into()),
                    },
                    _ => Err(ValidationError::RawShapeMismatch {
                        data_type: type_path,
                        expected: "numerical",
                        got: raw.shape_name(),
                    }
                    .into()),
                }
            }

            ElementData::RealType(real_type) => {
                let value = match raw {
                    RawValue::Int(v) => *v as f64,
                    RawValue::Float(f) => *f,
                    _ => {
                        return Err(ValidationError::RawShapeMismatch {
                            data_type: type_path,
                            expected: "numerical",
                            got: raw.shape_name(),
                        }
                        .into());
                    }
                };
                let below = real_type.lower_limit.is_some_and(|lo| value < lo);
                let above = real_type.upper_limit.is_some_and(|hi| value > hi);
                if below || above {
                    return Err(ValidationError::OutOfRange {
                        data_type: type_path,
                        value: value.to_string(),
                        lower: real_type
                            .lower_limit
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "-inf".into()),
                        upper: real_type
                            .upper_limit
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "inf".into()),
                    }
                    .into());
                }
                Ok(ValueSpec::Numerical {
                    label,
                    value: NumberValue::Float(value),
                })
            }

            ElementData::BooleanType => {
                let value = match raw {
                    RawValue::Bool(b) => i64::from(*b),
                    RawValue::Int(v @ (0 | 1)) => *v,
                    _ => {
                        return Err(ValidationError::RawShapeMismatch {
                            data_type: type_path,
                            expected: "boolean",
                            got: raw.shape_name(),
                        }
                        .into());
                    }
                };
                Ok(ValueSpec::Numerical {
                    label,
                    value: NumberValue::Int(value),
                })
            }

            ElementData::StringType(_) => match raw {
                RawValue::Text(text) => Ok(ValueSpec::Text {
                    label,
                    value: text.clone(),
                }),
                _ => Err(ValidationError::RawShapeMismatch {
                    data_type: type_path,
                    expected: "text",
                    got: raw.shape_name(),
                }
                .into()),
            },

            ElementData::RecordType(record) => {
                let RawValue::Map(entries) = raw else {
                    return Err(ValidationError::RawShapeMismatch {
                        data_type: type_path,
                        expected: "mapping",
                        got: raw.shape_name(),
                    }
                    .into());
                };
                for member in &record.members {
                    if !entries.iter().any(|(k, _)| *k == member.name) {
                        return Err(ValidationError::MissingRecordMember {
                            data_type: type_path,
                            member: member.name.clone(),
                        }
                        .into());
                    }
                }
                let extras: Vec<&str> = entries
                    .iter()
                    .map(|(k, _)| k.as_str())
                    .filter(|k| !record.members.iter().any(|m| m.name == *k))
                    .collect();
                if !extras.is_empty() {
                    return Err(ValidationError::UnexpectedRecordMembers {
                        data_type: type_path,
                        members: extras.join(", "),
                    }
                    .into());
                }
                let mut fields = Vec::with_capacity(record.members.len());
                for member in &record.members {
                    let member_raw = entries
                        .iter()
                        .find(|(k, _)| *k == member.name)
                        .map(|(_, v)| v.clone())
                        .ok_or_else(|| ValidationError::MissingRecordMember {
                            data_type: type_path.clone(),
                            member: member.name.clone(),
                        })?;
                    let member_type = self.resolve_data_type(member.type_ref.as_str())?;
                    let field =
                        self.build_value(member_type, &member_raw, Some(member.name.as_str()))?;
                    fields.push(field);
                }
                Ok(ValueSpec::Record { label, fields })
            }

            ElementData::ArrayType(array) => {
                let element_type = self.resolve_data_type(array.element_type_ref.as_str())?;
                let items: Vec<RawValue> = match raw {
                    RawValue::Seq(items) => items.clone(),
                    RawValue::Text(text) => self.explode_text(element_type, text)?,
                    _ => {
                        return Err(ValidationError::RawShapeMismatch {
                            data_type: type_path,
                            expected: "sequence",
                            got: raw.shape_name(),
                        }
                        .into());
                    }
                };
                let declared = array.length as usize;
                let mut items = items;
                if items.len() != declared {
                    self.warn(ModelWarning::ArrayLengthMismatch {
                        data_type: type_path.clone(),
                        expected: array.length,
                        actual: items.len(),
                    });
                    if items.len() < declared {
                        items.resize(declared, RawValue::Int(0));
                    } else {
                        items.truncate(declared);
                    }
                }
                let mut elements = Vec::with_capacity(items.len());
                for item in &items {
                    elements.push(self.build_value(element_type, item, None)?);
                }
                Ok(ValueSpec::Array { label, elements })
            }

            other => Err(ReferenceError::WrongKind {
                path: type_path,
                expected: "data type",
                actual: other.kind_name(),
            }
            .into()),
        }
    }

    /// Explode a string into per-character raw values: character codes
    /// when the (alias-resolved) element type is numeric, one-character
    /// texts otherwise.
    fn explode_text(
        &self,
        element_type: NodeId,
        text: &str,
    ) -> Result<Vec<RawValue>, ModelError> {
        let resolved = self.strip_aliases(element_type)?;
        let numeric = matches!(
            self.get(resolved)?.data(),
            ElementData::IntegerType(_) | ElementData::RealType(_) | ElementData::BooleanType
        );
        Ok(text
            .chars()
            .map(|c| {
                if numeric {
                    RawValue::Int(c as i64)
                } else {
                    RawValue::Text(SmolStr::new(c.to_string()))
                }
            })
            .collect())
    }

    /// Follow `TYPE_REFERENCE` indirections to the underlying type.
    pub(crate) fn strip_aliases(&self, data_type: NodeId) -> Result<NodeId, ModelError> {
        let mut visited = FxHashSet::default();
        let mut current = data_type;
        loop {
            if !visited.insert(current) {
                return Err(ValidationError::TypeReferenceCycle {
                    data_type: self.path_of(data_type).to_string(),
                }
                .into());
            }
            match self.get(current)?.data() {
                ElementData::TypeAlias(alias) => {
                    current = self.resolve_data_type(alias.referenced_type_ref.as_str())?;
                }
                _ => return Ok(current),
            }
        }
    }
}
