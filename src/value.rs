//! Attribute values: tri-state typed values and their wire emission

use std::collections::BTreeMap;
use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{AttrError, Result};
use crate::path::Path;
use crate::types::AttrType;
use crate::wire::{WireContent, WireValue};

/// The three mutually exclusive states of an attribute value.
///
/// `Known` is the only state carrying payload; `Unknown` marks a value the
/// producer has not computed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueState<T> {
    Known(T),
    Null,
    Unknown,
}

impl<T> ValueState<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, ValueState::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ValueState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ValueState::Unknown)
    }

    /// The payload, if this state is `Known`.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            ValueState::Known(payload) => Some(payload),
            _ => None,
        }
    }
}

/// A typed attribute value.
///
/// The variant set is closed: every consumer across the wire boundary must
/// interpret the same six kinds. List and Map are homogeneous (one shared
/// element type); a known Object's attribute map has exactly the key set of
/// its attribute-type map. Values are immutable once constructed and are
/// compared structurally, never by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    Bool(ValueState<bool>),
    Number(ValueState<BigDecimal>),
    String(ValueState<String>),
    List {
        element_type: AttrType,
        state: ValueState<Vec<AttrValue>>,
    },
    Map {
        element_type: AttrType,
        state: ValueState<BTreeMap<String, AttrValue>>,
    },
    Object {
        attribute_types: BTreeMap<String, AttrType>,
        state: ValueState<BTreeMap<String, AttrValue>>,
    },
}

impl AttrValue {
    pub fn known_bool(value: bool) -> Self {
        AttrValue::Bool(ValueState::Known(value))
    }

    pub fn known_number(value: impl Into<BigDecimal>) -> Self {
        AttrValue::Number(ValueState::Known(value.into()))
    }

    pub fn known_string(value: impl Into<String>) -> Self {
        AttrValue::String(ValueState::Known(value.into()))
    }

    pub fn known_list(element_type: AttrType, elements: Vec<AttrValue>) -> Self {
        AttrValue::List {
            element_type,
            state: ValueState::Known(elements),
        }
    }

    pub fn known_map(element_type: AttrType, elements: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Map {
            element_type,
            state: ValueState::Known(elements),
        }
    }

    pub fn known_object(
        attribute_types: BTreeMap<String, AttrType>,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Self {
        AttrValue::Object {
            attribute_types,
            state: ValueState::Known(attributes),
        }
    }

    /// Human-readable kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Number(_) => "number",
            AttrValue::String(_) => "string",
            AttrValue::List { .. } => "list",
            AttrValue::Map { .. } => "map",
            AttrValue::Object { .. } => "object",
        }
    }

    pub fn is_known(&self) -> bool {
        match self {
            AttrValue::Bool(state) => state.is_known(),
            AttrValue::Number(state) => state.is_known(),
            AttrValue::String(state) => state.is_known(),
            AttrValue::List { state, .. } => state.is_known(),
            AttrValue::Map { state, .. } => state.is_known(),
            AttrValue::Object { state, .. } => state.is_known(),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            AttrValue::Bool(state) => state.is_null(),
            AttrValue::Number(state) => state.is_null(),
            AttrValue::String(state) => state.is_null(),
            AttrValue::List { state, .. } => state.is_null(),
            AttrValue::Map { state, .. } => state.is_null(),
            AttrValue::Object { state, .. } => state.is_null(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            AttrValue::Bool(state) => state.is_unknown(),
            AttrValue::Number(state) => state.is_unknown(),
            AttrValue::String(state) => state.is_unknown(),
            AttrValue::List { state, .. } => state.is_unknown(),
            AttrValue::Map { state, .. } => state.is_unknown(),
            AttrValue::Object { state, .. } => state.is_unknown(),
        }
    }

    /// The type descriptor this value conforms to.
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::Bool(_) => AttrType::Bool,
            AttrValue::Number(_) => AttrType::Number,
            AttrValue::String(_) => AttrType::String,
            AttrValue::List { element_type, .. } => {
                AttrType::List(Box::new(element_type.clone()))
            }
            AttrValue::Map { element_type, .. } => AttrType::Map(Box::new(element_type.clone())),
            AttrValue::Object {
                attribute_types, ..
            } => AttrType::Object(attribute_types.clone()),
        }
    }

    /// Convert this value to its wire representation.
    ///
    /// Unknown maps to the wire unknown marker and Null to wire null. Known
    /// composites convert every child recursively and re-validate each
    /// child's declared tag and encoded content against the declared
    /// element or attribute wire type, so drift between a value and its
    /// type descriptor surfaces here as a [`AttrError::Validation`] naming
    /// the offending index or key, even for null and unknown children.
    pub fn to_wire(&self, ctx: &Context) -> Result<WireValue> {
        tracing::trace!(kind = self.kind_name(), "converting value to wire");
        self.to_wire_at(ctx, &Path::empty())
    }

    pub(crate) fn to_wire_at(&self, ctx: &Context, path: &Path) -> Result<WireValue> {
        ctx.ensure_active()?;
        let wire_type = self.attr_type().wire_type(ctx);
        match self {
            AttrValue::Bool(ValueState::Known(value)) => {
                Ok(WireValue::new(wire_type, WireContent::Bool(*value)))
            }
            AttrValue::Number(ValueState::Known(value)) => Ok(WireValue::new(
                wire_type,
                WireContent::Number(value.clone()),
            )),
            AttrValue::String(ValueState::Known(value)) => Ok(WireValue::new(
                wire_type,
                WireContent::String(value.clone()),
            )),
            AttrValue::List {
                element_type,
                state: ValueState::Known(elements),
            } => {
                let element_wire_type = element_type.wire_type(ctx);
                let mut items = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let element_path = path.with_element_key_int(index as i64);
                    let item = element.to_wire_at(ctx, &element_path)?;
                    if !element_wire_type.is(item.ty()) {
                        return Err(AttrError::Validation {
                            path: element_path,
                            detail: format!(
                                "element type {} does not match list element type {}",
                                item.ty(),
                                element_wire_type
                            ),
                        });
                    }
                    element_wire_type.validate_at(item.content(), &element_path)?;
                    items.push(item);
                }
                Ok(WireValue::new(wire_type, WireContent::List(items)))
            }
            AttrValue::Map {
                element_type,
                state: ValueState::Known(elements),
            } => {
                let element_wire_type = element_type.wire_type(ctx);
                let mut entries = BTreeMap::new();
                for (key, element) in elements {
                    let entry_path = path.with_element_key_string(key);
                    let entry = element.to_wire_at(ctx, &entry_path)?;
                    if !element_wire_type.is(entry.ty()) {
                        return Err(AttrError::Validation {
                            path: entry_path,
                            detail: format!(
                                "element type {} does not match map element type {}",
                                entry.ty(),
                                element_wire_type
                            ),
                        });
                    }
                    element_wire_type.validate_at(entry.content(), &entry_path)?;
                    entries.insert(key.clone(), entry);
                }
                Ok(WireValue::new(wire_type, WireContent::Map(entries)))
            }
            AttrValue::Object {
                attribute_types,
                state: ValueState::Known(attributes),
            } => {
                if attributes.len() != attribute_types.len() {
                    return Err(AttrError::SchemaMismatch {
                        path: path.clone(),
                        detail: format!(
                            "object has {} attributes, type declares {}",
                            attributes.len(),
                            attribute_types.len()
                        ),
                    });
                }
                let mut members = BTreeMap::new();
                for (name, attribute_type) in attribute_types {
                    let attribute =
                        attributes.get(name).ok_or_else(|| AttrError::SchemaMismatch {
                            path: path.clone(),
                            detail: format!("object is missing attribute {name:?}"),
                        })?;
                    let member_path = path.with_attribute_name(name);
                    let member = attribute.to_wire_at(ctx, &member_path)?;
                    let member_wire_type = attribute_type.wire_type(ctx);
                    if !member_wire_type.is(member.ty()) {
                        return Err(AttrError::Validation {
                            path: member_path,
                            detail: format!(
                                "attribute type {} does not match declared type {}",
                                member.ty(),
                                member_wire_type
                            ),
                        });
                    }
                    member_wire_type.validate_at(member.content(), &member_path)?;
                    members.insert(name.clone(), member);
                }
                Ok(WireValue::new(wire_type, WireContent::Object(members)))
            }
            _ if self.is_unknown() => Ok(WireValue::unknown(wire_type)),
            _ => Ok(WireValue::null(wire_type)),
        }
    }
}

/// Quote a string the way JSON does, for diagnostic rendering.
pub(crate) fn json_quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// Deterministic diagnostic rendering.
///
/// Unknown renders as `<unknown>` and null as `<null>`; strings are
/// JSON-quoted; map and object keys come out sorted so output is stable
/// across runs.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("<unknown>");
        }
        if self.is_null() {
            return f.write_str("<null>");
        }
        match self {
            AttrValue::Bool(ValueState::Known(value)) => write!(f, "{value}"),
            AttrValue::Number(ValueState::Known(value)) => write!(f, "{}", value.normalized()),
            AttrValue::String(ValueState::Known(value)) => f.write_str(&json_quote(value)),
            AttrValue::List {
                state: ValueState::Known(elements),
                ..
            } => {
                f.write_str("[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            AttrValue::Map {
                state: ValueState::Known(elements),
                ..
            }
            | AttrValue::Object {
                state: ValueState::Known(elements),
                ..
            } => {
                f.write_str("{")?;
                for (index, (key, element)) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{element}", json_quote(key))?;
                }
                f.write_str("}")
            }
            // known states are fully matched above
            _ => unreachable!("non-known state after state checks"),
        }
    }
}
