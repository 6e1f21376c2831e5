//! Attribute types: shape descriptors and the wire-to-value decoder

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{AttrError, Result};
use crate::path::Path;
use crate::value::{AttrValue, ValueState};
use crate::wire::{WireContent, WireType, WireValue};

/// Descriptor of a value's shape, independent of any value instance.
///
/// Closed variant set, compared structurally (two separately built
/// `List(String)` descriptors are equal; `List(String)` and `List(Number)`
/// are not). Types never hold values, and a single descriptor may be shared
/// read-only across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    Bool,
    Number,
    String,
    List(Box<AttrType>),
    Map(Box<AttrType>),
    Object(BTreeMap<String, AttrType>),
}

impl AttrType {
    /// Project this semantic type to its canonical wire-type tag.
    pub fn wire_type(&self, ctx: &Context) -> WireType {
        match self {
            AttrType::Bool => WireType::Bool,
            AttrType::Number => WireType::Number,
            AttrType::String => WireType::String,
            AttrType::List(element) => WireType::List(Box::new(element.wire_type(ctx))),
            AttrType::Map(element) => WireType::Map(Box::new(element.wire_type(ctx))),
            AttrType::Object(attribute_types) => WireType::Object(
                attribute_types
                    .iter()
                    .map(|(name, ty)| (name.clone(), ty.wire_type(ctx)))
                    .collect(),
            ),
        }
    }

    /// The null value of this type.
    pub fn null_value(&self) -> AttrValue {
        match self {
            AttrType::Bool => AttrValue::Bool(ValueState::Null),
            AttrType::Number => AttrValue::Number(ValueState::Null),
            AttrType::String => AttrValue::String(ValueState::Null),
            AttrType::List(element) => AttrValue::List {
                element_type: (**element).clone(),
                state: ValueState::Null,
            },
            AttrType::Map(element) => AttrValue::Map {
                element_type: (**element).clone(),
                state: ValueState::Null,
            },
            AttrType::Object(attribute_types) => AttrValue::Object {
                attribute_types: attribute_types.clone(),
                state: ValueState::Null,
            },
        }
    }

    /// The unknown (not yet computed) value of this type.
    pub fn unknown_value(&self) -> AttrValue {
        match self {
            AttrType::Bool => AttrValue::Bool(ValueState::Unknown),
            AttrType::Number => AttrValue::Number(ValueState::Unknown),
            AttrType::String => AttrValue::String(ValueState::Unknown),
            AttrType::List(element) => AttrValue::List {
                element_type: (**element).clone(),
                state: ValueState::Unknown,
            },
            AttrType::Map(element) => AttrValue::Map {
                element_type: (**element).clone(),
                state: ValueState::Unknown,
            },
            AttrType::Object(attribute_types) => AttrValue::Object {
                attribute_types: attribute_types.clone(),
                state: ValueState::Unknown,
            },
        }
    }

    /// Decode a wire value into an attribute value of this type.
    ///
    /// The wire value's declared type must be exactly this type's projection
    /// (recursive comparison, never container kind alone); anything else is
    /// [`AttrError::WireTypeMismatch`] with no coercion. Unknown and null
    /// short-circuit without recursing. Composite decoding wraps child
    /// failures with the element index, map key, or attribute name, and an
    /// object's member set must match its declared attribute set exactly or
    /// decoding fails with [`AttrError::SchemaMismatch`].
    pub fn value_from_wire(&self, ctx: &Context, value: &WireValue) -> Result<AttrValue> {
        tracing::trace!(wire_type = %value.ty(), "converting wire value");
        self.value_from_wire_at(ctx, value, &Path::empty())
    }

    fn value_from_wire_at(
        &self,
        ctx: &Context,
        value: &WireValue,
        path: &Path,
    ) -> Result<AttrValue> {
        ctx.ensure_active()?;
        let expected = self.wire_type(ctx);
        if !expected.is(value.ty()) {
            return Err(AttrError::WireTypeMismatch {
                path: path.clone(),
                expected,
                actual: value.ty().clone(),
            });
        }
        if !value.is_known() {
            return Ok(self.unknown_value());
        }
        if value.is_null() {
            return Ok(self.null_value());
        }
        match (self, value.content()) {
            (AttrType::Bool, WireContent::Bool(payload)) => {
                Ok(AttrValue::Bool(ValueState::Known(*payload)))
            }
            (AttrType::Number, WireContent::Number(payload)) => {
                Ok(AttrValue::Number(ValueState::Known(payload.clone())))
            }
            (AttrType::String, WireContent::String(payload)) => {
                Ok(AttrValue::String(ValueState::Known(payload.clone())))
            }
            (AttrType::List(element_type), WireContent::List(items)) => {
                let mut elements = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let element_path = path.with_element_key_int(index as i64);
                    elements.push(element_type.value_from_wire_at(ctx, item, &element_path)?);
                }
                Ok(AttrValue::List {
                    element_type: (**element_type).clone(),
                    state: ValueState::Known(elements),
                })
            }
            (AttrType::Map(element_type), WireContent::Map(entries)) => {
                let mut elements = BTreeMap::new();
                for (key, entry) in entries {
                    let entry_path = path.with_element_key_string(key);
                    elements.insert(
                        key.clone(),
                        element_type.value_from_wire_at(ctx, entry, &entry_path)?,
                    );
                }
                Ok(AttrValue::Map {
                    element_type: (**element_type).clone(),
                    state: ValueState::Known(elements),
                })
            }
            (AttrType::Object(attribute_types), WireContent::Object(members)) => {
                if members.len() != attribute_types.len() {
                    return Err(AttrError::SchemaMismatch {
                        path: path.clone(),
                        detail: format!(
                            "expected object with {} attributes, found {}",
                            attribute_types.len(),
                            members.len()
                        ),
                    });
                }
                let mut attributes = BTreeMap::new();
                for (name, attribute_type) in attribute_types {
                    let member = members.get(name).ok_or_else(|| AttrError::SchemaMismatch {
                        path: path.clone(),
                        detail: format!("expected object to have attribute {name:?}"),
                    })?;
                    let member_path = path.with_attribute_name(name);
                    attributes.insert(
                        name.clone(),
                        attribute_type.value_from_wire_at(ctx, member, &member_path)?,
                    );
                }
                Ok(AttrValue::Object {
                    attribute_types: attribute_types.clone(),
                    state: ValueState::Known(attributes),
                })
            }
            // unreachable when the declared type is honest about its content,
            // which the projection check above does not guarantee
            _ => Err(AttrError::Validation {
                path: path.clone(),
                detail: format!(
                    "wire content does not match its declared wire type {}",
                    value.ty()
                ),
            }),
        }
    }
}
