//! In-memory wire format: typed wire values and the wire schema messages
//!
//! This module is the crate's wire-format boundary. It carries exactly four
//! capabilities: obtaining a wire-type tag for a semantic type (see
//! [`AttrType::wire_type`]), comparing wire types ([`WireType::is`]),
//! validating untyped content against a wire type ([`WireType::validate`]),
//! and constructing a tagged wire value ([`WireValue::new`]).
//!
//! The compiled schema messages ([`WireSchema`] and friends) mirror the
//! receiving host's protocol shape: attributes sorted by name, nested object
//! blocks carrying a nesting-mode tag and item-count bounds. That shape is a
//! compatibility contract and must not change without version negotiation.
//!
//! [`AttrType::wire_type`]: crate::types::AttrType::wire_type

use std::collections::BTreeMap;
use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::{AttrError, Result};
use crate::path::Path;

/// Wire-level type tag.
///
/// Composite tags carry their element or attribute types, so comparing two
/// wire types is always a full recursive comparison, never a comparison of
/// container kinds alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    Bool,
    Number,
    String,
    List(Box<WireType>),
    Map(Box<WireType>),
    Object(BTreeMap<String, WireType>),
}

impl WireType {
    /// Exact recursive wire-type equality.
    pub fn is(&self, other: &WireType) -> bool {
        self == other
    }

    /// Validate untyped content against this wire type.
    ///
    /// Unknown and null content are valid for every type. Composite content
    /// is checked recursively: every element's declared type must match the
    /// container's element type, and object member sets must match the
    /// declared attribute set exactly. Failures identify the offending
    /// index, key, or attribute name.
    pub fn validate(&self, content: &WireContent) -> Result<()> {
        self.validate_at(content, &Path::empty())
    }

    pub(crate) fn validate_at(&self, content: &WireContent, path: &Path) -> Result<()> {
        match (self, content) {
            (_, WireContent::Unknown | WireContent::Null) => Ok(()),
            (WireType::Bool, WireContent::Bool(_)) => Ok(()),
            (WireType::Number, WireContent::Number(_)) => Ok(()),
            (WireType::String, WireContent::String(_)) => Ok(()),
            (WireType::List(element), WireContent::List(items)) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = path.with_element_key_int(index as i64);
                    if !element.is(item.ty()) {
                        return Err(AttrError::Validation {
                            path: item_path,
                            detail: format!(
                                "element type {} does not match list element type {}",
                                item.ty(),
                                element
                            ),
                        });
                    }
                    element.validate_at(item.content(), &item_path)?;
                }
                Ok(())
            }
            (WireType::Map(element), WireContent::Map(entries)) => {
                for (key, entry) in entries {
                    let entry_path = path.with_element_key_string(key);
                    if !element.is(entry.ty()) {
                        return Err(AttrError::Validation {
                            path: entry_path,
                            detail: format!(
                                "element type {} does not match map element type {}",
                                entry.ty(),
                                element
                            ),
                        });
                    }
                    element.validate_at(entry.content(), &entry_path)?;
                }
                Ok(())
            }
            (WireType::Object(attribute_types), WireContent::Object(members)) => {
                if members.len() != attribute_types.len() {
                    return Err(AttrError::Validation {
                        path: path.clone(),
                        detail: format!(
                            "expected object with {} attributes, found {}",
                            attribute_types.len(),
                            members.len()
                        ),
                    });
                }
                for (name, attribute_type) in attribute_types {
                    let member = members.get(name).ok_or_else(|| AttrError::Validation {
                        path: path.clone(),
                        detail: format!("missing object attribute {name:?}"),
                    })?;
                    let member_path = path.with_attribute_name(name);
                    if !attribute_type.is(member.ty()) {
                        return Err(AttrError::Validation {
                            path: member_path,
                            detail: format!(
                                "attribute type {} does not match declared type {}",
                                member.ty(),
                                attribute_type
                            ),
                        });
                    }
                    attribute_type.validate_at(member.content(), &member_path)?;
                }
                Ok(())
            }
            _ => Err(AttrError::Validation {
                path: path.clone(),
                detail: format!("content does not match wire type {self}"),
            }),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Bool => f.write_str("bool"),
            WireType::Number => f.write_str("number"),
            WireType::String => f.write_str("string"),
            WireType::List(element) => write!(f, "list[{element}]"),
            WireType::Map(element) => write!(f, "map[{element}]"),
            WireType::Object(attribute_types) => {
                f.write_str("object[")?;
                for (index, (name, ty)) in attribute_types.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}: {ty}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Untyped wire payload.
///
/// `Unknown` marks a value the producer has not computed yet; `Null` an
/// explicit absence. Composite payloads nest full [`WireValue`]s, each
/// carrying its own declared type, because values arriving over the wire are
/// tagged member by member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireContent {
    Unknown,
    Null,
    Bool(bool),
    Number(BigDecimal),
    String(String),
    List(Vec<WireValue>),
    Map(BTreeMap<String, WireValue>),
    Object(BTreeMap<String, WireValue>),
}

/// A wire value: untyped content tagged with its declared wire type.
///
/// Construction tags without validating; the declared type of a value that
/// crossed the transport is a claim, not a guarantee. Conversion and
/// emission validate explicitly via [`WireType::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireValue {
    ty: WireType,
    content: WireContent,
}

impl WireValue {
    /// Tag content with its declared wire type.
    pub fn new(ty: WireType, content: WireContent) -> Self {
        Self { ty, content }
    }

    /// The wire "not yet computed" marker for a type.
    pub fn unknown(ty: WireType) -> Self {
        Self::new(ty, WireContent::Unknown)
    }

    /// The wire null for a type.
    pub fn null(ty: WireType) -> Self {
        Self::new(ty, WireContent::Null)
    }

    /// The declared wire type.
    pub fn ty(&self) -> &WireType {
        &self.ty
    }

    /// The untyped payload.
    pub fn content(&self) -> &WireContent {
        &self.content
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.content, WireContent::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, WireContent::Null)
    }
}

/// Compiled wire schema, the protocol message emitted by
/// [`Schema::compile`].
///
/// [`Schema::compile`]: crate::schema::Schema::compile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSchema {
    pub version: i64,
    pub block: WireBlock,
}

/// Top-level block of a compiled schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    /// Attributes sorted by name (byte ordering).
    pub attributes: Vec<WireAttribute>,
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub description_kind: DescriptionKind,
}

/// One compiled attribute. Exactly one of `ty` / `nested` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<WireType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<WireNestedObject>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub description_kind: DescriptionKind,
}

/// Compiled nested-object block: name-sorted child attributes plus the
/// nesting-mode tag and item-count bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNestedObject {
    pub attributes: Vec<WireAttribute>,
    pub nesting: WireNesting,
    pub min_items: i64,
    pub max_items: i64,
}

/// Wire tag for how repeated nested blocks are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireNesting {
    Single,
    List,
    Set,
    Map,
}

/// Whether a description is plain text or rich text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionKind {
    #[default]
    Plain,
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_list() -> WireType {
        WireType::List(Box::new(WireType::String))
    }

    #[test]
    fn test_wire_type_is_recursive() {
        assert!(string_list().is(&string_list()));
        assert!(!string_list().is(&WireType::List(Box::new(WireType::Number))));
        assert!(!string_list().is(&WireType::String));
    }

    #[test]
    fn test_validate_scalars() {
        assert!(WireType::Bool.validate(&WireContent::Bool(true)).is_ok());
        assert!(WireType::Bool.validate(&WireContent::Unknown).is_ok());
        assert!(WireType::Bool.validate(&WireContent::Null).is_ok());
        assert!(WireType::Bool
            .validate(&WireContent::String("true".to_string()))
            .is_err());
    }

    #[test]
    fn test_validate_list_element_type() {
        let content = WireContent::List(vec![
            WireValue::new(WireType::String, WireContent::String("ok".to_string())),
            WireValue::new(WireType::Number, WireContent::Number(1.into())),
        ]);
        let err = string_list().validate(&content).unwrap_err();
        match err {
            AttrError::Validation { path, .. } => assert_eq!(path.to_string(), "[1]"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_object_cardinality() {
        let ty = WireType::Object(BTreeMap::from([("a".to_string(), WireType::Bool)]));
        let content = WireContent::Object(BTreeMap::from([
            (
                "a".to_string(),
                WireValue::new(WireType::Bool, WireContent::Bool(true)),
            ),
            (
                "b".to_string(),
                WireValue::new(WireType::Bool, WireContent::Bool(false)),
            ),
        ]));
        assert!(ty.validate(&content).is_err());
    }

    #[test]
    fn test_wire_type_display() {
        assert_eq!(string_list().to_string(), "list[string]");
        let object = WireType::Object(BTreeMap::from([
            ("a".to_string(), WireType::Bool),
            ("b".to_string(), WireType::Number),
        ]));
        assert_eq!(object.to_string(), r#"object["a": bool, "b": number]"#);
    }
}
