//! Declarative schemas and the schema-to-wire compiler

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{AttrError, Result};
use crate::path::Path;
use crate::types::AttrType;
use crate::wire::{
    DescriptionKind, WireAttribute, WireBlock, WireNestedObject, WireNesting, WireSchema,
};

/// How repeated nested attribute blocks are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    /// A single instance of the nested block.
    Single,
    /// An ordered list of instances.
    List,
    /// An unordered set of instances.
    Set,
    /// A string-keyed map of instances.
    Map,
}

/// A declarative schema: named attributes plus block-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub version: i64,
    pub attributes: HashMap<String, Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
}

/// One attribute definition.
///
/// Exactly one of `attr_type` / `nested` must be set; both or neither is a
/// definition error reported at compile time, not at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_type: Option<AttrType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedAttributes>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
}

impl Attribute {
    /// A terminal attribute of the given type.
    pub fn of_type(attr_type: AttrType) -> Self {
        Self {
            attr_type: Some(attr_type),
            ..Self::default()
        }
    }

    /// A nested attribute carrying child attributes.
    pub fn nested(nested: NestedAttributes) -> Self {
        Self {
            nested: Some(nested),
            ..Self::default()
        }
    }
}

/// Child attributes of a nested attribute, with nesting mode and item
/// bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedAttributes {
    pub attributes: HashMap<String, Attribute>,
    pub nesting_mode: NestingMode,
    pub min_items: i64,
    pub max_items: i64,
}

impl NestedAttributes {
    pub fn new(attributes: HashMap<String, Attribute>, nesting_mode: NestingMode) -> Self {
        Self {
            attributes,
            nesting_mode,
            min_items: 0,
            max_items: 0,
        }
    }

    pub fn with_bounds(mut self, min_items: i64, max_items: i64) -> Self {
        self.min_items = min_items;
        self.max_items = max_items;
        self
    }
}

/// Markdown wins when both description kinds are set.
fn project_description(
    plain: &Option<String>,
    markdown: &Option<String>,
) -> (Option<String>, DescriptionKind) {
    match (plain, markdown) {
        (_, Some(markdown)) => (Some(markdown.clone()), DescriptionKind::Markdown),
        (Some(plain), None) => (Some(plain.clone()), DescriptionKind::Plain),
        (None, None) => (None, DescriptionKind::Plain),
    }
}

impl Schema {
    /// Compile this schema into its wire message shape.
    ///
    /// At least one attribute must be set. Output attributes are sorted by
    /// name with locale-independent byte ordering, so wire output is stable
    /// regardless of map iteration order. Definition errors are fatal to the
    /// whole compilation; a partial schema is never returned.
    pub fn compile(&self, ctx: &Context) -> Result<WireSchema> {
        tracing::debug!(attributes = self.attributes.len(), "compiling schema");
        ctx.ensure_active()?;
        if self.attributes.is_empty() {
            return Err(AttrError::Definition {
                path: Path::empty(),
                reason: "must have at least one attribute in the schema".to_string(),
            });
        }
        let mut attributes = Vec::with_capacity(self.attributes.len());
        for (name, attribute) in &self.attributes {
            attributes.push(attribute.compile(ctx, name, &Path::root(name))?);
        }
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        let (description, description_kind) =
            project_description(&self.description, &self.markdown_description);
        Ok(WireSchema {
            version: self.version,
            block: WireBlock {
                attributes,
                deprecated: self.deprecation_message.is_some(),
                description,
                description_kind,
            },
        })
    }
}

impl Attribute {
    /// Compile one attribute, reporting definition errors with `path`.
    ///
    /// Terminal attributes project their type to a wire type; nested
    /// attributes emit a nested-object descriptor, compiling children
    /// depth-first with the same name-sorting rule as the top level. A
    /// nested definition with zero child attributes counts as unset.
    pub fn compile(&self, ctx: &Context, name: &str, path: &Path) -> Result<WireAttribute> {
        ctx.ensure_active()?;
        let (description, description_kind) =
            project_description(&self.description, &self.markdown_description);
        let mut compiled = WireAttribute {
            name: name.to_string(),
            ty: None,
            nested: None,
            required: self.required,
            optional: self.optional,
            computed: self.computed,
            sensitive: self.sensitive,
            deprecated: self.deprecation_message.is_some(),
            description,
            description_kind,
        };
        let nested = self
            .nested
            .as_ref()
            .filter(|nested| !nested.attributes.is_empty());
        match (&self.attr_type, nested) {
            (Some(attr_type), None) => {
                compiled.ty = Some(attr_type.wire_type(ctx));
            }
            (None, Some(nested)) => {
                let nesting = match nested.nesting_mode {
                    NestingMode::Single => WireNesting::Single,
                    NestingMode::List => WireNesting::List,
                    NestingMode::Set => WireNesting::Set,
                    NestingMode::Map => WireNesting::Map,
                };
                let mut attributes = Vec::with_capacity(nested.attributes.len());
                for (child_name, child) in &nested.attributes {
                    let child_path = path.with_attribute_name(child_name);
                    attributes.push(child.compile(ctx, child_name, &child_path)?);
                }
                attributes.sort_by(|a, b| a.name.cmp(&b.name));
                compiled.nested = Some(WireNestedObject {
                    attributes,
                    nesting,
                    min_items: nested.min_items,
                    max_items: nested.max_items,
                });
            }
            (Some(_), Some(_)) => {
                return Err(AttrError::Definition {
                    path: path.clone(),
                    reason: "cannot have both type and nested attributes set".to_string(),
                });
            }
            (None, None) => {
                return Err(AttrError::Definition {
                    path: path.clone(),
                    reason: "must have either type or nested attributes set".to_string(),
                });
            }
        }
        Ok(compiled)
    }
}
