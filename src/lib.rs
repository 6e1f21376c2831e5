//! Typed-value conversion and attribute addressing for configuration
//! schemas
//!
//! This crate is the value layer of a configuration-schema framework: it
//! bridges an untyped, tri-state wire representation (every value may be
//! known, null, or unknown-pending-computation) with strongly typed
//! attribute values, and gives every location inside a nested value tree a
//! stable, printable address.
//!
//! ## Features
//!
//! - **Tri-state values**: every [`AttrValue`] is known, null, or unknown,
//!   with structural equality and deterministic rendering
//! - **Bidirectional conversion**: [`AttrType::value_from_wire`] decodes
//!   wire values, [`AttrValue::to_wire`] re-encodes them with defensive
//!   re-validation
//! - **Addressing**: [`Path`]/[`PathStep`] name any location inside a value
//!   tree for diagnostics
//! - **Schema compilation**: [`Schema::compile`] projects a declarative
//!   attribute schema into the deterministic, name-sorted wire schema shape
//!
//! ## Data flow
//!
//! ```text
//! wire value --(AttrType::value_from_wire)--> AttrValue tree
//! AttrValue tree --(AttrValue::to_wire)-----> wire value (re-validated)
//! Schema --------(Schema::compile)----------> WireSchema (name-sorted)
//! ```
//!
//! Conversion errors carry the exact [`Path`] to the failure. All operations
//! are synchronous pure functions of their inputs plus a cancellation-aware
//! [`Context`]; types and built values are immutable, so concurrent
//! read-only sharing needs no locks.

pub mod context;
pub mod error;
pub mod path;
pub mod schema;
pub mod types;
pub mod value;
pub mod wire;

pub use context::{CancelHandle, Context};
pub use error::{AttrError, Result};
pub use path::{Path, PathStep, Paths};
pub use schema::{Attribute, NestedAttributes, NestingMode, Schema};
pub use types::AttrType;
pub use value::{AttrValue, ValueState};
pub use wire::{
    DescriptionKind, WireAttribute, WireBlock, WireContent, WireNestedObject, WireNesting,
    WireSchema, WireType, WireValue,
};
