//! Paths: comparable, printable addresses into a nested value tree

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{json_quote, AttrValue};

/// One traversal step of an attribute path.
///
/// The variant set is closed and fixed: every consumer across the wire
/// boundary must interpret a step identically, so the set is not
/// user-extensible. Steps compare by exact match only, never fuzzily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    /// Selects a named field of an object.
    AttributeName(String),
    /// Selects an index of a list.
    ElementKeyInt(i64),
    /// Selects a key of a map.
    ElementKeyString(String),
    /// Selects the element of a set equal to the given value. Sets are
    /// unordered and unindexed, so identity is structural value equality.
    ElementKeyValue(AttrValue),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => f.write_str(name),
            PathStep::ElementKeyInt(index) => write!(f, "[{index}]"),
            PathStep::ElementKeyString(key) => write!(f, "[{}]", json_quote(key)),
            PathStep::ElementKeyValue(value) => write!(f, "[Value({value})]"),
        }
    }
}

/// An ordered sequence of steps addressing a location inside a nested
/// attribute value tree. The empty path is the root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The root path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A path starting at the named top-level attribute.
    pub fn root(name: impl Into<String>) -> Self {
        Self::empty().with_attribute_name(name)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Copy of this path extended with an attribute-name step.
    pub fn with_attribute_name(&self, name: impl Into<String>) -> Self {
        self.with_step(PathStep::AttributeName(name.into()))
    }

    /// Copy of this path extended with a list-index step.
    pub fn with_element_key_int(&self, index: i64) -> Self {
        self.with_step(PathStep::ElementKeyInt(index))
    }

    /// Copy of this path extended with a map-key step.
    pub fn with_element_key_string(&self, key: impl Into<String>) -> Self {
        self.with_step(PathStep::ElementKeyString(key.into()))
    }

    /// Copy of this path extended with a set-element step.
    pub fn with_element_key_value(&self, value: AttrValue) -> Self {
        self.with_step(PathStep::ElementKeyValue(value))
    }

    fn with_step(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 && matches!(step, PathStep::AttributeName(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// An unordered collection of paths, for bulk membership tests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paths(Vec<Path>);

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: Path) {
        self.0.push(path);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the collection includes the given path.
    ///
    /// Linear scan by exact equality; set-element steps embed values whose
    /// equality is structural and not cheaply hashable.
    pub fn contains(&self, path: &Path) -> bool {
        self.0.iter().any(|candidate| candidate == path)
    }
}

impl From<Vec<Path>> for Paths {
    fn from(paths: Vec<Path>) -> Self {
        Self(paths)
    }
}

impl FromIterator<Path> for Paths {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Bracket-joined rendering of every non-empty path. Root paths are skipped.
impl fmt::Display for Paths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut written = 0;
        for path in &self.0 {
            if path.is_empty() {
                continue;
            }
            if written > 0 {
                f.write_str(",")?;
            }
            write!(f, "{path}")?;
            written += 1;
        }
        f.write_str("]")
    }
}
