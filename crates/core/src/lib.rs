//! fieldcheck core types: field paths and the error lists validators return.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use thiserror::Error;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named struct field, rendered as `.name`.
    Child(String),
    /// List position, rendered as `[3]`.
    Index(usize),
    /// Map key, rendered as `[key]`.
    Key(String),
}

/// Location of a field inside a nested object, e.g. `spec.secretRef.name`.
///
/// Paths are values: every builder returns a new path and leaves the
/// receiver untouched, so a parent path can be shared by sibling checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[PathSegment; 6]>,
}

impl FieldPath {
    pub fn new(root: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(PathSegment::Child(root.into()));
        Self { segments }
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Child(name.into()))
    }

    pub fn index(&self, i: usize) -> Self {
        self.with(PathSegment::Index(i))
    }

    pub fn key(&self, k: impl Into<String>) -> Self {
        self.with(PathSegment::Key(k.into()))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn with(&self, seg: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(seg);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Child(name) if i == 0 => f.write_str(name)?,
                PathSegment::Child(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Key(k) => write!(f, "[{}]", k)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Required,
    Invalid,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Required => "Required value",
            ErrorType::Invalid => "Invalid value",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The offending value, or a marker that the value was left out.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum BadValue {
    Omitted,
    /// `Debug` rendering of the value (strings come out quoted).
    Value(String),
}

/// A single violation, attributed to the field it concerns.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("{path}: {}", describe(.error_type, .bad_value, .detail))]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub path: FieldPath,
    pub bad_value: BadValue,
    pub detail: String,
}

impl FieldError {
    pub fn required(path: FieldPath, detail: impl Into<String>) -> Self {
        Self { error_type: ErrorType::Required, path, bad_value: BadValue::Omitted, detail: detail.into() }
    }

    pub fn invalid(path: FieldPath, value: impl fmt::Debug, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Invalid,
            path,
            bad_value: BadValue::Value(format!("{:?}", value)),
            detail: detail.into(),
        }
    }
}

fn describe(error_type: &ErrorType, bad_value: &BadValue, detail: &str) -> String {
    let mut s = error_type.as_str().to_string();
    if let (ErrorType::Invalid, BadValue::Value(v)) = (error_type, bad_value) {
        s.push_str(": ");
        s.push_str(v);
    }
    if !detail.is_empty() {
        s.push_str(": ");
        s.push_str(detail);
    }
    s
}

/// Violations in discovery order. Duplicates are kept.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn push(&mut self, err: FieldError) { self.0.push(err); }

    pub fn append(&mut self, mut other: ErrorList) { self.0.append(&mut other.0); }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> { self.0.iter() }

    pub fn as_slice(&self) -> &[FieldError] { &self.0 }

    /// Errors of the given type, in order.
    pub fn filter_type(&self, t: ErrorType) -> ErrorList {
        self.0.iter().filter(|e| e.error_type == t).cloned().collect()
    }

    /// Render as a JSON array (used by machine-readable front ends).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 { f.write_str("\n")?; }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl From<Vec<FieldError>> for ErrorList {
    fn from(v: Vec<FieldError>) -> Self { Self(v) }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) { self.0.extend(iter); }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

pub mod prelude {
    pub use super::{BadValue, ErrorList, ErrorType, FieldError, FieldPath, PathSegment};
}
