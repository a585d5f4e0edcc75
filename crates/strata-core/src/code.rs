//! Source code descriptors.
//!
//! Every declaration carries a [`Descriptor`]; its `path` is qualified with the
//! source file (`src/lib.rs::Config`) so that declarations of the same name in
//! different files stay distinct.

use serde::{Deserialize, Serialize};

/// Line range of a declaration, 1-based and inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub end_line: u32,
}

impl Span {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Number of lines covered.
    pub fn len(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end_line < self.start_line
    }
}

/// Identity shared by all declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// `<kind>:<path>`, e.g. `struct:src/lib.rs::Config`.
    pub id: String,
    pub name: String,
    /// File-qualified path of the declaration.
    pub path: String,
    pub language: String,
    pub span: Span,
}

impl Descriptor {
    pub fn new(
        kind: &str,
        name: impl Into<String>,
        path: impl Into<String>,
        language: impl Into<String>,
        span: Span,
    ) -> Self {
        let path = path.into();
        Self {
            id: format!("{kind}:{path}"),
            name: name.into(),
            path,
            language: language.into(),
            span,
        }
    }
}

/// A field of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub line: u32,
}

/// A struct (or record-like type) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructInfo {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldInfo>,
}

/// A variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInfo {
    pub name: String,
    pub path: String,
    /// Explicit discriminant or payload text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub line: u32,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumInfo {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantInfo>,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    /// Declaration line as written, without the body.
    pub signature: String,
}

/// All declarations found in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInfo {
    pub path: String,
    pub name: String,
    pub language: String,
    pub line_count: u64,
    #[serde(default)]
    pub structs: Vec<StructInfo>,
    #[serde(default)]
    pub enums: Vec<EnumInfo>,
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
}

impl CodeInfo {
    /// Total number of declarations.
    pub fn declaration_count(&self) -> usize {
        self.structs.len() + self.enums.len() + self.functions.len()
    }
}
