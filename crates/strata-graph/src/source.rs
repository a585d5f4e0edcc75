//! The describe capability that makes a value ingestible.
//!
//! Instead of inspecting types at runtime, every IR type states how each of
//! its fields maps onto the graph: a flattened property, an embedded base
//! record whose fields are lifted into the parent, or a relationship to
//! nested node(s).

use std::path::Path;

use crate::property::PropertyValue;

/// A value that can describe itself as graph fields.
pub trait GraphSource {
    /// Describe the shape of this value.
    fn describe(&self) -> Shape<'_>;

    /// Identity of the underlying value, used to detect reference cycles.
    ///
    /// Wrappers (references, boxes, options) forward to the wrapped value so
    /// the same record reached through different wrappers compares equal.
    fn address(&self) -> usize {
        (self as *const Self).cast::<()>() as usize
    }
}

/// Shape of a value as seen by the ingestion engine.
pub enum Shape<'a> {
    /// Nothing to ingest; no node is produced.
    Nil,
    /// Each element becomes a sibling node under the same parent and label.
    Sequence(Vec<&'a dyn GraphSource>),
    /// Exactly one node.
    Record(Record<'a>),
}

/// How a single field maps onto the graph.
pub enum FieldKind<'a> {
    /// Stored in the node's property bag.
    Property(PropertyValue),
    /// Base record whose properties are lifted into the enclosing node.
    Embedded(Record<'a>),
    /// Nested node(s) linked from the enclosing node, labeled with the field name.
    Relation(&'a dyn GraphSource),
}

/// A named field of a record.
pub struct Field<'a> {
    pub name: &'static str,
    pub kind: FieldKind<'a>,
}

/// Description of a struct-like value.
pub struct Record<'a> {
    type_name: &'static str,
    labels: Vec<String>,
    fields: Vec<Field<'a>>,
    /// Raw path the node ID is derived from, kept apart from the lossy `Path` property.
    path: Option<&'a Path>,
}

impl<'a> Record<'a> {
    /// Start describing a record of the given type.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            labels: Vec::new(),
            fields: Vec::new(),
            path: None,
        }
    }

    /// Add a label in addition to the type name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Add a property field.
    pub fn property(mut self, name: &'static str, value: impl Into<PropertyValue>) -> Self {
        self.fields.push(Field {
            name,
            kind: FieldKind::Property(value.into()),
        });
        self
    }

    /// Set the `Path` property and identify the node by the raw path.
    ///
    /// Paths that are not valid UTF-8 display lossily in the property but
    /// still yield distinct node IDs.
    pub fn path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self.property("Path", path.to_string_lossy().into_owned())
    }

    /// Add a property field only when a value is present.
    pub fn maybe<V: Into<PropertyValue>>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.property(name, value),
            None => self,
        }
    }

    /// Embed a base record whose properties become this record's own.
    pub fn embed(mut self, name: &'static str, base: Record<'a>) -> Self {
        self.fields.push(Field {
            name,
            kind: FieldKind::Embedded(base),
        });
        self
    }

    /// Add a relationship to nested node(s).
    pub fn relation(mut self, name: &'static str, target: &'a dyn GraphSource) -> Self {
        self.fields.push(Field {
            name,
            kind: FieldKind::Relation(target),
        });
        self
    }

    /// Type name, always the node's first label.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Labels added on top of the type name.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Raw path set with [`Record::path`].
    pub fn identity_path(&self) -> Option<&'a Path> {
        self.path
    }

    /// Split into extra labels and fields.
    pub fn into_parts(self) -> (Vec<String>, Vec<Field<'a>>) {
        (self.labels, self.fields)
    }
}

impl<T: GraphSource + ?Sized> GraphSource for &T {
    fn describe(&self) -> Shape<'_> {
        (**self).describe()
    }

    fn address(&self) -> usize {
        (**self).address()
    }
}

impl<T: GraphSource + ?Sized> GraphSource for Box<T> {
    fn describe(&self) -> Shape<'_> {
        (**self).describe()
    }

    fn address(&self) -> usize {
        (**self).address()
    }
}

impl<T: GraphSource> GraphSource for Option<T> {
    fn describe(&self) -> Shape<'_> {
        match self {
            Some(value) => value.describe(),
            None => Shape::Nil,
        }
    }

    fn address(&self) -> usize {
        match self {
            Some(value) => value.address(),
            None => (self as *const Self).cast::<()>() as usize,
        }
    }
}

impl<T: GraphSource> GraphSource for [T] {
    fn describe(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|item| item as &dyn GraphSource).collect())
    }
}

impl<T: GraphSource> GraphSource for Vec<T> {
    fn describe(&self) -> Shape<'_> {
        self.as_slice().describe()
    }
}
