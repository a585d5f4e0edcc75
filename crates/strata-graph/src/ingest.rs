//! Generic conversion of describable values into a [`Graph`].
//!
//! The traversal is depth-first and driven entirely by [`Shape`]:
//!
//! - `Nil` produces nothing.
//! - `Sequence` ingests every element under the same parent and edge label,
//!   so a one-to-many relation becomes N parallel edges.
//! - `Record` becomes exactly one node. Property fields fill its bag, embedded
//!   records are lifted into it, and relation fields are recursed into with an
//!   edge from this node labeled by the field name.
//!
//! A node is inserted before its relations are visited, so every edge is
//! recorded after both of its endpoints exist.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::IngestError;
use crate::property::{Properties, PropertyValue};
use crate::source::{FieldKind, GraphSource, Record, Shape};
use crate::store::{Edge, Graph, Node};

/// Convert a value into a fresh graph.
pub fn ingest(value: &dyn GraphSource) -> Result<Graph, IngestError> {
    Ingestor::new().ingest(value)
}

/// Stateful converter for a single ingestion call.
#[derive(Debug, Default)]
pub struct Ingestor {
    graph: Graph,
    /// Records on the current descent path, keyed by (address, type name).
    ancestors: HashMap<(usize, &'static str), String>,
}

impl Ingestor {
    /// Create an ingestor with an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the ingestor and convert `value`.
    pub fn ingest(mut self, value: &dyn GraphSource) -> Result<Graph, IngestError> {
        self.visit(value, None)?;
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "ingestion complete"
        );
        Ok(self.graph)
    }

    fn visit(
        &mut self,
        value: &dyn GraphSource,
        parent: Option<(&str, &'static str)>,
    ) -> Result<(), IngestError> {
        match value.describe() {
            Shape::Nil => Ok(()),
            Shape::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    self.visit(item, parent)
                        .map_err(|err| IngestError::at_index(index, err))?;
                }
                Ok(())
            }
            Shape::Record(record) => self.visit_record(value.address(), record, parent),
        }
    }

    fn visit_record(
        &mut self,
        address: usize,
        record: Record<'_>,
        parent: Option<(&str, &'static str)>,
    ) -> Result<(), IngestError> {
        let type_name = record.type_name();
        if type_name.is_empty() {
            return Err(IngestError::UnnamedRecord);
        }

        let key = (address, type_name);
        if let Some(existing) = self.ancestors.get(&key) {
            // Back-reference to a record still being ingested: link, don't descend.
            if let Some((parent_id, label)) = parent {
                let existing = existing.clone();
                trace!(target = %existing, label, "back-reference");
                self.link(parent_id, &existing, label);
            }
            return Ok(());
        }

        let identity = record
            .identity_path()
            .filter(|path| !path.as_os_str().is_empty());
        let (extra_labels, fields) = record.into_parts();
        let mut properties = Properties::new();
        let mut relations = Vec::new();

        for field in fields {
            if field.name.is_empty() {
                return Err(IngestError::EmptyFieldName { type_name });
            }
            match field.kind {
                FieldKind::Property(value) => {
                    properties.insert(field.name.to_string(), value);
                }
                FieldKind::Embedded(base) => lift_embedded(&mut properties, base),
                FieldKind::Relation(target) => relations.push((field.name, target)),
            }
        }

        let id = match identity {
            Some(path) => path_node_id(type_name, path),
            None => node_id(type_name, &properties),
        };
        let mut labels = vec![type_name.to_string()];
        for label in extra_labels {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        trace!(id = %id, "adding node");
        self.graph.add_node(Node::new(id.clone(), labels, properties));
        if let Some((parent_id, label)) = parent {
            self.link(parent_id, &id, label);
        }

        self.ancestors.insert(key, id.clone());
        let result = relations.into_iter().try_for_each(|(name, target)| {
            self.visit(target, Some((&id, name)))
                .map_err(|err| IngestError::in_field(name, err))
        });
        self.ancestors.remove(&key);
        result
    }

    fn link(&mut self, source_id: &str, target_id: &str, label: &str) {
        self.graph.add_edge(Edge::new(
            Uuid::new_v4().to_string(),
            source_id,
            target_id,
            label,
        ));
    }
}

/// Lift an embedded record's fields into the enclosing property bag.
///
/// Properties are copied as-is. A record embedded inside the base is kept as
/// a one-level record property. Relations inside an embedded base are not
/// followed.
fn lift_embedded(properties: &mut Properties, base: Record<'_>) {
    let (_, fields) = base.into_parts();
    for field in fields {
        match field.kind {
            FieldKind::Property(value) => {
                properties.insert(field.name.to_string(), value);
            }
            FieldKind::Embedded(inner) => {
                let (_, inner_fields) = inner.into_parts();
                let scalars = inner_fields.into_iter().filter_map(|f| match f.kind {
                    FieldKind::Property(value) => Some((f.name, value)),
                    _ => None,
                });
                if let Some(value) = PropertyValue::record(scalars) {
                    properties.insert(field.name.to_string(), value);
                }
            }
            FieldKind::Relation(_) => {
                trace!(field = field.name, "skipping relation inside embedded record");
            }
        }
    }
}

/// Derive a node ID from its properties.
///
/// A non-empty `Path` yields a deterministic ID, then a non-empty `Name`;
/// otherwise the ID is random.
pub fn node_id(type_name: &str, properties: &Properties) -> String {
    let non_empty = |key: &str| {
        properties
            .get(key)
            .and_then(PropertyValue::as_str)
            .filter(|s| !s.is_empty())
    };

    if let Some(path) = non_empty("Path") {
        path_node_id(type_name, path)
    } else if let Some(name) = non_empty("Name") {
        format!("{type_name}_{name}")
    } else {
        format!("{type_name}_{}", Uuid::new_v4())
    }
}

/// The ID a record of `type_name` with the given path receives.
pub fn path_node_id(type_name: &str, path: impl AsRef<Path>) -> String {
    format!("{type_name}_{}", encode_path(path.as_ref()))
}

/// Injective, separator-free encoding of a path for use inside an ID.
///
/// Platform separators become `_`; `%`, `_`, `:` and a literal `\` that is
/// not a separator are percent-escaped. Bytes that are not valid UTF-8 are
/// written as `%XX`, so distinct raw paths never share an encoding.
pub fn encode_path(path: &Path) -> String {
    let bytes = path.as_os_str().as_encoded_bytes();
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '%' => out.push_str("%25"),
                '_' => out.push_str("%5F"),
                ':' => out.push_str("%3A"),
                c if std::path::is_separator(c) => out.push('_'),
                '\\' => out.push_str("%5C"),
                c => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
