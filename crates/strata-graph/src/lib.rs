//! Generalized labeled property graph for strata.
//!
//! Every extractor produces its own intermediate representation; this crate
//! turns any of them into one uniform node/edge model so that renderers only
//! ever consume a [`Graph`].
//!
//! # Overview
//!
//! - [`GraphSource`] is implemented by each IR type to describe its fields as
//!   properties, embedded base records, or relations to nested nodes.
//! - [`ingest`] walks a source depth-first and fills a fresh [`Graph`].
//! - [`Graph`] keeps nodes and edges with outgoing/incoming adjacency and
//!   serializes as `{"Nodes": {...}, "Edges": {...}}`.
//!
//! ```rust
//! use strata_graph::{GraphSource, Record, Shape, ingest};
//!
//! struct Tag {
//!     name: String,
//! }
//!
//! impl GraphSource for Tag {
//!     fn describe(&self) -> Shape<'_> {
//!         Shape::Record(Record::new("Tag").property("Name", self.name.as_str()))
//!     }
//! }
//!
//! let graph = ingest(&Tag { name: "env".into() }).unwrap();
//! assert!(graph.node("Tag_env").is_some());
//! ```

mod error;
mod ingest;
mod property;
mod source;
mod store;

pub use error::IngestError;
pub use ingest::{Ingestor, encode_path, ingest, node_id, path_node_id};
pub use property::{Properties, PropertyValue, format_timestamp};
pub use source::{Field, FieldKind, GraphSource, Record, Shape};
pub use store::{Edge, Graph, Node};
