//! Core types for strata.
//!
//! This crate provides the intermediate representation (IR) produced by the
//! scanner and the auxiliary extractors, the scan configuration, and the
//! graph descriptions that let every IR type be ingested by `strata-graph`.

mod code;
mod config;
mod describe;
mod entry;
mod env;
mod error;
mod stats;
mod text;

pub use code::{
    CodeInfo, Descriptor, EnumInfo, FieldInfo, FunctionInfo, Span, StructInfo, VariantInfo,
};
pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use describe::CONTENT_LIMIT;
pub use entry::{EntryKind, FileEntry, GitInfo, extension_of};
pub use env::EnvSnapshot;
pub use error::ScanError;
pub use stats::EntryStats;
pub use text::{KeywordFrequency, ReadabilityScores, TextAnalysis};
