//! Extractors for strata.
//!
//! Each extractor reads one kind of source into the IR defined in
//! `strata-core`, ready to be ingested into a graph:
//!
//! - **File** - a single path with metadata, content and text analysis
//! - **Text** - word, sentence and keyword statistics plus readability
//! - **Code** - struct, enum and function declarations
//! - **Env** - the process environment
//!
//! Directory trees are read by `strata-scan`.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_extract::read_code;
//!
//! let info = read_code("src/main.rs").unwrap();
//! for s in &info.structs {
//!     println!("{} ({} fields)", s.descriptor.name, s.fields.len());
//! }
//! ```

mod code;
mod env;
mod error;
mod file;
mod patterns;
mod text;

pub use code::{Language, parse_code, read_code, read_enums, read_structs};
pub use env::read_env;
pub use error::ExtractError;
pub use file::read_file;
pub use text::{TextAnalyzer, TextConfig, TextConfigBuilder, analyze_text, is_binary, read_text};

// Re-export core types for convenience
pub use strata_core::{CodeInfo, EnumInfo, EnvSnapshot, FileEntry, StructInfo, TextAnalysis};
