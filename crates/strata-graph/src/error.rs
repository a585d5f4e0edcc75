//! Error types for graph ingestion.

use thiserror::Error;

/// Errors that abort an ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A record described itself without a type name, so it cannot be labeled.
    #[error("Record has no type name")]
    UnnamedRecord,

    /// A record declared a field with an empty name.
    #[error("Record {type_name} has a field without a name")]
    EmptyFieldName { type_name: &'static str },

    /// Ingesting a field failed.
    #[error("Error ingesting field {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<IngestError>,
    },

    /// Ingesting a sequence element failed.
    #[error("Error ingesting element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// Wrap an error with the field that produced it.
    pub fn in_field(field: &'static str, source: IngestError) -> Self {
        Self::Field {
            field,
            source: Box::new(source),
        }
    }

    /// Wrap an error with the sequence index that produced it.
    pub fn at_index(index: usize, source: IngestError) -> Self {
        Self::Element {
            index,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_message() {
        let err = IngestError::in_field(
            "Children",
            IngestError::at_index(2, IngestError::UnnamedRecord),
        );
        assert_eq!(
            err.to_string(),
            "Error ingesting field Children: Error ingesting element 2: Record has no type name"
        );
    }
}
