use thiserror::Error;

/// Errors that abort the conversion of a whole source.
///
/// Malformed verse markers, missing book codes and similar local problems are
/// not errors: they are recovered and reported as [`crate::diagnostics::Diagnostic`]s.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Not a USFX document: expected root element <usfx>, found <{found}>")]
    NotUsfx { found: String },

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Invalid attribute at position {position}: {source}")]
    Attribute {
        position: u64,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("Unbalanced markup: {0}")]
    Unbalanced(String),

    #[error("Elements nested deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: u64 },

    #[error("Strict mode: {count} diagnostic(s) reported")]
    Strict { count: usize },
}
