use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A required render option is missing or unusable. Raised before any fetch.
    #[error("options required: {0}")]
    Config(String),

    /// A data or template file could not be retrieved.
    #[error("Failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// A derived column function failed for one row.
    #[error("Derived column '{column}' failed on row {row}: {source}")]
    Derivation {
        column: String,
        row: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No filter control for {0:?}")]
    UnknownFilter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
