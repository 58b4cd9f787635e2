//! Error types for loading and reconciling point documents.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Survey,
    Design,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRole::Survey => write!(f, "survey"),
            InputRole::Design => write!(f, "design"),
        }
    }
}

/// The input is not a KML document or a KMZ archive holding one.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("'{file}' must be a .kmz or .kml file")]
    UnsupportedExtension { file: String },

    #[error("KMZ archive '{file}' does not contain a .kml file")]
    NoKmlEntry { file: String },

    #[error("failed to open KMZ archive '{file}': {source}")]
    Archive {
        file: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("malformed KML in '{file}': {source}")]
    Xml {
        file: String,
        #[source]
        source: quick_xml::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("missing {0} document")]
    MissingInput(InputRole),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document decoding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("nothing to export: the last run produced no takeout rows")]
    ExportDisabled,

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
