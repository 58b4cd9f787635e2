//! KML / KMZ document loading.
//!
//! Decodes the archive, parses point placemarks and loads the survey and
//! design documents concurrently.

mod archive;
mod parser;

use std::path::Path;

use tracing::info;

use crate::error::{Error, FormatError, InputRole, Result};
use crate::models::GeoPoint;

pub use archive::{decode, DocumentKind};
pub use parser::{parse, parse_coordinates};

/// Decode and parse one document already held in memory.
pub fn points_from_bytes(bytes: &[u8], file_name: &str) -> Result<Vec<GeoPoint>> {
    let text = decode(bytes, file_name)?;
    let points = parse(&text).map_err(|source| FormatError::Xml {
        file: file_name.to_string(),
        source,
    })?;
    Ok(points)
}

/// Read, decode and parse one document from disk.
pub async fn load_points(path: &Path) -> Result<Vec<GeoPoint>> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    // Reject unknown extensions before touching the file
    if DocumentKind::from_file_name(&file_name).is_none() {
        return Err(FormatError::UnsupportedExtension { file: file_name }.into());
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let points =
        tokio::task::spawn_blocking(move || points_from_bytes(&bytes, &file_name)).await??;

    info!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Load the survey and design documents concurrently.
///
/// Both must be present; the first failure aborts the pair.
pub async fn load_pair(
    survey: Option<&Path>,
    design: Option<&Path>,
) -> Result<(Vec<GeoPoint>, Vec<GeoPoint>)> {
    let survey = survey.ok_or(Error::MissingInput(InputRole::Survey))?;
    let design = design.ok_or(Error::MissingInput(InputRole::Design))?;

    tokio::try_join!(load_points(survey), load_points(design))
}
