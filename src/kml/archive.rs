//! KML / KMZ decoding.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::FormatError;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Input container recognized from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Kml,
    Kmz,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".kml") {
            Some(DocumentKind::Kml)
        } else if lower.ends_with(".kmz") {
            Some(DocumentKind::Kmz)
        } else {
            None
        }
    }
}

/// Decode a `.kml` or `.kmz` file into KML text.
///
/// For KMZ the first archive entry ending in `.kml` is used. Text that is not
/// valid UTF-8 is decoded lossily.
pub fn decode(bytes: &[u8], file_name: &str) -> Result<String, FormatError> {
    match DocumentKind::from_file_name(file_name) {
        Some(DocumentKind::Kml) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Some(DocumentKind::Kmz) => read_kml_entry(bytes, file_name),
        None => Err(FormatError::UnsupportedExtension {
            file: file_name.to_string(),
        }),
    }
}

fn read_kml_entry(bytes: &[u8], file_name: &str) -> Result<String, FormatError> {
    let archive_err = |source| FormatError::Archive {
        file: file_name.to_string(),
        source,
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        if !entry.is_file() || !entry.name().to_lowercase().ends_with(".kml") {
            continue;
        }

        debug!("Reading '{}' from {}", entry.name(), file_name);

        let mut content = Vec::with_capacity(initial_capacity(entry.size()));
        entry
            .read_to_end(&mut content)
            .map_err(|e| archive_err(e.into()))?;
        return Ok(String::from_utf8_lossy(&content).into_owned());
    }

    Err(FormatError::NoKmlEntry {
        file: file_name.to_string(),
    })
}

/// The declared uncompressed size comes from the archive and is untrusted.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}
