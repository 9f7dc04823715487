//! Playlist export reading and failure table writing.
//!
//! The input is a CSV export with a header row. Each row is kept twice:
//! as a typed [`TrackRecord`] for the pipeline, and as the raw
//! [`csv::StringRecord`] so that failed rows can be written back exactly as
//! they were read, including columns the pipeline never looks at.

mod record;

pub use record::{TrackRecord, columns, parse_release_year};

use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;

/// One input row: its position, the raw fields and the typed record.
#[derive(Debug, Clone)]
pub struct PlaylistRow {
    /// 0-based position among the data rows
    pub index: usize,
    /// Fields exactly as read
    pub raw: StringRecord,
    pub track: TrackRecord,
}

/// A fully loaded playlist export.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub headers: StringRecord,
    pub rows: Vec<PlaylistRow>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a playlist from any reader. `source` names it in errors.
    pub fn from_reader<R: io::Read>(reader: R, source: &Path) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| TableError::read(source, e))?
            .clone();

        for column in columns::REQUIRED {
            if !headers.iter().any(|h| h == *column) {
                return Err(TableError::MissingColumn {
                    path: source.to_path_buf(),
                    column: (*column).to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let raw = result.map_err(|e| TableError::read(source, e))?;
            let track: TrackRecord =
                raw.deserialize(Some(&headers))
                    .map_err(|e| TableError::Parse {
                        path: source.to_path_buf(),
                        line: raw.position().map(|p| p.line()).unwrap_or_default(),
                        message: e.to_string(),
                    })?;
            rows.push(PlaylistRow { index, raw, track });
        }

        tracing::debug!(path = ?source, rows = rows.len(), "Loaded playlist");
        Ok(Self { headers, rows })
    }
}

/// Read the whole playlist export into memory.
pub fn read_playlist(path: &Path) -> Result<Playlist, TableError> {
    let file = std::fs::File::open(path).map_err(|e| TableError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    Playlist::from_reader(io::BufReader::new(file), path)
}

/// Write rows back out with the input's header row, in the given order.
pub fn write_failures<'a>(
    path: &Path,
    headers: &StringRecord,
    rows: impl IntoIterator<Item = &'a PlaylistRow>,
) -> Result<(), TableError> {
    let write_err = |e: csv::Error| TableError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(headers).map_err(write_err)?;
    for row in rows {
        writer.write_record(&row.raw).map_err(write_err)?;
    }
    writer.flush().map_err(|e| TableError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::info!(path = ?path, "Wrote failure table");
    Ok(())
}

/// Errors reading or writing playlist tables. Fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("{path} is missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed row in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl TableError {
    fn read(path: &Path, err: csv::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
