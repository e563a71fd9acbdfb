use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::models::{DatasetKind, VenueRecord};

/// Errors that can occur while loading a venue dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Header names of the columns a dataset must provide
#[derive(Debug, Clone)]
pub struct DatasetColumns {
    pub name: String,
    pub score: String,
    pub category: String,
    pub address: String,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            name: "NOME".to_string(),
            score: "PONTUACAO".to_string(),
            category: "TIPO".to_string(),
            address: "LOCAL".to_string(),
        }
    }
}

/// Column positions resolved against a header row
struct ColumnIndex {
    name: usize,
    score: usize,
    category: usize,
    address: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &DatasetColumns) -> Result<Self, DatasetError> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))
        };

        Ok(Self {
            name: position(&columns.name)?,
            score: position(&columns.score)?,
            category: position(&columns.category)?,
            address: position(&columns.address)?,
        })
    }
}

/// Load a dataset file
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    kind: DatasetKind,
    delimiter: u8,
    columns: &DatasetColumns,
) -> Result<Vec<VenueRecord>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records = read_dataset(file, kind, delimiter, columns)?;

    tracing::info!("Loaded {} {} venues from {}", records.len(), kind.as_str(), path.display());

    Ok(records)
}

/// Read venues from any CSV source
///
/// Rows without a name, score or category are skipped; rows without an
/// address are kept with an empty one.
pub fn read_dataset<R: Read>(
    reader: R,
    kind: DatasetKind,
    delimiter: u8,
    columns: &DatasetColumns,
) -> Result<Vec<VenueRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        let field = |i: usize| {
            row.get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let name = field(index.name);
        let score = field(index.score).and_then(parse_score);
        let category = field(index.category);

        match (name, score, category) {
            (Some(name), Some(score), Some(category)) => records.push(VenueRecord {
                name: name.to_string(),
                address: field(index.address).unwrap_or_default().to_string(),
                category: category.to_string(),
                score,
                dataset_kind: kind,
                coordinate: None,
            }),
            _ => {
                skipped += 1;
                tracing::debug!("Skipping incomplete {} row {}", kind.as_str(), idx + 1);
            }
        }
    }

    if skipped > 0 {
        tracing::info!("Skipped {} incomplete {} rows", skipped, kind.as_str());
    }

    Ok(records)
}

/// Parse a score written with either `.` or `,` as decimal separator
fn parse_score(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
}
