pub mod aggregate;

use crate::error::{DashboardError, Result};
use csv::StringRecord;
use log::{debug, error, info, warn};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub use aggregate::{sum_columns, CellPolicy, Totals};

/// Location of the cleaned results file, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "../Clean_Data/2024/clean_dataset_legislative_2024.csv";

/// Field separator used by the cleaned dataset
pub const DELIMITER: u8 = b';';

/// Result columns the dashboard reads, under their canonical names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Registered,
    Voters,
    Abstentionists,
    Cast,
    Blank,
    Invalid,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Registered,
        Column::Voters,
        Column::Abstentionists,
        Column::Cast,
        Column::Blank,
        Column::Invalid,
    ];

    /// Canonical (English) header
    pub fn name(self) -> &'static str {
        match self {
            Column::Registered => "Registered",
            Column::Voters => "Voters",
            Column::Abstentionists => "Abstentionists",
            Column::Cast => "Cast",
            Column::Blank => "Blank",
            Column::Invalid => "Invalid",
        }
    }

    /// Header as published by the Ministry of the Interior
    pub fn source_label(self) -> &'static str {
        match self {
            Column::Registered => "Inscrits",
            Column::Voters => "Votants",
            Column::Abstentionists => "Abstentions",
            Column::Cast => "Exprimés",
            Column::Blank => "Blancs",
            Column::Invalid => "Nuls",
        }
    }
}

/// In-memory results table, one row per constituency.
/// Never mutated after construction.
#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Dataset {
    /// Parse a semicolon-delimited table with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        check_header(&headers)?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?);
        }

        let mut dataset = Self { headers, rows };
        dataset.rename_columns()?;
        Ok(dataset)
    }

    /// Build a dataset from in-memory rows, applying the same header renames
    pub fn from_rows<H, R, F>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        check_header(&headers)?;

        let mut records = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            let record: StringRecord = row.into_iter().collect();
            if record.len() != headers.len() {
                return Err(DashboardError::parse(
                    format!("row {}", idx + 1),
                    format!("expected {} fields, found {}", headers.len(), record.len()),
                ));
            }
            records.push(record);
        }

        let mut dataset = Self {
            headers,
            rows: records,
        };
        dataset.rename_columns()?;
        Ok(dataset)
    }

    /// Replace source headers with their canonical names, leaving others untouched.
    /// Fails when a canonical name ends up on more than one column.
    fn rename_columns(&mut self) -> Result<()> {
        for column in Column::ALL {
            match self.headers.iter().position(|h| h == column.source_label()) {
                Some(idx) => {
                    debug!("renaming column {:?} -> {:?}", column.source_label(), column.name());
                    self.headers[idx] = column.name().to_string();
                }
                None if !self.has_column(column.name()) => {
                    warn!("source column {:?} not present", column.source_label());
                }
                None => {}
            }

            let count = self.headers.iter().filter(|h| *h == column.name()).count();
            if count > 1 {
                return Err(DashboardError::parse(
                    "header",
                    format!("column {:?} appears {count} times", column.name()),
                ));
            }
        }
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

/// Reject headers that cannot come from a semicolon-separated export
fn check_header(headers: &[String]) -> Result<()> {
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::parse("header", "missing header row"));
    }
    // A single column holding commas or tabs means the file uses another separator
    if headers.len() == 1 && headers[0].contains([',', '\t']) {
        return Err(DashboardError::parse(
            "header",
            "expected ';' as field delimiter",
        ));
    }
    Ok(())
}

/// Read and parse the results file at `path`
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DashboardError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DashboardError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let dataset = Dataset::from_reader(io::BufReader::new(file))?;
    info!(
        "loaded {} rows, {} columns from {}",
        dataset.len(),
        dataset.headers().len(),
        path.display()
    );
    Ok(dataset)
}

/// Anything that can hand renderers the (shared, immutable) dataset
pub trait DatasetSource {
    fn dataset(&self) -> Result<Arc<Dataset>>;
}

/// Process-wide memoized loader.
///
/// The file is read on the first call to [`DatasetCache::load`]; every later
/// call returns the same `Arc`, or the same error if the first read failed.
pub struct DatasetCache {
    path: PathBuf,
    slot: OnceLock<Result<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: OnceLock::new(),
        }
    }

    /// Cache already holding `dataset`; the path is informational only
    pub fn preloaded(path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        Self {
            path: path.into(),
            slot: OnceLock::from(Ok(Arc::new(dataset))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<Dataset>> {
        self.slot
            .get_or_init(|| {
                // Logged once; later calls hand back the cached error silently
                load_dataset(&self.path).map(Arc::new).inspect_err(|e| error!("{e}"))
            })
            .clone()
    }
}

impl DatasetSource for DatasetCache {
    fn dataset(&self) -> Result<Arc<Dataset>> {
        self.load()
    }
}
