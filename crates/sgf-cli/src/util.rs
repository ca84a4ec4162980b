use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use sgf_analysis::{
    catalog::{StateCatalog, StateDefinition},
    dataset::SurvivalDataset,
    record::SurvivalRecord,
};
use tracing::info;

use crate::schema::{state::StateRow, survival::SurvivalRow};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `rows` as CSV with a header line.
    pub fn write_csv<T, I>(&mut self, rows: I) -> anyhow::Result<()>
    where
        T: serde::Serialize,
        I: IntoIterator<Item = T>,
    {
        let display_path = self.display_path();
        let mut writer = csv::Writer::from_writer(&mut *self);
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Failed to write CSV row to {display_path}"))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {display_path}"))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Deserializes every row of a headed CSV stream.
///
/// `source` names the stream in error messages.
pub fn read_csv<T, R>(file_kind: &str, source: &str, reader: R) -> anyhow::Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            // Line 1 is the header
            row.with_context(|| {
                format!("Failed to parse {file_kind} CSV {source} at line {}", i + 2)
            })
        })
        .collect()
}

pub fn read_csv_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    read_csv(
        file_kind,
        &path.display().to_string(),
        io::BufReader::new(file),
    )
}

/// Read and validate survival records from a CSV stream
///
/// Rows that parse but hold impossible values (e.g. a `NaN` or negative
/// duration) are rejected with their line number.
pub fn read_survival_records<R>(source: &str, reader: R) -> anyhow::Result<Vec<SurvivalRecord>>
where
    R: io::Read,
{
    read_csv::<SurvivalRow, _>("survival data", source, reader)?
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            // Line 1 is the header
            SurvivalRecord::try_from(row).with_context(|| {
                format!("Invalid survival data CSV {source} at line {}", i + 2)
            })
        })
        .collect()
}

/// Read the state catalog from a triples CSV file
///
/// # Errors
///
/// Returns error if the file cannot be read, parsed, or violates the catalog
/// invariants
pub fn read_catalog_file<P>(path: P) -> anyhow::Result<StateCatalog>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let rows = read_csv_file::<StateRow, _>("state catalog", path)?;
    StateCatalog::new(rows.into_iter().map(StateDefinition::from))
        .with_context(|| format!("Invalid state catalog: {}", path.display()))
}

/// Read survival records and their state catalog
///
/// # Arguments
///
/// * `survival_path` - Path to `sgf_survival_data.csv`
/// * `catalog_path` - Path to `sgf_triples.csv`
///
/// # Errors
///
/// Returns error if either file cannot be opened or parsed
pub fn read_dataset<P, Q>(survival_path: P, catalog_path: Q) -> anyhow::Result<SurvivalDataset>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let survival_path = survival_path.as_ref();
    let file = File::open(survival_path).with_context(|| {
        format!(
            "Failed to open survival data file: {}",
            survival_path.display()
        )
    })?;
    let records = read_survival_records(
        &survival_path.display().to_string(),
        io::BufReader::new(file),
    )?;
    let catalog = read_catalog_file(catalog_path)?;

    info!(
        records = records.len(),
        states = catalog.len(),
        "loaded survival dataset"
    );

    Ok(SurvivalDataset::new(records, catalog))
}
