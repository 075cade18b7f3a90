use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;

use super::model::{EmployeeRecord, EmployeeTable, REQUIRED_COLUMNS, parse_date};

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the employee table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// `http://` or `https://` URL, fetched once per session.
    Remote(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Remote(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    fn format(&self) -> Result<Format> {
        match self {
            DataSource::File(path) => Format::from_path(path),
            // Query strings and fragments are not part of the file name.
            DataSource::Remote(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                Ok(Format::from_path(Path::new(path)).unwrap_or(Format::Csv))
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the employee table from a local file or a remote URL.
pub fn load(source: &DataSource) -> Result<EmployeeTable> {
    let format = source.format()?;
    let table = match source {
        DataSource::File(path) => load_file(path)?,
        DataSource::Remote(url) => {
            let body = reqwest::blocking::get(url)
                .with_context(|| format!("fetching {url}"))?
                .error_for_status()
                .with_context(|| format!("fetching {url}"))?
                .bytes()
                .with_context(|| format!("reading response body from {url}"))?;
            log::debug!("fetched {} bytes from {url}", body.len());
            match format {
                Format::Csv => read_csv(&body[..])?,
                Format::Json => {
                    read_json(std::str::from_utf8(&body).context("response is not UTF-8")?)?
                }
                Format::Parquet => read_parquet(body)?,
            }
        }
    };

    log::info!(
        "Loaded {} employees from {source} ({} genders, {} marital statuses)",
        table.len(),
        table.genders.len(),
        table.marital_statuses.len()
    );
    Ok(table)
}

/// Load the employee table from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the 13 required columns
/// * `.json`    – `[{ "name_employee": ..., "performance_score": ..., ... }, ...]`
/// * `.parquet` – one column per field; dates as Date32/Date64 or text
pub fn load_file(path: &Path) -> Result<EmployeeTable> {
    match Format::from_path(path)? {
        Format::Csv => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        Format::Json => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        Format::Parquet => {
            let file = std::fs::File::open(path).context("opening parquet file")?;
            read_parquet(file)
        }
    }
}

/// Fail with every required column that `present` lacks.
fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.contains(col))
        .collect();
    if !missing.is_empty() {
        bail!("Dataset is missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; columns outside the schema are dropped.
pub fn read_csv<R: Read>(input: R) -> Result<EmployeeTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter())?;

    let records = reader
        .deserialize::<EmployeeRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<_>>>()?;

    EmployeeTable::from_records(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
pub fn read_json(text: &str) -> Result<EmployeeTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        check_columns(obj.keys().map(String::as_str)).with_context(|| format!("Row {i}"))?;
        let record: EmployeeRecord =
            serde_json::from_value(row.clone()).with_context(|| format!("Row {i}"))?;
        records.push(record);
    }

    EmployeeTable::from_records(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet written by Pandas (`df.to_parquet()`) or Polars.
///
/// Numeric columns may be any integer or float type; text columns Utf8 or
/// LargeUtf8; date columns Date32, Date64, or date text.
fn read_parquet<T: ChunkReader + 'static>(input: T) -> Result<EmployeeTable> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(input).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_records(&batch, records.len())?);
    }

    EmployeeTable::from_records(records)
}

/// Required columns of one record batch, resolved by name.
struct BatchColumns {
    columns: HashMap<&'static str, ArrayRef>,
}

impl BatchColumns {
    fn resolve(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;
        let mut columns = HashMap::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|e| anyhow::anyhow!("Parquet column '{name}': {e}"))?;
            columns.insert(name, batch.column(idx).clone());
        }
        Ok(BatchColumns { columns })
    }

    fn get(&self, name: &str) -> Result<&ArrayRef> {
        self.columns
            .get(name)
            .with_context(|| format!("Parquet column '{name}' not resolved"))
    }

    fn text(&self, name: &str) -> Result<Vec<String>> {
        let arr = cast(self.get(name)?, &DataType::Utf8)
            .with_context(|| format!("column '{name}' is not text"))?;
        let arr = arr.as_string::<i32>();
        (0..arr.len())
            .map(|row| {
                if arr.is_null(row) {
                    bail!("Row {row}: '{name}' is null");
                }
                Ok(arr.value(row).to_string())
            })
            .collect()
    }

    fn numbers(&self, name: &str) -> Result<Vec<f64>> {
        let arr = cast(self.get(name)?, &DataType::Float64)
            .with_context(|| format!("column '{name}' is not numeric"))?;
        let arr = arr.as_primitive::<Float64Type>();
        (0..arr.len())
            .map(|row| {
                if arr.is_null(row) {
                    bail!("Row {row}: '{name}' is null");
                }
                Ok(arr.value(row))
            })
            .collect()
    }

    /// Native date columns are cast; text columns go through the lenient parser.
    fn dates(&self, name: &str) -> Result<Vec<Option<NaiveDate>>> {
        let col = self.get(name)?;
        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => {
                let arr = cast(col, &DataType::Utf8)
                    .with_context(|| format!("column '{name}' is not text"))?;
                Ok(arr
                    .as_string::<i32>()
                    .iter()
                    .map(|v| v.and_then(parse_date))
                    .collect())
            }
            _ => {
                let arr = cast(col, &DataType::Date32)
                    .with_context(|| format!("column '{name}' is not a date"))?;
                let arr = arr.as_primitive::<Date32Type>();
                Ok((0..arr.len())
                    .map(|row| {
                        if arr.is_null(row) {
                            None
                        } else {
                            arr.value_as_date(row)
                        }
                    })
                    .collect())
            }
        }
    }
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<EmployeeRecord>> {
    let cols = BatchColumns::resolve(batch)
        .with_context(|| format!("record batch starting at row {offset}"))?;

    let names = cols.text("name_employee")?;
    let scores = cols.numbers("performance_score")?;
    let salaries = cols.numbers("salary")?;
    let positions = cols.text("position")?;
    let hours = cols.numbers("average_work_hours")?;
    let birth_dates = cols.dates("birth_date")?;
    let genders = cols.text("gender")?;
    let statuses = cols.text("marital_status")?;
    let hiring_dates = cols.dates("hiring_date")?;
    let satisfaction = cols.numbers("satisfaction_level")?;
    let review_dates = cols.dates("last_performance_date")?;
    let absences = cols.numbers("absences")?;
    let ages = cols.numbers("age")?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        records.push(EmployeeRecord {
            name: names[row].clone(),
            performance_score: scores[row],
            salary: salaries[row],
            position: positions[row].clone(),
            average_work_hours: hours[row],
            birth_date: birth_dates[row],
            gender: genders[row].clone(),
            marital_status: statuses[row].clone(),
            hiring_date: hiring_dates[row],
            satisfaction_level: satisfaction[row],
            last_performance_date: review_dates[row],
            absences: absences[row],
            age: ages[row],
        });
    }
    Ok(records)
}
