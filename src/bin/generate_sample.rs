//! Writes a deterministic synthetic employee dataset for offline use.
//!
//! Usage:
//!   generate_sample                          # 300 rows → Employee_data.csv
//!   generate_sample -n 1000 -o data.parquet  # parquet output, chosen by extension

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;

const FIRST_NAMES: [&str; 12] = [
    "Ana", "Luis", "Sofia", "Carlos", "Elena", "Jorge", "Lucia", "Miguel", "Paula", "Diego",
    "Marta", "Pablo",
];
const LAST_NAMES: [&str; 10] = [
    "Garcia", "Lopez", "Martinez", "Hernandez", "Perez", "Sanchez", "Ramirez", "Torres",
    "Flores", "Rivera",
];
/// (position, base salary)
const POSITIONS: [(&str, f64); 5] = [
    ("Marketing Assistant", 9_000.0),
    ("Content Creator", 11_000.0),
    ("Marketing Analyst", 14_000.0),
    ("Community Manager", 12_500.0),
    ("Marketing Manager", 22_000.0),
];
const MARITAL_STATUSES: [&str; 4] = ["Single", "Married", "Divorced", "Widowed"];

/// Synthetic employee dataset generator.
#[derive(Parser)]
#[command(name = "generate_sample", about = "Write a synthetic employee dataset")]
struct Args {
    /// Number of employees.
    #[arg(short = 'n', long, default_value_t = 300)]
    rows: usize,

    /// Output file; `.csv` or `.parquet`.
    #[arg(short, long, default_value = "Employee_data.csv")]
    output: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range(0, items.len() as i64 - 1) as usize]
    }
}

struct Employee {
    id: i64,
    name: String,
    performance_score: i64,
    salary: f64,
    position: String,
    average_work_hours: f64,
    birth_date: NaiveDate,
    gender: String,
    marital_status: String,
    hiring_date: NaiveDate,
    satisfaction_level: i64,
    last_performance_date: NaiveDate,
    absences: i64,
    age: i64,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Result<Vec<Employee>> {
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1).context("reference date")?;
    let mut employees = Vec::with_capacity(rows);

    for id in 0..rows as i64 {
        let gender = if rng.next_f64() < 0.55 { "F" } else { "M" };
        // Scores cluster around 3.
        let performance_score = match rng.next_f64() {
            p if p < 0.08 => 1,
            p if p < 0.25 => 2,
            p if p < 0.85 => 3,
            _ => 4,
        };
        let &(position, base_salary) = rng.pick(&POSITIONS);
        let age = rng.range(22, 60);
        // Low performers never reach the top of the hours range.
        let hours_cap = if performance_score == 1 { 4_450.0 } else { 4_900.0 };
        let hours_mean = if gender == "F" { 4_420.0 } else { 4_380.0 };
        let average_work_hours = rng.gauss(hours_mean, 120.0).clamp(4_000.0, hours_cap);
        let seniority = (age as f64 - 22.0) * 180.0;

        let birth_date = reference - Duration::days(age * 365 + rng.range(0, 364));
        let hiring_date = reference - Duration::days(rng.range(90, 15 * 365));
        let last_performance_date = reference - Duration::days(rng.range(10, 300));

        employees.push(Employee {
            id,
            name: format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES)),
            performance_score,
            salary: (base_salary + seniority + rng.gauss(0.0, 800.0)).round().max(6_000.0),
            position: position.to_string(),
            average_work_hours: (average_work_hours * 10.0).round() / 10.0,
            birth_date,
            gender: gender.to_string(),
            marital_status: rng.pick(&MARITAL_STATUSES).to_string(),
            hiring_date,
            satisfaction_level: rng.range(1, 5),
            last_performance_date,
            absences: rng.range(0, 12),
            age,
        });
    }
    Ok(employees)
}

/// Column order of the original export, including columns the dashboard prunes.
const HEADER: [&str; 15] = [
    "id_employee",
    "name_employee",
    "birth_date",
    "age",
    "gender",
    "marital_status",
    "hiring_date",
    "position",
    "salary",
    "performance_score",
    "last_performance_date",
    "average_work_hours",
    "satisfaction_level",
    "absences",
    "department",
];

fn write_csv(path: &Path, employees: &[Employee]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADER)?;
    for e in employees {
        writer.write_record([
            e.id.to_string(),
            e.name.clone(),
            e.birth_date.to_string(),
            e.age.to_string(),
            e.gender.clone(),
            e.marital_status.clone(),
            e.hiring_date.to_string(),
            e.position.clone(),
            e.salary.to_string(),
            e.performance_score.to_string(),
            e.last_performance_date.to_string(),
            e.average_work_hours.to_string(),
            e.satisfaction_level.to_string(),
            e.absences.to_string(),
            "Marketing".to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - 719_163
}

fn write_parquet(path: &Path, employees: &[Employee]) -> Result<()> {
    let text = |f: fn(&Employee) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(employees.iter().map(f).collect::<Vec<_>>()))
    };
    let ints = |f: fn(&Employee) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(employees.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&Employee) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(employees.iter().map(f).collect::<Vec<_>>()))
    };
    let dates = |f: fn(&Employee) -> NaiveDate| -> ArrayRef {
        Arc::new(Date32Array::from(
            employees.iter().map(|e| days_since_epoch(f(e))).collect::<Vec<_>>(),
        ))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("id_employee", ints(|e| e.id)),
        ("name_employee", text(|e| e.name.as_str())),
        ("birth_date", dates(|e| e.birth_date)),
        ("age", ints(|e| e.age)),
        ("gender", text(|e| e.gender.as_str())),
        ("marital_status", text(|e| e.marital_status.as_str())),
        ("hiring_date", dates(|e| e.hiring_date)),
        ("position", text(|e| e.position.as_str())),
        ("salary", floats(|e| e.salary)),
        ("performance_score", ints(|e| e.performance_score)),
        ("last_performance_date", dates(|e| e.last_performance_date)),
        ("average_work_hours", floats(|e| e.average_work_hours)),
        ("satisfaction_level", ints(|e| e.satisfaction_level)),
        ("absences", ints(|e| e.absences)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, a)| a).collect())
        .context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let employees = generate(args.rows, &mut rng)?;

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &employees)?,
        "parquet" | "pq" => write_parquet(&args.output, &employees)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} employees to {}", employees.len(), args.output.display());
    println!("Wrote {} employees to {}", employees.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Columns the dashboard requires from every dataset.
    const DASHBOARD_COLUMNS: [&str; 13] = [
        "name_employee",
        "performance_score",
        "salary",
        "position",
        "average_work_hours",
        "birth_date",
        "gender",
        "marital_status",
        "hiring_date",
        "satisfaction_level",
        "last_performance_date",
        "absences",
        "age",
    ];

    fn written_csv(seed: u64, rows: usize) -> String {
        let employees = generate(rows, &mut SimpleRng::new(seed)).unwrap();
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_csv(file.path(), &employees).unwrap();
        std::fs::read_to_string(file.path()).unwrap()
    }

    #[test]
    fn same_seed_writes_identical_csv() {
        assert_eq!(written_csv(7, 50), written_csv(7, 50));
        assert_ne!(written_csv(7, 50), written_csv(8, 50));
    }

    #[test]
    fn csv_carries_dashboard_columns_and_valid_values() {
        let text = written_csv(42, 40);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        for col in DASHBOARD_COLUMNS {
            assert!(headers.iter().any(|h| h == col), "missing {col}");
        }

        let idx = |name: &str| headers.iter().position(|h| h == name).unwrap();
        let (score, hours, birth) = (
            idx("performance_score"),
            idx("average_work_hours"),
            idx("birth_date"),
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 40);
        for row in &rows {
            let s: i64 = row[score].parse().unwrap();
            assert!((1..=4).contains(&s));
            let h: f64 = row[hours].parse().unwrap();
            assert!((4_000.0..=4_900.0).contains(&h));
            assert!(NaiveDate::parse_from_str(&row[birth], "%Y-%m-%d").is_ok());
        }
    }

    #[test]
    fn low_performers_stay_below_hours_cap() {
        let employees = generate(500, &mut SimpleRng::new(3)).unwrap();
        assert!(employees
            .iter()
            .filter(|e| e.performance_score == 1)
            .all(|e| e.average_work_hours <= 4_450.0));
    }

    #[test]
    fn epoch_offset_matches_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_since_epoch(epoch), 0);
        let date = NaiveDate::from_ymd_opt(1983, 10, 1).unwrap();
        assert_eq!(days_since_epoch(date), 5021);
    }
}
