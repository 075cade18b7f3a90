use clap::Parser;

/// Dataset published with the original marketing analysis.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/cindylozano/DataScienceTLG/Streamlit/Employee_data.csv";

pub const DEFAULT_LOGO: &str =
    "https://raw.githubusercontent.com/cindylozano/DataScienceTLG/Streamlit/SYN_logo.png";

/// Interactive dashboard over an employee performance dataset.
#[derive(Debug, Parser)]
#[command(name = "employee-dashboard", version, about)]
pub struct Args {
    /// Dataset location: http(s) URL or local .csv / .json / .parquet file.
    #[arg(long, env = "EMPLOYEE_DATA_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Sidebar logo (URL or local image path).
    #[arg(long, env = "DASHBOARD_LOGO", default_value = DEFAULT_LOGO)]
    pub logo: String,

    /// Hide the sidebar logo.
    #[arg(long)]
    pub no_logo: bool,

    /// Initial window width in points.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in points.
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

impl Args {
    /// Image URI for egui's loaders, `None` when disabled.
    pub fn logo_uri(&self) -> Option<String> {
        if self.no_logo || self.logo.is_empty() {
            return None;
        }
        if self.logo.contains("://") {
            Some(self.logo.clone())
        } else {
            Some(format!("file://{}", self.logo))
        }
    }
}
