mod csv;
mod json;
mod plotter;
mod text;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::plotter::PlotterFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Input:..,Output:..` lines for a serial plotter
    #[default]
    Plotter,
    Text,
    Csv,
    Json,
}

/// One tick of the simulation: the generated input and the filter's answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutput {
    pub index: u64,
    pub time_secs: f64,
    pub input: f32,
    pub output: f32,
}

pub trait Formatter: Send {
    fn format(&self, sample: &SampleOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

/// `visual_offset` only shifts the input trace of the plotter format; the
/// machine-readable formats report raw values.
pub fn create_formatter(
    format: OutputFormat,
    visual_offset: f32,
    verbose: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Plotter => Box::new(PlotterFormatter::new(visual_offset)),
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
