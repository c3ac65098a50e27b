//! Configuration for the low-pass simulation.
//!
//! Defaults reproduce the reference setup: the second-order low-pass from
//! [`Coefficients::reference_lowpass`], a 1 kHz unit sine sampled at 20 kHz,
//! plotter output with a visual offset of 2.0, and a 5 ms delay per tick.
//!
//! Every field can be overridden from a TOML file; missing keys keep their
//! defaults:
//!
//! ```toml
//! [filter]
//! order = 2
//! b = [0.0, 0.020198, 0.0]
//! a = [1.0, -1.788622, 0.808858]
//!
//! [signal]
//! sample_rate = 20000.0
//! test_freq = 1000.0
//!
//! [output]
//! format = "csv"
//! tick_delay_ms = 0
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{FilterError, Result};
use crate::output::OutputFormat;
use crate::signal_processing::Coefficients;

/// Frequency specification
///
/// Can be given either as a frequency or as a period, which is handy when a
/// test tone is described by its cycle time.
///
/// # Parsing formats
/// - `1000` - frequency in Hz (no suffix)
/// - `1000hz` or `1000Hz` - frequency in Hz (explicit)
/// - `1khz` or `1kHz` - frequency in kHz
/// - `1000us` or `1000μs` - period in microseconds
///
/// # Example
/// ```
/// use lowpass_sim::config::Frequency;
///
/// let freq: Frequency = "1000us".parse().unwrap();
/// assert!((freq.as_hz() - 1000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency(f64);

impl Frequency {
    /// Create from frequency in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Create from period in microseconds
    pub fn from_period_us(us: f64) -> Self {
        Self(1_000_000.0 / us)
    }

    /// Get frequency in Hz
    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Get period in microseconds
    pub fn as_period_us(&self) -> f64 {
        1_000_000.0 / self.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}hz", self.0)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("us").or_else(|| s.strip_suffix("μs")) {
            let us: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid period: {}", s))?;
            if us <= 0.0 {
                return Err("period must be positive".to_string());
            }
            return Ok(Self::from_period_us(us));
        }

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("khz") {
            (num, 1000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        if value <= 0.0 || !value.is_finite() {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(value * scale))
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Filter order and coefficients
    pub filter: FilterConfig,
    /// Test tone parameters
    pub signal: SignalConfig,
    /// Reporting and pacing
    pub output: OutputConfig,
}

/// Filter order and coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter order (number of past samples retained)
    pub order: usize,
    /// Feedforward coefficients, `order + 1` values
    pub b: Vec<f64>,
    /// Feedback coefficients, `order + 1` values with `a[0] == 1`
    pub a: Vec<f64>,
}

/// Test tone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Test tone frequency in Hz
    pub test_freq: f64,
    /// Test tone peak amplitude
    pub amplitude: f64,
}

/// Reporting and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Line format for each tick
    pub format: OutputFormat,
    /// Offset added to the input trace in plotter output
    pub visual_offset: f32,
    /// Delay between ticks in milliseconds
    pub tick_delay_ms: u64,
    /// Delay before the first tick in milliseconds
    pub startup_delay_ms: u64,
}

impl FilterConfig {
    pub fn coefficients(&self) -> Coefficients {
        Coefficients::new(self.b.clone(), self.a.clone())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        let coeffs = Coefficients::reference_lowpass();
        Self {
            order: coeffs.order(),
            b: coeffs.b,
            a: coeffs.a,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_rate: 20000.0,
            test_freq: 1000.0,
            amplitude: 1.0,
        }
    }
}

impl SignalConfig {
    /// Time step between samples in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plotter,
            visual_offset: 2.0,
            tick_delay_ms: 5,
            startup_delay_ms: 1000,
        }
    }
}

impl OutputConfig {
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl SimConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FilterError::ConfigFile(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FilterError::ConfigFile(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check everything that would make a simulation meaningless
    ///
    /// Filter coefficients are checked against the declared order. A test
    /// tone at or above Nyquist is allowed but logged, since it aliases.
    pub fn validate(&self) -> Result<()> {
        self.filter.coefficients().validate(self.filter.order)?;

        let fs = self.signal.sample_rate;
        if !(fs.is_finite() && fs > 0.0) {
            return Err(FilterError::Config(format!(
                "sample rate must be positive, got {}",
                fs
            )));
        }
        let freq = self.signal.test_freq;
        if !(freq.is_finite() && freq >= 0.0) {
            return Err(FilterError::Config(format!(
                "test frequency must be non-negative, got {}",
                freq
            )));
        }
        if !self.signal.amplitude.is_finite() {
            return Err(FilterError::Config("amplitude must be finite".to_string()));
        }
        if freq >= fs / 2.0 {
            log::warn!(
                "Test frequency {} Hz is at or above Nyquist ({} Hz) and will alias",
                freq,
                fs / 2.0
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_hz() {
        let freq: Frequency = "1000".parse().unwrap();
        assert_eq!(freq.as_hz(), 1000.0);
    }

    #[test]
    fn test_frequency_from_hz_explicit() {
        let freq: Frequency = "1000hz".parse().unwrap();
        assert_eq!(freq.as_hz(), 1000.0);

        let freq: Frequency = "440Hz".parse().unwrap();
        assert_eq!(freq.as_hz(), 440.0);
    }

    #[test]
    fn test_frequency_from_khz() {
        let freq: Frequency = "2.5kHz".parse().unwrap();
        assert_eq!(freq.as_hz(), 2500.0);
    }

    #[test]
    fn test_frequency_from_period() {
        let freq: Frequency = "500us".parse().unwrap();
        assert!((freq.as_hz() - 2000.0).abs() < 1e-9);
        assert!((freq.as_period_us() - 500.0).abs() < 1e-9);

        let freq: Frequency = "500μs".parse().unwrap();
        assert!((freq.as_hz() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_invalid() {
        assert!("abc".parse::<Frequency>().is_err());
        assert!("-100hz".parse::<Frequency>().is_err());
        assert!("0us".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::from_hz(1000.0).to_string(), "1000.000hz");
    }

    #[test]
    fn test_defaults_are_reference_setup() {
        let config = SimConfig::default();
        assert_eq!(config.filter.order, 2);
        assert_eq!(config.signal.sample_rate, 20000.0);
        assert_eq!(config.signal.test_freq, 1000.0);
        assert_eq!(config.signal.dt(), 1.0 / 20000.0);
        assert_eq!(config.output.format, OutputFormat::Plotter);
        assert_eq!(config.output.visual_offset, 2.0);
        assert_eq!(config.output.tick_delay(), Duration::from_millis(5));
        assert_eq!(config.output.startup_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [signal]
            test_freq = 250.0

            [output]
            format = "csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.signal.test_freq, 250.0);
        assert_eq!(config.signal.sample_rate, 20000.0);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.filter, FilterConfig::default());
    }

    #[test]
    fn test_toml_filter_section() {
        let config = SimConfig::from_toml_str(
            r#"
            [filter]
            order = 1
            b = [0.5, 0.5]
            a = [1.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.order, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_filter() {
        let mut config = SimConfig::default();
        config.filter.order = 3;
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_rejects_bad_sample_rate() {
        let mut config = SimConfig::default();
        config.signal.sample_rate = 0.0;
        assert!(matches!(config.validate(), Err(FilterError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            SimConfig::from_toml_str("[signal\n"),
            Err(FilterError::ConfigFile(_))
        ));
    }
}
