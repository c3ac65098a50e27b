use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::config::SimConfig;
use crate::error::Result;
use crate::output::{Formatter, SampleOutput};
use crate::signal_processing::DirectFormFilter;
use crate::simulation::SineOscillator;

/// Test tone feeding a single filter instance
///
/// One tick generates one input sample, runs it through the filter and
/// returns the pair. The simulator owns both the oscillator and the filter,
/// so separate simulators never share history.
pub struct Simulator {
    oscillator: SineOscillator,
    filter: DirectFormFilter,
    ticks: u64,
}

impl Simulator {
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let filter =
            DirectFormFilter::new(config.filter.order, &config.filter.b, &config.filter.a)?;
        let oscillator = SineOscillator::new(config.signal.test_freq, config.signal.sample_rate)
            .with_amplitude(config.signal.amplitude);

        Ok(Self::from_parts(oscillator, filter))
    }

    pub fn from_parts(oscillator: SineOscillator, filter: DirectFormFilter) -> Self {
        Self {
            oscillator,
            filter,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) -> SampleOutput {
        let index = self.oscillator.sample_index();
        let time_secs = self.oscillator.time_secs();
        let input = self.oscillator.next_sample();
        let output = self.filter.process_sample(input as f64) as f32;
        self.ticks += 1;

        log::trace!("tick {}: input {:.6} output {:.6}", index, input, output);

        SampleOutput {
            index,
            time_secs,
            input,
            output,
        }
    }

    /// Run `count` ticks back to back without pacing
    pub fn run_block(&mut self, count: usize) -> Vec<SampleOutput> {
        (0..count).map(|_| self.tick()).collect()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn filter(&self) -> &DirectFormFilter {
        &self.filter
    }

    pub fn oscillator(&self) -> &SineOscillator {
        &self.oscillator
    }
}

/// Pacing for [`run`]
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many ticks; `None` runs until the writer fails
    pub max_ticks: Option<u64>,
    /// Sleep between ticks
    pub tick_delay: Duration,
}

/// Stream formatted ticks to `out`
///
/// Writes the formatter's header (if any), then one line per tick. Returns
/// the number of ticks written.
pub fn run<W: Write>(
    sim: &mut Simulator,
    formatter: &dyn Formatter,
    out: &mut W,
    options: &RunOptions,
) -> Result<u64> {
    log::debug!(
        "Starting run: max_ticks = {:?}, tick delay = {:?}",
        options.max_ticks,
        options.tick_delay
    );

    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut written = 0u64;
    while options.max_ticks.is_none_or(|max| written < max) {
        let sample = sim.tick();
        writeln!(out, "{}", formatter.format(&sample))?;
        out.flush()?;
        written += 1;

        if !options.tick_delay.is_zero() {
            thread::sleep(options.tick_delay);
        }
    }

    log::debug!("Run finished after {} ticks", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{CsvFormatter, PlotterFormatter};
    use crate::signal_processing::Coefficients;

    #[test]
    fn test_tick_pairs_input_and_output() {
        let mut sim = Simulator::new(&SimConfig::default()).unwrap();
        let first = sim.tick();
        assert_eq!(first.index, 0);
        assert_eq!(first.time_secs, 0.0);
        assert_eq!(first.input, 0.0);
        assert_eq!(first.output, 0.0);

        let second = sim.tick();
        assert_eq!(second.index, 1);
        assert!((second.time_secs - 1.0 / 20000.0).abs() < 1e-15);
        assert!(second.input > 0.0);
        assert_eq!(sim.ticks(), 2);
    }

    #[test]
    fn test_run_block_matches_standalone_filter() {
        let mut sim = Simulator::new(&SimConfig::default()).unwrap();
        let results = sim.run_block(64);

        let mut filter =
            DirectFormFilter::from_coefficients(&Coefficients::reference_lowpass()).unwrap();
        for r in &results {
            assert_eq!(r.output, filter.process_sample(r.input as f64) as f32);
        }
    }

    #[test]
    fn test_run_writes_header_and_lines() {
        let mut sim = Simulator::new(&SimConfig::default()).unwrap();
        let mut out = Vec::new();
        let options = RunOptions {
            max_ticks: Some(10),
            tick_delay: Duration::ZERO,
        };

        let written = run(&mut sim, &CsvFormatter, &mut out, &options).unwrap();
        assert_eq!(written, 10);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "ts,index,time_s,input,output");
    }

    #[test]
    fn test_run_zero_ticks() {
        let mut sim = Simulator::new(&SimConfig::default()).unwrap();
        let mut out = Vec::new();
        let options = RunOptions {
            max_ticks: Some(0),
            tick_delay: Duration::ZERO,
        };
        let written = run(&mut sim, &PlotterFormatter::new(2.0), &mut out, &options).unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::default();
        config.filter.a[0] = 0.0;
        assert!(Simulator::new(&config).is_err());
    }
}
